//! # chirpy_core
//!
//! Core domain logic for Chirpy: the authentication and session core, the
//! chirp domain, and the stores both of them persist through.

pub mod auth;
pub mod chirps;
pub mod clock;
pub mod db;
pub mod memory;
pub mod models;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
