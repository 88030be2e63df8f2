//! Domain models shared across crates.

pub mod auth;
pub mod chirp;
