pub mod auth;
pub mod chirps;
