// handlers/public/mod.rs - endpoints that need no token: registration, login,
// public profiles and every read-only listing

pub mod artworks;
pub mod auth;
pub mod categories;
pub mod projects;
