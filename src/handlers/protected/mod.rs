// handlers/protected/mod.rs - endpoints behind `jwt_auth_middleware`
//
// Every handler here receives the caller as `Extension<AuthUser>` and only
// touches rows the caller owns.

pub mod artworks;
pub mod auth;
pub mod categories;
pub mod projects;
