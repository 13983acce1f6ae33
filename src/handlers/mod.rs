// handlers/mod.rs - two handler tiers
//
// Public (no auth) and protected (JWT auth, `AuthUser` in request
// extensions). Routing lives in `app.rs`.

pub mod forms;
pub mod protected;
pub mod public;
