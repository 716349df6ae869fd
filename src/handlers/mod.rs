// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth). Routing lives in app.rs.
pub mod protected;
pub mod public;
