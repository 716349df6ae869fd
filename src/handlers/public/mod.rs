// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service information and liveness. Everything else sits behind the JWT
// middleware in handlers/protected.

pub mod service;

pub use service::{health, root};
