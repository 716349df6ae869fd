// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs after `jwt_auth_middleware` and reads the
// requester from `Extension<AuthUser>`.

pub mod comments;
pub mod likes;
pub mod posts;
pub mod profile;
pub mod utils;
