pub mod posts;
pub mod profile;
pub mod token;
pub mod user;
