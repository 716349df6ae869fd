pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{MemoryPostRepository, MemoryUserRepository};
pub use postgres::{PgPostRepository, PgUserRepository};
pub use repository::{parse_comment_id, parse_post_id, PostRepository, StoreError, UserRepository};
