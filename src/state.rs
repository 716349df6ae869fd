use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::database::{
    MemoryPostRepository, MemoryUserRepository, PgPostRepository, PgUserRepository, PostRepository,
    UserRepository,
};

/// Shared handles passed to every handler through `State`
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub keys: JwtKeys,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { posts, users, keys }
    }

    pub fn postgres(pool: sqlx::PgPool, keys: JwtKeys) -> Self {
        Self::new(
            Arc::new(PgPostRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
            keys,
        )
    }

    pub fn in_memory(keys: JwtKeys) -> Self {
        Self::new(
            Arc::new(MemoryPostRepository::new()),
            Arc::new(MemoryUserRepository::new()),
            keys,
        )
    }
}
