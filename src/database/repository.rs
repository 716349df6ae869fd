use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{
    MutationOutcome, NewPost, Post, PostError, PostMutation, Profile, ProfileFields, User,
};

/// Errors from post/user repositories
#[derive(Debug, Error)]
pub enum StoreError {
    /// The id is not syntactically a post id. Kept apart from `PostNotFound`
    /// so the two causes stay distinguishable in logs.
    #[error("Malformed post id: {0}")]
    MalformedId(String),

    #[error("Post not found: {0}")]
    PostNotFound(Uuid),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error(transparent)]
    Post(#[from] PostError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Parse a post id taken from a request path
pub fn parse_post_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|_| StoreError::MalformedId(raw.to_string()))
}

/// Parse a comment id; an unparsable id simply names no comment
pub fn parse_comment_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|_| StoreError::Post(PostError::CommentNotFound(raw.to_string())))
}

/// Storage for post documents and their embedded likes and comments
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post; the repository assigns id and date
    async fn create(&self, post: NewPost) -> Result<Post, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Post, StoreError>;

    /// Every post, newest first
    async fn find_all(&self) -> Result<Vec<Post>, StoreError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;

    /// Returns the number of posts removed
    async fn delete_all(&self) -> Result<u64, StoreError>;

    /// Persist the whole document, likes and comments included
    async fn save(&self, post: &Post) -> Result<(), StoreError>;

    /// Apply a mutation to the stored post and save it. Mutations on the
    /// same post never interleave.
    async fn update(
        &self,
        id: Uuid,
        mutation: PostMutation,
    ) -> Result<(Post, MutationOutcome), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// User and profile records. Only lookups are needed by the post handlers;
/// writes serve the profile route and the operator CLI.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn create_user(&self, user: User) -> Result<User, StoreError>;

    /// The user's profile with name and avatar joined in
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Create or replace the profile of an existing user
    async fn upsert_profile(&self, user: &User, fields: ProfileFields) -> Result<Profile, StoreError>;
}
