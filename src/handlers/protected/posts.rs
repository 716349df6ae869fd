use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::database::models::{NewPost, Post};
use crate::database::{parse_post_id, StoreError};
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validation::{JsonBody, Validator};

use super::utils::load_author;

/// Body of `POST /posts` and `POST /posts/comment/:id`
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl TextRequest {
    /// The validated text, or a 400 listing the `text` field
    pub fn into_text(self) -> ApiResult<String> {
        Validator::new()
            .not_empty("text", self.text.as_deref(), "Text is required")
            .finish()?;
        Ok(self.text.unwrap_or_default())
    }
}

/// Confirmation body for destructive operations
#[derive(Debug, Serialize)]
pub struct Removed {
    pub msg: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<u64>,
}

/// POST /posts - create a post authored by the requester
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(payload): JsonBody<TextRequest>,
) -> ApiResult<Json<Post>> {
    let text = payload.into_text()?;
    let author = load_author(&state, auth.id).await?;

    let post = state.posts.create(NewPost::by(&author, text)).await?;
    tracing::info!("User {} created post {}", auth.id, post.id);

    Ok(Json(post))
}

/// GET /posts - every post, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    let posts = state.posts.find_all().await?;
    Ok(Json(posts))
}

/// GET /posts/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Post>> {
    let id = parse_post_id(&id)?;
    let post = state.posts.find_by_id(id).await?;
    Ok(Json(post))
}

/// DELETE /posts - remove every post. Unscoped; any authenticated user may call it.
pub async fn delete_all(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Removed>> {
    let deleted = state.posts.delete_all().await?;
    tracing::warn!("User {} removed all {} posts", auth.id, deleted);

    Ok(Json(Removed {
        msg: "All posts removed",
        deleted: Some(deleted),
    }))
}

/// DELETE /posts/:id - only the post's owner may delete it
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Removed>> {
    let id = parse_post_id(&id)?;
    let post = state.posts.find_by_id(id).await?;
    post.ensure_owner(auth.id).map_err(StoreError::from)?;

    state.posts.delete_by_id(id).await?;
    tracing::info!("User {} removed post {}", auth.id, id);

    Ok(Json(Removed {
        msg: "Post removed",
        deleted: None,
    }))
}
