use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::database::models::{Comment, PostMutation};
use crate::database::{parse_comment_id, parse_post_id};
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validation::JsonBody;

use super::posts::TextRequest;
use super::utils::load_author;

/// POST /posts/comment/:id - add a comment, newest first
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<TextRequest>,
) -> ApiResult<Json<Vec<Comment>>> {
    let text = payload.into_text()?;
    let id = parse_post_id(&id)?;
    // A missing post takes precedence over a missing author record
    state.posts.find_by_id(id).await?;
    let author = load_author(&state, auth.id).await?;

    let comment = Comment::by(&author, text);
    let comment_id = comment.id;
    let (post, _) = state.posts.update(id, PostMutation::AddComment(comment)).await?;
    tracing::info!("User {} commented {} on post {}", auth.id, comment_id, id);

    Ok(Json(post.comments))
}

/// DELETE /posts/comment/:id/:comment_id - only the post's owner may remove comments
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Comment>>> {
    let id = parse_post_id(&id)?;
    let comment_id = match parse_comment_id(&comment_id) {
        Ok(comment_id) => comment_id,
        Err(err) => {
            // A missing post still takes precedence over a bad comment id
            state.posts.find_by_id(id).await?;
            return Err(err.into());
        }
    };

    let (post, _) = state
        .posts
        .update(id, PostMutation::RemoveComment { comment_id, requester: auth.id })
        .await?;
    tracing::info!("User {} removed comment {} from post {}", auth.id, comment_id, id);

    Ok(Json(post.comments))
}
