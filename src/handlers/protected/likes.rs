use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::database::models::{Like, MutationOutcome, PostMutation};
use crate::database::parse_post_id;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// A like answers with the new like list; an unlike also carries a message
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LikeResponse {
    Liked(Vec<Like>),
    Unliked { msg: &'static str, likes: Vec<Like> },
}

/// PUT /posts/like/:id - like the post, or take back the requester's like
pub async fn toggle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<LikeResponse>> {
    let id = parse_post_id(&id)?;
    let (post, outcome) = state
        .posts
        .update(id, PostMutation::ToggleLike { user: auth.id })
        .await?;

    tracing::debug!("User {} toggled like on post {}: {:?}", auth.id, id, outcome);

    let response = match outcome {
        MutationOutcome::Unliked => LikeResponse::Unliked {
            msg: "Post unliked",
            likes: post.likes,
        },
        _ => LikeResponse::Liked(post.likes),
    };
    Ok(Json(response))
}
