use uuid::Uuid;

use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Load the requester's user record, whose name and avatar get copied into
/// new posts and comments
pub async fn load_author(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    state.users.find_user(user_id).await?.ok_or_else(|| {
        tracing::warn!("Authenticated user {} has no user record", user_id);
        ApiError::not_found("User not found")
    })
}
