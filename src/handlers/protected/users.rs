use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::app::AppState;
use crate::database::models::UserProfile;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// PUT /users - update the caller's profile
///
/// Body fields are all optional: `name`, `email`, `oldPassword`, `password`,
/// `confirmPassword`, `avatar_id`. Responds with `{ id, name, email, avatar }`.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let body = json_body(payload)?;
    let profile = state.users().update_profile(&body, auth.user_id).await?;
    Ok(ApiResponse::success(profile))
}
