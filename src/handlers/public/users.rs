use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::app::AppState;
use crate::database::models::RegisteredUser;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /users - register a new account
///
/// Body: `{ "name", "email", "password", "provider"? }`.
/// Responds with `{ id, name, email, provider }`.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<RegisteredUser> {
    let body = json_body(payload)?;
    let user = state.users().register(&body).await?;
    Ok(ApiResponse::success(user))
}
