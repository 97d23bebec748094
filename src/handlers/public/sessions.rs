use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::app::AppState;
use crate::auth::generate_jwt;
use crate::database::models::RegisteredUser;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Session {
    pub user: RegisteredUser,
    pub token: String,
}

/// POST /sessions - exchange email and password for a bearer token
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Session> {
    let body = json_body(payload)?;
    let user = state.users().authenticate(&body).await?;
    let token = generate_jwt(user.id, &state.config().security)?;

    info!(user_id = %user.id, "Session created");
    Ok(ApiResponse::success(Session {
        user: RegisteredUser::from(&user),
        token,
    }))
}
