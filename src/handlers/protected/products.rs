use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use super::parse_product_id;
use crate::app::AppState;
use crate::database::models::{Product, ProductEcho, ProductSummary};
use crate::filter::PageQuery;
use crate::handlers::{json_body, page_query};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub status: &'static str,
}

/// GET /products/own?page=N - the caller's products
#[instrument(skip(state, query))]
pub async fn list_own(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Vec<ProductSummary>> {
    let page = page_query(query)?;
    let products = state.products().list_own(page, auth.user_id).await?;
    Ok(ApiResponse::success(products))
}

/// POST /products - create a product owned by the caller
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Product> {
    let body = json_body(payload)?;
    let product = state.products().create(&body, auth.user_id).await?;
    Ok(ApiResponse::success(product))
}

/// PUT /products - partial update of `body.id`, echoing the input
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<ProductEcho> {
    let body = json_body(payload)?;
    let echo = state.products().update(&body).await?;
    Ok(ApiResponse::success(echo))
}

/// DELETE /products/:id - owner-only delete
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let id = parse_product_id(&id)?;
    state.products().delete(id, auth.user_id).await?;
    Ok(ApiResponse::success(Deleted {
        status: "Product successfully deleted",
    }))
}
