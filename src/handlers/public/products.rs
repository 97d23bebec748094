use axum::extract::{rejection::QueryRejection, Path, Query, State};
use tracing::instrument;

use crate::app::AppState;
use crate::database::models::{Product, ProductSummary};
use crate::filter::PageQuery;
use crate::handlers::page_query;
use crate::handlers::protected::parse_product_id;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /products?page=N - 20 products per page with owner id and name
#[instrument(skip(state, query))]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Vec<ProductSummary>> {
    let page = page_query(query)?;
    let products = state.products().list(page).await?;
    Ok(ApiResponse::success(products))
}

/// GET /products/:id - single product, all fields
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    let id = parse_product_id(&id)?;
    let product = state.products().get_one(id).await?;
    Ok(ApiResponse::success(product))
}
