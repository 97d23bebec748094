// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) and Protected (bearer JWT). Handlers only translate
// between HTTP and the services; rules live in `crate::services`.
pub mod protected;
pub mod public;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::{FilterError, Page, PageQuery};
use crate::services::ServiceError;

/// Unwrap a JSON body, turning extractor rejections into API errors
pub(crate) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))
}

/// Resolve `?page=`; unparseable query strings are reported against `page`
pub(crate) fn page_query(query: Result<Query<PageQuery>, QueryRejection>) -> Result<Page, ApiError> {
    let page = query
        .map_err(|rejection| FilterError::InvalidPage(rejection.body_text()))
        .and_then(|Query(query)| Page::try_from(query))
        .map_err(ServiceError::from)?;
    Ok(page)
}

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Storefront API",
            "version": version,
            "endpoints": {
                "users": "POST /users (public), PUT /users (protected)",
                "sessions": "POST /sessions (public)",
                "products": "GET /products, GET /products/:id (public)",
                "own_products": "GET /products/own (protected)",
                "product_mutations": "POST /products, PUT /products, DELETE /products/:id (protected)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.storage().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, Uri};

    fn page_for(uri: &str) -> Result<Page, ApiError> {
        let uri: Uri = uri.parse().unwrap();
        page_query(Query::try_from_uri(&uri))
    }

    #[test]
    fn missing_page_is_first_page() {
        assert_eq!(page_for("/products").unwrap(), Page::default());
        assert_eq!(page_for("/products?page=3").unwrap().offset(), 40);
    }

    #[test]
    fn duplicate_page_is_a_field_error() {
        let err = page_for("/products?page=1&page=2").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"]["page"].is_string(), "{}", body);
    }

    #[test]
    fn non_numeric_page_is_a_field_error() {
        let body = page_for("/products?page=abc").unwrap_err().to_json();
        assert!(body["field_errors"]["page"].is_string(), "{}", body);
    }
}
