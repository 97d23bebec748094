// handlers/protected/mod.rs - Protected handlers (bearer JWT required)
//
// `jwt_auth_middleware` runs first and injects `AuthUser`; the caller's id
// always comes from the token, never from the request body.
pub mod products;
pub mod users;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids that don't parse can't name a stored product
pub(crate) fn parse_product_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Product not found"))
}
