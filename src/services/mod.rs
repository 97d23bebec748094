pub mod error;
pub mod policy;
pub mod product_service;
pub mod user_service;

pub use error::ServiceError;
pub use policy::{can_delete, Access, Owned};
pub use product_service::ProductService;
pub use user_service::UserService;
