// database/store.rs - Persistence gateway contracts
//
// Services depend on these traits only. `PgStore` backs them with Postgres,
// `MemoryStore` with in-process tables.

use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    File, NewProduct, NewUser, Product, ProductChanges, ProductSummary, User, UserChanges,
};
use crate::filter::{Page, ProductFilter};

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Page of listing rows with the owner's id and name joined in
    async fn list_products(&self, filter: ProductFilter, page: Page) -> Result<Vec<ProductSummary>, DatabaseError>;

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, DatabaseError>;

    /// Single product joined with its owner
    async fn find_product_with_owner(&self, id: Uuid) -> Result<Option<ProductSummary>, DatabaseError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, DatabaseError>;

    /// Apply `changes` in place; `None` when the product does not exist
    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, DatabaseError>;

    /// `true` when a row was removed
    async fn delete_product(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Fails with `UniqueViolation` when the email is taken
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    /// Apply `changes` in place; `None` when the user does not exist.
    /// Fails with `UniqueViolation` when the new email is taken.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError>;

    async fn find_file(&self, id: Uuid) -> Result<Option<File>, DatabaseError>;
}

/// Everything the application needs from one backing store
#[async_trait]
pub trait Storage: ProductStore + UserStore {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
