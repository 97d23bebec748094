use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::error::ServiceError;
use super::policy::can_delete;
use crate::database::models::{NewProduct, Product, ProductChanges, ProductEcho, ProductSummary};
use crate::database::ProductStore;
use crate::filter::{Page, ProductFilter};
use crate::validation::{FieldRule, Schema};

/// Product listing, lookup and owner-scoped mutation
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

fn create_schema() -> Schema {
    Schema::new(vec![
        FieldRule::text("name").required(),
        FieldRule::text("price").required(),
        FieldRule::text("description").required(),
    ])
}

fn update_schema() -> Schema {
    Schema::new(vec![
        FieldRule::text("id").required(),
        FieldRule::text("name"),
        FieldRule::text("price"),
        FieldRule::text("description"),
    ])
}

fn product_not_found() -> ServiceError {
    ServiceError::NotFound("Product not found".to_string())
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Page of all products, 20 per page
    #[instrument(skip(self))]
    pub async fn list(&self, page: Page) -> Result<Vec<ProductSummary>, ServiceError> {
        Ok(self.store.list_products(ProductFilter::all(), page).await?)
    }

    /// Page of the caller's own products
    #[instrument(skip(self))]
    pub async fn list_own(&self, page: Page, caller_id: Uuid) -> Result<Vec<ProductSummary>, ServiceError> {
        Ok(self
            .store
            .list_products(ProductFilter::owned_by(caller_id), page)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_one(&self, id: Uuid) -> Result<Product, ServiceError> {
        self.store.find_product(id).await?.ok_or_else(product_not_found)
    }

    /// Validate and create a product owned by the caller
    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Value, caller_id: Uuid) -> Result<Product, ServiceError> {
        let fields = create_schema().validate(body)?;

        let product = self
            .store
            .create_product(NewProduct {
                name: fields.required_text("name")?.to_string(),
                price: fields.required_text("price")?.to_string(),
                description: fields.required_text("description")?.to_string(),
                user_id: caller_id,
            })
            .await?;

        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Apply the supplied fields to `body.id` and echo the input back.
    /// The owner is never touched.
    #[instrument(skip(self, body))]
    pub async fn update(&self, body: &Value) -> Result<ProductEcho, ServiceError> {
        let fields = update_schema().validate(body)?;
        let raw_id = fields.required_text("id")?;

        // An id that isn't a UUID can't name a stored product
        let id = Uuid::parse_str(raw_id).map_err(|_| product_not_found())?;
        if self.store.find_product(id).await?.is_none() {
            return Err(product_not_found());
        }

        let changes = ProductChanges {
            name: fields.text("name").map(str::to_string),
            price: fields.text("price").map(str::to_string),
            description: fields.text("description").map(str::to_string),
        };

        if !changes.is_empty() {
            self.store
                .update_product(id, changes)
                .await?
                .ok_or_else(product_not_found)?;
            info!(product_id = %id, "Product updated");
        }

        Ok(ProductEcho::from_body(body))
    }

    /// Delete a product; only its owner may do so
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, caller_id: Uuid) -> Result<(), ServiceError> {
        let product = self
            .store
            .find_product_with_owner(id)
            .await?
            .ok_or_else(product_not_found)?;

        if !can_delete(&product, caller_id).is_allowed() {
            warn!(product_id = %id, caller_id = %caller_id, "Delete refused: caller is not the owner");
            return Err(ServiceError::Unauthorized(
                "You don't have permission to delete this product.".to_string(),
            ));
        }

        if !self.store.delete_product(id).await? {
            return Err(product_not_found());
        }

        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use crate::database::{MemoryStore, UserStore};
    use serde_json::json;

    async fn setup() -> (Arc<MemoryStore>, ProductService, Uuid, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let mut ids = Vec::new();
        for email in ["ada@example.com", "bob@example.com"] {
            let user = store
                .create_user(NewUser {
                    name: email.split('@').next().unwrap_or_default().to_string(),
                    email: email.to_string(),
                    password_hash: "hash".to_string(),
                    provider: false,
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let service = ProductService::new(store.clone());
        (store, service, ids[0], ids[1])
    }

    fn chair() -> Value {
        json!({ "name": "Chair", "price": "49.90", "description": "Oak chair" })
    }

    #[tokio::test]
    async fn create_sets_owner_from_caller() {
        let (_, service, ada, _) = setup().await;

        let product = service
            .create(&json!({ "name": "Chair", "price": "49.90", "description": "Oak", "user_id": Uuid::new_v4() }), ada)
            .await
            .unwrap();

        assert_eq!(product.user_id, ada);
        assert_eq!(service.get_one(product.id).await.unwrap(), product);
    }

    #[tokio::test]
    async fn create_with_empty_description_persists_nothing() {
        let (store, service, ada, _) = setup().await;

        let err = service
            .create(&json!({ "name": "Chair", "price": "49.90", "description": "" }), ada)
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(errors) => assert!(errors.contains("description")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(store.product_count().await, 0);
    }

    #[tokio::test]
    async fn list_pages_by_twenty() {
        let (_, service, ada, bob) = setup().await;
        for i in 0..25 {
            let owner = if i % 5 == 0 { bob } else { ada };
            service
                .create(&json!({ "name": format!("p{}", i), "price": "1", "description": "x" }), owner)
                .await
                .unwrap();
        }

        assert_eq!(service.list(Page::default()).await.unwrap().len(), 20);
        assert_eq!(service.list(Page::new(2).unwrap()).await.unwrap().len(), 5);
        assert!(service.list(Page::new(3).unwrap()).await.unwrap().is_empty());

        let own = service.list_own(Page::default(), bob).await.unwrap();
        assert_eq!(own.len(), 5);
        assert!(own.iter().all(|p| p.user.id == bob));
    }

    #[tokio::test]
    async fn update_echoes_input_and_keeps_owner() {
        let (_, service, ada, bob) = setup().await;
        let product = service.create(&chair(), ada).await.unwrap();

        let echo = service
            .update(&json!({ "id": product.id.to_string(), "price": 55, "user_id": bob }))
            .await
            .unwrap();

        assert_eq!(echo.id, json!(product.id.to_string()));
        // the echo keeps the JSON type the caller sent
        assert_eq!(echo.price, Some(json!(55)));
        assert!(echo.name.is_none());

        let stored = service.get_one(product.id).await.unwrap();
        assert_eq!(stored.price, "55");
        assert_eq!(stored.name, "Chair");
        assert_eq!(stored.user_id, ada);
    }

    #[tokio::test]
    async fn update_requires_id_and_existing_product() {
        let (_, service, _, _) = setup().await;

        assert!(matches!(
            service.update(&json!({ "name": "x" })).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service.update(&json!({ "id": Uuid::new_v4().to_string(), "name": "x" })).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.update(&json!({ "id": "42", "name": "x" })).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_unauthorized() {
        let (_, service, ada, bob) = setup().await;
        let product = service.create(&chair(), ada).await.unwrap();

        assert!(matches!(
            service.delete(product.id, bob).await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(service.get_one(product.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_by_owner_removes_product() {
        let (_, service, ada, _) = setup().await;
        let product = service.create(&chair(), ada).await.unwrap();

        service.delete(product.id, ada).await.unwrap();

        assert!(matches!(
            service.get_one(product.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(product.id, ada).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
