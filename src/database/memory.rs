use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    File, NewProduct, NewUser, Owner, Product, ProductChanges, ProductSummary, User, UserChanges,
};
use super::store::{ProductStore, Storage, UserStore};
use crate::filter::{Page, ProductFilter};

/// In-process store with the same guarantees as the Postgres schema:
/// unique user emails, products owned by existing users, insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    // Vec keeps insertion order for listings
    products: Vec<Product>,
    users: HashMap<Uuid, User>,
    files: HashMap<Uuid, File>,
}

impl Tables {
    fn owner_of(&self, product: &Product) -> Option<Owner> {
        self.users.get(&product.user_id).map(|user| Owner {
            id: user.id,
            name: user.name.clone(),
        })
    }

    fn summarize(&self, product: &Product) -> Option<ProductSummary> {
        self.owner_of(product).map(|user| ProductSummary {
            id: product.id,
            name: product.name.clone(),
            price: product.price.clone(),
            description: product.description.clone(),
            user,
        })
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-stored upload so profiles can reference it
    pub async fn insert_file(&self, name: &str, path: &str) -> File {
        let file = File {
            id: Uuid::new_v4(),
            name: name.to_string(),
            path: path.to_string(),
            created_at: Utc::now(),
        };
        self.tables.write().await.files.insert(file.id, file.clone());
        file
    }

    pub async fn product_count(&self) -> usize {
        self.tables.read().await.products.len()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self, filter: ProductFilter, page: Page) -> Result<Vec<ProductSummary>, DatabaseError> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);

        Ok(tables
            .products
            .iter()
            .filter(|product| filter.matches(product.user_id))
            .skip(offset)
            .take(page.limit() as usize)
            .filter_map(|product| tables.summarize(product))
            .collect())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_with_owner(&self, id: Uuid) -> Result<Option<ProductSummary>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| tables.summarize(p)))
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&product.user_id) {
            return Err(DatabaseError::ForeignKeyViolation("products_user_id_fkey".to_string()));
        }

        let now = Utc::now();
        let created = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            description: product.description,
            user_id: product.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.products.iter_mut().find(|p| p.id == id).map(|product| {
            changes.apply(product);
            product.updated_at = Utc::now();
            product.clone()
        }))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        Ok(tables.products.len() < before)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        // Checked under the write lock, so concurrent registrations can't both win
        if tables.email_taken(&user.email, None) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            provider: user.provider,
            avatar_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;

        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
            }
        }
        if let Some(avatar_id) = changes.avatar_id {
            if !tables.files.contains_key(&avatar_id) {
                return Err(DatabaseError::ForeignKeyViolation("users_avatar_id_fkey".to_string()));
            }
        }

        Ok(tables.users.get_mut(&id).map(|user| {
            changes.apply(user);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn find_file(&self, id: Uuid) -> Result<Option<File>, DatabaseError> {
        Ok(self.tables.read().await.files.get(&id).cloned())
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
