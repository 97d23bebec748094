use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{
    File, NewProduct, NewUser, Owner, Product, ProductChanges, ProductSummary, User, UserChanges,
};
use super::store::{ProductStore, Storage, UserStore};
use crate::filter::{Page, ProductFilter};

const PRODUCT_COLUMNS: &str = "id, name, price, description, user_id, created_at, updated_at";
const USER_COLUMNS: &str =
    "id, name, email, password_hash, provider, avatar_id, created_at, updated_at";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Flat row for the products/users join
#[derive(Debug, FromRow)]
struct SummaryRow {
    id: Uuid,
    name: String,
    price: String,
    description: String,
    owner_id: Uuid,
    owner_name: String,
}

impl From<SummaryRow> for ProductSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            user: Owner {
                id: row.owner_id,
                name: row.owner_name,
            },
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self, filter: ProductFilter, page: Page) -> Result<Vec<ProductSummary>, DatabaseError> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.name, p.price, p.description,
                   u.id AS owner_id, u.name AS owner_name
            FROM products p
            JOIN users u ON u.id = p.user_id
            WHERE ($1::uuid IS NULL OR p.user_id = $1)
            ORDER BY p.created_at, p.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.owner)
        .bind(i64::from(page.limit()))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductSummary::from).collect())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, DatabaseError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find_product_with_owner(&self, id: Uuid) -> Result<Option<ProductSummary>, DatabaseError> {
        let row: Option<SummaryRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.name, p.price, p.description,
                   u.id AS owner_id, u.name AS owner_name
            FROM products p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductSummary::from))
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, DatabaseError> {
        let sql = format!(
            "INSERT INTO products (id, name, price, description, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PRODUCT_COLUMNS
        );
        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(Uuid::new_v4())
            .bind(&product.name)
            .bind(&product.price)
            .bind(&product.description)
            .bind(product.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, DatabaseError> {
        let sql = format!(
            "UPDATE products SET \
                name = COALESCE($2, name), \
                price = COALESCE($3, price), \
                description = COALESCE($4, description), \
                updated_at = now() \
             WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        );
        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.price)
            .bind(changes.description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, provider) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.provider)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                password_hash = COALESCE($4, password_hash), \
                avatar_id = COALESCE($5, avatar_id), \
                updated_at = now() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.avatar_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn find_file(&self, id: Uuid) -> Result<Option<File>, DatabaseError> {
        let file = sqlx::query_as::<_, File>("SELECT id, name, path, created_at FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(file)
    }
}

#[async_trait]
impl Storage for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
