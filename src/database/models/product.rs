use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Decimal amount kept as the text the client sent
    pub price: String,
    pub description: String,
    /// Owning user; set on create, never reassigned
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner fields exposed alongside a product listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
}

/// Listing row: product fields plus `user: {id, name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub price: String,
    pub description: String,
    pub user: Owner,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: String,
    pub description: String,
    pub user_id: Uuid,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.description.is_none()
    }

    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = &self.price {
            product.price = price.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
    }
}

/// Update response. Echoes the JSON values the caller sent, not what
/// storage holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductEcho {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
}

impl ProductEcho {
    /// Pick the product fields out of a request body; null counts as absent
    pub fn from_body(body: &Value) -> Self {
        let field = |name: &str| body.get(name).filter(|value| !value.is_null()).cloned();

        Self {
            id: body.get("id").cloned().unwrap_or(Value::Null),
            name: field("name"),
            price: field("price"),
            description: field("description"),
        }
    }
}
