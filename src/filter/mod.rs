pub mod error;
pub mod page;

pub use error::FilterError;
pub use page::{Page, PageQuery, PAGE_SIZE};

use uuid::Uuid;

/// Row filter for product listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Only products owned by this user
    pub owner: Option<Uuid>,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owned_by(owner: Uuid) -> Self {
        Self { owner: Some(owner) }
    }

    pub fn matches(&self, owner_id: Uuid) -> bool {
        self.owner.map_or(true, |owner| owner == owner_id)
    }
}
