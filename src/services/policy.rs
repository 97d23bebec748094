// services/policy.rs - Ownership rules
//
// Kept apart from the services so the rule can be tested without storage.

use uuid::Uuid;

use crate::database::models::{Product, ProductSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        self == Access::Allow
    }
}

/// Resources with a single owning user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Product {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for ProductSummary {
    fn owner_id(&self) -> Uuid {
        self.user.id
    }
}

/// Only the owner may delete a resource
pub fn can_delete<R: Owned>(resource: &R, caller_id: Uuid) -> Access {
    if resource.owner_id() == caller_id {
        Access::Allow
    } else {
        Access::Deny
    }
}
