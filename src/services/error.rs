use crate::auth::password::PasswordError;
use crate::database::DatabaseError;
use crate::filter::FilterError;
use crate::validation::ValidationErrors;

/// Terminal outcomes of a product or user operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Database(DatabaseError),
}

impl ServiceError {
    pub fn user_exists() -> Self {
        ServiceError::Conflict("User already exists".to_string())
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            // Only users.email carries a unique constraint
            DatabaseError::UniqueViolation(_) => ServiceError::user_exists(),
            DatabaseError::ForeignKeyViolation(constraint) => {
                ServiceError::NotFound(format!("Referenced record not found ({})", constraint))
            }
            other => ServiceError::Database(other),
        }
    }
}

impl From<FilterError> for ServiceError {
    fn from(err: FilterError) -> Self {
        ServiceError::Validation(err.into())
    }
}
