use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),
}

impl From<FilterError> for crate::validation::ValidationErrors {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::InvalidPage(msg) => crate::validation::ValidationErrors::single("page", msg),
        }
    }
}
