use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl StoreError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(entity.to_string())
    }
}
