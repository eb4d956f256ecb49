use crate::domain::error::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to save catalog (in-memory state kept): {0}")]
    StorageWrite(#[source] Box<dyn std::error::Error + Send + Sync>),
}
