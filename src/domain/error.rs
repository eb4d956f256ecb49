use super::model::id::BookId;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("out of range: {0}")]
    Range(String),

    #[error("book not found: {0}")]
    NotFound(BookId),

    #[error("book {0} is already on loan")]
    AlreadyLoaned(BookId),

    #[error("book {0} is already available")]
    AlreadyAvailable(BookId),

    #[error("not enough data to build a report: the catalog is empty")]
    NoData,
}
