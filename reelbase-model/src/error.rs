use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid rating: {0}")]
    InvalidRating(String),

    #[error("invalid cast member kind: {0}")]
    InvalidKind(String),

    #[error("invalid file slot: {0}")]
    InvalidFileSlot(String),

    #[error("invalid id: {0}")]
    InvalidId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
