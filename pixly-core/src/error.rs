#[derive(thiserror::Error, Debug)]
pub enum PixlyError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid payload: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Coarse failure class. Transports decide what each kind means on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Internal,
}

impl PixlyError {
    pub fn duplicate_image(name: &str) -> Self {
        PixlyError::BadRequest(format!("Duplicate image: {name}"))
    }

    pub fn image_not_found() -> Self {
        PixlyError::NotFound("No image found".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PixlyError::BadRequest(_) | PixlyError::Validation(_) => ErrorKind::BadRequest,
            PixlyError::NotFound(_) => ErrorKind::NotFound,
            PixlyError::Storage(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, PixlyError>;
