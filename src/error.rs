use thiserror::Error;

#[derive(Debug, Error)]
pub enum SketchvarError {
    #[error("Read error: {0}")]
    Read(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Model returned no content")]
    NoContent,
    #[error("Model response carried no image data")]
    NoImage,
}

pub type Result<T> = std::result::Result<T, SketchvarError>;
