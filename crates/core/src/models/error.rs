use thiserror::Error;

/// Errors raised while turning a decoded request body into a typed request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Not a JSON")]
    NotAnObject,
    #[error("Missing {0}")]
    MissingField(&'static str),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}
