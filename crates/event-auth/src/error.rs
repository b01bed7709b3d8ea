use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Signing key error: {0}")]
    Key(String),

    #[error("Failed to encode token: {0}")]
    Encode(String),

    #[error("Invalid token: {0}")]
    InvalidToken(&'static str),

    #[error("Token expired")]
    TokenExpired,
}
