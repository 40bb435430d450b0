use thiserror::Error;

use crate::errors::ServiceError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Este email ya existe")]
    Conflict,
    #[error("User not found")]
    NotFound,
    #[error("email or password incorrect")]
    InvalidCredentials,
    #[error("No se proporcionó un token de autenticación")]
    MissingToken,
    #[error("Token inválido")]
    InvalidToken,
    #[error("invalid Google token: {0}")]
    IdentityRejected(String),
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("identity provider error: {0}")]
    Upstream(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict => 1002,
            AuthError::NotFound => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::MissingToken => 1005,
            AuthError::InvalidToken => 1006,
            AuthError::IdentityRejected(_) => 1007,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Upstream(_) => 1103,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<ServiceError> for AuthError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Conflict(_) => AuthError::Conflict,
            ServiceError::NotFound(_) => AuthError::NotFound,
            ServiceError::Validation(msg) => AuthError::Validation(msg),
            ServiceError::Model(models::errors::ModelError::Validation(msg)) => AuthError::Validation(msg),
            other => AuthError::Repository(other.to_string()),
        }
    }
}
