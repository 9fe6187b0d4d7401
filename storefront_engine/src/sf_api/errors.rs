use thiserror::Error;

use crate::traits::RemoteError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogApiError {
    #[error("Could not read the catalog. {0}")]
    Remote(#[from] RemoteError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminApiError {
    /// The request was rejected before reaching the hosted service.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("The hosted service rejected the change. {0}")]
    Remote(#[from] RemoteError),
}

impl AdminApiError {
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthApiError {
    #[error("Invalid e-mail or password")]
    InvalidCredentials,
    #[error("The access token is invalid or has expired")]
    InvalidToken,
    #[error("{0} is not allowed to use the back-office")]
    NotAnAdmin(String),
    #[error("Auth service error: {0}")]
    Remote(#[from] RemoteError),
}
