use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::sf_api::errors::AuthApiError;

/// The identity behind a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub access_token: String,
    pub expires_in: Option<u64>,
    pub identity: AdminIdentity,
}

/// Credential verification is delegated to an external auth service. Nothing in this crate decides on its own that a
/// password or token is valid.
pub trait AuthManagement {
    /// Exchanges an e-mail and password for a session. Wrong credentials yield [`AuthApiError::InvalidCredentials`].
    fn sign_in(&self, email: &str, password: &str) -> impl Future<Output = Result<AdminSession, AuthApiError>> + Send;

    /// Resolves an access token to the identity that owns it. Unknown or expired tokens yield
    /// [`AuthApiError::InvalidToken`].
    fn verify_access_token(&self, token: &str) -> impl Future<Output = Result<AdminIdentity, AuthApiError>> + Send;
}
