use hosted_store::{AuthSession, HostedStoreError};
use log::*;

use crate::{
    sf_api::errors::AuthApiError,
    traits::{AdminIdentity, AdminSession},
};

pub fn admin_session(session: AuthSession) -> AdminSession {
    AdminSession {
        access_token: session.access_token,
        expires_in: session.expires_in,
        identity: AdminIdentity { user_id: session.user.id, email: session.user.email },
    }
}

pub fn sign_in_error(e: HostedStoreError) -> AuthApiError {
    match e.status() {
        Some(400) | Some(401) | Some(403) => {
            debug!("🔑️ Auth service refused the credentials. {e}");
            AuthApiError::InvalidCredentials
        },
        _ => AuthApiError::Remote(e.into()),
    }
}

pub fn verification_error(e: HostedStoreError) -> AuthApiError {
    match e.status() {
        Some(401) | Some(403) | Some(404) => {
            debug!("🔑️ Auth service refused the token. {e}");
            AuthApiError::InvalidToken
        },
        _ => AuthApiError::Remote(e.into()),
    }
}
