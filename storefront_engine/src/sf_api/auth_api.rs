//! Back-office authentication.
//!
//! Credentials are checked by the hosted auth service. On top of that, only identities whose e-mail is on the
//! configured allowlist count as admins. An empty allowlist lets nobody in.
use std::{collections::HashSet, fmt::Debug, sync::Arc};

use log::*;

use crate::{
    sf_api::errors::AuthApiError,
    traits::{AdminIdentity, AdminSession, AuthManagement},
};

pub struct AuthApi<A> {
    auth: A,
    admins: Arc<HashSet<String>>,
}

impl<A: Clone> Clone for AuthApi<A> {
    fn clone(&self) -> Self {
        Self { auth: self.auth.clone(), admins: Arc::clone(&self.admins) }
    }
}

impl<A: Debug> Debug for AuthApi<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?}, {} admins)", self.auth, self.admins.len())
    }
}

impl<A> AuthApi<A>
where A: AuthManagement
{
    /// E-mail addresses are compared case-insensitively.
    pub fn new<I, S>(auth: A, admin_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let admins = admin_emails
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect::<HashSet<_>>();
        if admins.is_empty() {
            warn!("🔑️ The admin allowlist is empty. Nobody will be able to use the back-office.");
        }
        Self { auth, admins: Arc::new(admins) }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admins.contains(&email.trim().to_lowercase())
    }

    fn check_allowlist(&self, identity: &AdminIdentity) -> Result<(), AuthApiError> {
        match identity.email.as_deref() {
            Some(email) if self.is_admin_email(email) => Ok(()),
            Some(email) => {
                warn!("🔑️ {email} authenticated but is not on the admin allowlist");
                Err(AuthApiError::NotAnAdmin(email.to_string()))
            },
            None => {
                warn!("🔑️ User {} has no e-mail address and cannot be an admin", identity.user_id);
                Err(AuthApiError::NotAnAdmin(identity.user_id.clone()))
            },
        }
    }

    /// Signs an admin in. Valid credentials for someone who is not on the allowlist are refused with
    /// [`AuthApiError::NotAnAdmin`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AuthApiError> {
        let session = self.auth.sign_in(email, password).await?;
        self.check_allowlist(&session.identity)?;
        info!("🔑️ {email} signed in to the back-office");
        Ok(session)
    }

    /// Verifies a bearer token and checks that its owner is an admin.
    pub async fn authenticate(&self, token: &str) -> Result<AdminIdentity, AuthApiError> {
        if token.trim().is_empty() {
            return Err(AuthApiError::InvalidToken);
        }
        let identity = self.auth.verify_access_token(token).await?;
        self.check_allowlist(&identity)?;
        trace!("🔑️ Token verified for {}", identity.user_id);
        Ok(identity)
    }
}
