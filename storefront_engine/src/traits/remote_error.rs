use thiserror::Error;

/// The hosted service rejected or failed a call.
///
/// There is a single kind: network failures, constraint violations and permission errors all surface the
/// same way and none of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Remote service error: {message}")]
pub struct RemoteError {
    pub status: Option<u16>,
    pub message: String,
}

impl RemoteError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { status: None, message: message.into() }
    }

    pub fn with_status<S: Into<String>>(status: u16, message: S) -> Self {
        Self { status: Some(status), message: message.into() }
    }
}

#[cfg(feature = "hosted")]
impl From<hosted_store::HostedStoreError> for RemoteError {
    fn from(e: hosted_store::HostedStoreError) -> Self {
        Self { status: e.status(), message: e.to_string() }
    }
}
