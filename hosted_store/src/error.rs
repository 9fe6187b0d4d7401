use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum HostedStoreError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The service returned no rows where one was expected")]
    EmptyResponse,
}

impl HostedStoreError {
    /// The HTTP status returned by the service, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::QueryError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
