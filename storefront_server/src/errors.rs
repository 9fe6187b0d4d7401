use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::*;
use storefront_engine::{AdminApiError, AuthApiError, CatalogApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("The catalog service could not complete the request. {0}")]
    BackendError(String),
    #[error("Invalid input. {0}")]
    InvalidInput(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Authentication required. {0}")]
    Unauthorized(String),
    #[error("Insufficient Permissions. {0}")]
    Forbidden(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::BackendError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::Remote(e) => {
                warn!("💻️ Catalog read failed. {e}");
                Self::BackendError(e.to_string())
            },
        }
    }
}

impl From<AdminApiError> for ServerError {
    fn from(e: AdminApiError) -> Self {
        match e {
            AdminApiError::InvalidInput(msg) => Self::InvalidInput(msg),
            AdminApiError::Remote(e) => {
                warn!("💻️ Catalog write failed. {e}");
                Self::BackendError(e.to_string())
            },
        }
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::InvalidCredentials | AuthApiError::InvalidToken => Self::Unauthorized(e.to_string()),
            AuthApiError::NotAnAdmin(_) => Self::Forbidden(e.to_string()),
            AuthApiError::Remote(e) => Self::BackendError(format!("Auth service error: {e}")),
        }
    }
}
