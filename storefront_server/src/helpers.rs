use actix_web::{
    http::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE},
    HttpRequest,
};
use log::trace;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extracts the token from an `Authorization: Bearer <token>` header. The scheme is matched case-insensitively.
/// Returns `None` if the header is missing, is not a bearer header, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        trace!("💻️ Authorization header uses the {scheme} scheme, not Bearer");
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// The request's content type, or `application/octet-stream` if the client didn't send one.
pub fn content_type(req: &HttpRequest) -> String {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}
