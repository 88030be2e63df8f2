//! `Authorization` header parsing.
//!
//! Only the shape `<scheme> <token>` is validated. The scheme word itself is
//! not checked, so `Bearer abc` and `ApiKey abc` both yield `abc`.

use http::HeaderMap;
use http::header::AUTHORIZATION;

use super::AuthError;

/// Extract the raw token from an `Authorization` header value.
///
/// The value must split on a single space into exactly two parts. The token
/// is returned unmodified.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = match header {
        None | Some("") => return Err(AuthError::MissingHeader),
        Some(v) => v,
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Extract the raw token from the `Authorization` header of a request.
pub fn bearer_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = match headers.get(AUTHORIZATION) {
        None => None,
        Some(v) => Some(v.to_str().map_err(|_| AuthError::MalformedHeader)?),
    };
    extract_bearer(header)
}
