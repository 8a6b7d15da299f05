//! Pull the raw credential out of the `Authorization` header.

use axum::http::{HeaderMap, header};

const BEARER_PREFIX: &str = "Bearer ";

/// Returns the credential carried by `Authorization`, if any.
///
/// - `Bearer <token>` yields `<token>` (prefix is case-sensitive and stripped once)
/// - any other value is taken whole as the credential
///
/// NOTE: the bare-value fallback accepts credentials without a scheme. Clients in the
/// field depend on it, so it stays, but it is laxer than RFC 6750.
pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?;

    // Non-ASCII bytes are kept (lossily) so that verification rejects them with a logged cause.
    let value = String::from_utf8_lossy(value.as_bytes());

    let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(&value);

    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}
