/*
 * Responsibility
 * - What resolvers see of the transport and of authentication
 * - Built once per request by the GraphQL handler, then read-only
 *
 * Notes
 * - Authorization (roles, ownership) is decided by resolvers from `user()`, not here
 */
use axum::http::{HeaderMap, Method, Uri};

use crate::services::auth::{AuthClaim, AuthOutcome};

#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    is_authenticated: bool,
    user: Option<AuthClaim>,
    token: Option<String>,
}

impl RequestContext {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, outcome: AuthOutcome) -> Self {
        Self {
            method,
            uri,
            headers,
            is_authenticated: outcome.is_authenticated(),
            user: outcome.claim().cloned(),
            token: outcome.raw_credential().map(str::to_owned),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// Verified claim of the caller, present only when authenticated.
    pub fn user(&self) -> Option<&AuthClaim> {
        self.user.as_ref()
    }

    /// Credential as presented (without the `Bearer ` prefix), valid or not.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// `x-request-id` as set by the transport layer.
    pub fn request_id(&self) -> Option<&str> {
        self.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}
