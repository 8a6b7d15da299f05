//! Per-request authentication: extract → verify → resolve identity → AuthOutcome.
//!
//! Every branch ends in a well-formed [`AuthOutcome`]. Failure causes go to the log,
//! never to the client.
use std::sync::Arc;

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use tracing::Instrument;

use crate::services::auth::{
    extractor::extract_credential,
    identity::{IdentityError, IdentityStore, resolve_identity},
    outcome::AuthOutcome,
    verifier::TokenVerifier,
};

#[derive(Clone)]
pub struct AuthPipeline {
    verifier: TokenVerifier,
    identities: Arc<dyn IdentityStore>,
}

impl std::fmt::Debug for AuthPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPipeline")
            .field("verifier", &self.verifier)
            .field("identities", &self.identities.backend_name())
            .finish()
    }
}

impl AuthPipeline {
    pub fn new(verifier: TokenVerifier, identities: Arc<dyn IdentityStore>) -> Self {
        Self {
            verifier,
            identities,
        }
    }

    /// Authenticate a request from its headers. Never fails.
    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthOutcome {
        let Some(raw) = extract_credential(headers) else {
            return AuthOutcome::anonymous();
        };

        let claim = match self.verifier.verify(&raw) {
            Ok(claim) => claim,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    token_fp = %fingerprint(&raw),
                    "access token verification failed"
                );
                return AuthOutcome::rejected(raw);
            }
        };

        // A panicking store must not take the request down with it.
        let identities = Arc::clone(&self.identities);
        let subject = claim.subject().to_string();
        let lookup = tokio::spawn(
            async move { resolve_identity(identities.as_ref(), &subject).await }
                .in_current_span(),
        );

        let resolved = match lookup.await {
            Ok(resolved) => resolved,
            Err(err) => {
                // fail closed
                tracing::error!(
                    error = %err,
                    backend = self.identities.backend_name(),
                    subject = %claim.subject(),
                    "identity lookup aborted"
                );
                return AuthOutcome::rejected(raw);
            }
        };

        match resolved {
            Ok(_) => {
                tracing::debug!(subject = %claim.subject(), "request authenticated");
                AuthOutcome::authenticated(claim, raw)
            }
            Err(IdentityError::NotFound) => {
                tracing::warn!(
                    subject = %claim.subject(),
                    token_fp = %fingerprint(&raw),
                    "token subject not found"
                );
                AuthOutcome::rejected(raw)
            }
            Err(IdentityError::Unavailable(err)) => {
                // fail closed
                tracing::error!(
                    error = ?err,
                    backend = self.identities.backend_name(),
                    subject = %claim.subject(),
                    "identity lookup failed"
                );
                AuthOutcome::rejected(raw)
            }
        }
    }
}

// First 8 bytes of SHA-256, hex. Enough to correlate log lines without logging the token.
fn fingerprint(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .take(8)
        .map(|b| format!("{b:02x}"))
        .collect()
}
