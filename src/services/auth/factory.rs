/// Factory: build `AuthPipeline` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthPipeline, IdentityStore, TokenVerifier};

pub fn build_auth_pipeline(
    config: &Config,
    identities: Arc<dyn IdentityStore>,
) -> Arc<AuthPipeline> {
    let verifier = TokenVerifier::new(
        &config.jwt_secret,
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    );

    Arc::new(AuthPipeline::new(verifier, identities))
}
