use async_graphql::{Context, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};

use crate::api::context::RequestContextExt;

/// Who the gateway thinks the caller is.
#[derive(SimpleObject, Debug)]
pub struct Viewer {
    pub is_authenticated: bool,
    pub subject: Option<String>,
    /// `role` claim as issued, if any. Informational; resolvers authorize from the store.
    pub role: Option<String>,
    /// A credential was sent, whether or not it was accepted.
    pub credential_presented: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct ViewerQuery;

#[Object]
impl ViewerQuery {
    /// Authentication state of the current request. Never requires a credential.
    async fn viewer(&self, ctx: &Context<'_>) -> Result<Viewer> {
        let rc = ctx.request_context()?;

        Ok(Viewer {
            is_authenticated: rc.is_authenticated(),
            subject: rc.user().map(|claim| claim.subject().to_string()),
            role: rc
                .user()
                .and_then(|claim| claim.get("role"))
                .and_then(|v| v.as_str())
                .map(str::to_owned),
            credential_presented: rc.token().is_some(),
            expires_at: rc
                .user()
                .and_then(|claim| claim.expires_at())
                .and_then(|exp| i64::try_from(exp).ok())
                .and_then(|exp| DateTime::from_timestamp(exp, 0)),
        })
    }
}
