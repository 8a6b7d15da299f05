use async_graphql::{Context, Error, ErrorExtensions, Result};

use crate::services::auth::AuthClaim;

use super::RequestContext;

/// Resolver-side access to [`RequestContext`].
///
/// The handler attaches a `RequestContext` to every request; its absence means the
/// schema was executed outside the HTTP pipeline.
pub trait RequestContextExt {
    fn request_context(&self) -> Result<&RequestContext>;

    /// The caller's claim, or an `UNAUTHENTICATED` GraphQL error.
    fn require_user(&self) -> Result<&AuthClaim>;
}

impl RequestContextExt for Context<'_> {
    fn request_context(&self) -> Result<&RequestContext> {
        self.data::<RequestContext>()
    }

    fn require_user(&self) -> Result<&AuthClaim> {
        self.request_context()?.user().ok_or_else(|| {
            Error::new("authentication required")
                .extend_with(|_, e| e.set("code", "UNAUTHENTICATED"))
        })
    }
}
