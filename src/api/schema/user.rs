use std::sync::Arc;

use async_graphql::{Context, Error, ID, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};

use crate::api::context::RequestContextExt;
use crate::services::auth::{IdentityRecord, IdentityStore};

/// Federated user entity, keyed by `id`.
#[derive(SimpleObject, Debug, Clone)]
pub struct User {
    pub id: ID,
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<IdentityRecord> for User {
    fn from(record: IdentityRecord) -> Self {
        Self {
            id: ID(record.id),
            user_name: record.user_name,
            email: record.email,
            role: record.role,
            created_at: record.created_at,
        }
    }
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The authenticated caller's user record.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let subject = ctx.require_user()?.subject().to_string();
        load(ctx, &subject).await
    }

    #[graphql(entity)]
    async fn find_user_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<User> {
        ctx.require_user()?;

        load(ctx, &id)
            .await?
            .ok_or_else(|| Error::new(format!("user {} not found", id.as_str())))
    }
}

async fn load(ctx: &Context<'_>, id: &str) -> Result<Option<User>> {
    let store = ctx.data::<Arc<dyn IdentityStore>>()?;

    let record = store.find_by_id(id).await.map_err(|err| {
        let rc = ctx.request_context().ok();
        tracing::error!(
            error = ?err,
            backend = store.backend_name(),
            method = ?rc.map(|rc| rc.method()),
            uri = ?rc.map(|rc| rc.uri()),
            request_id = ?rc.and_then(|rc| rc.request_id()),
            "user lookup failed"
        );
        Error::new("user lookup failed")
    })?;

    Ok(record.map(User::from))
}

#[cfg(test)]
mod tests {
    use async_graphql::{Request, value};
    use axum::http::{HeaderMap, Method, Uri};
    use serde_json::json;

    use super::*;
    use crate::api::context::RequestContext;
    use crate::api::schema::build_schema;
    use crate::services::auth::identity::testing::MemoryIdentityStore;
    use crate::services::auth::{AuthClaim, AuthOutcome};

    fn authenticated(sub: &str) -> RequestContext {
        let claim = AuthClaim::from_fields(
            json!({"sub": sub, "exp": 1}).as_object().cloned().unwrap(),
        )
        .unwrap();
        RequestContext::new(
            Method::POST,
            Uri::from_static("/graphql"),
            HeaderMap::new(),
            AuthOutcome::authenticated(claim, "raw".to_string()),
        )
    }

    fn anonymous() -> RequestContext {
        RequestContext::new(
            Method::POST,
            Uri::from_static("/graphql"),
            HeaderMap::new(),
            AuthOutcome::anonymous(),
        )
    }

    #[tokio::test]
    async fn me_returns_the_callers_record() {
        let schema = build_schema(Arc::new(MemoryIdentityStore::with_users(&["u-1"])));
        let res = schema
            .execute(Request::new("{ me { id email role } }").data(authenticated("u-1")))
            .await;

        assert!(res.errors.is_empty(), "{:?}", res.errors);
        assert_eq!(
            res.data,
            value!({ "me": { "id": "u-1", "email": "u-1@example.com", "role": "patient" } })
        );
    }

    #[tokio::test]
    async fn me_requires_authentication() {
        let schema = build_schema(Arc::new(MemoryIdentityStore::with_users(&["u-1"])));
        let res = schema
            .execute(Request::new("{ me { id } }").data(anonymous()))
            .await;

        assert_eq!(res.errors.len(), 1);
        let error = serde_json::to_value(&res.errors[0]).unwrap();
        assert_eq!(error["extensions"]["code"], json!("UNAUTHENTICATED"));
    }

    #[tokio::test]
    async fn store_errors_surface_as_resolver_errors() {
        let schema = build_schema(Arc::new(MemoryIdentityStore::failing()));
        let res = schema
            .execute(Request::new("{ me { id } }").data(authenticated("u-1")))
            .await;

        assert_eq!(res.errors.len(), 1);
        assert_eq!(res.errors[0].message, "user lookup failed");
    }

    #[tokio::test]
    async fn entities_resolve_users_by_key() {
        let schema = build_schema(Arc::new(MemoryIdentityStore::with_users(&["u-1"])));
        let query = r#"{ _entities(representations: [{__typename: "User", id: "u-1"}]) { ... on User { userName } } }"#;
        let res = schema
            .execute(Request::new(query).data(authenticated("u-2")))
            .await;

        assert!(res.errors.is_empty(), "{:?}", res.errors);
        assert_eq!(
            res.data,
            value!({ "_entities": [ { "userName": "user u-1" } ] })
        );
    }
}
