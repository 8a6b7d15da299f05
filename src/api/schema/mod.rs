//! Federated subgraph schema.

pub mod user;
pub mod viewer;

use std::sync::Arc;

use async_graphql::{EmptyMutation, EmptySubscription, MergedObject, Schema, extensions::Tracing};

use crate::services::auth::IdentityStore;

/// Root query object (federated)
#[derive(MergedObject, Default)]
pub struct QueryRoot(viewer::ViewerQuery, user::UserQuery);

pub type SubgraphSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Build the subgraph schema. Per-request `RequestContext` is attached by the handler.
pub fn build_schema(identities: Arc<dyn IdentityStore>) -> SubgraphSchema {
    Schema::build(QueryRoot::default(), EmptyMutation, EmptySubscription)
        .data(identities)
        .extension(Tracing)
        .enable_federation()
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::identity::testing::MemoryIdentityStore;

    #[test]
    fn schema_builds_with_federation() {
        let schema = build_schema(Arc::new(MemoryIdentityStore::default()));
        let sdl = schema.sdl();
        assert!(sdl.contains("type Query"));
        assert!(sdl.contains("viewer"));
        assert!(sdl.contains("_service"));
    }
}
