/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - auth pipeline (secret + identity store), GraphQL schema
 * - Cheap to clone (Arc / schema handle inside)
 */
use std::sync::Arc;

use crate::api::schema::SubgraphSchema;
use crate::services::auth::AuthPipeline;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthPipeline>,
    pub schema: SubgraphSchema,
}

impl AppState {
    pub fn new(auth: Arc<AuthPipeline>, schema: SubgraphSchema) -> Self {
        Self { auth, schema }
    }
}
