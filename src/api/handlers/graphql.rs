/*
 * Responsibility
 * - POST|GET /graphql
 * - Turn the AuthOutcome left by the auth middleware into a RequestContext
 *   and hand it to the schema with the request
 */
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension,
    extract::State,
    http::{HeaderMap, Method, Uri},
};

use crate::{api::context::RequestContext, services::auth::AuthOutcome, state::AppState};

pub async fn graphql(
    State(state): State<AppState>,
    Extension(outcome): Extension<AuthOutcome>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let ctx = RequestContext::new(method, uri, headers, outcome);

    state.schema.execute(req.into_inner().data(ctx)).await.into()
}
