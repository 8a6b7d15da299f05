/*
 * Responsibility
 * - URL layout: /health, /graphql
 * - /graphql gets the JSON body guard, then authentication (in that order)
 */
use axum::{Router, routing::get};

use crate::{
    api::handlers::{graphql::graphql, health::health},
    middleware,
    state::AppState,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let graphql = Router::new().route("/graphql", get(graphql).post(graphql));
    // Layers added later run first: json_body before auth.
    let graphql = middleware::auth::access::apply(graphql, state);
    let graphql = middleware::json_body::apply(graphql);

    Router::new().route("/health", get(health)).merge(graphql)
}
