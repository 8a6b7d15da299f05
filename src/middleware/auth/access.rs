//! Authenticate every request that reaches the GraphQL endpoint and leave the
//! resulting `AuthOutcome` in request extensions.
//!
//! Unlike a guard, this middleware never rejects: a missing, invalid or expired
//! credential becomes an unauthenticated outcome and the request is dispatched anyway.
//! Resolvers decide what an anonymous caller may see.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::state::AppState;

/// Apply the authentication middleware to `router`.
///
/// ```ignore
/// let graphql = Router::new().route("/graphql", post(graphql));
/// let graphql = middleware::auth::access::apply(graphql, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 from_fn cannot take a State extractor; pass state via from_fn_with_state
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let outcome = state.auth.authenticate(req.headers()).await;

    // middleware → handler
    req.extensions_mut().insert(outcome);

    next.run(req).await
}
