//! Header policy for `/assets/*` (micro-frontend build output).
//!
//! - `Access-Control-Allow-Origin` reflects the request `Origin` only when it is allow-listed,
//!   together with `Access-Control-Allow-Credentials: true`
//! - Allow-Methods / Allow-Headers / `Vary: Origin` / `Cache-Control: no-cache` on every response
//! - `OPTIONS` preflight is answered here with 204
//!
//! `Vary: Origin` makes CDNs in front of us cache one copy per origin.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

#[derive(Clone, Debug)]
struct AllowedOrigins(Arc<[HeaderValue]>);

/// Apply the asset header policy to the given Router.
pub fn apply(router: Router, allowed_origins: &[String]) -> Router {
    let allowed = AllowedOrigins(
        allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect(),
    );

    router.layer(middleware::from_fn_with_state(allowed, asset_headers))
}

async fn asset_headers(
    State(allowed): State<AllowedOrigins>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .filter(|origin| allowed.0.iter().any(|v| v == *origin))
        .cloned();

    let mut res = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    set_policy_headers(res.headers_mut(), origin);
    res
}

fn set_policy_headers(headers: &mut HeaderMap, origin: Option<HeaderValue>) {
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
}
