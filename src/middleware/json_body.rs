//! Reject request bodies that claim to be JSON but do not parse.
//!
//! Runs ahead of authentication, so a malformed body never reaches the auth
//! pipeline or a resolver.

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};
use http_body_util::LengthLimitError;
use serde::de::IgnoredAny;
use std::error::Error as StdError;

use crate::error::AppError;
use crate::state::AppState;

pub fn apply(router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn(reject_malformed_json))
}

async fn reject_malformed_json(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    if !declares_json(&req) {
        return Ok(next.run(req).await);
    }

    let (parts, body) = req.into_parts();

    // The transport layer already bounds the body size.
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|err| {
            if is_length_limit(&err) {
                AppError::PayloadTooLarge
            } else {
                AppError::bad_request("INVALID_BODY", "failed to read request body")
            }
        })?;

    // An empty body is left for the handler to reject.
    if !bytes.is_empty() && serde_json::from_slice::<IgnoredAny>(&bytes).is_err() {
        return Err(AppError::bad_request("INVALID_JSON", "Invalid JSON"));
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

fn declares_json<B>(req: &Request<B>) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::post};
    use tower::ServiceExt;

    fn router() -> Router {
        Router::new()
            .route("/", post(|| async { "ok" }))
            .route_layer(middleware::from_fn(reject_malformed_json))
    }

    fn request(content_type: &str, body: &'static str) -> Request<Body> {
        Request::post("/")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_json_passes_through() {
        let res = router()
            .oneshot(request("application/json; charset=utf-8", r#"{"a":1}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let res = router()
            .oneshot(request("application/json", "{not json"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_json_bodies_are_not_inspected() {
        let res = router()
            .oneshot(request("text/plain", "{not json"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_json_body_is_left_to_the_handler() {
        let res = router()
            .oneshot(request("application/json", ""))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
