/*
 * Responsibility
 * - Load Config → build dependencies (pool, auth pipeline, schema) → assemble Router
 * - Apply middleware (transport, CORS, asset headers)
 * - Start with axum::serve()
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api::{self, schema::build_schema},
    config::Config,
    middleware::{self, http::HttpLimits},
    services::auth::{IdentityStore, PgIdentityStore, build_auth_pipeline},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,health_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get lost.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(?config, "starting health gateway");

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("server ready at http://{}/graphql", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    // Lazy pool: the gateway starts even if the database is down.
    // Lookups then fail and requests fall back to unauthenticated.
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;

    let identities: Arc<dyn IdentityStore> = Arc::new(PgIdentityStore::new(db));

    let auth = build_auth_pipeline(config, Arc::clone(&identities));
    let schema = build_schema(identities);

    Ok(AppState::new(auth, schema))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let api = api::routes(state.clone()).with_state(state);
    let api = middleware::cors::apply(api, &config.cors_allowed_origins);

    let assets = Router::new().nest_service("/assets", ServeDir::new(config.assets_dir()));
    let assets = middleware::assets::apply(assets, &config.cors_allowed_origins);

    middleware::http::apply(
        api.merge(assets),
        HttpLimits {
            body_limit_bytes: config.http_body_limit_bytes,
            timeout: Duration::from_secs(config.http_timeout_seconds),
        },
    )
}
