use axum::{
    http::Method,
    routing::get,
    Router,
};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod auth;
mod config;
mod error;
mod graphql;
mod handlers;
mod pagination;
mod store;
mod validation;

use config::Config;
use store::Store;

#[cfg(test)]
mod tests;

pub struct AppState {
    pub store: RwLock<Store>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Arc<Self> {
        Arc::new(Self {
            store: RwLock::new(store),
            config,
        })
    }
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

/// REST API under `/api`.
pub fn rest_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "MaintDesk development API" }))
        .nest("/api", handlers::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors()),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("maintdesk_backend=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let store = Store::load(config.fixture_path.as_deref())?;
    let state = AppState::new(store, config.clone());

    let rest = rest_router(state.clone());
    let graphql = graphql::graphql_router(state).layer(cors());

    let rest_listener = tokio::net::TcpListener::bind(&config.rest_addr).await?;
    let graphql_listener = tokio::net::TcpListener::bind(&config.graphql_addr).await?;
    tracing::info!("REST API running on http://{}/api", config.rest_addr);
    tracing::info!("GraphQL running on http://{}/graphql", config.graphql_addr);

    tokio::try_join!(
        axum::serve(rest_listener, rest).into_future(),
        axum::serve(graphql_listener, graphql).into_future(),
    )?;

    Ok(())
}
