//! ChainName HTTP server

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{any, get},
    Router,
};
use chainname_resolver::{NameResolver, Networks, ResolveError, ResolverAddressCache, ResolverConfig};
use chainname_rpc::{HttpClientConfig, TransportError};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{ConfigError, ServerConfig};
use crate::handlers::{self, AppState};

/// `Cache-Control` of GET responses: one hour.
pub const GET_CACHE_CONTROL: &str = "public, max-age=3600";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", any(handlers::root))
        .route("/:param", get(handlers::field))
        .layer(middleware::from_fn(cache_control))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET responses may be cached unless they are server errors; nothing else
/// may be.
async fn cache_control(req: Request, next: Next) -> Response {
    let cacheable = req.method() == Method::GET;
    let mut response = next.run(req).await;
    let value = if cacheable && !response.status().is_server_error() {
        HeaderValue::from_static(GET_CACHE_CONTROL)
    } else {
        HeaderValue::from_static("no-store")
    };
    response.headers_mut().insert(header::CACHE_CONTROL, value);
    response
}

/// Build the application state from configuration.
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let registry = config.registry()?;
    let http = HttpClientConfig {
        request_timeout: config.rpc_timeout,
        ..Default::default()
    };
    let networks = Networks::from_registry(&registry, &http)?;
    let selector = config.selector(registry)?;

    let resolver = NameResolver::new(
        Arc::new(ResolverAddressCache::new()),
        ResolverConfig {
            rpc_timeout: config.rpc_timeout,
        },
    )?;

    for chain in selector.registry().iter() {
        tracing::info!(chain = %chain, rpc = %chain.rpc_url, "chain configured");
    }

    Ok(AppState {
        resolver,
        selector,
        networks,
    })
}

pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(build_state(&config)?);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("ChainName service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C signal"),
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received SIGTERM signal");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Starting graceful shutdown...");
}
