pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::{extract::FromRef, routing::on, Router};
use btcmap::{BtcMapClient, Registry, RegistryConfig};
use common::{route_not_found, RouteErrorResponse, METHOD_FILTER_ALL};
use database::SqliteDatabase;
use middleware::cors::{cors_middleware, AllowedOrigins};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use upload::LogoStore;

pub mod api;
pub mod common;
pub mod config;
pub mod middleware;
pub mod upload;

/// The remote registry as seen by the handlers.
#[derive(Clone)]
pub struct RegistryState {
    client: Option<Arc<dyn Registry>>,
    pub api_url: String,
    pub api_key_configured: bool,
}

impl RegistryState {
    pub fn new(client: Option<Arc<dyn Registry>>, config: &RegistryConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key_configured: config.api_key_configured(),
        }
    }

    pub fn from_config(config: RegistryConfig) -> Self {
        let client = match BtcMapClient::new(config.clone()) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn Registry>),
            Err(why) => {
                log::warn!("BTC Map client not available: {why}");
                None
            }
        };
        Self::new(client, &config)
    }

    pub fn client_available(&self) -> bool {
        self.client.is_some()
    }

    /// The client for read-only calls.
    pub fn client(&self) -> RouteResult<&Arc<dyn Registry>> {
        self.client
            .as_ref()
            .ok_or_else(|| RouteErrorResponse::unavailable("BTC Map client not available"))
    }

    /// The client for writes, which additionally need an API key.
    pub fn write_client(&self) -> RouteResult<&Arc<dyn Registry>> {
        let client = self.client()?;
        if !self.api_key_configured {
            return Err(RouteErrorResponse::unavailable(
                "BTC Map API key not configured",
            ));
        }
        Ok(client)
    }
}

#[derive(Clone, FromRef)]
pub struct WebState {
    pub registry: RegistryState,
    pub database: SqliteDatabase,
    pub logos: LogoStore,
    pub allowed_origins: AllowedOrigins,
}

/// All routes, the not-found fallback and the CORS layer. A known path
/// called with an unmapped method is answered like an unknown route.
pub fn router(state: WebState) -> Router {
    let allowed_origins = state.allowed_origins.clone();
    Router::new()
        .merge(api::routes(&state))
        .method_not_allowed_fallback(route_not_found)
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(axum::middleware::from_fn_with_state(
            allowed_origins,
            cors_middleware,
        ))
}

pub async fn start_web_server(address: &str, state: WebState) -> std::io::Result<()> {
    let routes = router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(address).await?;
    log::info!("Listening on {address}.");
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}
