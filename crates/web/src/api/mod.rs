use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use model::Establishment;
use serde_json::json;

pub mod directory;
pub mod establishments;

use crate::{common::schema, RegistryState, WebState};

pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Routes of the registry facade, served both at the root and below `/api`,
/// plus the local directory.
pub fn routes(state: &WebState) -> Router<WebState> {
    Router::new()
        .route("/", get(info))
        .merge(registry_routes())
        .nest("/api", registry_routes())
        .merge(directory::routes(&state.logos))
}

fn registry_routes() -> Router<WebState> {
    Router::new()
        .route("/health", get(health))
        .route("/establishments", post(establishments::add))
        .route("/establishments/schema", get(schema::<Establishment>))
        .route("/establishments/search", get(establishments::search))
        .route("/establishments/:id", put(establishments::update))
}

async fn info() -> impl IntoResponse {
    let endpoint = |path: &str, method: &str, description: &str| {
        json!({"path": path, "methods": [method], "description": description})
    };
    Json(json!({
        "name": "BTC Map Integration API",
        "description": "Registers bitcoin-accepting establishments on OpenStreetMap via BTC Map",
        "version": SERVICE_VERSION,
        "endpoints": [
            endpoint("/", "GET", "Service information"),
            endpoint("/health", "GET", "Health check"),
            endpoint("/api/health", "GET", "Health check (compatibility)"),
            endpoint("/establishments", "POST", "Add an establishment"),
            endpoint("/api/establishments", "POST", "Add an establishment (compatibility)"),
            endpoint("/establishments/{id}", "PUT", "Update an establishment"),
            endpoint("/api/establishments/{id}", "PUT", "Update an establishment (compatibility)"),
            endpoint("/establishments/search", "GET", "Search establishments"),
            endpoint("/api/establishments/search", "GET", "Search establishments (compatibility)"),
            endpoint("/establishments/schema", "GET", "Establishment JSON schema"),
            endpoint("/api/estabelecimentos", "POST", "Register a company in the local directory"),
            endpoint("/api/estabelecimentos", "GET", "List the local directory"),
        ]
    }))
}

async fn health(State(registry): State<RegistryState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "BTC Map integration API is running",
        "client_available": registry.client_available(),
        "api_url": registry.api_url,
        "api_key_configured": registry.api_key_configured,
    }))
}
