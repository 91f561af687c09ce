use axum::{Router, routing::get};
use configuration::{Config, Navigation};
use pages::PageRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod charts;
pub mod error;
pub mod handlers;
pub mod query;
pub mod render;
pub mod telemetry;

/// The shared application state that all handlers can access.
///
/// Pages are immutable after startup, so handlers share them without locks.
pub struct AppState {
    pub pages: PageRegistry,
}

impl AppState {
    /// Generates every page's dataset and trains the sample model.
    pub fn build(config: &Config, navigation: Navigation) -> Result<Self, error::AppError> {
        Ok(Self {
            pages: PageRegistry::build(config, navigation)?,
        })
    }
}

/// The application routes. Separate from `run_server` so tests can drive it directly.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/", get(handlers::landing))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/navigation", get(handlers::navigation))
        .route("/api/pages/:slug", get(handlers::page_json))
        .route("/:slug", get(handlers::page_html))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
