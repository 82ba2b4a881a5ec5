use axum::Router;
use pixly_core::{PixlyError, ServerConfig};
use pixly_restlette::{build_restlette_router, ApiError};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the full Axum application from a ServerConfig.
///
/// Anything outside the image routes falls through to a JSON 404.
pub fn build_app(config: ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(build_restlette_router(&config.path, config.store))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> ApiError {
    ApiError(PixlyError::NotFound("Not Found".to_string()))
}

/// Start the server on the configured port.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let port = config.port;
    let app = build_app(config);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("pixly listening on port {port}");
    axum::serve(listener, app).await?;
    Ok(())
}
