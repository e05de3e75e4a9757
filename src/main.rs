use axum::Router;
use std::sync::Arc;
use taxipred::artifacts::ModelArtifacts;
use taxipred::config::Config;
use taxipred::services::predictor::PredictionService;
use taxipred::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxipred=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting Taxi Price Prediction API server");
    tracing::info!("Configuration loaded successfully");

    // Artifacts must be loaded and self-checked before the listener binds
    let artifacts = Arc::new(ModelArtifacts::load(&config.model_dir)?);

    let state = Arc::new(AppState {
        prediction_service: PredictionService::new(artifacts),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .merge(taxipred::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
