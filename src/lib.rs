// Library exports for testing and reusability

pub mod artifacts;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

// App state for sharing across the application
use services::predictor::PredictionService;

pub struct AppState {
    pub prediction_service: PredictionService,
}
