pub mod predict;
pub mod root;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root::read_root))
        .route("/health", get(root::health_check))
        .route("/predict", post(predict::predict_price))
        .with_state(state)
}
