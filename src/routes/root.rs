use crate::constants::API_VERSION;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET / - Liveness and endpoint discovery
pub async fn read_root() -> Json<Value> {
    Json(json!({
        "message": "Taxi Price Prediction API is running!",
        "version": API_VERSION,
        "endpoints": {
            "predict": "/predict",
            "health": "/health"
        }
    }))
}

/// GET /health - Report which model is being served
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let artifacts = state.prediction_service.artifacts();
    let info = artifacts.feature_info();

    Json(json!({
        "status": "ok",
        "model": artifacts.model().kind(),
        "features": artifacts.model().n_features(),
        "categorical_features": info.categorical_features,
        "numerical_features": info.numerical_features,
    }))
}
