use crate::error::{AppError, FieldError, Result};
use crate::models::{PredictionResult, TripAttributes};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /predict
/// Predict the price of a single taxi trip
pub async fn predict_price(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<TripAttributes>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    // Malformed bodies are reported like constraint violations
    let Json(trip) = payload.map_err(|rejection| {
        AppError::Validation(vec![FieldError {
            loc: vec!["body".to_string()],
            msg: rejection.body_text(),
            kind: "json_invalid".to_string(),
            input: None,
        }])
    })?;

    let result = state.prediction_service.predict(&trip)?;
    Ok(Json(result))
}
