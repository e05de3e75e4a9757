use crate::artifacts::ModelArtifacts;
use crate::error::{AppError, Result};
use crate::models::{PredictionResult, TripAttributes};
use crate::services::preprocessing::build_feature_row;
use std::sync::Arc;

/// Runs the full prediction pipeline against shared, read-only artifacts.
#[derive(Clone)]
pub struct PredictionService {
    artifacts: Arc<ModelArtifacts>,
}

impl PredictionService {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        PredictionService { artifacts }
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    /// Validate, preprocess and score one trip. Nothing is returned unless
    /// every stage succeeds.
    pub fn predict(&self, trip: &TripAttributes) -> Result<PredictionResult> {
        trip.validate().map_err(AppError::Validation)?;

        let row = build_feature_row(trip, &self.artifacts)?;
        let raw = self
            .artifacts
            .model()
            .predict(&row)
            .map_err(AppError::Prediction)?;

        let result = PredictionResult::from_raw(raw);
        // Rounding can overflow for finite outputs near f64::MAX
        if !result.predicted_price.is_finite() {
            return Err(AppError::Prediction(format!(
                "Predicted price {} cannot be represented",
                raw
            )));
        }
        tracing::debug!(
            raw_prediction = raw,
            predicted_price = result.predicted_price,
            "Predicted {:.2} {}",
            result.predicted_price,
            result.currency
        );
        Ok(result)
    }
}
