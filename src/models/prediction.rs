use crate::constants::{CURRENCY, PRICE_DECIMALS};
use serde::{Deserialize, Serialize};

/// Response body of a successful `/predict` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
    pub currency: String,
}

impl PredictionResult {
    /// Wrap a raw model output: round to the price precision and attach the
    /// fixed currency label.
    pub fn from_raw(raw: f64) -> Self {
        PredictionResult {
            predicted_price: round_to(raw, PRICE_DECIMALS),
            currency: CURRENCY.to_string(),
        }
    }
}

pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let multiplier = 10_f64.powi(decimal_places as i32);
    (value * multiplier).round() / multiplier
}
