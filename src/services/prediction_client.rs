use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use crate::models::{PredictionResult, TripAttributes};
use reqwest::Client;
use serde_json::Value;

/// HTTP client for the prediction service.
///
/// Every call is bounded by the configured connect and request timeouts, so
/// an unreachable service surfaces as `AppError::Connection` instead of
/// blocking the caller.
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        Ok(PredictionClient {
            client,
            base_url: config.predict_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST the trip to `/predict`.
    pub async fn predict(&self, trip: &TripAttributes) -> Result<PredictionResult> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(trip)
            .send()
            .await
            .map_err(|e| connection_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let detail = detail_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            tracing::warn!(status = %status, "Prediction request rejected: {}", detail);
            return Err(AppError::PredictionApi {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Prediction(format!("Failed to parse response: {}", e)))
    }

    /// GET `/`, the service's discovery document.
    pub async fn service_info(&self) -> Result<Value> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| connection_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::PredictionApi {
                status: status.as_u16(),
                detail: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Prediction(format!("Failed to parse response: {}", e)))
    }
}

fn connection_error(url: &str, e: reqwest::Error) -> AppError {
    let reason = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection refused or unreachable"
    } else {
        "request failed"
    };
    AppError::Connection(format!("{} ({}): {}", url, reason, e))
}

/// Extract a human-readable message from an error body's `detail` field:
/// either a plain string or a list of field errors.
fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .map(|item| {
                    let field = item
                        .get("loc")
                        .and_then(Value::as_array)
                        .and_then(|loc| loc.last())
                        .and_then(Value::as_str)
                        .unwrap_or("input");
                    let msg = item.get("msg").and_then(Value::as_str).unwrap_or("invalid");
                    format!("{}: {}", field, msg)
                })
                .collect();
            Some(messages.join("; "))
        }
        _ => None,
    }
}
