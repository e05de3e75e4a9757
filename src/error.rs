use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// One rejected input field, serialized in the `detail` list of a 422 body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Location of the offending value, e.g. `["body", "Trip_Distance_km"]`
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
}

impl FieldError {
    pub fn body(field: &str, msg: impl Into<String>, kind: &str) -> Self {
        FieldError {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind: kind.to_string(),
            input: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<serde_json::Value>) -> Self {
        self.input = Some(input.into());
        self
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.loc.join("."), e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_missing_locations(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("Could not find location: {}", n))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("{}", join_missing_locations(.0))]
    LocationNotFound(Vec<String>),

    #[error("Prediction API returned {status}: {detail}")]
    PredictionApi { status: u16, detail: String },

    #[error("Cannot connect to prediction API: {0}")]
    Connection(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Validation(errors) => {
                tracing::info!("Rejected trip input: {}", join_field_errors(&errors));
                (StatusCode::UNPROCESSABLE_ENTITY, json!(errors))
            }
            AppError::UnknownCategory { ref field, ref value } => {
                tracing::info!(field = %field, "Unknown category '{}' for {}", value, field);
                let error = FieldError::body(
                    field,
                    format!("Unknown category '{}' for {}", value, field),
                    "unknown_category",
                )
                .with_input(value.as_str());
                (StatusCode::UNPROCESSABLE_ENTITY, json!([error]))
            }
            AppError::Prediction(ref e) => {
                tracing::error!("Prediction pipeline failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!(format!("Prediction error: {}", e)),
                )
            }
            AppError::Artifact(ref e) => {
                tracing::error!("Artifact error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("Internal server error"),
                )
            }
            AppError::Geocoding(ref e) => {
                tracing::error!("Geocoding error: {}", e);
                (StatusCode::BAD_GATEWAY, json!("Geocoding service error"))
            }
            ref e @ AppError::LocationNotFound(_) => {
                (StatusCode::NOT_FOUND, json!(e.to_string()))
            }
            AppError::PredictionApi { status, ref detail } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                json!(detail),
            ),
            AppError::Connection(ref e) => {
                tracing::warn!("Prediction API unreachable: {}", e);
                (StatusCode::BAD_GATEWAY, json!("Prediction service unreachable"))
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = AppError::Validation(vec![
            FieldError::body("Trip_Distance_km", "Input should be greater than 0", "greater_than"),
            FieldError::body("Base_Fare", "Input should be greater than 0", "greater_than"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: body.Trip_Distance_km: Input should be greater than 0; \
             body.Base_Fare: Input should be greater than 0"
        );
    }

    #[test]
    fn test_location_not_found_joins_names() {
        let err = AppError::LocationNotFound(vec!["Atlantis".to_string(), "Lemuria".to_string()]);
        assert_eq!(
            err.to_string(),
            "Could not find location: Atlantis | Could not find location: Lemuria"
        );
    }

    #[test]
    fn test_status_codes() {
        let validation = AppError::Validation(vec![]).into_response();
        assert_eq!(validation.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let unknown = AppError::UnknownCategory {
            field: "Weather".to_string(),
            value: "Snow".to_string(),
        }
        .into_response();
        assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let pipeline = AppError::Prediction("shape mismatch".to_string()).into_response();
        assert_eq!(pipeline.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
