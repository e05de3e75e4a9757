//! Stable application-wide constants.
//!
//! Values here are wire-level invariants, artifact file names, and default
//! fallbacks for env-var-based configuration. They should rarely change.

// --- Server defaults (used when HOST / PORT / MODEL_DIR env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "8000";
/// Default directory holding the model artifacts.
pub const DEFAULT_MODEL_DIR: &str = "models";

// --- API surface ---

/// Version reported by `GET /`.
pub const API_VERSION: &str = "1.0.0";
/// Fixed currency label attached to every prediction.
pub const CURRENCY: &str = "SEK";
/// Number of decimals the predicted price is rounded to.
pub const PRICE_DECIMALS: u32 = 2;

// --- Artifact file names inside the model directory ---

pub const MODEL_FILE: &str = "taxi_price_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const FEATURE_INFO_FILE: &str = "feature_names.json";

// --- Client defaults (used when the client env vars are absent) ---

/// Base URL of the prediction service.
pub const DEFAULT_PREDICT_API_URL: &str = "http://localhost:8000";
/// Base URL of the Nominatim-compatible geocoder.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
/// Nominatim's usage policy requires an identifying User-Agent.
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "taxi_price_predictor";
/// Connect timeout for every outbound client call.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Total request timeout for every outbound client call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
