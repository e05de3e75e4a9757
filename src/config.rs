use crate::constants::*;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Prediction server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding the model, scaler, encoder and feature-name artifacts
    pub model_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            model_dir: env::var("MODEL_DIR")
                .unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string())
                .into(),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration shared by the prediction and geocoding clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub predict_api_url: String,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            predict_api_url: DEFAULT_PREDICT_API_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_user_agent: DEFAULT_GEOCODER_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        let connect_timeout_secs: u64 = env::var("CLIENT_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.connect_timeout.as_secs().to_string())
            .parse()
            .map_err(|_| "Invalid CLIENT_CONNECT_TIMEOUT_SECS")?;

        let request_timeout_secs: u64 = env::var("CLIENT_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.request_timeout.as_secs().to_string())
            .parse()
            .map_err(|_| "Invalid CLIENT_REQUEST_TIMEOUT_SECS")?;

        if connect_timeout_secs == 0 || request_timeout_secs == 0 {
            return Err("Client timeouts must be at least 1 second".to_string());
        }

        Ok(Self {
            predict_api_url: env::var("PREDICT_API_URL").unwrap_or(defaults.predict_api_url),
            geocoder_url: env::var("GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            geocoder_user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or(defaults.geocoder_user_agent),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}
