//! Model and preprocessing artifacts, loaded once at startup.
//!
//! All four artifacts are JSON documents in the model directory. Loading runs
//! a schema self-check so that a feature ordering that disagrees with the
//! trained model fails the process at startup instead of silently producing
//! wrong prices.

pub mod encoder;
pub mod model;
pub mod scaler;

use crate::constants::{ENCODERS_FILE, FEATURE_INFO_FILE, MODEL_FILE, SCALER_FILE};
use crate::error::{AppError, Result};
use crate::models::TripAttributes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub use encoder::LabelEncoder;
pub use model::RegressionModel;
pub use scaler::StandardScaler;

/// Which columns are categorical and which are numerical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub categorical_features: Vec<String>,
    pub numerical_features: Vec<String>,
}

#[derive(Debug)]
pub struct ModelArtifacts {
    model: RegressionModel,
    scaler: StandardScaler,
    encoders: HashMap<String, LabelEncoder>,
    feature_info: FeatureInfo,
}

impl ModelArtifacts {
    /// Assemble artifacts and run the schema self-check.
    pub fn new(
        model: RegressionModel,
        scaler: StandardScaler,
        encoders: HashMap<String, LabelEncoder>,
        feature_info: FeatureInfo,
    ) -> Result<Self> {
        let artifacts = ModelArtifacts {
            model,
            scaler,
            encoders,
            feature_info,
        };
        artifacts.check_schema().map_err(AppError::Artifact)?;
        Ok(artifacts)
    }

    /// Load all artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        tracing::info!("Loading model artifacts from {}", dir.display());

        let model: RegressionModel = read_artifact(&dir.join(MODEL_FILE))?;
        let scaler: StandardScaler = read_artifact(&dir.join(SCALER_FILE))?;
        let encoders: HashMap<String, LabelEncoder> = read_artifact(&dir.join(ENCODERS_FILE))?;
        let feature_info: FeatureInfo = read_artifact(&dir.join(FEATURE_INFO_FILE))?;

        let artifacts = Self::new(model, scaler, encoders, feature_info)?;
        tracing::info!(
            model = artifacts.model.kind(),
            features = artifacts.model.n_features(),
            "Model artifacts loaded: {} model over {} features",
            artifacts.model.kind(),
            artifacts.model.n_features()
        );
        Ok(artifacts)
    }

    pub fn model(&self) -> &RegressionModel {
        &self.model
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn feature_info(&self) -> &FeatureInfo {
        &self.feature_info
    }

    pub fn encoder(&self, field: &str) -> Option<&LabelEncoder> {
        self.encoders.get(field)
    }

    fn check_schema(&self) -> std::result::Result<(), String> {
        let info = &self.feature_info;
        let columns: HashSet<&str> = TripAttributes::COLUMNS.iter().copied().collect();

        let mut declared = HashSet::new();
        for name in info
            .categorical_features
            .iter()
            .chain(&info.numerical_features)
        {
            if !declared.insert(name.as_str()) {
                return Err(format!("Feature '{}' is declared more than once", name));
            }
            if !columns.contains(name.as_str()) {
                return Err(format!("Feature '{}' is not a trip attribute", name));
            }
        }
        if let Some(missing) = TripAttributes::COLUMNS
            .iter()
            .find(|c| !declared.contains(**c))
        {
            return Err(format!(
                "Trip attribute '{}' is neither categorical nor numerical",
                missing
            ));
        }

        for field in &info.categorical_features {
            if !self.encoders.contains_key(field) {
                return Err(format!("No label encoder for categorical feature '{}'", field));
            }
        }

        self.scaler.check(&info.numerical_features)?;
        self.model.check()?;

        let trained: Vec<&str> = self.model.feature_names().iter().map(String::as_str).collect();
        if trained != TripAttributes::COLUMNS {
            return Err(format!(
                "Model was trained on columns {:?} but the feature row is {:?}",
                trained,
                TripAttributes::COLUMNS
            ));
        }

        Ok(())
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| AppError::Artifact(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&data)
        .map_err(|e| AppError::Artifact(format!("Failed to parse {}: {}", path.display(), e)))
}
