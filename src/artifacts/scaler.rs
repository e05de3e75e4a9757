use serde::{Deserialize, Serialize};

/// Fitted standardization transform: `(x - mean[i]) / scale[i]` per column,
/// with columns in the order the scaler was fitted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column names seen during fitting, when the artifact records them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Check internal consistency and that the scaler was fitted on exactly
    /// `numerical_features`, in that order.
    pub fn check(&self, numerical_features: &[String]) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "Scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.len() != numerical_features.len() {
            return Err(format!(
                "Scaler was fitted on {} columns but {} numerical features are declared",
                self.mean.len(),
                numerical_features.len()
            ));
        }
        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("Scaler mean for '{}' is not finite", numerical_features[i]));
        }
        if let Some(i) = self.scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(format!(
                "Scaler scale for '{}' must be finite and non-zero",
                numerical_features[i]
            ));
        }
        if let Some(ref names) = self.feature_names {
            if names.as_slice() != numerical_features {
                return Err(format!(
                    "Scaler columns {:?} do not match numerical features {:?}",
                    names, numerical_features
                ));
            }
        }
        Ok(())
    }

    /// Standardize one row of numerical columns.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, String> {
        if values.len() != self.n_features() {
            return Err(format!(
                "Scaler expects {} columns, got {}",
                self.n_features(),
                values.len()
            ));
        }

        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}
