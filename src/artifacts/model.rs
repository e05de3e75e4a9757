use serde::{Deserialize, Serialize};

/// Fitted regression model, tagged by `"type"` in the artifact file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegressionModel {
    Linear(LinearModel),
    GradientBoosting(GradientBoostingModel),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Additive ensemble of regression trees:
/// `init_prediction + learning_rate * sum(tree(x))`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingModel {
    pub feature_names: Vec<String>,
    pub init_prediction: f64,
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

/// Flat tree node. Leaves have `left == right == -1` or `feature == -1`;
/// internal nodes route to `left` when `x[feature] <= threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default = "leaf_marker")]
    pub feature: i64,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default = "leaf_marker")]
    pub left: i64,
    #[serde(default = "leaf_marker")]
    pub right: i64,
    pub value: f64,
}

fn leaf_marker() -> i64 {
    -1
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.feature < 0 || (self.left < 0 && self.right < 0)
    }
}

impl RegressionTree {
    /// Reject trees that could index out of range or fail to terminate.
    /// Children must come after their parent, which every depth-first
    /// tree export satisfies.
    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if !node.value.is_finite() {
                    return Err(format!("leaf {} has a non-finite value", idx));
                }
                continue;
            }
            if node.feature < 0 || node.feature as usize >= n_features {
                return Err(format!(
                    "node {} splits on feature {} (model has {})",
                    idx, node.feature, n_features
                ));
            }
            for child in [node.left, node.right] {
                if child <= idx as i64 || child as usize >= self.nodes.len() {
                    return Err(format!("node {} has invalid child {}", idx, child));
                }
            }
        }
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                return node.value;
            }
            idx = if row[node.feature as usize] <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }
}

impl RegressionModel {
    pub fn kind(&self) -> &'static str {
        match self {
            RegressionModel::Linear(_) => "linear",
            RegressionModel::GradientBoosting(_) => "gradient_boosting",
        }
    }

    /// Column names the model was trained on, in training order.
    pub fn feature_names(&self) -> &[String] {
        match self {
            RegressionModel::Linear(m) => &m.feature_names,
            RegressionModel::GradientBoosting(m) => &m.feature_names,
        }
    }

    pub fn n_features(&self) -> usize {
        self.feature_names().len()
    }

    /// Structural validation run once at load time, so `predict` can index
    /// without bounds failures.
    pub fn check(&self) -> Result<(), String> {
        let n = self.n_features();
        match self {
            RegressionModel::Linear(m) => {
                if m.coefficients.len() != n {
                    return Err(format!(
                        "Linear model has {} coefficients for {} features",
                        m.coefficients.len(),
                        n
                    ));
                }
                if !m.intercept.is_finite() || m.coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("Linear model has non-finite parameters".to_string());
                }
            }
            RegressionModel::GradientBoosting(m) => {
                if m.trees.is_empty() {
                    return Err("Gradient boosting model has no trees".to_string());
                }
                if !m.init_prediction.is_finite() || !m.learning_rate.is_finite() {
                    return Err("Gradient boosting model has non-finite parameters".to_string());
                }
                for (i, tree) in m.trees.iter().enumerate() {
                    tree.check(n).map_err(|e| format!("Tree {}: {}", i, e))?;
                }
            }
        }
        Ok(())
    }

    /// Predict a single row. The row must have exactly `n_features` columns
    /// in training order.
    pub fn predict(&self, row: &[f64]) -> Result<f64, String> {
        if row.len() != self.n_features() {
            return Err(format!(
                "Model expects {} features, got {}",
                self.n_features(),
                row.len()
            ));
        }

        let output = match self {
            RegressionModel::Linear(m) => {
                m.intercept
                    + m.coefficients
                        .iter()
                        .zip(row)
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
            RegressionModel::GradientBoosting(m) => {
                let boosted: f64 = m.trees.iter().map(|t| t.predict(row)).sum();
                m.init_prediction + m.learning_rate * boosted
            }
        };

        if output.is_finite() {
            Ok(output)
        } else {
            Err(format!("Model produced a non-finite output: {}", output))
        }
    }
}
