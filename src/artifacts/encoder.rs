use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct LabelEncoderFile {
    classes: Vec<String>,
}

/// Fitted label encoder: maps each label of a fixed vocabulary to its index
/// in the stored class list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LabelEncoderFile")]
pub struct LabelEncoder {
    classes: Vec<String>,
    #[serde(skip)]
    codes: HashMap<String, usize>,
}

impl TryFrom<LabelEncoderFile> for LabelEncoder {
    type Error = String;

    fn try_from(file: LabelEncoderFile) -> Result<Self, Self::Error> {
        LabelEncoder::new(file.classes)
    }
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("Label encoder has an empty vocabulary".to_string());
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            if codes.insert(label.clone(), code).is_some() {
                return Err(format!("Label encoder has duplicate class '{}'", label));
            }
        }

        Ok(LabelEncoder { classes, codes })
    }

    /// Integer code for `label`, or `None` when it was not seen during fitting.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.codes.get(label).copied()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}
