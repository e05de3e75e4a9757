use crate::artifacts::ModelArtifacts;
use crate::error::{AppError, Result};
use crate::models::{RawValue, TripAttributes};

/// Turn a validated trip into the numeric feature row the model was trained
/// on.
///
/// 1. materialize the trip as one row in native column order
/// 2. replace each categorical column (looked up by name) with its code
/// 3. standardize the numerical columns (by name) in place
///
/// Column order is never changed, so the result lines up with
/// `TripAttributes::COLUMNS`.
pub fn build_feature_row(trip: &TripAttributes, artifacts: &ModelArtifacts) -> Result<Vec<f64>> {
    let mut row = trip.to_row();
    let info = artifacts.feature_info();

    for field in &info.categorical_features {
        let idx = column_index(&row, field)?;
        let encoder = artifacts
            .encoder(field)
            .ok_or_else(|| AppError::Prediction(format!("No encoder for column '{}'", field)))?;

        let code = match &row[idx].1 {
            RawValue::Label(label) => {
                encoder
                    .encode(label)
                    .ok_or_else(|| AppError::UnknownCategory {
                        field: field.clone(),
                        value: label.clone(),
                    })?
            }
            RawValue::Number(_) => {
                return Err(AppError::Prediction(format!(
                    "Column '{}' is declared categorical but holds a number",
                    field
                )))
            }
        };
        row[idx].1 = RawValue::Number(code as f64);
    }

    let mut positions = Vec::with_capacity(info.numerical_features.len());
    let mut values = Vec::with_capacity(info.numerical_features.len());
    for field in &info.numerical_features {
        let idx = column_index(&row, field)?;
        match row[idx].1 {
            RawValue::Number(x) => values.push(x),
            RawValue::Label(_) => {
                return Err(AppError::Prediction(format!(
                    "Column '{}' is declared numerical but holds a label",
                    field
                )))
            }
        }
        positions.push(idx);
    }

    let scaled = artifacts
        .scaler()
        .transform(&values)
        .map_err(AppError::Prediction)?;
    for (idx, value) in positions.into_iter().zip(scaled) {
        row[idx].1 = RawValue::Number(value);
    }

    row.into_iter()
        .map(|(name, value)| match value {
            RawValue::Number(x) => Ok(x),
            RawValue::Label(_) => Err(AppError::Prediction(format!(
                "Column '{}' was left unencoded",
                name
            ))),
        })
        .collect()
}

fn column_index(row: &[(&'static str, RawValue)], field: &str) -> Result<usize> {
    row.iter()
        .position(|(name, _)| *name == field)
        .ok_or_else(|| AppError::Prediction(format!("Column '{}' not found in input", field)))
}
