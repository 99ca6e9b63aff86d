//! Per-column feature standardization
//!
//! The feature table itself is never scaled; consumers that feed a model fit a
//! [`FeatureScaler`] on their training rows and apply it to every row they
//! score. Scaler state persists as JSON.

use crate::error::ComputeError;
use crate::types::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use serde::{Deserialize, Serialize};

/// Column means and standard deviations fitted on a feature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    /// Column names the statistics refer to, in order
    columns: Vec<String>,
    means: Vec<f64>,
    /// Population standard deviations
    std_devs: Vec<f64>,
    /// Number of rows the scaler was fitted on
    samples: usize,
}

impl FeatureScaler {
    /// Fit column statistics on a non-empty table
    pub fn fit(rows: &[FeatureVector]) -> Result<Self, ComputeError> {
        if rows.is_empty() {
            return Err(ComputeError::Scaler(
                "Cannot fit a scaler on an empty feature table".to_string(),
            ));
        }

        let n = rows.len() as f64;
        let matrix: Vec<[f64; FEATURE_COUNT]> = rows.iter().map(FeatureVector::to_array).collect();

        let mut means = vec![0.0; FEATURE_COUNT];
        for row in &matrix {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut std_devs = vec![0.0; FEATURE_COUNT];
        for row in &matrix {
            for (col, value) in row.iter().enumerate() {
                std_devs[col] += (value - means[col]).powi(2);
            }
        }
        std_devs.iter_mut().for_each(|s| *s = (*s / n).sqrt());

        Ok(Self {
            columns: FEATURE_NAMES.iter().map(|c| c.to_string()).collect(),
            means,
            std_devs,
            samples: rows.len(),
        })
    }

    /// Standardize one row: `(x - mean) / std`; constant columns map to 0
    pub fn transform(&self, row: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let mut out = row.to_array();
        for (col, value) in out.iter_mut().enumerate() {
            let std_dev = self.std_devs[col];
            *value = if std_dev > 0.0 {
                (*value - self.means[col]) / std_dev
            } else {
                0.0
            };
        }
        out
    }

    /// Standardize a whole table
    pub fn transform_all(&self, rows: &[FeatureVector]) -> Vec<[f64; FEATURE_COUNT]> {
        rows.iter().map(|row| self.transform(row)).collect()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Serialize scaler state to JSON
    pub fn to_json(&self) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(self).map_err(|e| ComputeError::EncodingError(e.to_string()))
    }

    /// Load scaler state, checking it matches the current column layout
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let scaler: FeatureScaler = serde_json::from_str(json)
            .map_err(|e| ComputeError::Scaler(format!("Invalid scaler state: {}", e)))?;

        let expected: Vec<&str> = FEATURE_NAMES.to_vec();
        let actual: Vec<&str> = scaler.columns.iter().map(String::as_str).collect();
        if actual != expected
            || scaler.means.len() != FEATURE_COUNT
            || scaler.std_devs.len() != FEATURE_COUNT
        {
            return Err(ComputeError::Scaler(
                "Scaler state does not match the feature columns".to_string(),
            ));
        }
        Ok(scaler)
    }
}
