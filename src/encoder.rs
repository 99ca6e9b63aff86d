//! Feature table encoding
//!
//! Renders feature rows as NDJSON (one row per line) or as a JSON envelope
//! carrying producer metadata and the column layout.

use crate::error::ComputeError;
use crate::types::{FeatureVector, FEATURE_NAMES};
use crate::{CODETRACE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One feature row per line
    Ndjson,
    /// Compact JSON envelope
    Json,
    /// Indented JSON envelope
    JsonPretty,
}

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    /// Unique per encoder instance
    pub instance_id: String,
}

/// Feature table envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub producer: Producer,
    /// When the table was encoded (RFC3339)
    pub computed_at_utc: String,
    /// Numeric column names, in row order
    pub columns: Vec<String>,
    pub rows: Vec<FeatureVector>,
}

/// Encoder for feature tables
pub struct FeatureTableEncoder {
    instance_id: String,
}

impl Default for FeatureTableEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureTableEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Wrap rows into an envelope
    pub fn table(&self, rows: &[FeatureVector]) -> FeatureTable {
        FeatureTable {
            producer: Producer {
                name: PRODUCER_NAME.to_string(),
                version: CODETRACE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            columns: FEATURE_NAMES.iter().map(|c| c.to_string()).collect(),
            rows: rows.to_vec(),
        }
    }

    /// Render rows in the requested layout
    pub fn encode(
        &self,
        rows: &[FeatureVector],
        format: OutputFormat,
    ) -> Result<String, ComputeError> {
        let encoded = match format {
            OutputFormat::Ndjson => {
                let mut out = String::new();
                for row in rows {
                    out.push_str(&serde_json::to_string(row)?);
                    out.push('\n');
                }
                out
            }
            OutputFormat::Json => serde_json::to_string(&self.table(rows))?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&self.table(rows))?,
        };
        Ok(encoded)
    }
}
