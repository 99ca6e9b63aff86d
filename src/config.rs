//! Extractor configuration, loaded from a JSON file

use crate::concepts::ConceptWeights;
use crate::error::ComputeError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Concept label -> weight table used by the complexity score
    pub concept_weights: ConceptWeights,
    /// Extract sessions on the rayon worker pool
    pub parallel: bool,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: String,
    /// One JSON object per log line
    pub json: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            concept_weights: ConceptWeights::default(),
            parallel: true,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Config file picked up from the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "codetrace.json";

impl ExtractorConfig {
    /// Load a named JSON config file.
    ///
    /// Fields left out of the file keep their default values. A missing,
    /// unreadable or malformed file is a [`ComputeError::Config`].
    pub fn load(path: &Path) -> Result<Self, ComputeError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ComputeError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&data)
    }

    /// Load a config file that may legitimately be absent.
    ///
    /// Used for implicit discovery: a missing file yields the defaults, a
    /// present but broken one is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ComputeError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        serde_json::from_str(json).map_err(|e| ComputeError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::CONCEPT_LOOPS;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert!(config.parallel);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.concept_weights.weight(CONCEPT_LOOPS), 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ExtractorConfig::from_json(r#"{"parallel": false}"#).unwrap();
        assert!(!config.parallel);
        assert_eq!(&config.concept_weights, ConceptWeights::standard());
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_custom_weights_replace_table() {
        let config =
            ExtractorConfig::from_json(r#"{"concept_weights": {"Fonksiyonlar": 6}}"#).unwrap();
        assert_eq!(config.concept_weights.weight("Fonksiyonlar"), 6);
        assert_eq!(config.concept_weights.weight(CONCEPT_LOOPS), 0);
    }

    #[test]
    fn test_load_named_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExtractorConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ComputeError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let config = ExtractorConfig::load_or_default(&path).unwrap();
        assert_eq!(config, ExtractorConfig::default());
    }

    #[test]
    fn test_load_or_default_still_rejects_broken_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2").unwrap();

        let result = ExtractorConfig::load_or_default(file.path());
        assert!(matches!(result, Err(ComputeError::Config(_))));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = ExtractorConfig::load(file.path());
        assert!(matches!(result, Err(ComputeError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"log": {{"level": "debug", "json": true}}}}"#).unwrap();

        let config = ExtractorConfig::load(file.path()).unwrap();
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);
        assert!(config.parallel);
    }
}
