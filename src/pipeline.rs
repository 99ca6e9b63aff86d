//! Feature matrix orchestration
//!
//! This module provides the public API for turning sessions into the feature
//! table: raw log -> validated events -> session -> feature row.

use crate::concepts::ConceptWeights;
use crate::config::ExtractorConfig;
use crate::error::ComputeError;
use crate::features::SessionFeatureDeriver;
use crate::schema::{EventValidator, RawSession};
use crate::session::SessionAssembler;
use crate::types::{FeatureVector, Session};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::info;

/// Extract the feature row of one session log (stateless, one-shot).
///
/// # Arguments
/// * `student_id` - Learner identifier
/// * `session_index` - Position of this log among the learner's sessions
/// * `session_json` - JSON array of raw log entries
///
/// # Returns
/// `Ok(None)` when no entry survives validation.
///
/// # Example
/// ```ignore
/// let row = session_log_to_features("student1", 0, &json)?;
/// ```
pub fn session_log_to_features(
    student_id: &str,
    session_index: usize,
    session_json: &str,
) -> Result<Option<FeatureVector>, ComputeError> {
    // Stage 1: Parse the log file
    let raw = EventValidator::parse_session(session_json)?;

    // Stage 2: Validate events and assemble the session
    let session = match SessionAssembler::from_raw(student_id, session_index, &raw) {
        Some(session) => session,
        None => return Ok(None),
    };

    // Stage 3: Derive features
    Ok(Some(SessionFeatureDeriver::derive(
        &session,
        ConceptWeights::standard(),
    )))
}

/// Builds the feature table from many sessions.
///
/// Each session is an independent task; with `parallel` set, tasks run on the
/// rayon pool. Rows come back in the same order as the input sessions either
/// way.
#[derive(Debug, Clone)]
pub struct FeatureMatrixBuilder {
    weights: ConceptWeights,
    parallel: bool,
}

impl Default for FeatureMatrixBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureMatrixBuilder {
    /// Create a builder with the standard concept table, running in parallel
    pub fn new() -> Self {
        Self {
            weights: ConceptWeights::default(),
            parallel: true,
        }
    }

    /// Create a builder from a loaded configuration
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            weights: config.concept_weights.clone(),
            parallel: config.parallel,
        }
    }

    /// Replace the concept weight table
    pub fn with_concept_weights(mut self, weights: ConceptWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Toggle the worker pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn concept_weights(&self) -> &ConceptWeights {
        &self.weights
    }

    /// One feature row per session
    pub fn build(&self, sessions: &[Session]) -> Vec<FeatureVector> {
        let weights = &self.weights;
        let rows: Vec<FeatureVector> = if self.parallel {
            sessions
                .par_iter()
                .map(|session| SessionFeatureDeriver::derive(session, weights))
                .collect()
        } else {
            sessions
                .iter()
                .map(|session| SessionFeatureDeriver::derive(session, weights))
                .collect()
        };

        info!(
            sessions = sessions.len(),
            rows = rows.len(),
            parallel = self.parallel,
            "feature matrix built"
        );
        rows
    }

    /// Validate, assemble and extract every raw session of every student.
    ///
    /// Sessions left empty by validation produce no row.
    pub fn build_from_raw(
        &self,
        raw_sessions: &BTreeMap<String, Vec<RawSession>>,
    ) -> Vec<FeatureVector> {
        let sessions = SessionAssembler::assemble_all(raw_sessions);
        let total: usize = raw_sessions.values().map(Vec::len).sum();
        info!(
            students = raw_sessions.len(),
            raw_sessions = total,
            valid_sessions = sessions.len(),
            "sessions assembled"
        );
        self.build(&sessions)
    }
}
