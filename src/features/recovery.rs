//! Error and recovery features
//!
//! Each error report is matched to the first later run attempt that carries no
//! error detail. Matching is greedy and non-consuming: one clean run can close
//! several earlier errors, and an error with no later clean run is still
//! counted but adds no latency sample.

use crate::features::temporal::{mean, seconds_between};
use crate::types::{ErrorFeatures, EventRecord, Session};
use serde_json::Value;
use std::collections::BTreeSet;

/// Compute error count, recovery latency, error diversity and run outcomes
pub fn compute(session: &Session) -> ErrorFeatures {
    let events = &session.events;
    let errors: Vec<&EventRecord> = events.iter().filter(|e| e.action.is_error()).collect();

    let latencies = recovery_latencies(events);
    let error_count = errors.len() as u32;
    let successful_compilations =
        events.iter().filter(|e| e.action.is_successful_run()).count() as u32;

    let signatures: BTreeSet<String> = errors
        .iter()
        .map(|e| error_signature(e.action.error_detail()))
        .collect();

    ErrorFeatures {
        error_count,
        error_recovery_time: mean(&latencies),
        error_types: signatures.len() as u32,
        recovered_errors: latencies.len() as u32,
        successful_compilations,
        syntax_error_rate: syntax_error_rate(error_count, successful_compilations),
    }
}

/// Recovery latency in seconds for every error that has a qualifying run.
///
/// The search walks the whole sequence in order and takes the first event that
/// is strictly later than the error and is a clean run.
pub fn recovery_latencies(events: &[EventRecord]) -> Vec<f64> {
    events
        .iter()
        .filter(|e| e.action.is_error())
        .filter_map(|error| {
            events
                .iter()
                .find(|candidate| {
                    candidate.timestamp > error.timestamp && candidate.action.is_successful_run()
                })
                .map(|recovery| seconds_between(error.timestamp, recovery.timestamp))
        })
        .collect()
}

/// Structural signature of an error detail.
///
/// A missing detail reads as an empty object, so every detail-less error
/// shares one signature.
fn error_signature(detail: Option<&Value>) -> String {
    match detail {
        Some(value) => value.to_string(),
        None => Value::Object(serde_json::Map::new()).to_string(),
    }
}

/// Share of run outcomes that were errors
fn syntax_error_rate(error_count: u32, successful_compilations: u32) -> f64 {
    let attempts = error_count + successful_compilations;
    if attempts == 0 {
        return 0.0;
    }
    error_count as f64 / attempts as f64
}
