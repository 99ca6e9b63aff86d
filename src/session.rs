//! Session assembly
//!
//! Builds [`Session`]s from validated events. The assembler trusts the order it
//! is given: bounds come from the first and last event, nothing is re-sorted.

use crate::schema::{EventValidator, RawEvent};
use crate::types::{EventRecord, Session};
use std::collections::BTreeMap;
use tracing::debug;

/// Assembler for per-student sessions
pub struct SessionAssembler;

impl SessionAssembler {
    /// Build a session from already-validated events.
    ///
    /// Returns `None` when `events` is empty; such a session never reaches
    /// feature extraction.
    pub fn assemble(
        student_id: &str,
        session_index: usize,
        events: Vec<EventRecord>,
    ) -> Option<Session> {
        let start_time = events.first()?.timestamp;
        let end_time = events.last()?.timestamp;

        Some(Session {
            student_id: student_id.to_string(),
            session_id: session_id(student_id, session_index),
            session_index,
            event_count: events.len(),
            events,
            start_time,
            end_time,
        })
    }

    /// Validate a raw session and assemble it
    pub fn from_raw(student_id: &str, session_index: usize, raw: &[RawEvent]) -> Option<Session> {
        let cleaned = EventValidator::clean_session(raw);
        let dropped = raw.len() - cleaned.len();
        if dropped > 0 {
            debug!(student_id, session_index, dropped, "malformed events removed");
        }

        let session = Self::assemble(student_id, session_index, cleaned);
        if session.is_none() {
            debug!(student_id, session_index, "session has no valid events, skipping");
        }
        session
    }

    /// Assemble every session of every student.
    ///
    /// Sessions come out ordered by student id, then by load order within a
    /// student. Empty sessions are left out but keep their index, so session
    /// ids stay stable regardless of which sessions survive cleaning.
    pub fn assemble_all(raw_sessions: &BTreeMap<String, Vec<Vec<RawEvent>>>) -> Vec<Session> {
        raw_sessions
            .iter()
            .flat_map(|(student_id, sessions)| {
                sessions
                    .iter()
                    .enumerate()
                    .filter_map(move |(index, raw)| Self::from_raw(student_id, index, raw))
            })
            .collect()
    }
}

/// Session identifier for a student's n-th session
pub fn session_id(student_id: &str, session_index: usize) -> String {
    format!("{}_{}", student_id, session_index)
}
