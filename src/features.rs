//! Per-session feature derivation
//!
//! Four stateless calculators run over one cleaned [`Session`]:
//!
//! - [`temporal`]: session duration and mean inter-event gap
//! - [`recovery`]: error counts, recovery latency, run outcomes
//! - [`coding`]: keystroke pace, backspace ratio, IDE assistance
//! - [`complexity`]: buffer evolution and concept-weighted complexity
//!
//! The coding block depends on the temporal duration, so temporal always runs
//! first. Nothing here reads shared mutable state.

pub mod coding;
pub mod complexity;
pub mod recovery;
pub mod temporal;

use crate::concepts::ConceptWeights;
use crate::types::{FeatureVector, Session};

/// Feature deriver for cleaned sessions
pub struct SessionFeatureDeriver;

impl SessionFeatureDeriver {
    /// Derive the full feature row of one session
    pub fn derive(session: &Session, weights: &ConceptWeights) -> FeatureVector {
        let temporal = temporal::compute(session);
        let errors = recovery::compute(session);
        let coding = coding::compute(session, temporal.session_duration_minutes);
        let complexity = complexity::compute(session, weights);

        FeatureVector::from_parts(session, temporal, errors, coding, complexity)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::session::SessionAssembler;
    use crate::types::{Action, EventRecord, Session};
    use chrono::{Duration, TimeZone, Utc};

    pub fn event_at_us(offset_us: i64, action: Action, total_chars: u64) -> EventRecord {
        EventRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap()
                + Duration::microseconds(offset_us),
            action,
            total_chars,
            total_lines: 1,
        }
    }

    pub fn event_at(offset_sec: i64, action: Action, total_chars: u64) -> EventRecord {
        event_at_us(offset_sec * 1_000_000, action, total_chars)
    }

    pub fn session_of(events: Vec<EventRecord>) -> Session {
        SessionAssembler::assemble("student", 0, events).unwrap()
    }
}
