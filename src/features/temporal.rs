//! Temporal features: session length and pacing

use crate::types::{EventRecord, Session, TemporalFeatures};
use chrono::{DateTime, Utc};

/// Compute duration and mean inter-event gap
pub fn compute(session: &Session) -> TemporalFeatures {
    TemporalFeatures {
        session_duration_minutes: seconds_between(session.start_time, session.end_time) / 60.0,
        avg_time_between_actions: mean(&inter_event_gaps(&session.events)),
    }
}

/// Gaps in seconds between consecutive events, pairwise in the given order
pub fn inter_event_gaps(events: &[EventRecord]) -> Vec<f64> {
    events
        .windows(2)
        .map(|pair| seconds_between(pair[0].timestamp, pair[1].timestamp))
        .collect()
}

/// Signed seconds from `from` to `to`, microsecond resolution
///
/// Spans too wide for microseconds in an `i64` (about 292,000 years) fall
/// back to milliseconds.
pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let span = to - from;
    match span.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => span.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Arithmetic mean; 0 for an empty slice
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::complexity::code_evolution_rate;
    use crate::features::test_support::{event_at, event_at_us, session_of};
    use crate::types::Action;

    #[test]
    fn test_three_event_gaps() {
        let session = session_of(vec![
            event_at(0, Action::Autocomplete, 0),
            event_at(10, Action::Autocomplete, 5),
            event_at(40, Action::Autocomplete, 5),
        ]);

        // Gaps of 10s and 30s
        let features = compute(&session);
        assert!((features.avg_time_between_actions - 20.0).abs() < 1e-9);
        assert!((features.session_duration_minutes - 40.0 / 60.0).abs() < 1e-9);
        assert!((code_evolution_rate(&session.events) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_event_has_no_gap() {
        let session = session_of(vec![event_at(0, Action::Autocomplete, 0)]);

        let features = compute(&session);
        assert_eq!(features.avg_time_between_actions, 0.0);
        assert_eq!(features.session_duration_minutes, 0.0);
    }

    #[test]
    fn test_duration_in_minutes() {
        let session = session_of(vec![
            event_at(0, Action::Autocomplete, 0),
            event_at(1800, Action::Autocomplete, 0),
        ]);

        assert!((compute(&session).session_duration_minutes - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_sub_second_precision() {
        let gaps = inter_event_gaps(&[
            event_at(0, Action::Autocomplete, 0),
            event_at_us(1_500_000, Action::Autocomplete, 0),
        ]);
        assert_eq!(gaps, vec![1.5]);
    }

    #[test]
    fn test_microsecond_gaps_are_kept() {
        let session = session_of(vec![
            event_at_us(0, Action::Autocomplete, 0),
            event_at_us(900, Action::Autocomplete, 0),
            event_at_us(1_250, Action::Autocomplete, 0),
        ]);

        let features = compute(&session);
        assert!((features.avg_time_between_actions - 0.000625).abs() < 1e-12);
        assert!((features.session_duration_minutes - 0.00125 / 60.0).abs() < 1e-15);
    }

    #[test]
    fn test_seconds_between_parsed_timestamps() {
        let from = crate::schema::parse_timestamp("2024-01-15T14:00:00.000000").unwrap();
        let to = crate::schema::parse_timestamp("2024-01-15T14:00:00.000900").unwrap();

        assert!((seconds_between(from, to) - 0.0009).abs() < 1e-12);
        assert!((seconds_between(to, from) + 0.0009).abs() < 1e-12);
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
    }
}
