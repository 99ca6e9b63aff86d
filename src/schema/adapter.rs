//! Raw event validation
//!
//! Turns loosely-typed log entries into typed [`EventRecord`]s. An entry that
//! is missing a required field or carries an unparseable timestamp is dropped;
//! dropping is the only recovery, nothing here is fatal to a session.

use crate::error::ComputeError;
use crate::schema::raw_event::*;
use crate::types::{Action, EventRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

/// Naive (offset-less) timestamp layouts, interpreted as UTC
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layout; the event is placed at midnight UTC
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Validator for raw session-log entries
pub struct EventValidator;

impl EventValidator {
    /// Parse a JSON array of raw entries (one session log file)
    pub fn parse_session(json: &str) -> Result<RawSession, ComputeError> {
        serde_json::from_str(json)
            .map_err(|e| ComputeError::ParseError(format!("Failed to parse session log: {}", e)))
    }

    /// Validate one raw entry and classify its action
    pub fn validate(raw: &RawEvent) -> Result<EventRecord, ValidationError> {
        if !raw.is_object() {
            return Err(ValidationError::NotAnObject);
        }

        for field in REQUIRED_FIELDS {
            if raw.field(field).is_none() {
                return Err(ValidationError::MissingField(field));
            }
        }

        let timestamp = match raw.field(FIELD_TIME) {
            Some(Value::String(text)) => parse_timestamp(text)?,
            Some(other) => return Err(ValidationError::InvalidTimestamp(other.to_string())),
            None => return Err(ValidationError::MissingField(FIELD_TIME)),
        };

        let tag = match raw.field(FIELD_ACTION) {
            Some(Value::String(tag)) => tag.as_str(),
            Some(other) => {
                return Err(ValidationError::NotAString {
                    field: FIELD_ACTION,
                    value: other.to_string(),
                })
            }
            None => return Err(ValidationError::MissingField(FIELD_ACTION)),
        };

        let total_chars = parse_counter(raw, FIELD_TOTAL_CHARS)?;
        let total_lines = parse_counter(raw, FIELD_TOTAL_LINES)?;

        // Key presence decides, so an explicit null still counts as a detail
        let error_detail = raw.field(FIELD_ERROR_DETAIL).cloned();

        Ok(EventRecord {
            timestamp,
            action: Action::classify(tag, error_detail),
            total_chars,
            total_lines,
        })
    }

    /// Keep the valid entries of a raw session, in their original order
    pub fn clean_session(raw: &[RawEvent]) -> Vec<EventRecord> {
        raw.iter()
            .enumerate()
            .filter_map(|(index, event)| match Self::validate(event) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(index, error = %e, "dropping malformed event");
                    None
                }
            })
            .collect()
    }

    /// Validate a batch of entries, returning only the failures
    pub fn validate_events(raw: &[RawEvent]) -> Vec<ValidationResult> {
        raw.iter()
            .enumerate()
            .filter_map(|(index, event)| {
                Self::validate(event).err().map(|error| ValidationResult { index, error })
            })
            .collect()
    }
}

/// A rejected entry and the reason
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub index: usize,
    pub error: ValidationError,
}

/// Parse an ISO-8601 timestamp.
///
/// Offset-carrying forms are converted to UTC; naive forms are taken as UTC.
/// A bare date reads as midnight.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, DATE_ONLY_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidTimestamp(text.to_string()))
}

fn parse_counter(raw: &RawEvent, field: &'static str) -> Result<u64, ValidationError> {
    let value = raw.field(field).ok_or(ValidationError::MissingField(field))?;

    if let Some(n) = value.as_u64() {
        return Ok(n);
    }

    // Some exporters write counters as integral floats
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(ValidationError::InvalidCounter {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_validate_well_formed_event() {
        let raw = RawEvent::new("2024-01-15T14:00:05", "Basılan Tuş: BCKSPC", 120, 9);
        let record = EventValidator::validate(&raw).unwrap();

        assert_eq!(
            record.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 5).unwrap()
        );
        assert_eq!(record.action, Action::Keystroke { backspace: true });
        assert_eq!(record.total_chars, 120);
        assert_eq!(record.total_lines, 9);
    }

    #[test]
    fn test_missing_fields_rejected() {
        for field in REQUIRED_FIELDS {
            let mut raw = json!({
                "time": "2024-01-15T14:00:00",
                "action": "Hata",
                "totalchars": 1,
                "totallines": 1
            });
            raw.as_object_mut().unwrap().remove(field);

            assert_eq!(
                EventValidator::validate(&RawEvent(raw)),
                Err(ValidationError::MissingField(field))
            );
        }
    }

    #[test]
    fn test_non_object_rejected() {
        assert_eq!(
            EventValidator::validate(&RawEvent(json!(17))),
            Err(ValidationError::NotAnObject)
        );
    }

    #[test]
    fn test_unparseable_timestamp_rejected() {
        let raw = RawEvent::new("yesterday afternoon", "Hata", 0, 0);
        assert!(matches!(
            EventValidator::validate(&raw),
            Err(ValidationError::InvalidTimestamp(_))
        ));

        let raw = RawEvent(json!({
            "time": 1705327200, "action": "Hata", "totalchars": 0, "totallines": 0
        }));
        assert!(matches!(
            EventValidator::validate(&raw),
            Err(ValidationError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();

        assert_eq!(parse_timestamp("2024-01-15T14:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15 14:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15T14:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15T14:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15T17:00:00+03:00").unwrap(), expected);

        let fractional = parse_timestamp("2024-01-15T14:00:00.250").unwrap();
        assert_eq!((fractional - expected).num_milliseconds(), 250);

        let micros = parse_timestamp("2024-01-15T14:00:00.000900").unwrap();
        assert_eq!((micros - expected).num_microseconds(), Some(900));
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(
            parse_timestamp("2024-01-15").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("2024-01-32").is_err());

        let raw = RawEvent::new("2024-01-15", "Hata", 0, 0);
        assert!(EventValidator::validate(&raw).is_ok());
    }

    #[test]
    fn test_counter_validation() {
        let raw = RawEvent(json!({
            "time": "2024-01-15T14:00:00", "action": "x", "totalchars": 12.0, "totallines": 1
        }));
        assert_eq!(EventValidator::validate(&raw).unwrap().total_chars, 12);

        let raw = RawEvent(json!({
            "time": "2024-01-15T14:00:00", "action": "x", "totalchars": -3, "totallines": 1
        }));
        assert!(matches!(
            EventValidator::validate(&raw),
            Err(ValidationError::InvalidCounter { field: "totalchars", .. })
        ));

        let raw = RawEvent(json!({
            "time": "2024-01-15T14:00:00", "action": "x", "totalchars": 1, "totallines": "9"
        }));
        assert!(matches!(
            EventValidator::validate(&raw),
            Err(ValidationError::InvalidCounter { field: "totallines", .. })
        ));
    }

    #[test]
    fn test_null_error_detail_counts_as_present() {
        let raw = RawEvent::new("2024-01-15T14:00:00", "Eylem: Çalıştır", 0, 0)
            .with_error_detail(Value::Null);
        let record = EventValidator::validate(&raw).unwrap();

        assert_eq!(
            record.action,
            Action::Run {
                detail: Some(Value::Null)
            }
        );
        assert!(!record.action.is_successful_run());
    }

    #[test]
    fn test_clean_session_preserves_order_and_drops_invalid() {
        let raw = vec![
            RawEvent::new("2024-01-15T14:00:10", "Autocomplete", 5, 1),
            RawEvent(json!({"time": "2024-01-15T14:00:11"})),
            RawEvent::new("not a time", "Hata", 5, 1),
            RawEvent::new("2024-01-15T14:00:00", "Hata", 5, 1),
        ];

        let cleaned = EventValidator::clean_session(&raw);
        assert_eq!(cleaned.len(), 2);
        // Order as received, no re-sorting
        assert_eq!(cleaned[0].action, Action::Autocomplete);
        assert!(cleaned[1].action.is_error());
    }

    #[test]
    fn test_validate_events_reports_failures_only() {
        let raw = vec![
            RawEvent::new("2024-01-15T14:00:00", "Hata", 0, 0),
            RawEvent(json!([])),
            RawEvent(json!({"time": "2024-01-15T14:00:00", "action": "Hata", "totalchars": 0})),
        ];

        let failures = EventValidator::validate_events(&raw);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[0].error, ValidationError::NotAnObject);
        assert_eq!(failures[1].index, 2);
        assert_eq!(
            failures[1].error,
            ValidationError::MissingField(FIELD_TOTAL_LINES)
        );
    }

    #[test]
    fn test_parse_session_rejects_non_array() {
        assert!(EventValidator::parse_session("{\"time\": 1}").is_err());
        assert!(EventValidator::parse_session("not json").is_err());
        assert_eq!(EventValidator::parse_session("[]").unwrap().len(), 0);
    }
}
