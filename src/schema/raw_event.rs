//! Session-log raw event definition
//!
//! A session log file is a JSON array of loosely-typed objects, one per learner
//! action. Field names and action tags are the ones the IDE plugin writes:
//!
//! ```json
//! { "time": "2024-01-15T14:00:05", "action": "Hata", "totalchars": 120,
//!   "totallines": 9, "hata_listesi": { "line": 4, "msg": "SyntaxError" } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input schema identifier, reported by the CLI
pub const SCHEMA_VERSION: &str = "ide.session_log.v1";

/// Timestamp field (ISO-8601 text)
pub const FIELD_TIME: &str = "time";
/// Action tag field
pub const FIELD_ACTION: &str = "action";
/// Buffer character counter field
pub const FIELD_TOTAL_CHARS: &str = "totalchars";
/// Buffer line counter field
pub const FIELD_TOTAL_LINES: &str = "totallines";
/// Error list attached to error reports and failed runs
pub const FIELD_ERROR_DETAIL: &str = "hata_listesi";

/// Required fields, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 4] = [
    FIELD_TIME,
    FIELD_ACTION,
    FIELD_TOTAL_CHARS,
    FIELD_TOTAL_LINES,
];

/// Error report ("Error")
pub const ACTION_ERROR: &str = "Hata";
/// Run/execute attempt ("Action: Run")
pub const ACTION_RUN: &str = "Eylem: Çalıştır";
/// Key press prefix ("Pressed Key")
pub const KEYSTROKE_PREFIX: &str = "Basılan Tuş";
/// Marker inside a keystroke tag for the backspace key
pub const BACKSPACE_MARKER: &str = "BCKSPC";
/// Autocomplete prefix
pub const AUTOCOMPLETE_PREFIX: &str = "Autocomplete";
/// Side-menu click prefix ("Left menu click")
pub const MENU_CLICK_PREFIX: &str = "Solmenü_Tıkla";
/// Separator between the menu click prefix and the concept label
pub const MENU_LABEL_SEPARATOR: &str = ": ";

/// One raw log entry, exactly as read from the file
///
/// Kept as an arbitrary JSON value so that a single malformed entry (a number,
/// a string, an object missing fields) never fails the whole file; the
/// validator decides entry by entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEvent(pub Value);

/// One raw session: the entries of one log file, in file order
pub type RawSession = Vec<RawEvent>;

impl RawEvent {
    /// Build a well-formed raw event
    pub fn new(
        time: impl Into<String>,
        action: impl Into<String>,
        total_chars: u64,
        total_lines: u64,
    ) -> Self {
        let mut fields = Map::new();
        fields.insert(FIELD_TIME.to_string(), Value::String(time.into()));
        fields.insert(FIELD_ACTION.to_string(), Value::String(action.into()));
        fields.insert(FIELD_TOTAL_CHARS.to_string(), Value::from(total_chars));
        fields.insert(FIELD_TOTAL_LINES.to_string(), Value::from(total_lines));
        RawEvent(Value::Object(fields))
    }

    /// Attach an error list
    pub fn with_error_detail(mut self, detail: Value) -> Self {
        if let Value::Object(fields) = &mut self.0 {
            fields.insert(FIELD_ERROR_DETAIL.to_string(), detail);
        }
        self
    }

    /// Field lookup; `None` when the entry is not an object or lacks the key
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|fields| fields.get(name))
    }

    /// Whether the entry is a JSON object
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }
}

impl From<Value> for RawEvent {
    fn from(value: Value) -> Self {
        RawEvent(value)
    }
}

/// Reasons a raw entry is rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Entry is not a JSON object")]
    NotAnObject,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unparseable timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Field {field} must be a string, got {value}")]
    NotAString { field: &'static str, value: String },

    #[error("Field {field} must be a non-negative integer, got {value}")]
    InvalidCounter { field: &'static str, value: String },
}
