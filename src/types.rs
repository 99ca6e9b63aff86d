//! Core data types
//!
//! This module defines the typed events, sessions and feature rows that flow
//! through the extraction pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{
    ACTION_ERROR, ACTION_RUN, AUTOCOMPLETE_PREFIX, BACKSPACE_MARKER, KEYSTROKE_PREFIX,
    MENU_CLICK_PREFIX, MENU_LABEL_SEPARATOR,
};

/// Learner action, classified once when the raw record is validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Error report; `detail` is the attached error list, if any
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<Value>,
    },
    /// Run/execute attempt
    Run {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<Value>,
    },
    /// Key press in the editor
    Keystroke { backspace: bool },
    /// Autocomplete suggestion accepted
    Autocomplete,
    /// Click in the concept side menu
    MenuClick {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        concept: Option<String>,
    },
    /// Any other action tag, kept verbatim
    Other { tag: String },
}

impl Action {
    /// Classify a raw action tag.
    ///
    /// `error_detail` is only kept on error and run actions; every other kind
    /// drops it.
    pub fn classify(tag: &str, error_detail: Option<Value>) -> Self {
        if tag == ACTION_ERROR {
            Action::Error {
                detail: error_detail,
            }
        } else if tag == ACTION_RUN {
            Action::Run {
                detail: error_detail,
            }
        } else if tag.starts_with(KEYSTROKE_PREFIX) {
            Action::Keystroke {
                backspace: tag.contains(BACKSPACE_MARKER),
            }
        } else if tag.starts_with(AUTOCOMPLETE_PREFIX) {
            Action::Autocomplete
        } else if tag.starts_with(MENU_CLICK_PREFIX) {
            Action::MenuClick {
                concept: tag.split(MENU_LABEL_SEPARATOR).nth(1).map(str::to_string),
            }
        } else {
            Action::Other {
                tag: tag.to_string(),
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Action::Error { .. })
    }

    /// A run attempt that carries no error detail
    pub fn is_successful_run(&self) -> bool {
        matches!(self, Action::Run { detail: None })
    }

    pub fn is_keystroke(&self) -> bool {
        matches!(self, Action::Keystroke { .. })
    }

    pub fn is_backspace(&self) -> bool {
        matches!(self, Action::Keystroke { backspace: true })
    }

    pub fn is_autocomplete(&self) -> bool {
        matches!(self, Action::Autocomplete)
    }

    pub fn is_menu_click(&self) -> bool {
        matches!(self, Action::MenuClick { .. })
    }

    /// Concept label of a menu click, if the tag carried one
    pub fn concept(&self) -> Option<&str> {
        match self {
            Action::MenuClick { concept } => concept.as_deref(),
            _ => None,
        }
    }

    /// Error detail attached to an error or run action
    pub fn error_detail(&self) -> Option<&Value> {
        match self {
            Action::Error { detail } | Action::Run { detail } => detail.as_ref(),
            _ => None,
        }
    }
}

/// One validated, typed learner action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Absolute event time
    pub timestamp: DateTime<Utc>,
    /// Classified action
    pub action: Action,
    /// Characters in the editor buffer after this action
    pub total_chars: u64,
    /// Lines in the editor buffer after this action
    pub total_lines: u64,
}

/// One continuous coding episode of one learner
///
/// Built by [`crate::session::SessionAssembler`], which guarantees at least one
/// event and takes the bounds from the first and last event as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub student_id: String,
    /// `"{student_id}_{session_index}"`
    pub session_id: String,
    /// Position of this session in the student's load order
    pub session_index: usize,
    /// Validated events, in the order they were received
    pub events: Vec<EventRecord>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_count: usize,
}

/// Time-based features
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TemporalFeatures {
    pub session_duration_minutes: f64,
    /// Mean gap between consecutive events, in seconds
    pub avg_time_between_actions: f64,
}

/// Error and recovery features
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorFeatures {
    pub error_count: u32,
    /// Mean recovery latency in seconds over errors that were recovered
    pub error_recovery_time: f64,
    /// Number of distinct error-detail signatures
    pub error_types: u32,
    /// Number of latency samples behind `error_recovery_time`
    pub recovered_errors: u32,
    /// Run attempts that carried no error detail
    pub successful_compilations: u32,
    pub syntax_error_rate: f64,
}

/// Editing behavior features
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CodingFeatures {
    pub keystrokes_per_minute: f64,
    pub backspace_ratio: f64,
    pub autocomplete_usage: u32,
    pub ide_feature_usage: u32,
}

/// Buffer evolution and concept complexity features
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplexityFeatures {
    pub code_evolution_rate: f64,
    pub code_complexity_score: u32,
    pub menu_exploration_depth: u32,
}

/// Number of numeric feature columns
pub const FEATURE_COUNT: usize = 14;

/// Feature column names, in output order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "session_duration_minutes",
    "avg_time_between_actions",
    "error_recovery_time",
    "error_count",
    "error_types",
    "keystrokes_per_minute",
    "backspace_ratio",
    "autocomplete_usage",
    "menu_exploration_depth",
    "code_complexity_score",
    "syntax_error_rate",
    "successful_compilations",
    "ide_feature_usage",
    "code_evolution_rate",
];

/// One output row: identifiers plus the fourteen session features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub student_id: String,
    pub session_id: String,
    pub session_duration_minutes: f64,
    pub avg_time_between_actions: f64,
    pub error_recovery_time: f64,
    pub error_count: u32,
    pub error_types: u32,
    pub keystrokes_per_minute: f64,
    pub backspace_ratio: f64,
    pub autocomplete_usage: u32,
    pub menu_exploration_depth: u32,
    pub code_complexity_score: u32,
    pub syntax_error_rate: f64,
    pub successful_compilations: u32,
    pub ide_feature_usage: u32,
    pub code_evolution_rate: f64,
}

impl FeatureVector {
    /// Merge the four feature blocks of one session into a row
    pub fn from_parts(
        session: &Session,
        temporal: TemporalFeatures,
        errors: ErrorFeatures,
        coding: CodingFeatures,
        complexity: ComplexityFeatures,
    ) -> Self {
        Self {
            student_id: session.student_id.clone(),
            session_id: session.session_id.clone(),
            session_duration_minutes: temporal.session_duration_minutes,
            avg_time_between_actions: temporal.avg_time_between_actions,
            error_recovery_time: errors.error_recovery_time,
            error_count: errors.error_count,
            error_types: errors.error_types,
            keystrokes_per_minute: coding.keystrokes_per_minute,
            backspace_ratio: coding.backspace_ratio,
            autocomplete_usage: coding.autocomplete_usage,
            menu_exploration_depth: complexity.menu_exploration_depth,
            code_complexity_score: complexity.code_complexity_score,
            syntax_error_rate: errors.syntax_error_rate,
            successful_compilations: errors.successful_compilations,
            ide_feature_usage: coding.ide_feature_usage,
            code_evolution_rate: complexity.code_evolution_rate,
        }
    }

    /// Numeric features in [`FEATURE_NAMES`] order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.session_duration_minutes,
            self.avg_time_between_actions,
            self.error_recovery_time,
            self.error_count as f64,
            self.error_types as f64,
            self.keystrokes_per_minute,
            self.backspace_ratio,
            self.autocomplete_usage as f64,
            self.menu_exploration_depth as f64,
            self.code_complexity_score as f64,
            self.syntax_error_rate,
            self.successful_compilations as f64,
            self.ide_feature_usage as f64,
            self.code_evolution_rate,
        ]
    }
}
