//! Codetrace - Per-session behavioral features from programming-session logs
//!
//! Codetrace turns raw IDE event logs (keystrokes, side-menu clicks, run
//! attempts, error reports) into one fixed-width feature row per coding
//! session through a deterministic pipeline: event validation → session
//! assembly → feature derivation → feature table.
//!
//! ## Feature families
//!
//! - **Temporal**: session duration, mean gap between actions
//! - **Error recovery**: error count and diversity, time to the next clean run
//! - **Coding behavior**: keystroke pace, backspace ratio, IDE assistance
//! - **Complexity**: buffer evolution, concept-weighted menu exploration

pub mod concepts;
pub mod config;
pub mod encoder;
pub mod error;
pub mod features;
pub mod loader;
pub mod logging;
pub mod normalizer;
pub mod pipeline;
pub mod schema;
pub mod session;
pub mod types;

pub use concepts::ConceptWeights;
pub use config::ExtractorConfig;
pub use error::ComputeError;
pub use loader::SessionLoader;
pub use normalizer::FeatureScaler;
pub use pipeline::{session_log_to_features, FeatureMatrixBuilder};
pub use schema::{EventValidator, RawEvent, SCHEMA_VERSION};
pub use types::{EventRecord, FeatureVector, Session, FEATURE_NAMES};

/// Codetrace version embedded in encoded tables
pub const CODETRACE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for encoded tables
pub const PRODUCER_NAME: &str = "codetrace";
