//! Raw session-log schema
//!
//! This module defines the loosely-typed input records as they appear in the
//! session log files, and the validator that turns them into typed
//! [`crate::types::EventRecord`]s.

mod adapter;
mod raw_event;

pub use adapter::*;
pub use raw_event::*;
