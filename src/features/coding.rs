//! Coding-behavior features: typing pace, corrections and tool usage

use crate::types::{CodingFeatures, Session};

/// Compute keystroke pace, backspace share and IDE assistance counts.
///
/// Needs the session duration from the temporal block; a zero duration gives a
/// pace of 0 rather than an infinite rate.
pub fn compute(session: &Session, session_duration_minutes: f64) -> CodingFeatures {
    let mut keystrokes = 0u32;
    let mut backspaces = 0u32;
    let mut autocompletes = 0u32;
    let mut menu_clicks = 0u32;

    for event in &session.events {
        if event.action.is_keystroke() {
            keystrokes += 1;
            if event.action.is_backspace() {
                backspaces += 1;
            }
        } else if event.action.is_autocomplete() {
            autocompletes += 1;
        } else if event.action.is_menu_click() {
            menu_clicks += 1;
        }
    }

    let keystrokes_per_minute = if session_duration_minutes > 0.0 {
        keystrokes as f64 / session_duration_minutes
    } else {
        0.0
    };

    let backspace_ratio = if keystrokes > 0 {
        backspaces as f64 / keystrokes as f64
    } else {
        0.0
    };

    CodingFeatures {
        keystrokes_per_minute,
        backspace_ratio,
        autocomplete_usage: autocompletes,
        ide_feature_usage: autocompletes + menu_clicks,
    }
}
