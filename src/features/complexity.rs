//! Complexity and evolution features

use crate::concepts::ConceptWeights;
use crate::features::temporal::mean;
use crate::types::{ComplexityFeatures, EventRecord, Session};
use std::collections::BTreeSet;

/// Compute buffer evolution and concept-weighted complexity
pub fn compute(session: &Session, weights: &ConceptWeights) -> ComplexityFeatures {
    let concepts: Vec<&str> = session
        .events
        .iter()
        .filter(|e| e.action.is_menu_click())
        .filter_map(|e| e.action.concept())
        .collect();

    // Configured weights are unbounded; the score pins at u32::MAX
    let code_complexity_score = concepts
        .iter()
        .fold(0u32, |score, label| score.saturating_add(weights.weight(label)));
    let menu_exploration_depth = concepts.iter().collect::<BTreeSet<_>>().len() as u32;

    ComplexityFeatures {
        code_evolution_rate: code_evolution_rate(&session.events),
        code_complexity_score,
        menu_exploration_depth,
    }
}

/// Mean absolute change of the buffer size between consecutive events
pub fn code_evolution_rate(events: &[EventRecord]) -> f64 {
    let changes: Vec<f64> = events
        .windows(2)
        .map(|pair| pair[1].total_chars.abs_diff(pair[0].total_chars) as f64)
        .collect();
    mean(&changes)
}
