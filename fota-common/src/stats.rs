//! Summary figures for a list of completed activations.

use serde::{Deserialize, Serialize};

use crate::temporal::parse_timestamp;
use crate::types::NormalizedActivation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationStats {
    pub total_count: usize,
    pub total_hours: f64,
    pub avg_minutes: f64,
    pub longest_minutes: f64,
}

/// Minutes between start and end; 0 when either is unusable, never negative.
pub fn duration_minutes(activation: &NormalizedActivation) -> f64 {
    let start = parse_timestamp(activation.started_at.as_deref());
    let end = parse_timestamp(activation.ended_at.as_deref());
    if !start.valid || !end.valid {
        return 0.0;
    }
    ((end.epoch_millis - start.epoch_millis) as f64 / 60_000.0).max(0.0)
}

pub fn compute_stats(activations: &[NormalizedActivation]) -> ActivationStats {
    if activations.is_empty() {
        return ActivationStats::default();
    }

    let durations: Vec<f64> = activations.iter().map(duration_minutes).collect();
    let total_minutes: f64 = durations.iter().sum();
    let longest_minutes = durations.iter().copied().fold(0.0, f64::max);

    ActivationStats {
        total_count: activations.len(),
        total_hours: total_minutes / 60.0,
        avg_minutes: total_minutes / durations.len() as f64,
        longest_minutes,
    }
}
