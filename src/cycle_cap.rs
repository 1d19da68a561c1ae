// src/cycle_cap.rs

use crate::types::GreenTimeResult;
use tracing::warn;

/// Clamp per-phase greens and enforce the global cycle cap.
///
/// Two-step transform whose order is load-bearing: every green is first
/// clamped to `max_green_per_phase`, and the clamped sum decides whether
/// the global cap `n * max_green_per_phase` is exceeded. When scaling is
/// required, the factor applies to the ORIGINAL greens, not the clamped
/// ones, so a scaled value may land above the per-phase limit again. That
/// is accepted model behavior; do not fold the steps into one pass.
///
/// Demand figures ride along untouched for clearance reporting.
pub fn enforce_cycle_cap(
    greens: &[GreenTimeResult],
    max_green_per_phase: f64,
) -> Vec<GreenTimeResult> {
    let cap = greens.len() as f64 * max_green_per_phase;

    let clamped: Vec<f64> = greens
        .iter()
        .map(|info| info.green.min(max_green_per_phase))
        .collect();
    let total_clamped: f64 = clamped.iter().sum();

    if total_clamped <= cap {
        return greens
            .iter()
            .zip(&clamped)
            .map(|(info, &green)| GreenTimeResult { green, ..*info })
            .collect();
    }

    let scale = cap / total_clamped;
    warn!(
        "cycle cap exceeded: {:.2}s of green against {:.2}s, scaling by {:.4}",
        total_clamped, cap, scale
    );
    greens
        .iter()
        .map(|info| GreenTimeResult {
            green: info.green * scale,
            ..*info
        })
        .collect()
}
