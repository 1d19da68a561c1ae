// src/green_time.rs

use crate::types::{GreenTimeResult, VehicleRecord};
use tracing::debug;

/// Sustainable discharge rate once a green is underway, in PCE per second
/// per lane (1800 PCE/hour).
pub const SATURATION_FLOW_RATE_PER_LANE: f64 = 0.5;

/// Start-up lost time per phase in seconds, covering the initial delay
/// before the queue discharges at saturation flow.
pub const START_UP_LOST_TIME: f64 = 3.0;

/// Required green time for one phase under the saturation-flow model.
///
/// Arrivals during the cycle are modeled as equal to the queued equivalent
/// demand, so the total demand is twice the queue's summed PCE. The target
/// is the service fraction of that total; `min` guards against a fraction
/// above 1.0.
///
/// `red_interval` is accepted for interface stability; the current formula
/// does not consume it. A lane count of zero disables the phase (zero
/// green), which is a configuration default rather than an error.
pub fn compute_green_time(
    records: &[VehicleRecord],
    service_fraction: f64,
    _red_interval: f64,
    num_lanes: u32,
) -> GreenTimeResult {
    let equivalent_demand: f64 = records.iter().map(|v| v.pce).sum();
    let arrival_demand = equivalent_demand;
    let total_demand = equivalent_demand + arrival_demand;
    let target_demand = total_demand.min(service_fraction * total_demand);

    if target_demand <= 0.0 || num_lanes == 0 {
        return GreenTimeResult {
            green: 0.0,
            total_demand,
            target_demand,
        };
    }

    let total_saturation_flow = SATURATION_FLOW_RATE_PER_LANE * num_lanes as f64;
    let time_to_clear = target_demand / total_saturation_flow;
    let green = (START_UP_LOST_TIME + time_to_clear).max(0.0);

    debug!(
        "green time: demand={:.2} target={:.2} lanes={} -> {:.2}s",
        total_demand, target_demand, num_lanes, green
    );

    GreenTimeResult {
        green,
        total_demand,
        target_demand,
    }
}
