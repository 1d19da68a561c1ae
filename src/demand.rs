// src/demand.rs

use crate::types::{VehicleClass, VehicleCounts, VehicleRecord};
use rand::Rng;
use std::cmp::Ordering;

/// Start delay carried by the first queued vehicle of each class.
const FIRST_VEHICLE_START_DELAY: f64 = 2.0;
/// Start delay for every vehicle behind the first.
const FOLLOWER_START_DELAY: f64 = 0.5;

/// Headway sampling range in seconds.
const HEADWAY_MIN: f64 = 2.0;
const HEADWAY_MAX: f64 = 3.0;

/// Expand per-class counts into one record per observed vehicle.
///
/// Headways are drawn from the passed generator so callers control
/// reproducibility. Records are sorted by `(start_delay, distance)`
/// ascending, which groups the head-of-queue vehicle of each class at the
/// tail; the ordering is deterministic and has no effect on the computed
/// green time.
pub fn build_phase_demand(
    approach_distance: f64,
    counts: &VehicleCounts,
    rng: &mut impl Rng,
) -> Vec<VehicleRecord> {
    let mut records = Vec::with_capacity(counts.total() as usize);

    push_class(
        &mut records,
        VehicleClass::TwoWheeler,
        counts.two_wheelers,
        approach_distance,
        rng,
    );
    push_class(
        &mut records,
        VehicleClass::LightMotorVehicle,
        counts.light_motor_vehicles,
        approach_distance,
        rng,
    );
    push_class(
        &mut records,
        VehicleClass::HeavyMotorVehicle,
        counts.heavy_motor_vehicles,
        approach_distance,
        rng,
    );

    records.sort_by(|a, b| {
        (a.start_delay, a.distance)
            .partial_cmp(&(b.start_delay, b.distance))
            .unwrap_or(Ordering::Equal)
    });

    records
}

fn push_class(
    records: &mut Vec<VehicleRecord>,
    class: VehicleClass,
    count: u32,
    distance: f64,
    rng: &mut impl Rng,
) {
    for k in 0..count {
        records.push(VehicleRecord {
            class,
            pce: class.pce(),
            start_delay: if k == 0 {
                FIRST_VEHICLE_START_DELAY
            } else {
                FOLLOWER_START_DELAY
            },
            headway: rng.gen_range(HEADWAY_MIN..HEADWAY_MAX),
            distance,
            start_velocity: class.start_velocity(),
        });
    }
}

/// Scale each record's headway by its class factor.
///
/// The scaled headway is recorded on the vehicle but never read back by
/// the green-time formula, which depends only on summed PCE and lane
/// count. Kept so exported records match the historical data model.
pub fn calibrate_headways(records: &mut [VehicleRecord]) {
    for record in records.iter_mut() {
        record.headway *= record.class.calibration_factor();
    }
}
