// src/lib.rs

pub mod config;
pub mod counts;
pub mod cycle_cap;
pub mod demand;
pub mod green_time;
pub mod scheduler;
pub mod types;

pub use cycle_cap::enforce_cycle_cap;
pub use demand::{build_phase_demand, calibrate_headways};
pub use green_time::{compute_green_time, SATURATION_FLOW_RATE_PER_LANE, START_UP_LOST_TIME};
pub use scheduler::{compute_schedule, schedule_phases, ScheduleError, ALL_RED_TIME, YELLOW_TIME};
pub use types::{
    Config, GreenTimeResult, PhaseRequest, ScheduleEntry, SchedulerParams, VehicleClass,
    VehicleCounts, VehicleRecord,
};
