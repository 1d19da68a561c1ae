use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub junction: JunctionConfig,
    pub scheduler: SchedulerConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JunctionConfig {
    pub id: String,
    pub approach_distance: f64,
    pub lanes_per_phase: Vec<u32>,
    pub counts_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub service_fraction: f64,
    pub red_interval: f64,
    pub max_green_per_phase: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
    pub save_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn scheduler_params(&self) -> SchedulerParams {
        SchedulerParams {
            service_fraction: self.scheduler.service_fraction,
            red_interval: self.scheduler.red_interval,
            max_green_per_phase: self.scheduler.max_green_per_phase,
            approach_distance: self.junction.approach_distance,
        }
    }
}

/// Vehicle classification used by the demand model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    TwoWheeler,
    LightMotorVehicle,
    HeavyMotorVehicle,
}

impl VehicleClass {
    /// Passenger-car-equivalent weight for capacity calculations.
    pub fn pce(self) -> f64 {
        match self {
            VehicleClass::TwoWheeler => 0.5,
            VehicleClass::LightMotorVehicle => 1.0,
            VehicleClass::HeavyMotorVehicle => 2.5,
        }
    }

    /// Headway calibration factor. Scales recorded headways only; the
    /// green-time formula reads summed PCE, never individual headways.
    pub fn calibration_factor(self) -> f64 {
        match self {
            VehicleClass::TwoWheeler => 0.8,
            VehicleClass::LightMotorVehicle => 1.0,
            VehicleClass::HeavyMotorVehicle => 1.5,
        }
    }

    /// Average starting velocity in meters per second.
    pub fn start_velocity(self) -> f64 {
        match self {
            VehicleClass::TwoWheeler => 4.0,
            VehicleClass::LightMotorVehicle => 5.0,
            VehicleClass::HeavyMotorVehicle => 3.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::TwoWheeler => "two_wheeler",
            VehicleClass::LightMotorVehicle => "light_motor_vehicle",
            VehicleClass::HeavyMotorVehicle => "heavy_motor_vehicle",
        }
    }
}

/// One queued vehicle, synthesized from observed class counts.
///
/// Built fresh for every scheduling call and discarded once the schedule
/// is produced. Only `pce` feeds the green-time formula; the remaining
/// fields describe the queue for debugging and export.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleRecord {
    pub class: VehicleClass,
    pub pce: f64,
    pub start_delay: f64,
    pub headway: f64,
    pub distance: f64,
    pub start_velocity: f64,
}

/// Raw per-class counts observed for one phase during a detection window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleCounts {
    pub two_wheelers: u32,
    pub light_motor_vehicles: u32,
    pub heavy_motor_vehicles: u32,
}

impl VehicleCounts {
    pub fn new(two_wheelers: u32, light_motor_vehicles: u32, heavy_motor_vehicles: u32) -> Self {
        Self {
            two_wheelers,
            light_motor_vehicles,
            heavy_motor_vehicles,
        }
    }

    pub fn total(&self) -> u32 {
        self.two_wheelers + self.light_motor_vehicles + self.heavy_motor_vehicles
    }
}

/// Scheduling input for one signal phase.
///
/// A `lane_count` of zero marks a disabled phase: it still appears in the
/// schedule but is forced to zero green.
#[derive(Debug, Clone, Copy)]
pub struct PhaseRequest {
    pub lane_count: u32,
    pub counts: VehicleCounts,
}

/// Green time for one phase plus the demand figures behind it, carried
/// through cap enforcement for clearance reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreenTimeResult {
    pub green: f64,
    pub total_demand: f64,
    pub target_demand: f64,
}

/// Final timing for one phase. Serialized field names match the wire
/// format consumed by downstream signal controllers.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub traffic_light_no: u32,
    #[serde(rename = "G")]
    pub green: f64,
    #[serde(rename = "Y")]
    pub yellow: f64,
    #[serde(rename = "R")]
    pub red: f64,
    pub percentage_clearance: f64,
}

impl ScheduleEntry {
    pub fn cycle_time(&self) -> f64 {
        self.green + self.yellow + self.red
    }
}

/// Tunable scheduling parameters.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerParams {
    /// Target fraction of equivalent demand to clear, practically 0.8..=1.0.
    pub service_fraction: f64,
    /// Red interval in seconds. Accepted for interface stability; the
    /// current green-time formula does not consume it.
    pub red_interval: f64,
    /// Per-phase green ceiling in seconds; the global cycle cap is
    /// `n_phases * max_green_per_phase`.
    pub max_green_per_phase: f64,
    /// Distance from the stop line assigned to every synthesized record.
    pub approach_distance: f64,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            service_fraction: 0.8,
            red_interval: 60.0,
            max_green_per_phase: 150.0,
            approach_distance: 10.0,
        }
    }
}
