use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::SimulationError;

/// Integrator tunables. Keys missing from a YAML file keep the defaults in
/// [`crate::constants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlightModelConfig {
    pub gravity: f64,
    pub sea_level_density: f64, // unless the environment sets its own
    pub scale_height: f64,

    pub throttle_response: f64,
    pub flap_response: f64,

    pub flap_lift_bonus: f64,
    pub stall_band: f64,
    pub stall_lift_retention: f64,
    pub induced_drag_factor: f64,
    pub flap_drag: f64,
    pub min_speed: f64,
    pub min_cos: f64,

    pub damping_base: f64,
    pub damping_flap_gain: f64,
    pub damping_floor: f64,

    pub roll_rate_gain: f64,
    pub pitch_rate_gain: f64,
    pub yaw_rate_gain: f64,
    pub roll_yaw_coupling: f64,
    pub roll_rate_response: f64,
    pub pitch_rate_response: f64,
    pub yaw_rate_response: f64,
    pub pitch_limit: f64,

    pub idle_fuel_flow: f64,
    pub throttle_fuel_gain: f64,
    pub thrust_per_fuel_flow: f64,

    pub crash_height: f64,
    pub crash_sink_rate: f64,
    pub ground_friction: f64,
    pub ground_settle_rate: f64,

    pub rotation_pitch_rate: f64,
    pub rotation_gain: f64,
    pub rotation_height: f64,

    pub score_airspeed_knots: f64,
    pub score_altitude_agl: f64,
}

impl Default for FlightModelConfig {
    fn default() -> Self {
        FlightModelConfig {
            gravity: GRAVITY,
            sea_level_density: AIR_DENSITY_SEA_LEVEL,
            scale_height: ATMOSPHERE_SCALE_HEIGHT,
            throttle_response: THROTTLE_RESPONSE,
            flap_response: FLAP_RESPONSE,
            flap_lift_bonus: FLAP_LIFT_BONUS,
            stall_band: STALL_BAND,
            stall_lift_retention: STALL_LIFT_RETENTION,
            induced_drag_factor: INDUCED_DRAG_FACTOR,
            flap_drag: FLAP_DRAG,
            min_speed: MIN_SPEED,
            min_cos: MIN_COS,
            damping_base: DAMPING_BASE,
            damping_flap_gain: DAMPING_FLAP_GAIN,
            damping_floor: DAMPING_FLOOR,
            roll_rate_gain: ROLL_RATE_GAIN,
            pitch_rate_gain: PITCH_RATE_GAIN,
            yaw_rate_gain: YAW_RATE_GAIN,
            roll_yaw_coupling: ROLL_YAW_COUPLING,
            roll_rate_response: ROLL_RATE_RESPONSE,
            pitch_rate_response: PITCH_RATE_RESPONSE,
            yaw_rate_response: YAW_RATE_RESPONSE,
            pitch_limit: PITCH_LIMIT,
            idle_fuel_flow: IDLE_FUEL_FLOW,
            throttle_fuel_gain: THROTTLE_FUEL_GAIN,
            thrust_per_fuel_flow: THRUST_PER_FUEL_FLOW,
            crash_height: CRASH_HEIGHT,
            crash_sink_rate: CRASH_SINK_RATE,
            ground_friction: GROUND_FRICTION,
            ground_settle_rate: GROUND_SETTLE_RATE,
            rotation_pitch_rate: ROTATION_PITCH_RATE,
            rotation_gain: ROTATION_GAIN,
            rotation_height: ROTATION_HEIGHT,
            score_airspeed_knots: SCORE_AIRSPEED_KNOTS,
            score_altitude_agl: SCORE_ALTITUDE_AGL,
        }
    }
}

impl FlightModelConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SimulationError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn damping_factor(&self, flaps: f64, delta_time: f64) -> f64 {
        (1.0 - delta_time * (self.damping_base + flaps * self.damping_flap_gain))
            .clamp(self.damping_floor, 1.0)
    }
}
