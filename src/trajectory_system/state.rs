use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::{INITIAL_THROTTLE, SPAWN_HEIGHT};
use crate::control::aircraft::AircraftProfile;
use crate::control::environment::EnvironmentProfile;
use crate::utils::orientation::{euler_to_quaternion, quaternion_to_euler, EulerAngles};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64, // m MSL
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub position: GeodeticPosition,
    pub velocity: Vector3<f64>, // NED, m/s
    pub angular_velocity: Vector3<f64>, // Body rates (roll, pitch, yaw), rad/s
    pub orientation: UnitQuaternion<f64>, // Body-to-world attitude
    pub throttle: f64,
    pub flaps: f64,
    pub fuel: f64, // kg
    pub engine_on: bool,
    pub crashed: bool,
    pub airspeed: f64, // knots
    pub vertical_speed: f64, // feet per minute, positive up
    pub load_factor: f64,
    pub g_force: f64,
    pub score: f64,
}

impl FlightState {
    pub fn on_runway(environment: &EnvironmentProfile, aircraft: &AircraftProfile) -> Self {
        FlightState {
            position: GeodeticPosition {
                latitude: environment.latitude,
                longitude: environment.longitude,
                altitude: environment.ground_elevation + SPAWN_HEIGHT,
            },
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            orientation: euler_to_quaternion(EulerAngles::new(
                0.0,
                0.0,
                environment.runway_heading.to_radians(),
            )),
            throttle: INITIAL_THROTTLE,
            flaps: 0.0,
            fuel: aircraft.max_fuel,
            engine_on: true,
            crashed: false,
            airspeed: 0.0,
            vertical_speed: 0.0,
            load_factor: 1.0,
            g_force: 1.0,
            score: 0.0,
        }
    }

    pub fn euler(&self) -> EulerAngles {
        quaternion_to_euler(&self.orientation)
    }

    pub fn heading_degrees(&self) -> f64 {
        self.euler().yaw.to_degrees().rem_euclid(360.0)
    }

    pub fn altitude_above(&self, ground_elevation: f64) -> f64 {
        self.position.altitude - ground_elevation
    }

    pub fn fuel_fraction(&self, aircraft: &AircraftProfile) -> f64 {
        if aircraft.max_fuel > 0.0 {
            (self.fuel / aircraft.max_fuel).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
