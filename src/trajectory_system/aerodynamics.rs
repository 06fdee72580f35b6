use nalgebra::{UnitQuaternion, Vector3};

use crate::config::FlightModelConfig;
use crate::control::aircraft::AircraftProfile;
use crate::utils::math::smoothstep;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroForces {
    pub lift: Vector3<f64>,
    pub drag: Vector3<f64>,
    pub lift_magnitude: f64,
    pub angle_of_attack: f64,
    pub dynamic_pressure: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Aerodynamics {
    pub wing_area: f64,
    pub lift_slope: f64,
    pub drag_coefficient: f64,
    pub stall_aoa: f64,
    pub wing_incidence: f64,
    pub flap_lift_bonus: f64,
    pub stall_band: f64,
    pub stall_lift_retention: f64,
    pub induced_drag_factor: f64,
    pub flap_drag: f64,
    pub min_speed: f64,
}

impl Aerodynamics {
    pub fn new(aircraft: &AircraftProfile, config: &FlightModelConfig) -> Self {
        Aerodynamics {
            wing_area: aircraft.wing_area,
            lift_slope: aircraft.lift_slope,
            drag_coefficient: aircraft.drag_coefficient,
            stall_aoa: aircraft.stall_aoa,
            wing_incidence: aircraft.wing_incidence,
            flap_lift_bonus: config.flap_lift_bonus,
            stall_band: config.stall_band,
            stall_lift_retention: config.stall_lift_retention,
            induced_drag_factor: config.induced_drag_factor,
            flap_drag: config.flap_drag,
            min_speed: config.min_speed,
        }
    }

    pub fn dynamic_pressure(air_density: f64, speed: f64) -> f64 {
        0.5 * air_density * speed * speed
    }

    // Forward speed is floored so a stationary or reversing airframe never
    // divides by zero
    pub fn angle_of_attack(&self, body_airflow: &Vector3<f64>) -> f64 {
        body_airflow.z.atan2(body_airflow.x.max(self.min_speed))
    }

    /// Linear lift curve faded to the retention fraction across the stall band.
    pub fn lift_coefficient(&self, angle_of_attack: f64, flaps: f64) -> f64 {
        let raw = self.lift_slope * (angle_of_attack + self.wing_incidence + flaps * self.flap_lift_bonus);
        let attached = 1.0
            - smoothstep(
                self.stall_aoa,
                self.stall_aoa + self.stall_band,
                angle_of_attack.abs(),
            );
        raw * (self.stall_lift_retention + (1.0 - self.stall_lift_retention) * attached)
    }

    pub fn drag_coefficient(&self, lift_coefficient: f64, flaps: f64) -> f64 {
        self.drag_coefficient
            + lift_coefficient * lift_coefficient / (std::f64::consts::PI * self.induced_drag_factor)
            + flaps * self.flap_drag
    }

    pub fn calculate_forces(
        &self,
        relative_velocity: &Vector3<f64>,
        orientation: &UnitQuaternion<f64>,
        air_density: f64,
        flaps: f64,
    ) -> AeroForces {
        let speed = relative_velocity.norm().max(self.min_speed);
        let body_airflow = orientation.inverse_transform_vector(relative_velocity);
        let angle_of_attack = self.angle_of_attack(&body_airflow);

        let dynamic_pressure = Self::dynamic_pressure(air_density, speed);
        let lift_coefficient = self.lift_coefficient(angle_of_attack, flaps);
        let drag_coefficient = self.drag_coefficient(lift_coefficient, flaps);

        let lift_magnitude = dynamic_pressure * self.wing_area * lift_coefficient;
        let drag_magnitude = dynamic_pressure * self.wing_area * drag_coefficient;

        // Body up is -z in FRD, so lift banks and pitches with the airframe
        let body_up = -orientation.transform_vector(&Vector3::z());
        let drag = relative_velocity
            .try_normalize(f64::EPSILON)
            .map_or_else(Vector3::zeros, |direction| -direction * drag_magnitude);

        AeroForces {
            lift: body_up * lift_magnitude,
            drag,
            lift_magnitude,
            angle_of_attack,
            dynamic_pressure,
        }
    }
}
