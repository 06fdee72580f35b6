use nalgebra::{UnitQuaternion, Vector3};

use crate::config::FlightModelConfig;
use crate::constants::{METERS_PER_DEGREE_LATITUDE, MPS_TO_FEET_PER_MINUTE, MPS_TO_KNOTS};
use crate::control::aircraft::AircraftProfile;
use crate::control::controls::ControlInput;
use crate::control::environment::EnvironmentProfile;
use crate::control::propulsion::PropulsionSystem;
use crate::utils::math::{approach, retention};
use crate::utils::orientation::{
    euler_to_quaternion, integrate_body_rates, quaternion_to_euler, EulerAngles,
};

use super::aerodynamics::Aerodynamics;
use super::state::{FlightState, GeodeticPosition};

/// Stepping contract shared by every flight-dynamics implementation.
///
/// `step` is a pure function of its arguments: it must not mutate its inputs
/// and must return the same state for the same arguments. A higher-fidelity
/// engine can be dropped in behind this trait.
pub trait FlightModel: Send + Sync {
    fn step(
        &self,
        state: &FlightState,
        controls: &ControlInput,
        aircraft: &AircraftProfile,
        environment: &EnvironmentProfile,
        delta_time: f64,
        sim_time: f64,
    ) -> FlightState;
}

#[derive(Debug, Clone, Default)]
pub struct SixDofModel {
    pub config: FlightModelConfig,
}

impl SixDofModel {
    pub fn new(config: FlightModelConfig) -> Self {
        SixDofModel { config }
    }

    fn target_rates(&self, controls: &ControlInput, aircraft: &AircraftProfile) -> Vector3<f64> {
        let authority = &aircraft.control_authority;
        Vector3::new(
            controls.roll * authority.roll * self.config.roll_rate_gain,
            controls.pitch * authority.pitch * self.config.pitch_rate_gain,
            controls.yaw * authority.yaw * self.config.yaw_rate_gain
                + controls.roll * self.config.roll_yaw_coupling,
        )
    }

    // Nose-up rate added while the wheels are on the runway above rotation speed
    fn rotation_rate(&self, state: &FlightState, aircraft: &AircraftProfile, ground: f64) -> Option<f64> {
        let config = &self.config;
        if state.altitude_above(ground) > config.rotation_height || state.airspeed < aircraft.rotation_speed {
            return None;
        }
        let pitch = quaternion_to_euler(&state.orientation).pitch;
        Some(((aircraft.rotation_pitch - pitch) * config.rotation_gain).clamp(0.0, config.rotation_pitch_rate))
    }

    fn filter_rates(&self, current: &Vector3<f64>, target: &Vector3<f64>, delta_time: f64) -> Vector3<f64> {
        Vector3::new(
            approach(current.x, target.x, self.config.roll_rate_response, delta_time),
            approach(current.y, target.y, self.config.pitch_rate_response, delta_time),
            approach(current.z, target.z, self.config.yaw_rate_response, delta_time),
        )
    }

    fn limit_pitch(&self, orientation: UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        let angles = quaternion_to_euler(&orientation);
        if angles.pitch.abs() <= self.config.pitch_limit {
            return orientation;
        }
        euler_to_quaternion(EulerAngles {
            pitch: angles.pitch.clamp(-self.config.pitch_limit, self.config.pitch_limit),
            ..angles
        })
    }

    fn advance_position(
        &self,
        position: &GeodeticPosition,
        velocity: &Vector3<f64>,
        delta_time: f64,
    ) -> GeodeticPosition {
        let latitude = position.latitude + velocity.x * delta_time / METERS_PER_DEGREE_LATITUDE;
        let meters_per_degree_longitude =
            METERS_PER_DEGREE_LATITUDE * latitude.to_radians().cos().max(self.config.min_cos);

        GeodeticPosition {
            latitude,
            longitude: position.longitude + velocity.y * delta_time / meters_per_degree_longitude,
            altitude: position.altitude - velocity.z * delta_time,
        }
    }
}

fn settle_attitude(orientation: &UnitQuaternion<f64>, roll_keep: f64, pitch_keep: f64) -> UnitQuaternion<f64> {
    let angles = quaternion_to_euler(orientation);
    euler_to_quaternion(EulerAngles {
        roll: angles.roll * roll_keep,
        pitch: angles.pitch * pitch_keep,
        yaw: angles.yaw,
    })
}

impl FlightModel for SixDofModel {
    fn step(
        &self,
        state: &FlightState,
        controls: &ControlInput,
        aircraft: &AircraftProfile,
        environment: &EnvironmentProfile,
        delta_time: f64,
        sim_time: f64,
    ) -> FlightState {
        if state.crashed {
            return state.clone();
        }

        let config = &self.config;
        let controls = controls.clamped();

        let throttle = approach(state.throttle, controls.throttle, config.throttle_response, delta_time)
            .clamp(0.0, 1.0);
        let flaps =
            approach(state.flaps, controls.flaps, config.flap_response, delta_time).clamp(0.0, 1.0);

        let altitude = state.position.altitude;
        let air_density = environment.air_density(altitude, config);
        let wind = environment.wind_at(sim_time, altitude);
        let relative_velocity = state.velocity - wind;

        let aerodynamics = Aerodynamics::new(aircraft, config);
        let forces =
            aerodynamics.calculate_forces(&relative_velocity, &state.orientation, air_density, flaps);

        let propulsion = PropulsionSystem::new(aircraft.max_thrust);
        let thrust = propulsion.thrust(throttle, state.engine_on);
        let forward = state.orientation.transform_vector(&Vector3::x());

        let acceleration = (forces.lift + forces.drag + forward * thrust) / aircraft.mass
            + Vector3::new(0.0, 0.0, config.gravity);

        let mut velocity = state.velocity + acceleration * delta_time;
        let damping = config.damping_factor(flaps, delta_time);
        velocity.x *= damping;
        velocity.y *= damping;

        let ground = environment.ground_elevation;
        let rotation = self.rotation_rate(state, aircraft, ground);
        let mut target_rates = self.target_rates(&controls, aircraft);
        target_rates.y += rotation.unwrap_or(0.0);
        let angular_velocity = self.filter_rates(&state.angular_velocity, &target_rates, delta_time);
        let mut orientation = self.limit_pitch(integrate_body_rates(
            &state.orientation,
            &angular_velocity,
            delta_time,
        ));

        let mut position = self.advance_position(&state.position, &velocity, delta_time);

        let engine = propulsion.burn(state.fuel, state.engine_on, throttle, delta_time, config);
        if state.engine_on && !engine.engine_on {
            log::info!("Fuel exhausted at t={:.1}s, engine shut down", sim_time);
        }

        let height = position.altitude - ground;
        let crashed = height < config.crash_height && velocity.z > config.crash_sink_rate;
        if crashed {
            log::warn!(
                "Ground impact at {:.1} m/s sink rate, t={:.1}s",
                velocity.z,
                sim_time
            );
            position.altitude = position.altitude.max(ground);
        }
        let on_ground = !crashed && height < 0.0;
        if on_ground {
            position.altitude = ground;
            velocity.z = 0.0;

            let friction = retention(config.ground_friction, delta_time);
            velocity.x *= friction;
            velocity.y *= friction;

            // Rotation holds the nose up against the runway
            let keep = retention(config.ground_settle_rate, delta_time);
            let pitch_keep = if rotation.is_some() { 1.0 } else { keep };
            orientation = settle_attitude(&orientation, keep, pitch_keep);
        }

        let airspeed = (velocity - wind).norm() * MPS_TO_KNOTS;
        let load_factor = forces.lift_magnitude / aircraft.weight(config.gravity);
        // The runway carries whatever weight the wing does not, and the gear
        // absorbs the touchdown sink rate
        let vertical_acceleration = if on_ground {
            acceleration.z.min(0.0)
        } else {
            acceleration.z
        };
        let height_above_ground = position.altitude - ground;

        let mut score = state.score;
        if airspeed > config.score_airspeed_knots {
            score += delta_time;
        }
        if height_above_ground > config.score_altitude_agl {
            score += delta_time;
        }

        FlightState {
            position,
            velocity,
            angular_velocity,
            orientation,
            throttle,
            flaps,
            fuel: engine.fuel,
            engine_on: engine.engine_on,
            crashed,
            airspeed,
            vertical_speed: -velocity.z * MPS_TO_FEET_PER_MINUTE,
            load_factor: if load_factor.is_finite() { load_factor } else { 1.0 },
            g_force: (1.0 - vertical_acceleration / config.gravity).max(0.0),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{AIR_DENSITY_SEA_LEVEL, CRASH_SINK_RATE};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const DT: f64 = 1.0 / 60.0;

    fn calm(airport: &str) -> EnvironmentProfile {
        EnvironmentProfile::lookup(airport, "calm").expect("catalog entry")
    }

    fn cruise_state(env: &EnvironmentProfile) -> FlightState {
        let mut state = FlightState::on_runway(env, &AircraftProfile::cessna_172());
        state.position.altitude = env.ground_elevation + 1_000.0;
        state.orientation = euler_to_quaternion(EulerAngles::new(0.0, 0.0, 0.0));
        state.velocity = Vector3::new(55.0, 0.0, 0.0);
        state.throttle = 0.7;
        state
    }

    #[test]
    fn test_step_is_deterministic() {
        let model = SixDofModel::default();
        let env = EnvironmentProfile::lookup("wsss", "storm").expect("catalog entry");
        let aircraft = AircraftProfile::cessna_172();
        let state = cruise_state(&env);
        let controls = ControlInput::new(0.3, -0.4, 0.1, 0.8, 0.5);

        let a = model.step(&state, &controls, &aircraft, &env, DT, 42.0);
        let b = model.step(&state, &controls, &aircraft, &env, DT, 42.0);

        assert_eq!(a, b);
        assert_eq!(a.velocity.x.to_bits(), b.velocity.x.to_bits());
    }

    #[test]
    fn test_step_does_not_mutate_input() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let state = cruise_state(&env);
        let before = state.clone();

        let next = model.step(&state, &ControlInput::neutral_with_throttle(1.0), &aircraft, &env, DT, 0.0);

        assert_eq!(state, before);
        assert_ne!(next, state);
    }

    #[test]
    fn test_crashed_state_is_frozen() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = cruise_state(&env);
        state.crashed = true;

        let mut current = state.clone();
        for i in 0..50 {
            let controls = ControlInput::new(1.0, -1.0, 0.5, 1.0, 1.0);
            current = model.step(&current, &controls, &aircraft, &env, DT, i as f64 * DT);
        }

        assert_eq!(current, state);
    }

    #[test]
    fn test_actuators_lag_toward_command() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = cruise_state(&env);
        state.throttle = 0.0;

        let next = model.step(&state, &ControlInput::new(0.0, 0.0, 0.0, 1.0, 1.0), &aircraft, &env, DT, 0.0);

        assert_relative_eq!(next.throttle, 2.5 * DT, epsilon = 1e-12);
        assert_relative_eq!(next.flaps, 2.0 * DT, epsilon = 1e-12);

        // A huge step lands exactly on target instead of overshooting
        let jump = model.step(&state, &ControlInput::new(0.0, 0.0, 0.0, 1.0, 1.0), &aircraft, &env, 5.0, 0.0);
        assert_eq!(jump.throttle, 1.0);
        assert_eq!(jump.flaps, 1.0);
    }

    #[test]
    fn test_out_of_range_controls_are_clamped() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let state = cruise_state(&env);

        let wild = model.step(&state, &ControlInput::new(9.0, -9.0, 9.0, 9.0, 9.0), &aircraft, &env, DT, 0.0);
        let limit = model.step(&state, &ControlInput::new(1.0, -1.0, 1.0, 1.0, 1.0), &aircraft, &env, DT, 0.0);

        assert_eq!(wild, limit);
    }

    #[test]
    fn test_roll_input_banks_and_couples_yaw() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = cruise_state(&env);

        let controls = ControlInput::new(0.0, 1.0, 0.0, 0.7, 0.0);
        for i in 0..30 {
            state = model.step(&state, &controls, &aircraft, &env, DT, i as f64 * DT);
        }

        assert!(state.angular_velocity.x > 0.0);
        assert!(state.angular_velocity.x < 0.9);
        assert!(state.angular_velocity.z > 0.0);
        assert!(state.euler().roll > 0.0);
    }

    #[test]
    fn test_pitch_is_limited() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::fa_18();
        let mut state = cruise_state(&env);
        state.position.altitude = 5_000.0;
        state.velocity = Vector3::new(200.0, 0.0, 0.0);

        let controls = ControlInput::new(1.0, 0.0, 0.0, 1.0, 0.0);
        for i in 0..600 {
            state = model.step(&state, &controls, &aircraft, &env, DT, i as f64 * DT);
            assert!(state.euler().pitch <= model.config.pitch_limit + 1e-9);
        }
    }

    #[test]
    fn test_geodetic_update_scales_longitude() {
        let model = SixDofModel::default();
        let position = GeodeticPosition {
            latitude: 60.0,
            longitude: 10.0,
            altitude: 500.0,
        };
        let velocity = Vector3::new(0.0, 100.0, -2.0);

        let next = model.advance_position(&position, &velocity, 1.0);

        assert_eq!(next.latitude, 60.0);
        assert_relative_eq!(next.longitude - 10.0, 100.0 / (111_320.0 * 0.5), epsilon = 1e-9);
        assert_relative_eq!(next.altitude, 502.0, epsilon = 1e-12);
    }

    #[test]
    fn test_geodetic_update_at_pole_is_finite() {
        let model = SixDofModel::default();
        let position = GeodeticPosition {
            latitude: 90.0,
            longitude: 0.0,
            altitude: 500.0,
        };
        let next = model.advance_position(&position, &Vector3::new(0.0, 50.0, 0.0), 1.0);
        assert!(next.longitude.is_finite());
    }

    #[test]
    fn test_fuel_never_increases_and_engine_stays_off() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = cruise_state(&env);
        state.fuel = 0.05;

        let mut previous_fuel = state.fuel;
        let mut engine_went_out = false;
        for i in 0..600 {
            let throttle = if i % 2 == 0 { 1.0 } else { 0.3 };
            state = model.step(&state, &ControlInput::neutral_with_throttle(throttle), &aircraft, &env, DT, i as f64 * DT);

            assert!(state.fuel <= previous_fuel);
            previous_fuel = state.fuel;

            if state.fuel == 0.0 {
                assert!(!state.engine_on);
                engine_went_out = true;
            }
            if engine_went_out {
                assert!(!state.engine_on);
            }
        }
        assert!(engine_went_out);
    }

    #[test]
    fn test_gliding_without_engine() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = cruise_state(&env);
        state.fuel = 0.0;
        state.engine_on = false;

        let next = model.step(&state, &ControlInput::neutral_with_throttle(1.0), &aircraft, &env, DT, 0.0);
        assert!(!next.engine_on);
        assert_eq!(next.fuel, 0.0);
        assert!(next.velocity.x < state.velocity.x);
    }

    #[test]
    fn test_hard_impact_crashes() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = cruise_state(&env);
        state.position.altitude = env.ground_elevation + 0.1;
        state.velocity = Vector3::new(0.0, 0.0, CRASH_SINK_RATE + 3.0);

        let next = model.step(&state, &ControlInput::default(), &aircraft, &env, DT, 0.0);

        assert!(next.crashed);
        assert!(next.position.altitude >= env.ground_elevation);
    }

    #[test]
    fn test_ground_contact_settles() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = FlightState::on_runway(&env, &aircraft);
        state.position.altitude = env.ground_elevation;
        state.velocity = Vector3::new(8.0, 0.0, 0.5);
        state.throttle = 0.0;
        state.orientation = euler_to_quaternion(EulerAngles::new(0.2, 0.1, 1.0));

        let next = model.step(&state, &ControlInput::default(), &aircraft, &env, DT, 0.0);
        let angles = next.euler();

        assert!(!next.crashed);
        assert_eq!(next.position.altitude, env.ground_elevation);
        assert_eq!(next.velocity.z, 0.0);
        assert!(next.velocity.x < 8.0 && next.velocity.x > 7.0);
        assert!(angles.roll < 0.2 && angles.roll > 0.0);
        assert!(angles.pitch < 0.1 && angles.pitch > 0.0);
        assert_abs_diff_eq!(angles.yaw, 1.0, epsilon = 1e-9);
        assert_eq!(next.vertical_speed, 0.0);
    }

    fn rolling_state(env: &EnvironmentProfile, aircraft: &AircraftProfile, airspeed_knots: f64) -> FlightState {
        let mut state = FlightState::on_runway(env, aircraft);
        state.position.altitude = env.ground_elevation;
        state.velocity = state
            .orientation
            .transform_vector(&Vector3::new(airspeed_knots / MPS_TO_KNOTS, 0.0, 0.0));
        state.airspeed = airspeed_knots;
        state.throttle = 1.0;
        state
    }

    #[test]
    fn test_nose_rotates_above_rotation_speed() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = rolling_state(&env, &aircraft, aircraft.rotation_speed + 3.0);

        let controls = ControlInput::neutral_with_throttle(1.0);
        let first = model.step(&state, &controls, &aircraft, &env, DT, 0.0);
        assert!(first.angular_velocity.y > 0.0);
        assert!(first.euler().pitch > 0.0, "Runway contact must not cancel the rotation");

        for i in 0..120 {
            state = model.step(&state, &controls, &aircraft, &env, DT, i as f64 * DT);
        }
        let pitch = state.euler().pitch;
        assert!(pitch > 0.5 * aircraft.rotation_pitch, "pitch {:.3}", pitch);
        assert!(pitch < aircraft.rotation_pitch + 0.03, "pitch {:.3}", pitch);
    }

    #[test]
    fn test_no_rotation_below_rotation_speed() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::boeing_737();
        let mut state = rolling_state(&env, &aircraft, aircraft.rotation_speed - 40.0);

        for i in 0..60 {
            state = model.step(&state, &ControlInput::neutral_with_throttle(1.0), &aircraft, &env, DT, i as f64 * DT);
        }

        assert_eq!(state.angular_velocity.y, 0.0);
        assert_abs_diff_eq!(state.euler().pitch, 0.0, epsilon = 1e-9);
        assert_eq!(state.position.altitude, env.ground_elevation);
    }

    #[test]
    fn test_touchdown_reads_gear_load() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = FlightState::on_runway(&env, &aircraft);
        state.position.altitude = env.ground_elevation + 0.05;
        state.velocity = Vector3::new(0.0, 0.0, 5.0);
        state.throttle = 0.0;

        let next = model.step(&state, &ControlInput::default(), &aircraft, &env, DT, 0.0);

        assert!(!next.crashed);
        assert_eq!(next.position.altitude, env.ground_elevation);
        assert_eq!(next.g_force, 1.0, "Sink rate absorbed by the gear is not a load spike");
    }

    #[test]
    fn test_free_fall_reads_zero_g() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = cruise_state(&env);
        state.velocity = Vector3::zeros();
        state.throttle = 0.0;
        state.engine_on = false;

        let next = model.step(&state, &ControlInput::default(), &aircraft, &env, DT, 0.0);

        assert_abs_diff_eq!(next.g_force, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_sea_level_density_scales_lift() {
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let state = cruise_state(&env);
        let controls = ControlInput::neutral_with_throttle(0.7);

        let standard = SixDofModel::default().step(&state, &controls, &aircraft, &env, DT, 0.0);
        let thin = SixDofModel::new(FlightModelConfig {
            sea_level_density: 0.5 * AIR_DENSITY_SEA_LEVEL,
            ..FlightModelConfig::default()
        })
        .step(&state, &controls, &aircraft, &env, DT, 0.0);

        assert_relative_eq!(thin.load_factor, 0.5 * standard.load_factor, epsilon = 1e-12);
    }

    #[test]
    fn test_score_accrues_in_fast_high_flight() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = cruise_state(&env);
        state.velocity = Vector3::new(60.0, 0.0, 0.0);

        let next = model.step(&state, &ControlInput::neutral_with_throttle(0.7), &aircraft, &env, DT, 0.0);
        assert_relative_eq!(next.score, 2.0 * DT, epsilon = 1e-12);
    }

    #[test]
    fn test_derived_instruments() {
        let model = SixDofModel::default();
        let env = calm("wsss");
        let aircraft = AircraftProfile::cessna_172();
        let mut state = cruise_state(&env);
        state.velocity = Vector3::new(55.0, 0.0, -2.0);

        let next = model.step(&state, &ControlInput::neutral_with_throttle(0.7), &aircraft, &env, DT, 0.0);

        assert_relative_eq!(next.airspeed, next.velocity.norm() * MPS_TO_KNOTS, epsilon = 1e-9);
        assert_relative_eq!(next.vertical_speed, -next.velocity.z * MPS_TO_FEET_PER_MINUTE, epsilon = 1e-9);
        assert!(next.load_factor > 0.0);
        assert!(next.g_force >= 0.0);
    }
}
