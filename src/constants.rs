// Physical Constants
pub const GRAVITY: f64 = 9.81; // m/s²
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225; // kg/m³
pub const ATMOSPHERE_SCALE_HEIGHT: f64 = 8_500.0; // m

// Unit Conversions
pub const MPS_TO_KNOTS: f64 = 1.94384;
pub const KNOTS_TO_MPS: f64 = 0.514444;
pub const MPS_TO_FEET_PER_MINUTE: f64 = 196.85;
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

// Scheduler Defaults
pub const FIXED_TIME_STEP: f64 = 1.0 / 60.0; // s
pub const MAX_SUB_STEPS: u32 = 3;
pub const MAX_FRAME_TIME: f64 = 0.25; // s, anti spiral-of-death clamp
pub const MAX_TIME_SCALE: f64 = 10.0;

// Actuators
pub const THROTTLE_RESPONSE: f64 = 2.5; // 1/s
pub const FLAP_RESPONSE: f64 = 2.0; // 1/s

// Aerodynamics
pub const FLAP_LIFT_BONUS: f64 = 0.15; // rad of equivalent angle of attack at full flaps
pub const STALL_BAND: f64 = 0.2; // rad
pub const STALL_LIFT_RETENTION: f64 = 0.25;
pub const INDUCED_DRAG_FACTOR: f64 = 8.5; // e·AR
pub const FLAP_DRAG: f64 = 0.08;
pub const MIN_SPEED: f64 = 0.1; // m/s
pub const MIN_COS: f64 = 1e-3;

// Velocity damping (not a physical force)
pub const DAMPING_BASE: f64 = 0.02; // 1/s
pub const DAMPING_FLAP_GAIN: f64 = 0.12; // 1/s
pub const DAMPING_FLOOR: f64 = 0.82;

// Attitude
pub const ROLL_RATE_GAIN: f64 = 0.9; // rad/s
pub const PITCH_RATE_GAIN: f64 = 0.65; // rad/s
pub const YAW_RATE_GAIN: f64 = 0.5; // rad/s
pub const ROLL_YAW_COUPLING: f64 = 0.12; // rad/s
pub const ROLL_RATE_RESPONSE: f64 = 3.0; // 1/s
pub const PITCH_RATE_RESPONSE: f64 = 3.0; // 1/s
pub const YAW_RATE_RESPONSE: f64 = 2.0; // 1/s
pub const PITCH_LIMIT: f64 = 1.2; // rad (~69°)

// Propulsion
pub const IDLE_FUEL_FLOW: f64 = 0.08;
pub const THROTTLE_FUEL_GAIN: f64 = 0.95;
pub const THRUST_PER_FUEL_FLOW: f64 = 100_000.0; // N

// Ground contact
pub const CRASH_HEIGHT: f64 = 0.2; // m above ground
pub const CRASH_SINK_RATE: f64 = 7.0; // m/s downward
pub const GROUND_FRICTION: f64 = 0.04; // 1/s
pub const GROUND_SETTLE_RATE: f64 = 2.5; // 1/s
pub const SPAWN_HEIGHT: f64 = 1.0; // m above runway

// Takeoff rotation
pub const ROTATION_PITCH_RATE: f64 = 0.1; // rad/s
pub const ROTATION_GAIN: f64 = 2.0; // 1/s
pub const ROTATION_HEIGHT: f64 = 0.5; // m, wheels still on the runway

// Scoring
pub const SCORE_AIRSPEED_KNOTS: f64 = 60.0;
pub const SCORE_ALTITUDE_AGL: f64 = 30.0; // m

// Session
pub const INITIAL_THROTTLE: f64 = 0.15;
