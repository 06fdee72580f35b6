pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod persistence;
pub mod scheduling_system;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use config::FlightModelConfig;
pub use constants::*;
pub use control::aircraft::{AircraftProfile, ControlAuthority, Inertia};
pub use control::controls::ControlInput;
pub use control::environment::{Airport, EnvironmentProfile, WeatherPreset};
pub use control::session::FlightSession;
pub use errors::SimulationError;
pub use persistence::{SaveStore, SavedFlight};

// Re-export commonly used items from scheduling_system
pub use scheduling_system::clock::{Clock, ManualClock, SystemClock};
pub use scheduling_system::scheduler::{
    FixedStepScheduler, LoopHandle, SchedulerConfig, SimClockState, SimClockUpdate, SubscriptionId,
};

// Re-export commonly used items from trajectory_system
pub use trajectory_system::aerodynamics::Aerodynamics;
pub use trajectory_system::kinematics::{FlightModel, SixDofModel};
pub use trajectory_system::state::{FlightState, GeodeticPosition};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::{FlightEvent, Telemetry, TelemetrySummary};

// Re-export commonly used utilities
pub use utils::orientation::{euler_to_quaternion, quaternion_to_euler, EulerAngles};
