pub mod aircraft;
pub mod controls;
pub mod environment;
pub mod propulsion;
pub mod session;
