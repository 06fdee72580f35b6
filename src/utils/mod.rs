pub mod math;
pub mod orientation;
