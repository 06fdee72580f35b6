use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlInput {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
    pub throttle: f64,
    pub flaps: f64,
}

impl ControlInput {
    pub fn new(pitch: f64, roll: f64, yaw: f64, throttle: f64, flaps: f64) -> Self {
        ControlInput {
            pitch,
            roll,
            yaw,
            throttle,
            flaps,
        }
    }

    pub fn neutral_with_throttle(throttle: f64) -> Self {
        ControlInput {
            throttle,
            ..Default::default()
        }
    }

    /// Out-of-range values are clamped, never rejected. NaN becomes neutral.
    pub fn clamped(&self) -> Self {
        ControlInput {
            pitch: clamp_or(self.pitch, -1.0, 1.0, 0.0),
            roll: clamp_or(self.roll, -1.0, 1.0, 0.0),
            yaw: clamp_or(self.yaw, -1.0, 1.0, 0.0),
            throttle: clamp_or(self.throttle, 0.0, 1.0, 0.0),
            flaps: clamp_or(self.flaps, 0.0, 1.0, 0.0),
        }
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
