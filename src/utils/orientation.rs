//! Conversions between the canonical quaternion attitude and Euler angles.
//!
//! Attitudes are body-to-world rotations using the aerospace ZYX sequence:
//! yaw about world down, then pitch about the new right axis, then roll
//! about the forward axis.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl EulerAngles {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        EulerAngles { roll, pitch, yaw }
    }
}

/// Quaternion to Euler angles. At the gimbal-lock boundary
/// (`|sin(pitch)| >= 1`) pitch saturates to ±90° instead of producing NaN.
pub fn quaternion_to_euler(orientation: &UnitQuaternion<f64>) -> EulerAngles {
    let q = orientation.quaternion();
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);

    let sinr_cosp = 2.0 * (w * x + y * z);
    let cosr_cosp = 1.0 - 2.0 * (x * x + y * y);
    let roll = sinr_cosp.atan2(cosr_cosp);

    let sinp = 2.0 * (w * y - z * x);
    let pitch = if sinp.abs() >= 1.0 {
        FRAC_PI_2.copysign(sinp)
    } else {
        sinp.asin()
    };

    let siny_cosp = 2.0 * (w * z + x * y);
    let cosy_cosp = 1.0 - 2.0 * (y * y + z * z);
    let yaw = siny_cosp.atan2(cosy_cosp);

    EulerAngles { roll, pitch, yaw }
}

pub fn euler_to_quaternion(angles: EulerAngles) -> UnitQuaternion<f64> {
    let (sr, cr) = (angles.roll * 0.5).sin_cos();
    let (sp, cp) = (angles.pitch * 0.5).sin_cos();
    let (sy, cy) = (angles.yaw * 0.5).sin_cos();

    UnitQuaternion::new_normalize(Quaternion::new(
        cr * cp * cy + sr * sp * sy,
        sr * cp * cy - cr * sp * sy,
        cr * sp * cy + sr * cp * sy,
        cr * cp * sy - sr * sp * cy,
    ))
}

pub fn integrate_body_rates(
    orientation: &UnitQuaternion<f64>,
    angular_velocity: &Vector3<f64>,
    delta_time: f64,
) -> UnitQuaternion<f64> {
    let delta = UnitQuaternion::from_scaled_axis(angular_velocity * delta_time);
    let mut next = orientation * delta;
    next.renormalize();
    next
}
