//! Working-frame coordinates
//!
//! The controller works on four independent axes: position in meters
//! (world frame) and yaw in degrees. Subtracting two coordinates yields
//! the raw tracking error; the horizontal part of that error can be
//! projected into the vehicle's heading-aligned frame.

use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// A position-and-heading coordinate
///
/// x/y/z in meters (world frame unless noted), yaw in degrees within
/// (-180, 180]. The four axes carry no cross-axis invariant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Heading [deg]
    pub yaw: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64, z: f64, yaw: f64) -> Self {
        Self { x, y, z, yaw }
    }

    /// Coordinate at the world origin with zero heading
    pub fn zeros() -> Self {
        Self::default()
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    /// Component-wise difference; the yaw component is NOT wrapped
    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            yaw: self.yaw - rhs.yaw,
        }
    }
}

/// Wrap a yaw difference onto the shorter angular path
///
/// Applied once, not iteratively: inputs are assumed to be within a
/// single wrap of each other, so one ±360° correction is enough to land
/// in (-180, 180].
pub fn wrap_angle_deg(angle: f64) -> f64 {
    if angle < -180.0 {
        angle + 360.0
    } else if angle > 180.0 {
        angle - 360.0
    } else {
        angle
    }
}

/// Project the horizontal error into the vehicle's heading-aligned frame
///
/// Rotates the world-frame x/y error by the vehicle's current heading so
/// that x points along the nose and y to the side. z and yaw are used
/// unrotated and are not part of the projection.
///
/// # Arguments
/// * `error` - World-frame tracking error
/// * `heading_deg` - Current vehicle heading [deg]
///
/// # Returns
/// Heading-frame (x, y) error pair
pub fn body_frame_xy(error: &Coordinate, heading_deg: f64) -> (f64, f64) {
    let heading = heading_deg.to_radians();
    let (sin_h, cos_h) = heading.sin_cos();

    (
        error.x * cos_h + error.y * sin_h,
        error.y * cos_h - error.x * sin_h,
    )
}
