//! Motion-capture pose conversion
//!
//! Converts one raw tracking sample (position plus unit quaternion in the
//! capture system's frame) into the controller's working frame. The
//! capture frame is y-up while the controller's world frame is z-up, so
//! the axes are remapped and the heading sign is flipped on the way in.

use nalgebra::{UnitQuaternion, Vector3};

use crate::coord::Coordinate;

/// One raw pose sample in the capture-system frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPose {
    /// Position in the capture frame [m]
    pub position: Vector3<f64>,
    /// Orientation in the capture frame
    pub orientation: UnitQuaternion<f64>,
}

impl RawPose {
    pub fn new(position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Convert this sample into the controller's working frame
    ///
    /// Axis remap: controller x ← capture x, controller y ← capture z,
    /// controller z ← −(capture y). The heading is the rotation about the
    /// capture system's vertical axis, sign-negated and reported in
    /// degrees within roughly (-180, 180].
    pub fn to_world(&self) -> Coordinate {
        let q = &self.orientation;
        let yaw = -f64::atan2(
            2.0 * (q.w * q.j + q.i * q.k),
            q.w * q.w - q.i * q.i - q.j * q.j - q.k * q.k,
        )
        .to_degrees();

        Coordinate {
            x: self.position.x,
            y: self.position.z,
            z: -self.position.y,
            yaw,
        }
    }
}

impl Default for RawPose {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
        }
    }
}
