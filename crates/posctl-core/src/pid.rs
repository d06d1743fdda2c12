//! Per-axis PID with integral reset on output saturation
//!
//! Each controlled axis (x, y, z, yaw) owns one [`AxisPid`]. The
//! integral and derivative terms are per-tick quantities: the fixed
//! sample period of the control loop is absorbed into the gains, so the
//! same gain set is only meaningful at the rate it was tuned for.

use serde::{Deserialize, Serialize};

/// PID gain triple for a single axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisGains {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain (per tick)
    pub ki: f64,
    /// Derivative gain (per tick)
    pub kd: f64,
}

impl AxisGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Purely proportional gains
    pub fn proportional(kp: f64) -> Self {
        Self {
            kp,
            ki: 0.0,
            kd: 0.0,
        }
    }
}

/// Full gain set: one triple per controlled axis (12 scalars)
///
/// Mutable at runtime, but only ever replaced as a whole set between
/// control ticks, never one scalar at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    pub x: AxisGains,
    pub y: AxisGains,
    pub z: AxisGains,
    pub yaw: AxisGains,
}

impl Default for Gains {
    fn default() -> Self {
        // Hand-tuned against the 30 Hz loop; position errors in meters,
        // yaw error in degrees.
        Self {
            x: AxisGains::new(0.6, 0.005, 0.4),
            y: AxisGains::new(0.6, 0.005, 0.4),
            z: AxisGains::new(1.0, 0.005, 0.3),
            yaw: AxisGains::new(0.02, 0.0, 0.0),
        }
    }
}

/// PID state for one axis
///
/// Owns the integral accumulator, the previous tick's error, and the
/// previous tick's raw (pre-saturation) output.
#[derive(Debug, Clone)]
pub struct AxisPid {
    /// Gains for this axis
    pub gains: AxisGains,
    integral: f64,
    prev_error: f64,
    prev_output: f64,
}

impl AxisPid {
    pub fn new(gains: AxisGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            prev_error: 0.0,
            prev_output: 0.0,
        }
    }

    /// Advance the axis by one tick and return the saturated output
    ///
    /// The integral accumulates the current error, unless the previous
    /// tick's output was already beyond `limit` in the same direction as
    /// the error: then the accumulator is cleared instead, so a pinned
    /// output cannot wind it up further. The comparison uses the
    /// previous *unclamped* output with strict inequality: an output
    /// stored exactly at the limit does not trigger the reset, one past
    /// it does, even though the transmitted command was clamped.
    ///
    /// # Arguments
    /// * `error` - Current tracking error for this axis
    /// * `limit` - Symmetric output bound (non-negative)
    pub fn update(&mut self, error: f64, limit: f64) -> f64 {
        if (self.prev_output > limit && error > 0.0)
            || (self.prev_output < -limit && error < 0.0)
        {
            self.integral = 0.0;
        } else {
            self.integral += error;
        }

        let output = self.gains.kp * error
            + self.gains.ki * self.integral
            + self.gains.kd * (error - self.prev_error);

        // The raw output is what the next tick's windup check sees; only
        // a working copy is clamped for transmission.
        self.prev_output = output;
        self.prev_error = error;

        output.clamp(-limit, limit)
    }

    /// Current value of the integral accumulator
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Previous tick's raw (pre-saturation) output
    pub fn prev_output(&self) -> f64 {
        self.prev_output
    }

    /// Previous tick's error
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }
}
