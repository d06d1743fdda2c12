//! Per-tick controller snapshot
//!
//! One read-only record of everything the controller saw and produced
//! during a tick, assembled for external logging and plotting. Emitted
//! only when the tick actually ran.

use serde::Serialize;

use crate::coord::Coordinate;
use crate::pid::Gains;

/// Snapshot of one executed control tick
#[derive(Debug, Clone, Serialize)]
pub struct Telemetry {
    /// Commanded setpoint
    pub target: Coordinate,
    /// Last ingested pose
    pub actual: Coordinate,
    /// World-frame tracking error (yaw wrapped onto the shorter path)
    pub error: Coordinate,
    /// Heading-frame x error [m]
    pub error_body_x: f64,
    /// Heading-frame y error [m]
    pub error_body_y: f64,
    /// Saturated velocity output (x/y/z linear, yaw angular)
    pub velocity: Coordinate,
    /// Upper horizontal velocity bound [m/s]
    pub vel_max: f64,
    /// Lower horizontal velocity bound [m/s]
    pub vel_min: f64,
    /// Gain set in force during this tick
    pub gains: Gains,
}
