//! # posctl-core
//!
//! Position-and-heading feedback control for multirotor vehicles flown
//! from an external motion-capture system.
//!
//! The crate closes a four-axis (x, y, z, yaw) loop between a streamed
//! pose and an externally supplied target coordinate, producing bounded
//! body-frame velocity commands at a fixed sample rate.
//!
//! ## Modules
//!
//! - [`coord`]: Working-frame coordinates and heading-frame projection
//! - [`pose`]: Motion-capture sample conversion into the working frame
//! - [`pid`]: Per-axis PID with integral reset on output saturation
//! - [`controller`]: The per-vehicle controller and its flight state
//! - [`telemetry`]: Per-tick controller snapshot

pub mod controller;
pub mod coord;
pub mod pid;
pub mod pose;
pub mod telemetry;

pub use controller::{
    ControllerParams, FlightState, Limits, ParamError, PositionController, TickOutput,
    VelocityCommand,
};
pub use coord::Coordinate;
pub use pid::{AxisGains, Gains};
pub use pose::RawPose;
pub use telemetry::Telemetry;
