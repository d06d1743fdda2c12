//! # posctl-node
//!
//! Online orchestration for the posctl controllers: validated runtime
//! configuration, the message-bus abstraction, the multi-vehicle fleet,
//! and the fixed-rate control loop.
//!
//! The node layer owns no control mathematics; it wires inbound events
//! (pose samples, targets, lifecycle signals, parameter sets) into the
//! per-vehicle controllers of `posctl-core` and drives their ticks at a
//! fixed rate, publishing commands and telemetry through an outbound
//! sink.
//!
//! ## Modules
//!
//! - [`config`]: Fleet configuration with startup validation
//! - [`bus`]: Inbound event enum and outbound sink trait
//! - [`fleet`]: Named vehicle collection and event dispatch
//! - [`scheduler`]: Fixed-period control loop

pub mod bus;
pub mod config;
pub mod fleet;
pub mod scheduler;

pub use bus::{Outbound, Recorder, VehicleEvent};
pub use config::{ConfigError, ControlConfig, FleetConfig, VehicleConfig};
pub use fleet::{Fleet, FleetError};
pub use scheduler::ControlLoop;
