//! Message-bus abstraction
//!
//! The node talks to the outside world through one inbound event enum
//! and one outbound sink trait per vehicle. The surrounding transport
//! (ROS topics, a simulator, a test harness) is an external collaborator
//! and only has to map its messages onto these two surfaces.

use posctl_core::controller::VelocityCommand;
use posctl_core::coord::Coordinate;
use posctl_core::pose::RawPose;
use posctl_core::telemetry::Telemetry;

use crate::config::ControlConfig;

/// Inbound event for one vehicle
///
/// Pose, target, hover and parameter updates are immediate state
/// overwrites; takeoff/land/reset are lifecycle triggers. A reset has
/// the same effect as a land.
#[derive(Debug, Clone)]
pub enum VehicleEvent {
    /// Raw motion-capture sample
    Pose(RawPose),
    /// New target coordinate (last write wins)
    Target(Coordinate),
    /// Takeoff trigger
    Takeoff,
    /// Land trigger
    Land,
    /// Reset trigger; grounds the vehicle like a land
    Reset,
    /// Hover override flag
    Hover(bool),
    /// Runtime parameter set, applied at the next tick boundary
    Reconfigure(ControlConfig),
}

/// Outbound sink: everything the node publishes, per vehicle
pub trait Outbound {
    /// Saturated velocity command, once per executed tick
    fn command(&mut self, vehicle: &str, command: &VelocityCommand);
    /// Airborne flag, reported on every lifecycle signal
    fn airborne(&mut self, vehicle: &str, airborne: bool);
    /// Converted pose snapshot, on every ingested sample
    fn pose(&mut self, vehicle: &str, pose: &Coordinate);
    /// Controller snapshot, once per executed tick
    fn telemetry(&mut self, vehicle: &str, telemetry: &Telemetry);
}

/// Recording sink for tests and demos
///
/// Stores every published message in arrival order, tagged with the
/// vehicle name.
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<(String, VelocityCommand)>,
    pub airborne: Vec<(String, bool)>,
    pub poses: Vec<(String, Coordinate)>,
    pub telemetry: Vec<(String, Telemetry)>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands published for one vehicle, in order
    pub fn commands_for(&self, vehicle: &str) -> Vec<&VelocityCommand> {
        self.commands
            .iter()
            .filter(|(name, _)| name == vehicle)
            .map(|(_, command)| command)
            .collect()
    }

    /// Last command published for one vehicle
    pub fn last_command_for(&self, vehicle: &str) -> Option<&VelocityCommand> {
        self.commands_for(vehicle).pop()
    }

    /// Airborne flags reported for one vehicle, in order
    pub fn airborne_for(&self, vehicle: &str) -> Vec<bool> {
        self.airborne
            .iter()
            .filter(|(name, _)| name == vehicle)
            .map(|(_, flag)| *flag)
            .collect()
    }

    /// Telemetry snapshots published for one vehicle, in order
    pub fn telemetry_for(&self, vehicle: &str) -> Vec<&Telemetry> {
        self.telemetry
            .iter()
            .filter(|(name, _)| name == vehicle)
            .map(|(_, telemetry)| telemetry)
            .collect()
    }
}

impl Outbound for Recorder {
    fn command(&mut self, vehicle: &str, command: &VelocityCommand) {
        self.commands.push((vehicle.to_string(), *command));
    }

    fn airborne(&mut self, vehicle: &str, airborne: bool) {
        self.airborne.push((vehicle.to_string(), airborne));
    }

    fn pose(&mut self, vehicle: &str, pose: &Coordinate) {
        self.poses.push((vehicle.to_string(), *pose));
    }

    fn telemetry(&mut self, vehicle: &str, telemetry: &Telemetry) {
        self.telemetry.push((vehicle.to_string(), telemetry.clone()));
    }
}
