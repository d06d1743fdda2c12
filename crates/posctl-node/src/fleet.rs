//! Vehicle fleet
//!
//! Holds one controller per configured vehicle, keyed by name, and
//! dispatches inbound bus events to them. Parameter updates are parked
//! per vehicle and installed at the next tick boundary so a set is never
//! swapped mid-computation.

use thiserror::Error;

use posctl_core::controller::{ControllerParams, ParamError, PositionController};

use crate::bus::{Outbound, VehicleEvent};
use crate::config::{ConfigError, FleetConfig};

/// Event dispatch errors
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("unknown vehicle: {0}")]
    UnknownVehicle(String),
    #[error("vehicle {vehicle}: rejected parameter set: {source}")]
    Reconfigure {
        vehicle: String,
        source: ParamError,
    },
}

/// One vehicle slot: the controller plus a parked parameter set
#[derive(Debug)]
struct Vehicle {
    controller: PositionController,
    pending: Option<ControllerParams>,
}

/// All configured vehicles, in configuration order
#[derive(Debug)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
    takeoff_altitude: f64,
}

impl Fleet {
    /// Build the fleet from a validated configuration
    pub fn from_config(config: &FleetConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let vehicles = config
            .vehicles
            .iter()
            .map(|vehicle| {
                let params = vehicle.control.to_params(config.takeoff_altitude);
                PositionController::new(&vehicle.name, params)
                    .map(|controller| Vehicle {
                        controller,
                        pending: None,
                    })
                    .map_err(|source| ConfigError::Vehicle {
                        vehicle: vehicle.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            vehicles,
            takeoff_altitude: config.takeoff_altitude,
        })
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Vehicle names in configuration order
    pub fn names(&self) -> Vec<&str> {
        self.vehicles
            .iter()
            .map(|v| v.controller.name())
            .collect()
    }

    /// Look up one vehicle's controller
    pub fn controller(&self, vehicle: &str) -> Option<&PositionController> {
        self.vehicles
            .iter()
            .map(|v| &v.controller)
            .find(|c| c.name() == vehicle)
    }

    fn vehicle_mut(&mut self, vehicle: &str) -> Option<&mut Vehicle> {
        self.vehicles
            .iter_mut()
            .find(|v| v.controller.name() == vehicle)
    }

    /// Dispatch one inbound event to its vehicle
    ///
    /// Pose, target, hover and lifecycle events apply immediately as
    /// non-blocking overwrites; pose samples and lifecycle signals also
    /// publish their snapshot/status through the sink. A `Reconfigure`
    /// is validated here and parked until the next tick boundary; a bad
    /// set is rejected without disturbing the active parameters.
    pub fn handle_event(
        &mut self,
        vehicle: &str,
        event: VehicleEvent,
        out: &mut impl Outbound,
    ) -> Result<(), FleetError> {
        let takeoff_altitude = self.takeoff_altitude;
        let slot = self
            .vehicle_mut(vehicle)
            .ok_or_else(|| FleetError::UnknownVehicle(vehicle.to_string()))?;

        match event {
            VehicleEvent::Pose(raw) => {
                let converted = slot.controller.ingest_pose(&raw);
                out.pose(vehicle, &converted);
            }
            VehicleEvent::Target(target) => {
                slot.controller.set_target(target);
            }
            VehicleEvent::Takeoff => {
                let airborne = slot.controller.takeoff();
                out.airborne(vehicle, airborne);
            }
            VehicleEvent::Land | VehicleEvent::Reset => {
                let airborne = slot.controller.land();
                out.airborne(vehicle, airborne);
            }
            VehicleEvent::Hover(hover) => {
                slot.controller.set_hover(hover);
            }
            VehicleEvent::Reconfigure(control) => {
                let params = control.to_params(takeoff_altitude);
                params.validate().map_err(|source| FleetError::Reconfigure {
                    vehicle: vehicle.to_string(),
                    source,
                })?;
                slot.pending = Some(params);
            }
        }

        Ok(())
    }

    /// Run one control pass over every vehicle
    ///
    /// Parked parameter sets are installed first, then each airborne,
    /// non-hovering vehicle ticks and its command and telemetry are
    /// published. Gated vehicles are skipped silently.
    pub fn step(&mut self, out: &mut impl Outbound) {
        for slot in &mut self.vehicles {
            if let Some(params) = slot.pending.take() {
                // Validated when parked; installs as one atomic set.
                slot.controller.apply_params(&params);
            }

            if let Some(output) = slot.controller.tick() {
                out.command(slot.controller.name(), &output.command);
                out.telemetry(slot.controller.name(), &output.telemetry);
            }
        }
    }
}
