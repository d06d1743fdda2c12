//! Fleet configuration
//!
//! Configuration for the control loop and each vehicle. Velocity limits
//! arrive percentage-scaled, as exposed by the ground-station sliders:
//! a configured value of 50 means a stored limit of 0.5. Everything is
//! validated once at startup; runtime parameter updates go through the
//! same validation before they reach a controller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use posctl_core::controller::{ControllerParams, Limits, ParamError};
use posctl_core::pid::Gains;

/// Configuration errors surfaced at startup or on reconfiguration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("control rate must be positive and finite, got {0}")]
    InvalidRate(f64),
    #[error("no vehicles configured")]
    EmptyFleet,
    #[error("duplicate vehicle name: {0}")]
    DuplicateVehicle(String),
    #[error("vehicle {vehicle}: {source}")]
    Vehicle {
        vehicle: String,
        source: ParamError,
    },
}

/// Whole-node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Control loop rate [Hz]
    pub rate_hz: f64,
    /// Altitude commanded right after takeoff [m]
    pub takeoff_altitude: f64,
    /// One entry per vehicle
    pub vehicles: Vec<VehicleConfig>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            rate_hz: 30.0,
            takeoff_altitude: 1.5,
            vehicles: vec![
                VehicleConfig::named("leader"),
                VehicleConfig::named("follower1"),
            ],
        }
    }
}

impl FleetConfig {
    /// Validate the whole configuration
    ///
    /// Rejects a non-positive or non-finite rate, an empty fleet,
    /// duplicate vehicle names, and any per-vehicle parameter problem
    /// (negative limit, non-finite gain or altitude).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rate_hz.is_finite() || self.rate_hz <= 0.0 {
            return Err(ConfigError::InvalidRate(self.rate_hz));
        }

        if self.vehicles.is_empty() {
            return Err(ConfigError::EmptyFleet);
        }

        for (i, vehicle) in self.vehicles.iter().enumerate() {
            if self.vehicles[..i].iter().any(|v| v.name == vehicle.name) {
                return Err(ConfigError::DuplicateVehicle(vehicle.name.clone()));
            }

            vehicle
                .control
                .to_params(self.takeoff_altitude)
                .validate()
                .map_err(|source| ConfigError::Vehicle {
                    vehicle: vehicle.name.clone(),
                    source,
                })?;
        }

        Ok(())
    }
}

/// Per-vehicle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Vehicle name; doubles as the bus routing key
    pub name: String,
    /// Control parameters
    pub control: ControlConfig,
}

impl VehicleConfig {
    /// Vehicle with default control parameters
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            control: ControlConfig::default(),
        }
    }
}

/// Control parameters as configured externally
///
/// Gains are taken as-is; velocity limits are percentages of one unit
/// of velocity, so the stored bound is the configured value divided by
/// 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    pub gains: Gains,
    /// Horizontal velocity limit [% of 1 m/s]
    pub max_vel_xy_pct: f64,
    /// Vertical velocity limit [% of 1 m/s]
    pub max_vel_z_pct: f64,
    /// Yaw rate limit [%]
    pub max_vel_yaw_pct: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            gains: Gains::default(),
            max_vel_xy_pct: 50.0,
            max_vel_z_pct: 50.0,
            max_vel_yaw_pct: 50.0,
        }
    }
}

impl ControlConfig {
    /// Convert into the controller's parameter set
    pub fn to_params(&self, takeoff_altitude: f64) -> ControllerParams {
        ControllerParams {
            gains: self.gains,
            limits: Limits {
                max_vel_xy: self.max_vel_xy_pct / 100.0,
                max_vel_z: self.max_vel_z_pct / 100.0,
                max_vel_yaw: self.max_vel_yaw_pct / 100.0,
            },
            takeoff_altitude,
        }
    }
}
