//! Per-vehicle position controller
//!
//! One [`PositionController`] instance per vehicle closes the loop from
//! the last ingested pose to the current target coordinate, producing a
//! bounded body-frame velocity command once per control tick. A small
//! grounded/airborne state machine with an independent hover flag decides
//! whether a tick is allowed to run at all.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{body_frame_xy, wrap_angle_deg, Coordinate};
use crate::pid::{AxisPid, Gains};
use crate::pose::RawPose;
use crate::telemetry::Telemetry;

/// Parameter validation errors
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("negative {axis} velocity limit: {value}")]
    NegativeLimit { axis: &'static str, value: f64 },
    #[error("non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Symmetric per-axis-group velocity bounds
///
/// x and y share one horizontal limit; z and yaw each have their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Horizontal velocity bound [m/s]
    pub max_vel_xy: f64,
    /// Vertical velocity bound [m/s]
    pub max_vel_z: f64,
    /// Yaw rate bound
    pub max_vel_yaw: f64,
}

impl Limits {
    /// Reject negative or non-finite bounds
    pub fn validate(&self) -> Result<(), ParamError> {
        for (axis, value) in [
            ("xy", self.max_vel_xy),
            ("z", self.max_vel_z),
            ("yaw", self.max_vel_yaw),
        ] {
            if !value.is_finite() {
                return Err(ParamError::NonFinite {
                    field: "velocity limit",
                    value,
                });
            }
            if value < 0.0 {
                return Err(ParamError::NegativeLimit { axis, value });
            }
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_vel_xy: 0.5,
            max_vel_z: 0.5,
            max_vel_yaw: 0.5,
        }
    }
}

/// One atomic parameter set: gains, limits, takeoff altitude
///
/// Consumed as a whole between ticks; a partial update mid-tick is never
/// observable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControllerParams {
    pub gains: Gains,
    pub limits: Limits,
    /// Altitude the vehicle climbs to after takeoff [m]
    pub takeoff_altitude: f64,
}

impl ControllerParams {
    /// Validate the whole set: finite gains and altitude, valid limits
    pub fn validate(&self) -> Result<(), ParamError> {
        self.limits.validate()?;

        if !self.takeoff_altitude.is_finite() {
            return Err(ParamError::NonFinite {
                field: "takeoff altitude",
                value: self.takeoff_altitude,
            });
        }

        for axis in [self.gains.x, self.gains.y, self.gains.z, self.gains.yaw] {
            for (field, value) in [("kp", axis.kp), ("ki", axis.ki), ("kd", axis.kd)] {
                if !value.is_finite() {
                    return Err(ParamError::NonFinite { field, value });
                }
            }
        }

        Ok(())
    }
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            gains: Gains::default(),
            limits: Limits::default(),
            takeoff_altitude: 1.5,
        }
    }
}

/// Grounded/airborne flight state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    /// On the ground; control does not run
    Grounded,
    /// In the air; control runs unless hovering
    Airborne,
}

/// Saturated velocity command
///
/// Linear x/y/z plus a yaw rate; roll and pitch rate components are
/// always zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VelocityCommand {
    /// Body-frame linear velocity [m/s]
    pub linear: Vector3<f64>,
    /// Yaw rate
    pub yaw_rate: f64,
}

/// Everything one executed tick produces
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub command: VelocityCommand,
    pub telemetry: Telemetry,
}

/// Position-and-heading controller for a single vehicle
///
/// Owns the target, the last ingested pose, the four axis PIDs, and the
/// flight state. Pose and target writes are immediate, non-blocking
/// overwrites; all control state mutates only inside [`tick`].
///
/// [`tick`]: PositionController::tick
#[derive(Debug, Clone)]
pub struct PositionController {
    name: String,
    state: FlightState,
    hover: bool,
    target: Coordinate,
    actual: Coordinate,
    pid_x: AxisPid,
    pid_y: AxisPid,
    pid_z: AxisPid,
    pid_yaw: AxisPid,
    limits: Limits,
    takeoff_altitude: f64,
}

impl PositionController {
    /// Create a grounded controller with a zeroed pose
    ///
    /// Fails if the parameter set is invalid (negative limit, non-finite
    /// gain or altitude).
    pub fn new(name: impl Into<String>, params: ControllerParams) -> Result<Self, ParamError> {
        params.validate()?;

        Ok(Self {
            name: name.into(),
            state: FlightState::Grounded,
            hover: false,
            target: Coordinate::zeros(),
            actual: Coordinate::zeros(),
            pid_x: AxisPid::new(params.gains.x),
            pid_y: AxisPid::new(params.gains.y),
            pid_z: AxisPid::new(params.gains.z),
            pid_yaw: AxisPid::new(params.gains.yaw),
            limits: params.limits,
            takeoff_altitude: params.takeoff_altitude,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn is_airborne(&self) -> bool {
        self.state == FlightState::Airborne
    }

    pub fn hover(&self) -> bool {
        self.hover
    }

    pub fn target(&self) -> Coordinate {
        self.target
    }

    pub fn actual(&self) -> Coordinate {
        self.actual
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Gain set currently in force
    pub fn gains(&self) -> Gains {
        Gains {
            x: self.pid_x.gains,
            y: self.pid_y.gains,
            z: self.pid_z.gains,
            yaw: self.pid_yaw.gains,
        }
    }

    /// Ingest one pose sample; the newest sample always wins
    ///
    /// Overwrites the working pose unconditionally (no smoothing, no
    /// staleness check) and returns the converted coordinate so the
    /// caller can publish it as a pose snapshot.
    pub fn ingest_pose(&mut self, raw: &RawPose) -> Coordinate {
        self.actual = raw.to_world();
        self.actual
    }

    /// Overwrite the target coordinate (last write wins)
    ///
    /// No reachability or continuity validation: an abrupt jump is legal
    /// and shows up as a large transient error on the next tick.
    pub fn set_target(&mut self, target: Coordinate) {
        self.target = target;
    }

    /// Handle a takeoff signal; returns the airborne flag to report
    ///
    /// On the grounded→airborne edge the target is seeded to the current
    /// x/y/yaw at the configured takeoff altitude, so the vehicle climbs
    /// vertically in place until an external target arrives. A takeoff
    /// signal while already airborne changes nothing and does not
    /// re-seed.
    pub fn takeoff(&mut self) -> bool {
        if self.state == FlightState::Grounded {
            self.target = Coordinate::new(
                self.actual.x,
                self.actual.y,
                self.takeoff_altitude,
                self.actual.yaw,
            );
            self.state = FlightState::Airborne;
        }
        true
    }

    /// Handle a land (or reset) signal; returns the airborne flag to report
    ///
    /// Landing while grounded is a no-op. Control state (integrals, error
    /// history) is deliberately left untouched.
    pub fn land(&mut self) -> bool {
        self.state = FlightState::Grounded;
        false
    }

    /// Set the hover override flag
    ///
    /// Independent of the flight state: it only suppresses the control
    /// tick while set, letting the vehicle's own station-keeping hold
    /// position.
    pub fn set_hover(&mut self, hover: bool) {
        self.hover = hover;
    }

    /// Install a validated parameter set as one atomic operation
    ///
    /// Callers validate with [`ControllerParams::validate`] first; the
    /// fleet layer does this before parking a set for the next tick
    /// boundary. Gains, limits and takeoff altitude switch together.
    pub fn apply_params(&mut self, params: &ControllerParams) {
        self.pid_x.gains = params.gains.x;
        self.pid_y.gains = params.gains.y;
        self.pid_z.gains = params.gains.z;
        self.pid_yaw.gains = params.gains.yaw;
        self.limits = params.limits;
        self.takeoff_altitude = params.takeoff_altitude;
    }

    /// Run one control tick
    ///
    /// Returns `None` without touching any state unless the vehicle is
    /// airborne and not hovering; both flags are read fresh on every
    /// call. There are no NaN/Inf guards: a malformed pose or target
    /// propagates into the command.
    pub fn tick(&mut self) -> Option<TickOutput> {
        if self.state != FlightState::Airborne || self.hover {
            return None;
        }

        // === Step 1: world-frame error, yaw on the shorter path ===
        let mut error = self.target - self.actual;
        error.yaw = wrap_angle_deg(error.yaw);

        // === Step 2: horizontal error into the heading frame ===
        // Uses the current actual heading, not the target heading.
        let (error_body_x, error_body_y) = body_frame_xy(&error, self.actual.yaw);

        // === Step 3: per-axis PID and saturation ===
        let vx = self.pid_x.update(error_body_x, self.limits.max_vel_xy);
        let vy = self.pid_y.update(error_body_y, self.limits.max_vel_xy);
        let vz = self.pid_z.update(error.z, self.limits.max_vel_z);
        let vyaw = self.pid_yaw.update(error.yaw, self.limits.max_vel_yaw);

        // === Step 4: command and snapshot ===
        let command = VelocityCommand {
            linear: Vector3::new(vx, vy, vz),
            yaw_rate: vyaw,
        };

        let telemetry = Telemetry {
            target: self.target,
            actual: self.actual,
            error,
            error_body_x,
            error_body_y,
            velocity: Coordinate::new(vx, vy, vz, vyaw),
            vel_max: self.limits.max_vel_xy,
            vel_min: -self.limits.max_vel_xy,
            gains: self.gains(),
        };

        Some(TickOutput { command, telemetry })
    }
}
