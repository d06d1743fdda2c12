//! Fixed-rate control loop
//!
//! Owns the fleet and the sample period, and drives one control pass
//! over every vehicle per period. Inbound events arrive between passes
//! through [`ControlLoop::dispatch`]; nothing inside a pass blocks or
//! suspends.

use std::thread;
use std::time::{Duration, Instant};

use crate::bus::{Outbound, VehicleEvent};
use crate::config::{ConfigError, FleetConfig};
use crate::fleet::{Fleet, FleetError};

/// Fixed-period scheduler for a fleet of controllers
#[derive(Debug)]
pub struct ControlLoop {
    fleet: Fleet,
    period: Duration,
}

impl ControlLoop {
    /// Build the fleet and the loop from one validated configuration
    pub fn from_config(config: &FleetConfig) -> Result<Self, ConfigError> {
        let fleet = Fleet::from_config(config)?;

        Ok(Self {
            fleet,
            period: Duration::from_secs_f64(1.0 / config.rate_hz),
        })
    }

    /// Sample period of the loop
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    /// Route one inbound event to its vehicle
    pub fn dispatch(
        &mut self,
        vehicle: &str,
        event: VehicleEvent,
        out: &mut impl Outbound,
    ) -> Result<(), FleetError> {
        self.fleet.handle_event(vehicle, event, out)
    }

    /// Run one control pass immediately, without pacing
    pub fn step(&mut self, out: &mut impl Outbound) {
        self.fleet.step(out);
    }

    /// Run paced passes until the callback asks to stop
    ///
    /// `on_pass` is invoked before every pass with the pass index and
    /// mutable access to the fleet, so a caller can feed inbound events
    /// at the loop boundary; returning `false` ends the loop. A pass
    /// that overruns its slot runs the next one immediately and the
    /// schedule restarts from there rather than replaying the backlog.
    pub fn run<O, F>(&mut self, out: &mut O, mut on_pass: F)
    where
        O: Outbound,
        F: FnMut(u64, &mut Fleet, &mut O) -> bool,
    {
        let mut pass: u64 = 0;
        let mut next = Instant::now();

        loop {
            if !on_pass(pass, &mut self.fleet, out) {
                break;
            }

            self.fleet.step(out);
            pass += 1;

            next += self.period;
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            } else {
                next = now;
            }
        }
    }
}
