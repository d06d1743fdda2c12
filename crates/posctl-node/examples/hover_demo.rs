//! Two-vehicle closed-loop demonstration
//!
//! Flies two simulated vehicles through a full mission: takeoff, climb
//! to the takeoff altitude, fly to a target, land. The plant is a pure
//! kinematic integrator fed by the commanded body-frame velocities, and
//! its pose is converted back into capture-frame samples so the whole
//! ingest path is exercised.
//!
//! Runs as fast as possible (the paced loop is for real transports);
//! prints one status line per simulated second.

use nalgebra::{UnitQuaternion, Vector3};

use posctl_core::controller::VelocityCommand;
use posctl_core::coord::Coordinate;
use posctl_core::pose::RawPose;
use posctl_node::bus::{Recorder, VehicleEvent};
use posctl_node::config::{FleetConfig, VehicleConfig};
use posctl_node::scheduler::ControlLoop;

/// Kinematic stand-in for one vehicle
struct Plant {
    pose: Coordinate,
}

/// The platform interprets the commanded yaw rate as a fraction of its
/// maximum rotation speed.
const MAX_YAW_RATE_DPS: f64 = 100.0;

impl Plant {
    fn new(x: f64, y: f64) -> Self {
        Self {
            pose: Coordinate::new(x, y, 0.0, 0.0),
        }
    }

    /// Integrate one commanded body-frame velocity over dt
    fn apply(&mut self, command: &VelocityCommand, dt: f64) {
        let heading = self.pose.yaw.to_radians();
        let (sin_h, cos_h) = heading.sin_cos();

        // Body-frame command back into world axes.
        self.pose.x += (command.linear.x * cos_h - command.linear.y * sin_h) * dt;
        self.pose.y += (command.linear.y * cos_h + command.linear.x * sin_h) * dt;
        self.pose.z += command.linear.z * dt;
        self.pose.yaw += command.yaw_rate * MAX_YAW_RATE_DPS * dt;
    }

    /// Express the current pose as a capture-frame sample
    fn sample(&self) -> RawPose {
        RawPose::new(
            Vector3::new(self.pose.x, -self.pose.z, self.pose.y),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -self.pose.yaw.to_radians()),
        )
    }
}

fn main() {
    println!("=== posctl two-vehicle demonstration ===\n");

    let config = FleetConfig {
        vehicles: vec![
            VehicleConfig::named("leader"),
            VehicleConfig::named("follower1"),
        ],
        ..FleetConfig::default()
    };

    let rate = config.rate_hz;
    let dt = 1.0 / rate;
    let mut control_loop = ControlLoop::from_config(&config).expect("valid configuration");
    let mut out = Recorder::new();

    let mut plants = [
        ("leader", Plant::new(0.0, 0.0)),
        ("follower1", Plant::new(0.0, -1.0)),
    ];

    let targets = [
        ("leader", Coordinate::new(2.0, 1.0, 1.5, 90.0)),
        ("follower1", Coordinate::new(2.0, 0.0, 1.5, 90.0)),
    ];

    println!("fleet: {:?}", control_loop.fleet().names());
    println!("rate: {rate} Hz, takeoff altitude: {} m\n", config.takeoff_altitude);

    let total_passes = (20.0 * rate) as u64;

    for pass in 0..total_passes {
        // Feed the latest plant pose to every vehicle, as the capture
        // system would.
        for (name, plant) in &plants {
            control_loop
                .dispatch(name, VehicleEvent::Pose(plant.sample()), &mut out)
                .expect("known vehicle");
        }

        // Mission script: takeoff at t=0, external targets at t=5s,
        // land at t=18s.
        if pass == 0 {
            for (name, _) in &plants {
                control_loop
                    .dispatch(name, VehicleEvent::Takeoff, &mut out)
                    .expect("known vehicle");
            }
        }
        if pass == (5.0 * rate) as u64 {
            for (name, target) in &targets {
                control_loop
                    .dispatch(name, VehicleEvent::Target(*target), &mut out)
                    .expect("known vehicle");
            }
        }
        if pass == (18.0 * rate) as u64 {
            for (name, _) in &plants {
                control_loop
                    .dispatch(name, VehicleEvent::Land, &mut out)
                    .expect("known vehicle");
            }
        }

        let published_before = out.commands.len();
        control_loop.step(&mut out);

        // Apply only the commands published during this pass; a landed
        // or hovering vehicle gets none and stays where it is.
        for (name, command) in &out.commands[published_before..] {
            if let Some((_, plant)) = plants.iter_mut().find(|(n, _)| *n == name.as_str()) {
                plant.apply(command, dt);
            }
        }

        if pass % (rate as u64) == 0 {
            let t = pass as f64 * dt;
            let leader = &plants[0].1.pose;
            let follower = &plants[1].1.pose;
            println!(
                "t={t:5.1}s  leader ({:6.2}, {:6.2}, {:5.2}, {:7.2}°)  follower1 ({:6.2}, {:6.2}, {:5.2}, {:7.2}°)",
                leader.x, leader.y, leader.z, leader.yaw,
                follower.x, follower.y, follower.z, follower.yaw,
            );
        }
    }

    println!("\ncommands published: {}", out.commands.len());
    println!("telemetry snapshots: {}", out.telemetry.len());

    let leader = &plants[0].1.pose;
    println!(
        "\nleader final pose: ({:.3}, {:.3}, {:.3}, {:.2}°)",
        leader.x, leader.y, leader.z, leader.yaw
    );
}
