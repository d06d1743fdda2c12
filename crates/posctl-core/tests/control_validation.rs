//! Control-law validation tests
//!
//! End-to-end checks of the controller's documented behavior: yaw
//! wraparound, heading-frame rotation, output saturation, integral
//! reset on saturation, takeoff seeding, the hover/grounded guard, and
//! one fully worked closed-form scenario.

use approx::assert_relative_eq;
use nalgebra::{UnitQuaternion, Vector3};

use posctl_core::controller::{ControllerParams, Limits, PositionController};
use posctl_core::coord::{body_frame_xy, wrap_angle_deg, Coordinate};
use posctl_core::pid::{AxisGains, Gains};
use posctl_core::pose::RawPose;

/// Controller with unit proportional gains and the given symmetric limits
fn p_controller(limit: f64) -> PositionController {
    let params = ControllerParams {
        gains: Gains {
            x: AxisGains::proportional(1.0),
            y: AxisGains::proportional(1.0),
            z: AxisGains::proportional(1.0),
            yaw: AxisGains::proportional(1.0),
        },
        limits: Limits {
            max_vel_xy: limit,
            max_vel_z: limit,
            max_vel_yaw: limit,
        },
        takeoff_altitude: 1.5,
    };
    PositionController::new("validation", params).expect("valid params")
}

/// Place the vehicle at a world coordinate through the capture-frame remap
fn place(c: &mut PositionController, world: Coordinate) {
    let pose = RawPose::new(
        Vector3::new(world.x, -world.z, world.y),
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -world.yaw.to_radians()),
    );
    let converted = c.ingest_pose(&pose);
    assert_relative_eq!(converted.x, world.x, epsilon = 1e-9);
    assert_relative_eq!(converted.y, world.y, epsilon = 1e-9);
    assert_relative_eq!(converted.z, world.z, epsilon = 1e-9);
    assert_relative_eq!(converted.yaw, world.yaw, epsilon = 1e-9);
}

/// Yaw wraparound lands every error on the shorter angular path
mod yaw_wrap_tests {
    use super::*;

    #[test]
    fn test_wrap_positive_overflow() {
        assert_relative_eq!(wrap_angle_deg(270.0), -90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_negative_overflow() {
        assert_relative_eq!(wrap_angle_deg(-270.0), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_result_in_half_open_range() {
        for e in [-359.0, -181.0, -180.0, -1.0, 0.0, 1.0, 180.0, 181.0, 359.0] {
            let w = wrap_angle_deg(e);
            assert!(w > -180.0 - 1e-12 && w <= 180.0 + 1e-12, "{e} -> {w}");
        }
    }

    #[test]
    fn test_controller_turns_the_short_way() {
        // Actual heading 170°, target -170°: the short path is +20°, so
        // the yaw command must be positive.
        let mut c = p_controller(10.0);
        place(&mut c, Coordinate::new(0.0, 0.0, 1.5, 170.0));
        c.takeoff();
        c.set_target(Coordinate::new(0.0, 0.0, 1.5, -170.0));

        let out = c.tick().expect("tick runs");

        assert_relative_eq!(out.telemetry.error.yaw, 20.0, epsilon = 1e-6);
        assert!(out.command.yaw_rate > 0.0);
    }
}

/// The heading-frame projection is a pure rotation
mod frame_rotation_tests {
    use super::*;

    #[test]
    fn test_identity_at_zero_heading() {
        let error = Coordinate::new(0.7, -0.3, 0.0, 0.0);
        let (bx, by) = body_frame_xy(&error, 0.0);

        assert_relative_eq!(bx, 0.7, epsilon = 1e-12);
        assert_relative_eq!(by, -0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_uses_actual_heading_not_target() {
        // Vehicle facing 90° with a purely world-x error: the error
        // appears on the body side axis even though the target heading
        // is 0°.
        let mut c = p_controller(10.0);
        place(&mut c, Coordinate::new(0.0, 0.0, 1.5, 90.0));
        c.takeoff();
        c.set_target(Coordinate::new(1.0, 0.0, 1.5, 90.0));

        let out = c.tick().expect("tick runs");

        assert_relative_eq!(out.telemetry.error_body_x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(out.telemetry.error_body_y, -1.0, epsilon = 1e-9);
    }
}

/// Saturation clamps to the configured symmetric bounds and is idempotent
mod saturation_tests {
    use super::*;

    #[test]
    fn test_output_never_exceeds_bound() {
        let mut c = p_controller(0.5);
        place(&mut c, Coordinate::zeros());
        c.takeoff();

        for magnitude in [1.0, 10.0, 1e6] {
            c.set_target(Coordinate::new(magnitude, -magnitude, 1.5, 0.0));
            let out = c.tick().expect("tick runs");

            assert!(out.command.linear.x.abs() <= 0.5 + 1e-12);
            assert!(out.command.linear.y.abs() <= 0.5 + 1e-12);
            assert!(out.command.linear.z.abs() <= 0.5 + 1e-12);
            assert!(out.command.yaw_rate.abs() <= 0.5 + 1e-12);
        }
    }

    #[test]
    fn test_reclamping_is_idempotent() {
        let limit = 0.5_f64;
        let clamped = 7.3_f64.clamp(-limit, limit);

        assert_relative_eq!(clamped.clamp(-limit, limit), clamped, epsilon = 1e-15);
    }
}

/// Integral reset when the previous output was pinned in the error's direction
mod windup_tests {
    use super::*;
    use posctl_core::pid::AxisPid;

    #[test]
    fn test_pinned_positive_output_resets_integral_on_positive_error() {
        let mut pid = AxisPid::new(AxisGains::new(10.0, 1.0, 0.0));

        // Tick 1: raw output 10·1 + 1·1 = 11, far past the 0.5 bound.
        pid.update(1.0, 0.5);
        assert_relative_eq!(pid.integral(), 1.0, epsilon = 1e-12);

        // Tick 2: error still positive, accumulator resets instead of
        // growing.
        pid.update(1.0, 0.5);
        assert_relative_eq!(pid.integral(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_each_axis_uses_its_own_limit() {
        // Wide z limit, narrow xy limit, identical gains and errors:
        // only the xy axes reset.
        let mut c = PositionController::new(
            "windup",
            ControllerParams {
                gains: Gains {
                    x: AxisGains::new(1.0, 1.0, 0.0),
                    y: AxisGains::new(1.0, 1.0, 0.0),
                    z: AxisGains::new(1.0, 1.0, 0.0),
                    yaw: AxisGains::proportional(0.0),
                },
                limits: Limits {
                    max_vel_xy: 0.5,
                    max_vel_z: 100.0,
                    max_vel_yaw: 0.5,
                },
                takeoff_altitude: 0.0,
            },
        )
        .expect("valid params");

        place(&mut c, Coordinate::zeros());
        c.takeoff();
        c.set_target(Coordinate::new(1.0, 0.0, 1.0, 0.0));

        // Tick 1 winds both axes up; x raw output (2.0) is past its
        // bound, z raw output (2.0) is far inside its own.
        c.tick().expect("tick runs");
        let out = c.tick().expect("tick runs");

        // x reset: output = kp·e + ki·0 = 1.0 raw, clamped to 0.5.
        assert_relative_eq!(out.command.linear.x, 0.5, epsilon = 1e-12);
        // z kept its accumulator: output = 1·1 + 1·2 = 3.0, unclamped.
        assert_relative_eq!(out.command.linear.z, 3.0, epsilon = 1e-12);
    }
}

/// Takeoff seeding and lifecycle guard
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_takeoff_seeds_exactly_from_last_pose() {
        let mut c = p_controller(0.5);
        place(&mut c, Coordinate::new(0.4, -1.2, 0.05, 33.0));
        c.set_target(Coordinate::new(7.0, 7.0, 7.0, 7.0));

        c.takeoff();

        let t = c.target();
        assert_relative_eq!(t.x, 0.4, epsilon = 1e-9);
        assert_relative_eq!(t.y, -1.2, epsilon = 1e-9);
        assert_relative_eq!(t.z, 1.5, epsilon = 1e-12);
        assert_relative_eq!(t.yaw, 33.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hover_freezes_all_internal_state() {
        // Two identical controllers; one spends ticks hovering. If the
        // hover ticks mutate nothing, both produce identical outputs
        // afterwards.
        let build = || {
            let mut c = PositionController::new(
                "guard",
                ControllerParams {
                    gains: Gains {
                        x: AxisGains::new(0.5, 0.1, 0.2),
                        y: AxisGains::new(0.5, 0.1, 0.2),
                        z: AxisGains::new(0.5, 0.1, 0.2),
                        yaw: AxisGains::new(0.5, 0.1, 0.2),
                    },
                    limits: Limits::default(),
                    takeoff_altitude: 1.5,
                },
            )
            .expect("valid params");
            place(&mut c, Coordinate::zeros());
            c.takeoff();
            c.set_target(Coordinate::new(0.3, 0.2, 1.0, 10.0));
            c
        };

        let mut hovered = build();
        let mut reference = build();

        hovered.set_hover(true);
        for _ in 0..5 {
            assert!(hovered.tick().is_none());
        }
        hovered.set_hover(false);

        for _ in 0..3 {
            let a = hovered.tick().expect("tick runs");
            let b = reference.tick().expect("tick runs");
            assert_relative_eq!(a.command.linear.x, b.command.linear.x, epsilon = 1e-12);
            assert_relative_eq!(a.command.linear.y, b.command.linear.y, epsilon = 1e-12);
            assert_relative_eq!(a.command.linear.z, b.command.linear.z, epsilon = 1e-12);
            assert_relative_eq!(a.command.yaw_rate, b.command.yaw_rate, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_land_before_takeoff_is_harmless() {
        let mut c = p_controller(0.5);

        assert!(!c.land());
        assert!(c.tick().is_none());

        c.takeoff();
        assert!(c.tick().is_some());
    }
}

/// Fully worked scenario with closed-form expected values
mod end_to_end_tests {
    use super::*;

    #[test]
    fn test_unit_gain_scenario() {
        // actual = {0,0,0,0}, target = {1,0,1.5,0}, Kp = 1, Ki = Kd = 0,
        // limits = 0.5 everywhere:
        //   error        = {1, 0, 1.5, 0}
        //   body error   = (1, 0)
        //   raw velocity = {1, 0, 1.5, 0}
        //   saturated    = {0.5, 0, 0.5, 0}
        let mut c = p_controller(0.5);
        place(&mut c, Coordinate::zeros());
        c.takeoff();
        c.set_target(Coordinate::new(1.0, 0.0, 1.5, 0.0));

        let out = c.tick().expect("tick runs");

        assert_relative_eq!(out.telemetry.error.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(out.telemetry.error.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(out.telemetry.error.z, 1.5, epsilon = 1e-12);
        assert_relative_eq!(out.telemetry.error.yaw, 0.0, epsilon = 1e-12);

        assert_relative_eq!(out.telemetry.error_body_x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(out.telemetry.error_body_y, 0.0, epsilon = 1e-12);

        assert_relative_eq!(out.command.linear.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(out.command.linear.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(out.command.linear.z, 0.5, epsilon = 1e-12);
        assert_relative_eq!(out.command.yaw_rate, 0.0, epsilon = 1e-12);

        assert_relative_eq!(out.telemetry.vel_max, 0.5, epsilon = 1e-12);
        assert_relative_eq!(out.telemetry.vel_min, -0.5, epsilon = 1e-12);
    }
}
