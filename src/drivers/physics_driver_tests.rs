use approx::assert_abs_diff_eq;
use std::f64::consts::PI;

use crate::{assert_float_eq, assert_vector_eq};
use crate::drivers::{DriveOutcome, DriveRequest, DriverKind, PhysicsDriver, VelocityCommand, VelocityLimits};
use crate::models::{CollisionLayer, PhysicsDrivable, Pose, Quaternion, RigidBodyState};
use crate::utils::{vector_magnitude, DriverConfig};

const DT: f64 = 1.0 / 90.0;

fn body_at(pose: Pose) -> RigidBodyState {
    RigidBodyState::new(pose, 1.0, CollisionLayer::Interaction)
}

fn request(target: Pose) -> DriveRequest {
    DriveRequest {
        target,
        fixed_delta_time: DT,
        remaining_distance: 0.0,
        just_grasped: false,
    }
}

#[test]
fn test_body_on_target_stays_at_rest() {
    let driver = PhysicsDriver::default();
    let pose = Pose::new((0.2, 1.0, 0.0), Quaternion::from_axis_angle((0.0, 1.0, 0.0), 0.3));
    let mut body = body_at(pose);
    for _ in 0..10 {
        assert_eq!(driver.drive(&mut body, &request(pose)), DriveOutcome::AtRest);
        body.integrate(DT);
    }
    assert_eq!(body.velocity, (0.0, 0.0, 0.0));
    assert_eq!(body.angular_velocity, (0.0, 0.0, 0.0));
    assert_abs_diff_eq!(body.pose(), pose, epsilon = 1e-12);
}

#[test]
fn test_dead_zone_stops_a_moving_body() {
    let driver = PhysicsDriver::default();
    let mut body = body_at(Pose::identity());
    body.velocity = (0.3, 0.0, 0.0);
    let outcome = driver.drive(&mut body, &request(Pose::from_position((0.0001, 0.0, 0.0))));
    assert_eq!(outcome, DriveOutcome::AtRest);
    assert_eq!(body.velocity, (0.0, 0.0, 0.0));
}

#[test]
fn test_teleport_beyond_threshold() {
    let driver = PhysicsDriver::default();
    let mut body = body_at(Pose::identity());
    body.velocity = (1.0, 2.0, 3.0);
    let target = Pose::new((1.0, 0.0, 0.0), Quaternion::from_axis_angle((0.0, 0.0, 1.0), 1.0));
    assert_eq!(driver.drive(&mut body, &request(target)), DriveOutcome::Teleported);
    assert_abs_diff_eq!(body.pose(), target, epsilon = 1e-12);
    assert_eq!(body.velocity, (0.0, 0.0, 0.0));
    assert_eq!(body.angular_velocity, (0.0, 0.0, 0.0));
}

#[test]
fn test_just_grasped_teleports_when_configured() {
    let target = Pose::from_position((0.05, 0.0, 0.0));
    let mut grasp_request = request(target);
    grasp_request.just_grasped = true;

    let mut body = body_at(Pose::identity());
    assert_eq!(PhysicsDriver::default().drive(&mut body, &grasp_request), DriveOutcome::Teleported);

    let mut config = DriverConfig::default();
    config.teleport_on_grasp = false;
    let mut body = body_at(Pose::identity());
    let outcome = PhysicsDriver::new(config).drive(&mut body, &grasp_request);
    assert!(matches!(outcome, DriveOutcome::Driven { .. }));
}

#[test]
fn test_linear_speed_is_clamped() {
    let driver = PhysicsDriver::default();
    let mut body = body_at(Pose::identity());
    let target = Pose::from_position((0.0, 0.2, 0.0));
    driver.drive(&mut body, &request(target));
    assert_float_eq(vector_magnitude(body.velocity), driver.config().max_velocity, 1e-9, Some("capped speed"));
    assert_vector_eq(body.velocity, (0.0, driver.config().max_velocity, 0.0), 1e-9, Some("direction kept"));
}

#[test]
fn test_follow_strength_uses_remaining_distance() {
    let driver = PhysicsDriver::default();
    let mut body = body_at(Pose::identity());
    let mut far = request(Pose::from_position((0.01, 0.0, 0.0)));
    far.remaining_distance = 1.0;
    let outcome = driver.drive(&mut body, &far);
    assert_eq!(outcome, DriveOutcome::Driven { follow_strength: 0.3 });
    assert_float_eq(body.velocity.0, 0.3 * 0.01 / DT, 1e-9, None);
}

#[test]
fn test_velocity_drive_converges() {
    let driver = PhysicsDriver::default();
    let target = Pose::new((0.1, 1.0, -0.05), Quaternion::from_axis_angle((1.0, 1.0, 0.0), 0.4));
    let mut body = body_at(Pose::from_position((0.0, 1.0, 0.0)));
    let mut remaining = body.pose().distance_to(&target);
    for _ in 0..200 {
        let mut step = request(target);
        step.remaining_distance = remaining;
        driver.drive(&mut body, &step);
        body.integrate(DT);
        remaining = body.pose().distance_to(&target);
    }
    assert!(remaining < 0.001);
    assert!(body.rotation.angle_to(&target.rotation) < 0.01);
}

#[test]
fn test_half_turn_yields_finite_zero_angular_velocity() {
    let current = Pose::identity();
    let target = Pose::new((0.0, 0.0, 0.0), Quaternion::from_axis_angle((0.0, 1.0, 0.0), PI));
    let limits = VelocityLimits { max_velocity: 6.0, dead_zone: 0.0005, angular_dead_zone: 0.001 };
    let command = VelocityCommand::toward(&current, &target, DT, &limits);
    assert_eq!(command.angular, (0.0, 0.0, 0.0));

    let mut body = body_at(current);
    PhysicsDriver::default().drive(&mut body, &request(target));
    assert!(body.angular_velocity.0.is_finite() && body.angular_velocity.1.is_finite());
}

#[test]
fn test_blended_angular_velocity_never_exceeds_command() {
    let limits = VelocityLimits { max_velocity: 6.0, dead_zone: 0.0005, angular_dead_zone: 0.001 };
    let target = Pose::new((0.0, 0.0, 0.0), Quaternion::from_axis_angle((0.0, 0.0, 1.0), 0.01));
    let command = VelocityCommand::toward(&Pose::identity(), &target, DT, &limits);
    let mut body = body_at(Pose::identity());
    body.angular_velocity = (0.0, 0.0, 50.0);
    command.blend_into(&mut body, 0.5);
    assert!(vector_magnitude(body.angular_velocity) <= vector_magnitude(command.angular) + 1e-12);
}

#[test]
fn test_kinematic_strategy_places_body() {
    let mut config = DriverConfig::default();
    config.kind = DriverKind::Kinematic;
    let driver = PhysicsDriver::new(config);
    let target = Pose::new((0.01, 0.0, 0.0), Quaternion::from_axis_angle((1.0, 0.0, 0.0), 0.2));
    let mut body = body_at(Pose::identity());
    body.velocity = (1.0, 0.0, 0.0);
    assert_eq!(driver.drive(&mut body, &request(target)), DriveOutcome::Placed);
    assert_abs_diff_eq!(body.pose(), target, epsilon = 1e-12);
    assert_eq!(body.velocity, (0.0, 0.0, 0.0));
}

#[test]
fn test_invalid_request_is_skipped() {
    let driver = PhysicsDriver::default();
    let mut body = body_at(Pose::identity());
    let mut bad = request(Pose::identity());
    bad.fixed_delta_time = 0.0;
    assert_eq!(driver.drive(&mut body, &bad), DriveOutcome::Skipped);
    let nan_target = request(Pose::from_position((f64::NAN, 0.0, 0.0)));
    assert_eq!(driver.drive(&mut body, &nan_target), DriveOutcome::Skipped);
}
