use crate::assert_float_eq;
use crate::grasp::{ReleaseVelocity, SlidingWindowThrow, ThrowHandler, ThrowVelocityOverride};
use crate::models::{ArenaHandle, ObjectId, Pose, Quaternion};
use crate::utils::{scale_vector, ThrowConfig};

fn record_motion(window: &mut SlidingWindowThrow, samples: usize) {
    for i in 0..samples {
        let t = i as f64 * 0.01;
        let pose = Pose::new((t, 1.0, 0.0), Quaternion::from_axis_angle((0.0, 0.0, 1.0), 2.0 * t));
        window.record(t, pose);
    }
}

#[test]
fn test_release_velocity_from_window() {
    let mut window = SlidingWindowThrow::new(&ThrowConfig::default());
    record_motion(&mut window, 10);
    assert!(window.sample_count() <= 7, "old samples leave the window");

    let release = window.release_velocity().unwrap();
    // 1 m/s lands on the multiplier curve at 1 + 0.5 / 3
    assert_float_eq(release.linear.0, 1.0 + 0.5 / 3.0, 1e-9, Some("scaled linear velocity"));
    assert_float_eq(release.linear.1, 0.0, 1e-12, None);
    assert_float_eq(release.angular.2, 2.0, 1e-9, Some("angular velocity"));
}

#[test]
fn test_release_needs_two_samples() {
    let mut window = SlidingWindowThrow::new(&ThrowConfig::default());
    assert!(window.release_velocity().is_none());
    window.record(0.0, Pose::identity());
    assert!(window.release_velocity().is_none());
}

#[test]
fn test_handler_variants() {
    let mut config = ThrowConfig::default();
    config.enabled = false;
    let mut disabled = ThrowHandler::from_config(&config);
    disabled.on_hold(0.0, Pose::identity());
    disabled.on_hold(0.01, Pose::from_position((1.0, 0.0, 0.0)));
    assert!(disabled.on_release().is_none());

    let mut sliding = ThrowHandler::from_config(&ThrowConfig::default());
    sliding.on_hold(0.0, Pose::identity());
    sliding.on_hold(0.01, Pose::from_position((0.01, 0.0, 0.0)));
    assert!(sliding.on_release().is_some());
    assert!(sliding.on_release().is_none(), "history is cleared on release");
}

#[test]
fn test_closure_override() {
    let mut hook = |_: ObjectId, release: ReleaseVelocity| ReleaseVelocity {
        linear: scale_vector(release.linear, 2.0),
        ..release
    };
    let release = ReleaseVelocity { linear: (1.0, 0.0, 0.0), angular: (0.0, 1.0, 0.0) };
    let changed = hook.override_release(ObjectId::from_parts(0, 0), release);
    assert_eq!(changed.linear, (2.0, 0.0, 0.0));
    assert_eq!(changed.angular, (0.0, 1.0, 0.0));
}
