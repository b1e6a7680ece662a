use approx::assert_abs_diff_eq;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::{assert_float_eq, assert_vector_eq};
use crate::models::Quaternion;

#[test]
fn test_identity_leaves_points_untouched() {
    let q = Quaternion::identity();
    assert_eq!(q.to_axis_angle(), None);
    assert_vector_eq(q.rotate_point((1.0, 2.0, 3.0)), (1.0, 2.0, 3.0), 1e-12, None);
}

#[test]
fn test_from_axis_angle_rotates_about_axis() {
    let q = Quaternion::from_axis_angle((0.0, 0.0, 1.0), FRAC_PI_2);
    assert_vector_eq(q.rotate_point((1.0, 0.0, 0.0)), (0.0, 1.0, 0.0), 1e-12, Some("x maps to y"));
    assert_float_eq(q.magnitude(), 1.0, 1e-12, Some("unit quaternion"));
}

#[test]
fn test_from_axis_angle_zero_axis_is_identity() {
    let q = Quaternion::from_axis_angle((0.0, 0.0, 0.0), 1.0);
    assert_eq!(q, Quaternion::identity());
}

#[test]
fn test_inverse_undoes_rotation() {
    let q = Quaternion::from_axis_angle((1.0, 2.0, -0.5), 1.1);
    let p = (0.3, -0.7, 2.0);
    let back = q.inverse().rotate_point(q.rotate_point(p));
    assert_vector_eq(back, p, 1e-12, None);
}

#[test]
fn test_to_axis_angle_round_trip() {
    let q = Quaternion::from_axis_angle((0.0, 1.0, 0.0), 0.75);
    let (axis, angle) = q.to_axis_angle().unwrap();
    assert_vector_eq(axis, (0.0, 1.0, 0.0), 1e-12, None);
    assert_float_eq(angle, 0.75, 1e-12, None);
}

#[test]
fn test_to_axis_angle_picks_shortest_path() {
    // 270 degrees one way is 90 degrees the other way
    let q = Quaternion::from_axis_angle((0.0, 0.0, 1.0), 1.5 * PI);
    let (axis, angle) = q.to_axis_angle().unwrap();
    assert_float_eq(angle, FRAC_PI_2, 1e-12, None);
    assert_vector_eq(axis, (0.0, 0.0, -1.0), 1e-12, None);
}

#[test]
fn test_to_axis_angle_rejects_identity_and_nan() {
    assert!(Quaternion::identity().to_axis_angle().is_none());
    assert!(Quaternion::new(f64::NAN, 0.0, 0.0, 0.0).to_axis_angle().is_none());
}

#[test]
fn test_delta_to_composes_back() {
    let a = Quaternion::from_axis_angle((1.0, 0.0, 0.0), 0.4);
    let b = Quaternion::from_axis_angle((0.0, 1.0, 1.0), -0.9);
    let delta = a.delta_to(&b);
    assert_abs_diff_eq!(delta.multiply(&a), b, epsilon = 1e-12);
}

#[test]
fn test_sign_folded_comparison() {
    let q = Quaternion::from_axis_angle((0.3, 0.2, 0.1), 0.5);
    assert_abs_diff_eq!(q, q.negated(), epsilon = 1e-12);
    assert_float_eq(q.angle_to(&q.negated()), 0.0, 1e-6, Some("same rotation"));
}

#[test]
fn test_basis_is_orthonormal() {
    let q = Quaternion::from_axis_angle((0.3, -0.8, 1.7), 2.1);
    let [x, y, z] = q.basis();
    assert_float_eq(crate::utils::dot_product(x, y), 0.0, 1e-12, None);
    assert_float_eq(crate::utils::dot_product(y, z), 0.0, 1e-12, None);
    assert_vector_eq(crate::utils::cross_product(x, y), z, 1e-12, Some("right handed basis"));
}
