use crate::{assert_float_eq, assert_vector_eq};
use crate::utils::{
    are_colinear,
    centroid,
    clamp_magnitude,
    cross_product,
    dot_product,
    lerp_vector,
    max_spread,
    normalize_vector,
    vector_magnitude,
    ZERO_VECTOR,
};

#[test]
fn test_cross_and_dot_product() {
    let x = (1.0, 0.0, 0.0);
    let y = (0.0, 1.0, 0.0);
    assert_vector_eq(cross_product(x, y), (0.0, 0.0, 1.0), 1e-12, Some("x cross y should be z"));
    assert_float_eq(dot_product(x, y), 0.0, 1e-12, Some("orthogonal axes"));
    assert_float_eq(dot_product((1.0, 2.0, 3.0), (4.0, 5.0, 6.0)), 32.0, 1e-12, None);
}

#[test]
fn test_normalize_vector_rejects_zero_length() {
    assert!(normalize_vector(ZERO_VECTOR).is_none());
    assert!(normalize_vector((f64::NAN, 0.0, 0.0)).is_none());
    let n = normalize_vector((3.0, 0.0, 4.0)).unwrap();
    assert_float_eq(vector_magnitude(n), 1.0, 1e-12, Some("unit length"));
}

#[test]
fn test_clamp_magnitude_preserves_direction() {
    let clamped = clamp_magnitude((3.0, 0.0, 4.0), 1.0);
    assert_vector_eq(clamped, (0.6, 0.0, 0.8), 1e-12, Some("clamped direction"));
    let untouched = clamp_magnitude((0.1, 0.0, 0.0), 1.0);
    assert_vector_eq(untouched, (0.1, 0.0, 0.0), 1e-12, Some("short vectors stay"));
}

#[test]
fn test_lerp_vector_clamps_factor() {
    let a = (0.0, 0.0, 0.0);
    let b = (2.0, 4.0, 6.0);
    assert_vector_eq(lerp_vector(a, b, 0.5), (1.0, 2.0, 3.0), 1e-12, None);
    assert_vector_eq(lerp_vector(a, b, 2.0), b, 1e-12, Some("factor above one clamps"));
    assert_vector_eq(lerp_vector(a, b, -1.0), a, 1e-12, Some("factor below zero clamps"));
}

#[test]
fn test_centroid_and_spread() {
    let points = [(1.0, 0.0, 0.0), (-1.0, 0.0, 0.0), (0.0, 2.0, 0.0), (0.0, -2.0, 0.0)];
    assert_vector_eq(centroid(&points), ZERO_VECTOR, 1e-12, None);
    assert_float_eq(max_spread(&points), 2.0, 1e-12, None);
    assert_vector_eq(centroid(&[]), ZERO_VECTOR, 1e-12, Some("empty centroid is the origin"));
}

#[test]
fn test_are_colinear() {
    let line = [(0.0, 0.0, 0.0), (1.0, 1.0, 1.0), (2.0, 2.0, 2.0), (-3.0, -3.0, -3.0)];
    assert!(are_colinear(&line, 1e-9));
    let coincident = [(0.5, 0.5, 0.5); 4];
    assert!(are_colinear(&coincident, 1e-9));
    let triangle = [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)];
    assert!(!are_colinear(&triangle, 1e-9));
}
