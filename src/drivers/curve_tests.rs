use crate::assert_float_eq;
use crate::drivers::{ResponseCurve, MAX_CURVE_KEYS};
use crate::errors::InteractionError;

#[test]
fn test_evaluate_interpolates_and_clamps() {
    let curve = ResponseCurve::new(&[(0.0, 1.0), (1.0, 0.5), (3.0, 0.0)]).unwrap();
    assert_float_eq(curve.evaluate(-1.0), 1.0, 1e-12, Some("clamped below"));
    assert_float_eq(curve.evaluate(0.5), 0.75, 1e-12, None);
    assert_float_eq(curve.evaluate(2.0), 0.25, 1e-12, None);
    assert_float_eq(curve.evaluate(10.0), 0.0, 1e-12, Some("clamped above"));
    assert_float_eq(curve.evaluate(f64::NAN), 0.0, 1e-12, Some("non-finite input uses last key"));
}

#[test]
fn test_constant_curve() {
    let curve = ResponseCurve::constant(0.4);
    assert_eq!(curve.keys().len(), 1);
    assert_eq!(curve.evaluate(-5.0), 0.4);
    assert_eq!(curve.evaluate(5.0), 0.4);
    assert!(curve.is_non_increasing());
}

#[test]
fn test_monotonicity_and_range() {
    let falling = ResponseCurve::linear((0.0, 1.0), (0.02, 0.3));
    assert!(falling.is_non_increasing());
    assert_eq!(falling.output_range(), (0.3, 1.0));
    let rising = ResponseCurve::linear((0.0, 0.2), (1.0, 0.9));
    assert!(!rising.is_non_increasing());
}

#[test]
fn test_invalid_curves_are_rejected() {
    assert!(matches!(ResponseCurve::new(&[]), Err(InteractionError::InvalidCurve(_))));
    assert!(matches!(ResponseCurve::new(&[(1.0, 0.0), (1.0, 1.0)]), Err(InteractionError::InvalidCurve(_))));
    assert!(matches!(ResponseCurve::new(&[(0.0, f64::INFINITY)]), Err(InteractionError::InvalidCurve(_))));
    let too_many: Vec<(f64, f64)> = (0..=MAX_CURVE_KEYS).map(|i| (i as f64, 0.0)).collect();
    assert!(ResponseCurve::new(&too_many).is_err());
}
