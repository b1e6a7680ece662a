use crate::errors::InteractionError;

pub const MAX_CURVE_KEYS: usize = 8;

/// A single keyframe of a [`ResponseCurve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveKey {
    pub input: f64,
    pub output: f64,
}

impl CurveKey {
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

const UNUSED_KEY: CurveKey = CurveKey::new(0.0, 0.0);

/// Piecewise-linear curve with a fixed key capacity.
///
/// Used for follow strength by remaining distance and for throw speed
/// multipliers. Inputs outside the key range clamp to the first or last key.
/// The storage is inline, so evaluating and copying never allocates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseCurve {
    keys: [CurveKey; MAX_CURVE_KEYS],
    len: usize,
}

impl ResponseCurve {
    /// A curve returning `value` everywhere.
    pub const fn constant(value: f64) -> Self {
        Self {
            keys: [
                CurveKey::new(0.0, value),
                UNUSED_KEY, UNUSED_KEY, UNUSED_KEY,
                UNUSED_KEY, UNUSED_KEY, UNUSED_KEY, UNUSED_KEY,
            ],
            len: 1,
        }
    }

    /// A two-key curve. `start.0` must be smaller than `end.0`.
    pub const fn linear(start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            keys: [
                CurveKey::new(start.0, start.1),
                CurveKey::new(end.0, end.1),
                UNUSED_KEY, UNUSED_KEY, UNUSED_KEY,
                UNUSED_KEY, UNUSED_KEY, UNUSED_KEY,
            ],
            len: 2,
        }
    }

    /// Creates a curve from `(input, output)` pairs.
    ///
    /// # Errors
    /// Returns [`InteractionError::InvalidCurve`] if there are no keys, more than
    /// [`MAX_CURVE_KEYS`] keys, non-finite values, or inputs that are not
    /// strictly increasing.
    ///
    /// # Example
    /// ```
    /// use rs_interaction::drivers::ResponseCurve;
    ///
    /// let curve = ResponseCurve::new(&[(0.0, 1.0), (0.02, 0.3)]).unwrap();
    /// assert_eq!(curve.evaluate(0.0), 1.0);
    /// assert_eq!(curve.evaluate(1.0), 0.3);
    /// ```
    pub fn new(points: &[(f64, f64)]) -> Result<Self, InteractionError> {
        if points.is_empty() {
            return Err(InteractionError::InvalidCurve("curve needs at least one key".to_string()));
        }
        if points.len() > MAX_CURVE_KEYS {
            return Err(InteractionError::InvalidCurve(format!(
                "curve supports at most {} keys, got {}",
                MAX_CURVE_KEYS,
                points.len()
            )));
        }
        let mut keys = [UNUSED_KEY; MAX_CURVE_KEYS];
        for (i, &(input, output)) in points.iter().enumerate() {
            if !input.is_finite() || !output.is_finite() {
                return Err(InteractionError::InvalidCurve(format!("key {} is not finite", i)));
            }
            if i > 0 && input <= points[i - 1].0 {
                return Err(InteractionError::InvalidCurve(format!(
                    "key inputs must be strictly increasing (key {})",
                    i
                )));
            }
            keys[i] = CurveKey::new(input, output);
        }
        Ok(Self { keys, len: points.len() })
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys[..self.len]
    }

    /// Evaluates the curve at `x`. A non-finite `x` evaluates to the last key.
    pub fn evaluate(&self, x: f64) -> f64 {
        let keys = self.keys();
        let first = keys[0];
        let last = keys[keys.len() - 1];
        if !x.is_finite() {
            return last.output;
        }
        if x <= first.input {
            return first.output;
        }
        if x >= last.input {
            return last.output;
        }
        for pair in keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.input {
                let t = (x - a.input) / (b.input - a.input);
                return a.output + (b.output - a.output) * t;
            }
        }
        last.output
    }

    /// True when the output never rises as the input grows.
    pub fn is_non_increasing(&self) -> bool {
        self.keys().windows(2).all(|pair| pair[1].output <= pair[0].output)
    }

    /// Smallest and largest output over all keys.
    pub fn output_range(&self) -> (f64, f64) {
        self.keys().iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), key| {
            (lo.min(key.output), hi.max(key.output))
        })
    }
}
