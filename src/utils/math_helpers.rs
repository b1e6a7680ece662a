/// Three component vector used throughout the crate.
pub type Vec3 = (f64, f64, f64);

pub const ZERO_VECTOR: Vec3 = (0.0, 0.0, 0.0);

/// Lengths below this are treated as zero when normalizing.
pub const VECTOR_EPSILON: f64 = 1e-10;

/// Vector utility: component-wise sum
#[inline]
pub fn vector_add(a: Vec3, b: Vec3) -> Vec3 {
    (a.0 + b.0, a.1 + b.1, a.2 + b.2)
}

/// Vector utility: component-wise difference `a - b`
#[inline]
pub fn vector_sub(a: Vec3, b: Vec3) -> Vec3 {
    (a.0 - b.0, a.1 - b.1, a.2 - b.2)
}

/// Vector utility: multiplication by a scalar
#[inline]
pub fn scale_vector(v: Vec3, s: f64) -> Vec3 {
    (v.0 * s, v.1 * s, v.2 * s)
}

#[inline]
pub fn negate_vector(v: Vec3) -> Vec3 {
    (-v.0, -v.1, -v.2)
}

/// Vector utility: dot product
#[inline]
pub fn dot_product(a: Vec3, b: Vec3) -> f64 {
    a.0 * b.0 + a.1 * b.1 + a.2 * b.2
}

/// Vector utility: cross product
#[inline]
pub fn cross_product(a: Vec3, b: Vec3) -> Vec3 {
    (
        a.1 * b.2 - a.2 * b.1,
        a.2 * b.0 - a.0 * b.2,
        a.0 * b.1 - a.1 * b.0,
    )
}

/// Vector utility: magnitude calculation
#[inline]
pub fn vector_magnitude(v: Vec3) -> f64 {
    (v.0 * v.0 + v.1 * v.1 + v.2 * v.2).sqrt()
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f64 {
    vector_magnitude(vector_sub(a, b))
}

/// Vector utility: normalization
///
/// Returns `None` for vectors too short to carry a direction.
#[inline]
pub fn normalize_vector(v: Vec3) -> Option<Vec3> {
    let mag = vector_magnitude(v);
    if mag > VECTOR_EPSILON && mag.is_finite() {
        Some((v.0 / mag, v.1 / mag, v.2 / mag))
    } else {
        None
    }
}

/// Shortens `v` to `max_length` while preserving its direction.
#[inline]
pub fn clamp_magnitude(v: Vec3, max_length: f64) -> Vec3 {
    let mag = vector_magnitude(v);
    if mag > max_length && mag > VECTOR_EPSILON {
        scale_vector(v, max_length / mag)
    } else {
        v
    }
}

/// Linear interpolation `a + (b - a) * t`, with `t` clamped to [0, 1].
#[inline]
pub fn lerp_vector(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    (
        a.0 + (b.0 - a.0) * t,
        a.1 + (b.1 - a.1) * t,
        a.2 + (b.2 - a.2) * t,
    )
}

#[inline]
pub fn is_finite_vector(v: Vec3) -> bool {
    v.0.is_finite() && v.1.is_finite() && v.2.is_finite()
}

/// Mean of a set of points. An empty slice has its centroid at the origin.
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return ZERO_VECTOR;
    }
    let sum = points.iter().fold(ZERO_VECTOR, |acc, p| vector_add(acc, *p));
    scale_vector(sum, 1.0 / points.len() as f64)
}

/// Largest distance from any point to the set's centroid.
pub fn max_spread(points: &[Vec3]) -> f64 {
    let center = centroid(points);
    points
        .iter()
        .map(|p| distance(*p, center))
        .fold(0.0, f64::max)
}

/// True when every point lies on a single line (or on a single point),
/// measured against `epsilon`.
pub fn are_colinear(points: &[Vec3], epsilon: f64) -> bool {
    let center = centroid(points);
    let mut direction: Option<Vec3> = None;
    let mut longest = 0.0;
    for p in points {
        let offset = vector_sub(*p, center);
        let length = vector_magnitude(offset);
        if length > longest {
            longest = length;
            direction = normalize_vector(offset);
        }
    }
    let Some(axis) = direction else {
        return true;
    };
    points.iter().all(|p| {
        let offset = vector_sub(*p, center);
        vector_magnitude(cross_product(axis, offset)) <= epsilon
    })
}
