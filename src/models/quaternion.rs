use approx::{AbsDiffEq, RelativeEq};
use std::f64::consts::PI;

use crate::utils::{cross_product, normalize_vector, Vec3};

/// Quaternion representation for 3D rotations to avoid gimbal lock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    /// Creates a new identity quaternion (no rotation)
    pub const fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Creates a quaternion from axis-angle representation
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let Some((nx, ny, nz)) = normalize_vector(axis) else {
            return Quaternion::identity();
        };
        if !angle.is_finite() {
            return Quaternion::identity();
        }

        let half_angle = angle / 2.0;
        let sin_half = half_angle.sin();

        Quaternion {
            w: half_angle.cos(),
            x: nx * sin_half,
            y: ny * sin_half,
            z: nz * sin_half,
        }
    }

    /// Creates a quaternion from a rotation vector (axis scaled by angle in radians)
    pub fn from_rotation_vector(v: Vec3) -> Self {
        let angle = crate::utils::vector_magnitude(v);
        Self::from_axis_angle(v, angle)
    }

    /// Returns the length/magnitude of the quaternion
    pub fn magnitude(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns a normalized version of the quaternion
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < 1e-10 || !mag.is_finite() {
            return Quaternion::identity();
        }
        Quaternion {
            w: self.w / mag,
            x: self.x / mag,
            y: self.y / mag,
            z: self.z / mag,
        }
    }

    /// The same rotation with a non-negative scalar part
    pub fn canonical(&self) -> Self {
        if self.w < 0.0 { self.negated() } else { *self }
    }

    pub fn negated(&self) -> Self {
        Quaternion { w: -self.w, x: -self.x, y: -self.y, z: -self.z }
    }

    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn is_finite(&self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Multiplies two quaternions (composition of rotations)
    pub fn multiply(&self, other: &Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }

    /// Returns the conjugate of the quaternion
    pub fn conjugate(&self) -> Quaternion {
        Quaternion {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Returns the inverse of the quaternion
    pub fn inverse(&self) -> Quaternion {
        let mag_squared = self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z;
        if mag_squared < 1e-10 {
            return Quaternion::identity();
        }

        let conj = self.conjugate();
        Quaternion {
            w: conj.w / mag_squared,
            x: conj.x / mag_squared,
            y: conj.y / mag_squared,
            z: conj.z / mag_squared,
        }
    }

    /// Rotates a point using the quaternion
    pub fn rotate_point(&self, point: Vec3) -> Vec3 {
        // v' = v + 2w (q x v) + 2 q x (q x v) for a unit quaternion q
        let q = self.normalized();
        let axis = (q.x, q.y, q.z);
        let t = cross_product(axis, point);
        let t = (2.0 * t.0, 2.0 * t.1, 2.0 * t.2);
        let u = cross_product(axis, t);
        (
            point.0 + q.w * t.0 + u.0,
            point.1 + q.w * t.1 + u.1,
            point.2 + q.w * t.2 + u.2,
        )
    }

    /// The rotated unit axes (x, y, z), i.e. the columns of the rotation matrix
    pub fn basis(&self) -> [Vec3; 3] {
        [
            self.rotate_point((1.0, 0.0, 0.0)),
            self.rotate_point((0.0, 1.0, 0.0)),
            self.rotate_point((0.0, 0.0, 1.0)),
        ]
    }

    /// Rotation taking `self` to `target` in world space: `target * self^-1`
    pub fn delta_to(&self, target: &Quaternion) -> Quaternion {
        target.multiply(&self.inverse()).normalized()
    }

    /// Splits the rotation into a unit axis and an angle in [0, PI].
    ///
    /// Returns `None` when the rotation is too small to carry an axis, or when
    /// the components are not finite.
    pub fn to_axis_angle(&self) -> Option<(Vec3, f64)> {
        if !self.is_finite() {
            return None;
        }
        let q = self.normalized().canonical();
        let sin_half = (q.x * q.x + q.y * q.y + q.z * q.z).sqrt();
        if sin_half < 1e-12 {
            return None;
        }
        let angle = 2.0 * sin_half.atan2(q.w);
        let axis = (q.x / sin_half, q.y / sin_half, q.z / sin_half);
        if angle.is_finite() && angle <= PI + 1e-12 {
            Some((axis, angle))
        } else {
            None
        }
    }

    /// Smallest angle in radians between the two orientations
    pub fn angle_to(&self, other: &Quaternion) -> f64 {
        let d = self.normalized().dot(&other.normalized()).abs().min(1.0);
        2.0 * d.acos()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::identity()
    }
}

/// `q` and `-q` describe the same rotation, so comparisons fold the sign first.
impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        let other = if self.dot(other) < 0.0 { other.negated() } else { *other };
        self.w.abs_diff_eq(&other.w, epsilon)
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        let other = if self.dot(other) < 0.0 { other.negated() } else { *other };
        self.w.relative_eq(&other.w, epsilon, max_relative)
            && self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}
