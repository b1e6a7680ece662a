use approx::{AbsDiffEq, RelativeEq};

use crate::models::Quaternion;
use crate::utils::{distance, is_finite_vector, negate_vector, vector_add, vector_sub, Vec3, ZERO_VECTOR};

/// Position and orientation of a rigid frame in world space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quaternion,
}

impl Pose {
    pub const fn new(position: Vec3, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }

    pub const fn identity() -> Self {
        Self { position: ZERO_VECTOR, rotation: Quaternion::identity() }
    }

    pub const fn from_position(position: Vec3) -> Self {
        Self { position, rotation: Quaternion::identity() }
    }

    /// Maps a point from this frame's local space to world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        vector_add(self.position, self.rotation.rotate_point(local))
    }

    /// Maps a world space point into this frame's local space.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse().rotate_point(vector_sub(world, self.position))
    }

    /// Composition `self * local`: the pose `local`, expressed in this frame, in world space.
    ///
    /// # Example
    /// ```
    /// use rs_interaction::models::{Pose, Quaternion};
    ///
    /// let hand = Pose::from_position((1.0, 0.0, 0.0));
    /// let held = Pose::from_position((0.0, 0.5, 0.0));
    /// let object = hand.then(&held);
    /// assert_eq!(object.position, (1.0, 0.5, 0.0));
    /// ```
    pub fn then(&self, local: &Pose) -> Pose {
        Pose {
            position: self.transform_point(local.position),
            rotation: self.rotation.multiply(&local.rotation).normalized(),
        }
    }

    pub fn inverse(&self) -> Pose {
        let inverse_rotation = self.rotation.inverse();
        Pose {
            position: inverse_rotation.rotate_point(negate_vector(self.position)),
            rotation: inverse_rotation.normalized(),
        }
    }

    /// This pose expressed in the local space of `parent`, so that
    /// `parent.then(&self.relative_to(parent)) == self`.
    pub fn relative_to(&self, parent: &Pose) -> Pose {
        parent.inverse().then(self)
    }

    pub fn distance_to(&self, other: &Pose) -> f64 {
        distance(self.position, other.position)
    }

    pub fn is_finite(&self) -> bool {
        is_finite_vector(self.position) && self.rotation.is_finite()
    }
}

impl AbsDiffEq for Pose {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.position.0.abs_diff_eq(&other.position.0, epsilon)
            && self.position.1.abs_diff_eq(&other.position.1, epsilon)
            && self.position.2.abs_diff_eq(&other.position.2, epsilon)
            && self.rotation.abs_diff_eq(&other.rotation, epsilon)
    }
}

impl RelativeEq for Pose {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.position.0.relative_eq(&other.position.0, epsilon, max_relative)
            && self.position.1.relative_eq(&other.position.1, epsilon, max_relative)
            && self.position.2.relative_eq(&other.position.2, epsilon, max_relative)
            && self.rotation.relative_eq(&other.rotation, epsilon, max_relative)
    }
}
