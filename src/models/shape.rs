use crate::errors::InteractionError;
use crate::models::Pose;
use crate::utils::{distance, vector_magnitude, Vec3};

/// Collision volume of an interaction object, used for hover and contact checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionShape {
    /// A sphere with the given radius
    Sphere { radius: f64 },
    /// A box with the given half extents along its local axes
    Cuboid { half_extents: Vec3 },
    /// A capsule along the local y axis
    Capsule { radius: f64, half_height: f64 },
}

impl InteractionShape {
    pub fn new_sphere(radius: f64) -> Result<Self, InteractionError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(InteractionError::InvalidDimension);
        }
        Ok(InteractionShape::Sphere { radius })
    }

    /// Creates a box from its full width, height and depth.
    pub fn new_cuboid(width: f64, height: f64, depth: f64) -> Result<Self, InteractionError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height) && valid(depth)) {
            return Err(InteractionError::InvalidDimension);
        }
        Ok(InteractionShape::Cuboid { half_extents: (width / 2.0, height / 2.0, depth / 2.0) })
    }

    pub fn new_capsule(radius: f64, height: f64) -> Result<Self, InteractionError> {
        if !(radius.is_finite() && radius > 0.0 && height.is_finite() && height >= 0.0) {
            return Err(InteractionError::InvalidDimension);
        }
        Ok(InteractionShape::Capsule { radius, half_height: height / 2.0 })
    }

    /// Signed distance from `point` to the surface of the shape placed at `pose`.
    /// Negative inside the shape.
    pub fn signed_distance(&self, pose: &Pose, point: Vec3) -> f64 {
        match *self {
            InteractionShape::Sphere { radius } => distance(pose.position, point) - radius,
            InteractionShape::Cuboid { half_extents } => {
                let local = pose.inverse_transform_point(point);
                let q = (
                    local.0.abs() - half_extents.0,
                    local.1.abs() - half_extents.1,
                    local.2.abs() - half_extents.2,
                );
                let outside = vector_magnitude((q.0.max(0.0), q.1.max(0.0), q.2.max(0.0)));
                let inside = q.0.max(q.1).max(q.2).min(0.0);
                outside + inside
            }
            InteractionShape::Capsule { radius, half_height } => {
                let local = pose.inverse_transform_point(point);
                let y = local.1.clamp(-half_height, half_height);
                distance(local, (0.0, y, 0.0)) - radius
            }
        }
    }

    /// Radius of a sphere around the shape's origin that encloses it.
    pub fn bounding_radius(&self) -> f64 {
        match *self {
            InteractionShape::Sphere { radius } => radius,
            InteractionShape::Cuboid { half_extents } => vector_magnitude(half_extents),
            InteractionShape::Capsule { radius, half_height } => radius + half_height,
        }
    }
}
