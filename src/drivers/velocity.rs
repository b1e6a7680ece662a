use log::trace;
use std::f64::consts::PI;

use crate::models::{PhysicsDrivable, Pose};
use crate::utils::{
    clamp_magnitude,
    is_finite_vector,
    lerp_vector,
    scale_vector,
    vector_magnitude,
    vector_sub,
    Vec3,
    ZERO_VECTOR,
};

/// Rotations this close to a half turn have no reliable axis.
const HALF_TURN_GUARD: f64 = 1e-6;

/// Caps and dead zones shared by the object driver and the contact bones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityLimits {
    pub max_velocity: f64,
    pub dead_zone: f64,
    pub angular_dead_zone: f64,
}

/// Velocities that carry a body from its current pose onto a target in one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityCommand {
    pub linear: Vec3,
    pub angular: Vec3,
    pub linear_settled: bool,
    pub angular_settled: bool,
}

impl VelocityCommand {
    /// Computes `delta / dt` for position and rotation.
    ///
    /// Deltas inside the dead zones produce zero velocity, linear speed is
    /// clamped to `limits.max_velocity`, and rotations with no usable axis
    /// (half turns, non-finite input) produce zero angular velocity.
    pub fn toward(current: &Pose, target: &Pose, dt: f64, limits: &VelocityLimits) -> Self {
        let offset = vector_sub(target.position, current.position);
        let offset_length = vector_magnitude(offset);
        let linear_settled = !(offset_length > limits.dead_zone);
        let linear = if linear_settled || !is_finite_vector(offset) {
            ZERO_VECTOR
        } else {
            clamp_magnitude(scale_vector(offset, 1.0 / dt), limits.max_velocity)
        };

        let delta = current.rotation.delta_to(&target.rotation);
        let (angular, angular_settled) = match delta.to_axis_angle() {
            None => (ZERO_VECTOR, true),
            Some((_, angle)) if angle <= limits.angular_dead_zone => (ZERO_VECTOR, true),
            Some((_, angle)) if PI - angle < HALF_TURN_GUARD => {
                trace!("Half turn rotation delta, angular velocity dropped");
                (ZERO_VECTOR, false)
            }
            Some((axis, angle)) => {
                let angular = scale_vector(axis, angle / dt);
                if is_finite_vector(angular) { (angular, false) } else { (ZERO_VECTOR, false) }
            }
        };

        Self { linear, angular, linear_settled, angular_settled }
    }

    /// Both deltas are inside their dead zones.
    pub fn is_settled(&self) -> bool {
        self.linear_settled && self.angular_settled
    }

    /// Blends the body's velocities toward this command by `strength` in [0, 1].
    ///
    /// A settled command stops the body outright. The blended angular velocity
    /// never exceeds the magnitude of the commanded one.
    pub fn blend_into<B: PhysicsDrivable + ?Sized>(&self, body: &mut B, strength: f64) {
        if self.is_settled() {
            body.set_velocity(ZERO_VECTOR);
            body.set_angular_velocity(ZERO_VECTOR);
            return;
        }
        let linear = lerp_vector(body.velocity(), self.linear, strength);
        let angular = lerp_vector(body.angular_velocity(), self.angular, strength);
        let angular = clamp_magnitude(angular, vector_magnitude(self.angular));
        body.set_velocity(if is_finite_vector(linear) { linear } else { ZERO_VECTOR });
        body.set_angular_velocity(if is_finite_vector(angular) { angular } else { ZERO_VECTOR });
    }
}
