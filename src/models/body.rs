use crate::models::{Pose, Quaternion};
use crate::utils::{scale_vector, vector_add, Vec3, ZERO_VECTOR};

/// Collision layer a body is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionLayer {
    /// Regular interaction objects
    Interaction,
    /// Hand segments fully driven toward tracking, colliding at full authority
    HardContact,
    /// Hand segments with reduced collision authority
    SoftContact,
    /// Collides with nothing
    NoCollision,
}

/// The rigid body surface the drivers need from a physics engine.
///
/// Implemented by [`RigidBodyState`] for standalone use; an external engine
/// implements it over its own body handles.
pub trait PhysicsDrivable {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quaternion;
    fn velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn set_rotation(&mut self, rotation: Quaternion);
    fn set_velocity(&mut self, velocity: Vec3);
    fn set_angular_velocity(&mut self, angular_velocity: Vec3);
    fn collision_layer(&self) -> CollisionLayer;
    fn set_collision_layer(&mut self, layer: CollisionLayer);
    fn is_kinematic(&self) -> bool;
    fn set_kinematic(&mut self, kinematic: bool);

    fn pose(&self) -> Pose {
        Pose::new(self.position(), self.rotation())
    }

    /// Places the body on `pose` and clears both velocities.
    fn teleport(&mut self, pose: Pose) {
        self.set_position(pose.position);
        self.set_rotation(pose.rotation);
        self.set_velocity(ZERO_VECTOR);
        self.set_angular_velocity(ZERO_VECTOR);
    }
}

/// Minimal rigid body used when no external engine owns the bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyState {
    pub position: Vec3,
    pub rotation: Quaternion,
    /// Linear velocity in m/s
    pub velocity: Vec3,
    /// Angular velocity in radians per second (around x, y, z axes)
    pub angular_velocity: Vec3,
    pub mass: f64,
    pub layer: CollisionLayer,
    pub kinematic: bool,
}

impl RigidBodyState {
    pub fn new(pose: Pose, mass: f64, layer: CollisionLayer) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            velocity: ZERO_VECTOR,
            angular_velocity: ZERO_VECTOR,
            mass,
            layer,
            kinematic: false,
        }
    }

    /// Updates the body's position and orientation based on velocities
    pub fn integrate(&mut self, dt: f64) {
        if self.kinematic || dt <= 0.0 {
            return;
        }
        self.position = vector_add(self.position, scale_vector(self.velocity, dt));
        let step = Quaternion::from_rotation_vector(scale_vector(self.angular_velocity, dt));
        self.rotation = step.multiply(&self.rotation).normalized();
    }
}

impl PhysicsDrivable for RigidBodyState {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quaternion {
        self.rotation
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation.normalized();
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
    }

    fn collision_layer(&self) -> CollisionLayer {
        self.layer
    }

    fn set_collision_layer(&mut self, layer: CollisionLayer) {
        self.layer = layer;
    }

    fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
    }
}
