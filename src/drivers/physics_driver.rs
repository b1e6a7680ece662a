use log::{debug, warn};

use crate::drivers::{VelocityCommand, VelocityLimits};
use crate::models::{PhysicsDrivable, Pose};
use crate::utils::{distance, DriverConfig};

/// How a grasped object's body is moved onto its target pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    /// Velocity commands, so the body keeps colliding while it follows.
    Velocity,
    /// Direct pose assignment every step.
    Kinematic,
}

/// Input of one drive step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveRequest {
    pub target: Pose,
    pub fixed_delta_time: f64,
    /// Distance between body and target at the end of the previous step.
    pub remaining_distance: f64,
    /// The grasp began this step.
    pub just_grasped: bool,
}

/// What a drive step did to the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveOutcome {
    /// The body was snapped onto the target and stopped.
    Teleported,
    /// The body was placed on the target by the kinematic strategy.
    Placed,
    /// The body's velocities were blended toward the target by `follow_strength`.
    Driven { follow_strength: f64 },
    /// The body is inside the dead zone and was stopped.
    AtRest,
    /// The request was unusable and the body was left untouched.
    Skipped,
}

/// Moves a rigid body toward a target pose without visible jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsDriver {
    config: DriverConfig,
}

impl PhysicsDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn set_kind(&mut self, kind: DriverKind) {
        self.config.kind = kind;
    }

    fn limits(&self) -> VelocityLimits {
        VelocityLimits {
            max_velocity: self.config.max_velocity,
            dead_zone: self.config.dead_zone,
            angular_dead_zone: self.config.angular_dead_zone,
        }
    }

    /// Runs one step of the configured strategy on `body`.
    ///
    /// # Example
    /// ```
    /// use rs_interaction::drivers::{DriveOutcome, DriveRequest, PhysicsDriver};
    /// use rs_interaction::models::{CollisionLayer, Pose, RigidBodyState};
    /// use rs_interaction::utils::DriverConfig;
    ///
    /// let driver = PhysicsDriver::new(DriverConfig::default());
    /// let mut body = RigidBodyState::new(Pose::identity(), 1.0, CollisionLayer::Interaction);
    /// let request = DriveRequest {
    ///     target: Pose::from_position((0.01, 0.0, 0.0)),
    ///     fixed_delta_time: 0.01,
    ///     remaining_distance: 0.0,
    ///     just_grasped: false,
    /// };
    /// let outcome = driver.drive(&mut body, &request);
    /// assert_eq!(outcome, DriveOutcome::Driven { follow_strength: 1.0 });
    /// assert!((body.velocity.0 - 1.0).abs() < 1e-9);
    /// ```
    pub fn drive<B: PhysicsDrivable + ?Sized>(&self, body: &mut B, request: &DriveRequest) -> DriveOutcome {
        let dt = request.fixed_delta_time;
        if !(dt.is_finite() && dt > 0.0) || !request.target.is_finite() {
            warn!("Drive request with invalid delta time or target, body left untouched");
            return DriveOutcome::Skipped;
        }

        match self.config.kind {
            DriverKind::Kinematic => {
                body.teleport(request.target);
                DriveOutcome::Placed
            }
            DriverKind::Velocity => self.drive_by_velocity(body, request),
        }
    }

    fn drive_by_velocity<B: PhysicsDrivable + ?Sized>(&self, body: &mut B, request: &DriveRequest) -> DriveOutcome {
        let current = body.pose();
        if !current.is_finite() {
            warn!("Driven body has a non-finite pose, resetting onto target");
            body.teleport(request.target);
            return DriveOutcome::Teleported;
        }

        let error = distance(current.position, request.target.position);
        if request.just_grasped && self.config.teleport_on_grasp {
            body.teleport(request.target);
            return DriveOutcome::Teleported;
        }
        if error > self.config.teleport_distance {
            debug!("Positional error {:.3} m over teleport distance, snapping body", error);
            body.teleport(request.target);
            return DriveOutcome::Teleported;
        }

        let command = VelocityCommand::toward(&current, &request.target, request.fixed_delta_time, &self.limits());
        if command.is_settled() {
            command.blend_into(body, 1.0);
            return DriveOutcome::AtRest;
        }

        let follow_strength = self.config.follow_strength.evaluate(request.remaining_distance);
        command.blend_into(body, follow_strength);
        DriveOutcome::Driven { follow_strength }
    }
}

impl Default for PhysicsDriver {
    fn default() -> Self {
        PhysicsDriver::new(DriverConfig::default())
    }
}
