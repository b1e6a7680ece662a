use log::{debug, trace};

use crate::drivers::{VelocityCommand, VelocityLimits};
use crate::models::{BoneKind, CollisionLayer, Finger, PhysicsDrivable, Pose, RigidBodyState};
use crate::utils::{distance, ContactConfig, ZERO_VECTOR};

/// Mass given to every simulated hand segment.
const SEGMENT_MASS: f64 = 0.1;

/// How a hand segment currently takes part in the physics scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactMode {
    /// Driven fully toward tracking; collides at full authority.
    Hard,
    /// Force-corrected with reduced authority.
    Soft,
    /// Snapped onto its target this step; collides with nothing.
    Reset,
    /// Tracking is lost; collides with nothing and stands still.
    Disabled,
}

impl ContactMode {
    pub fn layer(self) -> CollisionLayer {
        match self {
            ContactMode::Hard => CollisionLayer::HardContact,
            ContactMode::Soft => CollisionLayer::SoftContact,
            ContactMode::Reset | ContactMode::Disabled => CollisionLayer::NoCollision,
        }
    }
}

/// Which part of the hand a segment follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Palm,
    Bone { finger: Finger, bone: BoneKind },
}

/// What a segment is told about its hand in one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInput {
    /// Freshly tracked pose, or `None` when the sample is missing.
    pub tracked: Option<Pose>,
    pub grasping: bool,
    pub in_contact: bool,
}

/// One simulated hand segment: a rigid body chasing its tracked pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactBone {
    kind: SegmentKind,
    body: RigidBodyState,
    target: Pose,
    mode: ContactMode,
    width: f64,
    length: f64,
}

impl ContactBone {
    pub fn new(kind: SegmentKind, target: Pose, width: f64, length: f64) -> Self {
        let body = RigidBodyState::new(target, SEGMENT_MASS, ContactMode::Hard.layer());
        Self { kind, body, target, mode: ContactMode::Hard, width, length }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn mode(&self) -> ContactMode {
        self.mode
    }

    pub fn body(&self) -> &RigidBodyState {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut RigidBodyState {
        &mut self.body
    }

    /// Last accepted target, after dead-zone filtering.
    pub fn target(&self) -> Pose {
        self.target
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Blend factor reduction for segments thinner than the reference width.
    fn width_scale(&self, config: &ContactConfig) -> f64 {
        (self.width / config.reference_width).clamp(config.min_width_scale, 1.0)
    }

    /// Runs one physics step and returns the mode the segment ends up in.
    pub fn step(&mut self, input: &SegmentInput, dt: f64, config: &ContactConfig) -> ContactMode {
        let Some(tracked) = input.tracked else {
            if config.disable_on_tracking_loss {
                self.body.set_velocity(ZERO_VECTOR);
                self.body.set_angular_velocity(ZERO_VECTOR);
                self.set_mode(ContactMode::Disabled);
                return self.mode;
            }
            return self.drive(input, dt, config);
        };

        let moved = distance(tracked.position, self.target.position) > config.target_dead_zone
            || tracked.rotation.angle_to(&self.target.rotation) > config.angular_dead_zone;
        if moved {
            self.target = tracked;
        }
        self.drive(input, dt, config)
    }

    fn drive(&mut self, input: &SegmentInput, dt: f64, config: &ContactConfig) -> ContactMode {
        let current = self.body.pose();
        let error = if current.is_finite() { distance(current.position, self.target.position) } else { f64::INFINITY };

        if error > config.teleport_distance {
            debug!("{:?} is {:.3} m from tracking, resetting", self.kind, error);
            self.body.teleport(self.target);
            self.set_mode(ContactMode::Reset);
            return self.mode;
        }

        let mode = if input.grasping || input.in_contact || error > config.soft_contact_distance {
            ContactMode::Soft
        } else {
            ContactMode::Hard
        };
        self.set_mode(mode);

        let strength = match mode {
            ContactMode::Soft => config.soft_strength,
            _ => config.hard_strength,
        } * self.width_scale(config);
        let limits = VelocityLimits {
            max_velocity: config.max_velocity,
            dead_zone: config.target_dead_zone,
            angular_dead_zone: config.angular_dead_zone,
        };
        if dt > 0.0 {
            VelocityCommand::toward(&current, &self.target, dt, &limits).blend_into(&mut self.body, strength);
        }
        self.mode
    }

    fn set_mode(&mut self, mode: ContactMode) {
        if mode != self.mode {
            trace!("{:?} contact mode {:?} -> {:?}", self.kind, self.mode, mode);
        }
        self.mode = mode;
        self.body.set_collision_layer(mode.layer());
    }
}
