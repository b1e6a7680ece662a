use crate::drivers::{DriverKind, PhysicsDriver};
use crate::grasp::{GraspPoseAggregator, GraspingHandSet, ThrowHandler};
use crate::models::{InteractionShape, PhysicsDrivable, Pose};
use crate::utils::{distance, InteractionConfig, Vec3};

/// Per-object behavior switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSettings {
    pub ignore_hover: bool,
    pub ignore_contact: bool,
    pub ignore_grasping: bool,
    /// When off, a new grasp takes the object away from the hand holding it.
    pub allow_multi_grasp: bool,
    pub movement: DriverKind,
    pub throw_enabled: bool,
}

impl Default for ObjectSettings {
    fn default() -> Self {
        Self {
            ignore_hover: false,
            ignore_contact: false,
            ignore_grasping: false,
            allow_multi_grasp: true,
            movement: DriverKind::Velocity,
            throw_enabled: true,
        }
    }
}

/// Scene-side record of one interaction object and the body it drives.
pub(crate) struct InteractionObject<B> {
    pub(crate) body: B,
    pub(crate) shape: InteractionShape,
    pub(crate) settings: ObjectSettings,
    pub(crate) grasping: GraspingHandSet,
    pub(crate) aggregator: GraspPoseAggregator,
    pub(crate) driver: PhysicsDriver,
    pub(crate) throw: ThrowHandler,
    pub(crate) solved_pose: Option<Pose>,
    /// Target handed to the driver on the previous step.
    pub(crate) last_target: Option<Pose>,
    pub(crate) just_grasped: bool,
    pub(crate) suspended: bool,
    pub(crate) visible: bool,
}

impl<B: PhysicsDrivable> InteractionObject<B> {
    pub(crate) fn new(body: B, shape: InteractionShape, settings: ObjectSettings, config: &InteractionConfig) -> Self {
        let mut object = Self {
            body,
            shape,
            settings,
            grasping: GraspingHandSet::new(),
            aggregator: GraspPoseAggregator::new(&config.grasp),
            driver: PhysicsDriver::new(config.driver),
            throw: ThrowHandler::Disabled,
            solved_pose: None,
            last_target: None,
            just_grasped: false,
            suspended: false,
            visible: true,
        };
        object.apply_settings(settings, config);
        object
    }

    pub(crate) fn apply_settings(&mut self, settings: ObjectSettings, config: &InteractionConfig) {
        self.settings = settings;
        self.driver.set_kind(settings.movement);
        self.throw = if settings.throw_enabled {
            ThrowHandler::from_config(&config.throw)
        } else {
            ThrowHandler::Disabled
        };
    }

    pub(crate) fn pose(&self) -> Pose {
        self.body.pose()
    }

    /// Distance left between the body, as the engine last moved it, and the
    /// previous target. Zero before the first driven step.
    pub(crate) fn remaining_distance(&self) -> f64 {
        self.last_target
            .map_or(0.0, |target| distance(self.body.position(), target.position))
    }

    /// Signed distance from `point` to the object's surface.
    pub(crate) fn surface_distance(&self, point: Vec3) -> f64 {
        self.shape.signed_distance(&self.body.pose(), point)
    }
}
