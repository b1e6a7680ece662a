// src/utils/constants_config.rs
use crate::drivers::{DriverKind, ResponseCurve};
use crate::errors::InteractionError;
use crate::grasp::SuspensionPolicy;
use crate::utils::{
    DEFAULT_CONTACT_CONFIG,
    DEFAULT_DRIVER_CONFIG,
    DEFAULT_GRASP_CONFIG,
    DEFAULT_INTERACTION_CONFIG,
    DEFAULT_THROW_CONFIG,
};

fn check_distance(value: f64, name: &'static str) -> Result<(), InteractionError> {
    if value.is_finite() && value > 0.0 { Ok(()) } else { Err(InteractionError::InvalidDistance(name)) }
}

fn check_duration(value: f64, name: &'static str) -> Result<(), InteractionError> {
    if value.is_finite() && value > 0.0 { Ok(()) } else { Err(InteractionError::InvalidDuration(name)) }
}

fn check_velocity(value: f64, name: &'static str) -> Result<(), InteractionError> {
    if value.is_finite() && value > 0.0 { Ok(()) } else { Err(InteractionError::InvalidVelocity(name)) }
}

fn check_factor(value: f64, name: &'static str) -> Result<(), InteractionError> {
    if (0.0..=1.0).contains(&value) { Ok(()) } else { Err(InteractionError::InvalidFactor(name)) }
}

/// Hover, contact, grasp-intent and suspension parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraspConfig {
    /// Surface distance from the hand's hover point under which an object is hovered.
    pub hover_distance: f64,
    /// Surface distance under which a hand contact point touches an object.
    pub contact_distance: f64,
    /// Hand/object pairs are created lazily once the hand comes this close.
    pub pair_creation_distance: f64,
    /// Grasp strength at which grasp intent switches on.
    pub grasp_begin_threshold: f64,
    /// Grasp strength below which grasp intent switches off again.
    pub grasp_release_threshold: f64,
    /// Samples below this confidence count as untracked.
    pub min_confidence: f64,
    /// Offset of the symmetric landmark points around the grasp frame origin.
    pub landmark_spread: f64,
    /// Adds fingertips to the landmark set of tracked hands.
    pub include_fingertips: bool,
    pub solver_iterations: usize,
    /// Longest time a grasp may stay suspended before it is released.
    pub max_suspension_duration: f64,
    pub suspension_policy: SuspensionPolicy,
    /// Untracked time after which a hand is declared lost.
    pub tracking_loss_timeout: f64,
}

impl Default for GraspConfig {
    fn default() -> Self {
        DEFAULT_GRASP_CONFIG
    }
}

impl GraspConfig {
    pub fn validate(&self) -> Result<(), InteractionError> {
        check_distance(self.hover_distance, "hover_distance")?;
        check_distance(self.contact_distance, "contact_distance")?;
        check_distance(self.pair_creation_distance, "pair_creation_distance")?;
        check_distance(self.landmark_spread, "landmark_spread")?;
        check_factor(self.grasp_begin_threshold, "grasp_begin_threshold")?;
        check_factor(self.grasp_release_threshold, "grasp_release_threshold")?;
        check_factor(self.min_confidence, "min_confidence")?;
        if self.grasp_release_threshold > self.grasp_begin_threshold {
            return Err(InteractionError::InvalidFactor("grasp_release_threshold above grasp_begin_threshold"));
        }
        if self.pair_creation_distance < self.hover_distance {
            return Err(InteractionError::InvalidDistance("pair_creation_distance below hover_distance"));
        }
        if self.solver_iterations == 0 {
            return Err(InteractionError::InvalidFactor("solver_iterations"));
        }
        check_duration(self.max_suspension_duration, "max_suspension_duration")?;
        check_duration(self.tracking_loss_timeout, "tracking_loss_timeout")?;
        Ok(())
    }
}

/// Parameters of the physics driver that moves grasped objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    pub kind: DriverKind,
    /// Linear speed cap in m/s.
    pub max_velocity: f64,
    /// Positional error beyond which the body is placed directly on the target.
    pub teleport_distance: f64,
    /// Place the body directly on its target in the step the grasp begins.
    pub teleport_on_grasp: bool,
    /// Positional errors below this produce no linear velocity.
    pub dead_zone: f64,
    /// Rotational errors (radians) below this produce no angular velocity.
    pub angular_dead_zone: f64,
    /// Blend factor by remaining distance last frame; must not increase with distance.
    pub follow_strength: ResponseCurve,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DEFAULT_DRIVER_CONFIG
    }
}

impl DriverConfig {
    pub fn new(
        max_velocity: Option<f64>,
        teleport_distance: Option<f64>,
        dead_zone: Option<f64>,
        follow_strength: Option<ResponseCurve>,
    ) -> Self {
        let default = DEFAULT_DRIVER_CONFIG;
        Self {
            max_velocity: max_velocity.unwrap_or(default.max_velocity),
            teleport_distance: teleport_distance.unwrap_or(default.teleport_distance),
            dead_zone: dead_zone.unwrap_or(default.dead_zone),
            follow_strength: follow_strength.unwrap_or(default.follow_strength),
            ..default
        }
    }

    pub fn validate(&self) -> Result<(), InteractionError> {
        check_velocity(self.max_velocity, "max_velocity")?;
        check_distance(self.teleport_distance, "teleport_distance")?;
        if !(self.dead_zone.is_finite() && self.dead_zone >= 0.0) {
            return Err(InteractionError::InvalidDistance("dead_zone"));
        }
        if !(self.angular_dead_zone.is_finite() && self.angular_dead_zone >= 0.0) {
            return Err(InteractionError::InvalidDistance("angular_dead_zone"));
        }
        if !self.follow_strength.is_non_increasing() {
            return Err(InteractionError::InvalidCurve("follow strength must not increase with distance".to_string()));
        }
        let (lo, hi) = self.follow_strength.output_range();
        if lo < 0.0 || hi > 1.0 {
            return Err(InteractionError::InvalidCurve("follow strength must stay within [0, 1]".to_string()));
        }
        Ok(())
    }
}

/// Parameters of the per-segment contact bone simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactConfig {
    /// Error beyond which a segment snaps to its target and skips collision for the step.
    pub teleport_distance: f64,
    /// Error beyond which a segment switches to soft contact.
    pub soft_contact_distance: f64,
    /// Target moves smaller than this keep the previous target.
    pub target_dead_zone: f64,
    pub angular_dead_zone: f64,
    pub max_velocity: f64,
    /// Velocity blend factor in hard contact.
    pub hard_strength: f64,
    /// Velocity blend factor in soft contact.
    pub soft_strength: f64,
    /// Segment width at which the blend factor is not reduced.
    pub reference_width: f64,
    /// Lower bound of the width scale for thin segments.
    pub min_width_scale: f64,
    /// Extra distance around a segment that still counts as touching an object.
    pub contact_margin: f64,
    pub disable_on_tracking_loss: bool,
}

impl Default for ContactConfig {
    fn default() -> Self {
        DEFAULT_CONTACT_CONFIG
    }
}

impl ContactConfig {
    pub fn validate(&self) -> Result<(), InteractionError> {
        check_distance(self.teleport_distance, "contact teleport_distance")?;
        check_distance(self.soft_contact_distance, "soft_contact_distance")?;
        if self.soft_contact_distance >= self.teleport_distance {
            return Err(InteractionError::InvalidDistance("soft_contact_distance must be below teleport_distance"));
        }
        if !(self.target_dead_zone.is_finite() && self.target_dead_zone >= 0.0) {
            return Err(InteractionError::InvalidDistance("target_dead_zone"));
        }
        if !(self.angular_dead_zone.is_finite() && self.angular_dead_zone >= 0.0) {
            return Err(InteractionError::InvalidDistance("contact angular_dead_zone"));
        }
        check_velocity(self.max_velocity, "contact max_velocity")?;
        check_factor(self.hard_strength, "hard_strength")?;
        check_factor(self.soft_strength, "soft_strength")?;
        check_distance(self.reference_width, "reference_width")?;
        check_factor(self.min_width_scale, "min_width_scale")?;
        if !(self.contact_margin.is_finite() && self.contact_margin >= 0.0) {
            return Err(InteractionError::InvalidDistance("contact_margin"));
        }
        Ok(())
    }
}

/// Parameters of the sliding-window throw handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowConfig {
    pub enabled: bool,
    /// Length of the pose history used to estimate release velocity, in seconds.
    pub window_length: f64,
    /// Capacity of the pose history.
    pub max_samples: usize,
    /// Multiplier applied to the release velocity by release speed.
    pub speed_multiplier: ResponseCurve,
}

impl Default for ThrowConfig {
    fn default() -> Self {
        DEFAULT_THROW_CONFIG
    }
}

impl ThrowConfig {
    pub fn validate(&self) -> Result<(), InteractionError> {
        check_duration(self.window_length, "window_length")?;
        if self.max_samples < 2 {
            return Err(InteractionError::InvalidFactor("max_samples"));
        }
        let (lo, _) = self.speed_multiplier.output_range();
        if lo < 0.0 {
            return Err(InteractionError::InvalidCurve("speed multiplier must not be negative".to_string()));
        }
        Ok(())
    }
}

/// Every tunable of the interaction core, passed to the scene at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    pub grasp: GraspConfig,
    pub driver: DriverConfig,
    pub contact: ContactConfig,
    pub throw: ThrowConfig,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        DEFAULT_INTERACTION_CONFIG
    }
}

impl InteractionConfig {
    pub fn new(
        grasp: Option<GraspConfig>,
        driver: Option<DriverConfig>,
        contact: Option<ContactConfig>,
        throw: Option<ThrowConfig>,
    ) -> Self {
        let default = DEFAULT_INTERACTION_CONFIG;
        Self {
            grasp: grasp.unwrap_or(default.grasp),
            driver: driver.unwrap_or(default.driver),
            contact: contact.unwrap_or(default.contact),
            throw: throw.unwrap_or(default.throw),
        }
    }

    /// Checks every section.
    ///
    /// # Errors
    /// Returns the first invalid parameter found.
    ///
    /// # Example
    /// ```
    /// use rs_interaction::utils::InteractionConfig;
    ///
    /// let mut config = InteractionConfig::default();
    /// assert!(config.validate().is_ok());
    /// config.driver.max_velocity = -1.0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), InteractionError> {
        self.grasp.validate()?;
        self.driver.validate()?;
        self.contact.validate()?;
        self.throw.validate()?;
        Ok(())
    }
}
