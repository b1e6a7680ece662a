use crate::drivers::{DriverKind, ResponseCurve};
use crate::grasp::SuspensionPolicy;
use crate::utils::{ContactConfig, DriverConfig, GraspConfig, InteractionConfig, ThrowConfig};

/// Default physics step, 90 Hz.
pub const DEFAULT_FIXED_DELTA_TIME: f64 = 1.0 / 90.0;

pub const DEFAULT_GRASP_CONFIG: GraspConfig = GraspConfig {
    hover_distance: 0.1,
    contact_distance: 0.01,
    pair_creation_distance: 0.3,
    grasp_begin_threshold: 0.8,
    grasp_release_threshold: 0.6,
    min_confidence: 0.3,
    landmark_spread: 0.05,
    include_fingertips: false,
    solver_iterations: 9,
    max_suspension_duration: 4.0,
    suspension_policy: SuspensionPolicy::HideObject,
    tracking_loss_timeout: 0.5,
};

pub const DEFAULT_DRIVER_CONFIG: DriverConfig = DriverConfig {
    kind: DriverKind::Velocity,
    max_velocity: 6.0,
    teleport_distance: 0.25,
    teleport_on_grasp: true,
    dead_zone: 0.0005,
    angular_dead_zone: 0.001,
    follow_strength: ResponseCurve::linear((0.0, 1.0), (0.02, 0.3)),
};

pub const DEFAULT_CONTACT_CONFIG: ContactConfig = ContactConfig {
    teleport_distance: 0.05,
    soft_contact_distance: 0.02,
    target_dead_zone: 0.0005,
    angular_dead_zone: 0.001,
    max_velocity: 10.0,
    hard_strength: 1.0,
    soft_strength: 0.35,
    reference_width: 0.02,
    min_width_scale: 0.25,
    contact_margin: 0.002,
    disable_on_tracking_loss: true,
};

pub const DEFAULT_THROW_CONFIG: ThrowConfig = ThrowConfig {
    enabled: true,
    window_length: 0.05,
    max_samples: 16,
    speed_multiplier: ResponseCurve::linear((0.0, 1.0), (3.0, 1.5)),
};

pub const DEFAULT_INTERACTION_CONFIG: InteractionConfig = InteractionConfig {
    grasp: DEFAULT_GRASP_CONFIG,
    driver: DEFAULT_DRIVER_CONFIG,
    contact: DEFAULT_CONTACT_CONFIG,
    throw: DEFAULT_THROW_CONFIG,
};
