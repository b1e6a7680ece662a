use crate::drivers::ResponseCurve;
use crate::errors::InteractionError;
use crate::utils::{DriverConfig, InteractionConfig, DEFAULT_DRIVER_CONFIG, DEFAULT_INTERACTION_CONFIG};

#[test]
fn test_default_config_is_valid() {
    assert!(DEFAULT_INTERACTION_CONFIG.validate().is_ok());
    assert_eq!(InteractionConfig::default(), DEFAULT_INTERACTION_CONFIG);
}

#[test]
fn test_driver_config_new_falls_back_to_defaults() {
    let config = DriverConfig::new(Some(3.0), None, None, None);
    assert_eq!(config.max_velocity, 3.0);
    assert_eq!(config.teleport_distance, DEFAULT_DRIVER_CONFIG.teleport_distance);
    assert_eq!(config.follow_strength, DEFAULT_DRIVER_CONFIG.follow_strength);
}

#[test]
fn test_rising_follow_strength_is_rejected() {
    let rising = ResponseCurve::linear((0.0, 0.2), (0.05, 0.9));
    let config = DriverConfig::new(None, None, None, Some(rising));
    assert!(matches!(config.validate(), Err(InteractionError::InvalidCurve(_))));
}

#[test]
fn test_invalid_sections_are_reported() {
    let mut config = InteractionConfig::default();
    config.grasp.grasp_release_threshold = 0.95;
    assert!(matches!(config.validate(), Err(InteractionError::InvalidFactor(_))));

    let mut config = InteractionConfig::default();
    config.contact.soft_contact_distance = 0.2;
    assert!(matches!(config.validate(), Err(InteractionError::InvalidDistance(_))));

    let mut config = InteractionConfig::default();
    config.throw.window_length = 0.0;
    assert!(matches!(config.validate(), Err(InteractionError::InvalidDuration(_))));
}
