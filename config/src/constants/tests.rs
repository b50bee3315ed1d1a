//! Tests for the validated configuration snapshot.

use super::*;

/// Ensures the default snapshot asks for an automatic tolerance.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let cfg = GlobalConfig::default();
/// assert!(cfg.distance_tolerance.is_none());
/// ```
#[test]
fn default_uses_automatic_tolerance() {
    let cfg = GlobalConfig::default();
    assert_eq!(cfg.distance_tolerance, None);
    assert!(!cfg.normalize_output);
}

/// Validates the builder rejects invalid tolerances.
#[test]
fn new_validates_inputs() {
    assert_eq!(
        GlobalConfig::new(Some(0.0), false).unwrap_err(),
        ConfigError::InvalidTolerance(0.0)
    );
    assert_eq!(
        GlobalConfig::new(Some(-1.0e-9), true).unwrap_err(),
        ConfigError::InvalidTolerance(-1.0e-9)
    );
    assert!(GlobalConfig::new(Some(f64::INFINITY), false).is_err());
    assert!(GlobalConfig::new(Some(f64::NAN), false).is_err());
}

#[test]
fn new_accepts_valid_inputs() {
    let cfg = GlobalConfig::new(Some(1.0e-6), true).unwrap();
    assert_eq!(cfg.distance_tolerance, Some(1.0e-6));
    assert!(cfg.normalize_output);

    let auto = GlobalConfig::new(None, false).unwrap();
    assert_eq!(auto, GlobalConfig::default());
}

#[test]
fn error_message_names_value() {
    let message = ConfigError::InvalidTolerance(-2.0).to_string();
    assert!(message.contains("-2"));
    assert!(message.contains("tolerance"));
}
