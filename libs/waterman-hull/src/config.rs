//! Hull-level configuration building on the shared `config` crate.

use crate::error::HullResult;
use config::constants::GlobalConfig;

/// Hull builder configuration.
///
/// # Examples
/// ```
/// use waterman_hull::config::HullConfig;
/// let cfg = HullConfig::default();
/// assert!(cfg.distance_tolerance.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HullConfig {
    /// Explicit distance tolerance; `None` derives it from the input extent.
    pub distance_tolerance: Option<f64>,
    /// Whether hosts rescale exported coordinates into a unit range.
    pub normalize_output: bool,
}

impl HullConfig {
    /// Creates a configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use waterman_hull::config::HullConfig;
    /// let cfg = HullConfig::new(Some(1.0e-8), true).unwrap();
    /// assert_eq!(cfg.distance_tolerance, Some(1.0e-8));
    /// assert!(HullConfig::new(Some(0.0), false).is_err());
    /// ```
    pub fn new(distance_tolerance: Option<f64>, normalize_output: bool) -> HullResult<Self> {
        let global = GlobalConfig::new(distance_tolerance, normalize_output)?;
        Ok(Self::from(global))
    }

    /// Returns a copy with an explicit distance tolerance.
    pub fn with_tolerance(self, tolerance: f64) -> HullResult<Self> {
        Self::new(Some(tolerance), self.normalize_output)
    }
}

impl From<GlobalConfig> for HullConfig {
    fn from(cfg: GlobalConfig) -> Self {
        Self {
            distance_tolerance: cfg.distance_tolerance,
            normalize_output: cfg.normalize_output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HullError;
    use config::ConfigError;

    #[test]
    fn default_matches_global() {
        assert_eq!(HullConfig::default(), HullConfig::from(GlobalConfig::default()));
    }

    #[test]
    fn builder_validates_input() {
        let err = HullConfig::new(Some(-1.0), false).unwrap_err();
        assert_eq!(err, HullError::InvalidConfig(ConfigError::InvalidTolerance(-1.0)));
    }

    #[test]
    fn with_tolerance_keeps_normalize_flag() {
        let cfg = HullConfig::new(None, true).unwrap().with_tolerance(1e-6).unwrap();
        assert_eq!(cfg.distance_tolerance, Some(1e-6));
        assert!(cfg.normalize_output);
    }
}
