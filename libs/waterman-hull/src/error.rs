//! # Hull Errors
//!
//! Error types for hull construction and export.
//!
//! ## Error Policy
//!
//! - Degenerate geometry is reported, never half-built
//! - Hosts only see a validity flag; the variant carries the detail for logs

use config::ConfigError;
use thiserror::Error;

/// Errors that can occur while building or exporting a hull.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HullError {
    /// The radius was not strictly positive and finite, so no lattice exists.
    #[error("Invalid radius: {radius}")]
    InvalidInput { radius: f64 },

    /// Fewer than four points, or the points are coincident, collinear or
    /// coplanar within tolerance.
    #[error("Degenerate point cloud: {message}")]
    DegenerateCloud { message: String },

    /// The finished hull failed its own consistency check.
    #[error("Numerical inconsistency: {message}")]
    NumericalInconsistency { message: String },

    /// A flat face buffer ended inside a face record.
    #[error("Malformed face buffer at offset {offset}")]
    MalformedFaceBuffer { offset: usize },

    /// Rejected configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl HullError {
    /// Creates a degenerate cloud error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateCloud {
            message: message.into(),
        }
    }

    /// Creates a numerical inconsistency error.
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::NumericalInconsistency {
            message: message.into(),
        }
    }

    /// True for the causes a host reports as "no valid hull".
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::DegenerateCloud { .. } | Self::NumericalInconsistency { .. }
        )
    }
}

/// Result type alias for hull operations.
pub type HullResult<T> = Result<T, HullError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HullError::degenerate("all points are coplanar");
        assert!(err.to_string().contains("Degenerate"));
        assert!(err.to_string().contains("coplanar"));

        let err = HullError::InvalidInput { radius: -1.0 };
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_is_degenerate_groups_geometric_failures() {
        assert!(HullError::degenerate("x").is_degenerate());
        assert!(HullError::inconsistent("x").is_degenerate());
        assert!(HullError::InvalidInput { radius: 0.0 }.is_degenerate());
        assert!(!HullError::MalformedFaceBuffer { offset: 3 }.is_degenerate());
    }

    #[test]
    fn test_config_error_converts() {
        let err: HullError = ConfigError::InvalidTolerance(0.0).into();
        assert!(matches!(err, HullError::InvalidConfig(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HullError>();
    }
}
