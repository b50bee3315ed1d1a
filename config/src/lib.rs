//! # Config Crate
//!
//! Centralized configuration constants for the Waterman polyhedron pipeline.
//! Tolerance factors, size limits and the validated configuration snapshot
//! live here so the lattice and hull crates never carry bare literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{automatic_tolerance, DOUBLE_PRECISION};
//!
//! // Tolerance for a cloud spanning [-2, 2] on every axis
//! let tol = automatic_tolerance(2.0, 2.0, 2.0);
//! assert!(tol > DOUBLE_PRECISION);
//! assert!(tol < 1e-12);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Browser-Safe**: No platform-specific values
//! - **Scale-Relative**: Hull tolerances are derived from the input extent

pub mod constants;

pub use constants::{ConfigError, GlobalConfig};
