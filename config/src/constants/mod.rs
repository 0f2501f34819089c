//! Centralized configuration values shared across the Rust OpenSCAD CSG
//! pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// RECURSION CONSTANTS
// =============================================================================

/// Bytes of stack space allocated when growing recursion limits using the
/// `stacker` crate.
///
/// # Examples
/// ```
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker::maybe_grow` allocates a new segment.
///
/// # Examples
/// ```
/// use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
/// assert!(STACKER_RED_ZONE_BYTES < STACKER_STACK_SIZE_BYTES);
/// ```
pub const STACKER_RED_ZONE_BYTES: usize = STACKER_STACK_SIZE_BYTES / 8;

// =============================================================================
// NORMALIZATION LIMITS
// =============================================================================

/// Upper bound on rewrite-rule applications during a single normalization.
///
/// The distributive rules duplicate subtrees, so pathological inputs can grow
/// the normalized tree exponentially. Hitting this bound is reported as an
/// invariant violation rather than returning a partially rewritten tree.
///
/// # Examples
/// ```
/// use config::constants::MAX_NORMALIZE_REWRITES;
/// assert!(MAX_NORMALIZE_REWRITES >= 1_000);
/// ```
pub const MAX_NORMALIZE_REWRITES: usize = 1_000_000;

// =============================================================================
// COLOR CONSTANTS
// =============================================================================

/// Default color when none is specified (light gray).
///
/// RGBA values in range [0.0, 1.0].
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Settings consumed by the CSG term normalizer.
///
/// # Examples
/// ```
/// use config::constants::NormalizerConfig;
/// let config = NormalizerConfig::default();
/// assert!(config.max_rewrites > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Total rewrite budget for one `normalize` call.
    pub max_rewrites: usize,
}

impl NormalizerConfig {
    /// Builds a configuration, rejecting a zero rewrite budget.
    ///
    /// # Examples
    /// ```
    /// use config::constants::NormalizerConfig;
    /// let cfg = NormalizerConfig::new(64).expect("valid config");
    /// assert_eq!(cfg.max_rewrites, 64);
    /// ```
    pub fn new(max_rewrites: usize) -> Result<Self, ConfigError> {
        if max_rewrites == 0 {
            return Err(ConfigError::InvalidRewriteLimit(max_rewrites));
        }
        Ok(Self { max_rewrites })
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_rewrites: MAX_NORMALIZE_REWRITES,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Raised when the rewrite budget is zero.
    InvalidRewriteLimit(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRewriteLimit(value) => {
                write!(f, "max_rewrites must be > 0: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
