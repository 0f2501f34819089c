//! # CSG Errors
//!
//! Error types for term normalization.

use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur while normalizing a CSG term.
#[derive(Debug, Error)]
pub enum CsgError {
    /// Normalization did not reach a fixed point within the rewrite budget
    #[error("normalization exceeded {limit} rewrites ({nodes} nodes in current term)")]
    RewriteLimitExceeded {
        limit: usize,
        /// Size of the subterm being rewritten when the budget ran out
        nodes: usize,
    },

    /// Rejected normalizer configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl CsgError {
    /// Creates a rewrite limit error.
    pub fn rewrite_limit(limit: usize, nodes: usize) -> Self {
        Self::RewriteLimitExceeded { limit, nodes }
    }
}
