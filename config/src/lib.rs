//! # Config Crate
//!
//! Centralized configuration constants for the Rust OpenSCAD CSG pipeline.
//! All magic numbers and tunable parameters are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{NormalizerConfig, MAX_NORMALIZE_REWRITES};
//!
//! let cfg = NormalizerConfig::default();
//! assert_eq!(cfg.max_rewrites, MAX_NORMALIZE_REWRITES);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Dependency-Free**: Plain constants and a validated settings struct

pub mod constants;

#[cfg(test)]
mod tests;
