//! # Tests for Config Constants
//!
//! Sanity checks on the exported constants.

use crate::constants::*;

// =============================================================================
// RECURSION TESTS
// =============================================================================

#[test]
fn test_red_zone_smaller_than_stack() {
    assert!(
        STACKER_RED_ZONE_BYTES < STACKER_STACK_SIZE_BYTES,
        "red zone must leave room in the grown segment"
    );
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_rewrite_limit_is_positive() {
    assert!(MAX_NORMALIZE_REWRITES > 0);
}

// =============================================================================
// COLOR TESTS
// =============================================================================

#[test]
fn test_default_color_components_in_range() {
    for component in DEFAULT_COLOR {
        assert!((0.0..=1.0).contains(&component));
    }
}

#[test]
fn test_default_color_is_opaque() {
    assert_eq!(DEFAULT_COLOR[3], 1.0);
}
