//! Tests for the normalizer configuration snapshot.

use super::*;

#[test]
fn default_config_uses_constants() {
    let cfg = NormalizerConfig::default();
    assert_eq!(cfg.max_rewrites, MAX_NORMALIZE_REWRITES);
}

#[test]
fn new_validates_inputs() {
    assert_eq!(
        NormalizerConfig::new(0).unwrap_err(),
        ConfigError::InvalidRewriteLimit(0)
    );
    assert_eq!(NormalizerConfig::new(7).unwrap().max_rewrites, 7);
}

#[test]
fn config_error_display() {
    let message = ConfigError::InvalidRewriteLimit(0).to_string();
    assert_eq!(message, "max_rewrites must be > 0: 0");
}
