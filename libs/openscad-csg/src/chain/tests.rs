//! # Chain Tests
//!
//! Flattening, dump format and bounding box aggregation.

use super::*;
use approx::assert_relative_eq;
use config::constants::DEFAULT_COLOR;
use glam::DVec3;

fn unit_box() -> SolidRef {
    Arc::new(BoundingBox::new(DVec3::ZERO, DVec3::ONE))
}

fn box_solid(min: f64, max: f64) -> SolidRef {
    Arc::new(BoundingBox::new(DVec3::splat(min), DVec3::splat(max)))
}

fn leaf(label: &str) -> Arc<Term> {
    Term::labeled(unit_box(), label)
}

fn tags(chain: &Chain) -> Vec<(String, CsgOp)> {
    chain
        .iter()
        .map(|entry| (entry.label.to_string(), entry.op))
        .collect()
}

// =============================================================================
// ADD / ACCESSORS
// =============================================================================

#[test]
fn test_add_keeps_sequences_aligned() {
    let mut chain = Chain::new();
    assert!(chain.is_empty());

    let transform = DMat4::from_translation(DVec3::X);
    chain.add(unit_box(), DMat4::IDENTITY, DEFAULT_COLOR, CsgOp::Union, "A");
    chain.add(unit_box(), transform, [1.0, 0.0, 0.0, 1.0], CsgOp::Difference, "B");

    assert_eq!(chain.len(), 2);
    assert_eq!(chain.solids().len(), 2);
    assert_eq!(chain.transforms(), &[DMat4::IDENTITY, transform]);
    assert_eq!(chain.colors()[1], [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(chain.ops(), &[CsgOp::Union, CsgOp::Difference]);
    assert_eq!(chain.labels(), &["A".to_string(), "B".to_string()]);

    let entry = chain.get(1).unwrap();
    assert_eq!(entry.label, "B");
    assert_eq!(*entry.transform, transform);
    assert!(chain.get(2).is_none());
}

// =============================================================================
// IMPORT
// =============================================================================

#[test]
fn test_import_primitive_uses_inherited_op() {
    let mut chain = Chain::new();
    chain.import(&leaf("A"), CsgOp::Intersection);
    assert_eq!(tags(&chain), vec![("A".to_string(), CsgOp::Intersection)]);
}

#[test]
fn test_import_right_child_takes_node_op() {
    let term = Term::union(
        Term::difference(leaf("A"), leaf("B")),
        Term::intersection(leaf("C"), leaf("D")),
    );
    let chain = Chain::from_term(&term);

    assert_eq!(
        tags(&chain),
        vec![
            ("A".to_string(), CsgOp::Union),
            ("B".to_string(), CsgOp::Difference),
            ("C".to_string(), CsgOp::Union),
            ("D".to_string(), CsgOp::Intersection),
        ]
    );
}

#[test]
fn test_import_copies_primitive_payload() {
    let transform = DMat4::from_scale(DVec3::splat(2.0));
    let color = [0.1, 0.2, 0.3, 0.4];
    let solid = unit_box();
    let term = Term::primitive(solid.clone(), transform, color, "P");

    let chain = Chain::from_term(&term);
    let entry = chain.get(0).unwrap();
    assert!(Arc::ptr_eq(entry.solid, &solid));
    assert_eq!(*entry.transform, transform);
    assert_eq!(*entry.color, color);
}

// =============================================================================
// DUMP
// =============================================================================

#[test]
fn test_dump_empty_chain() {
    assert_eq!(Chain::new().dump(), "\n");
}

#[test]
fn test_dump_products_per_line() {
    let term = Term::union(
        Term::difference(Term::intersection(leaf("A"), leaf("B")), leaf("C")),
        leaf("D"),
    );
    let chain = Chain::from_term(&term);
    assert_eq!(chain.dump(), "+A *B -C\n+D\n");
    assert_eq!(chain.to_string(), chain.dump());
}

#[test]
fn test_dump_leading_difference_has_no_newline() {
    let mut chain = Chain::new();
    chain.add(unit_box(), DMat4::IDENTITY, DEFAULT_COLOR, CsgOp::Difference, "X");
    chain.add(unit_box(), DMat4::IDENTITY, DEFAULT_COLOR, CsgOp::Union, "Y");
    assert_eq!(chain.dump(), " -X\n+Y\n");
}

// =============================================================================
// BOUNDING BOX
// =============================================================================

#[test]
fn test_bounding_box_skips_difference() {
    let mut chain = Chain::new();
    chain.add(box_solid(0.0, 1.0), DMat4::IDENTITY, DEFAULT_COLOR, CsgOp::Union, "P1");
    chain.add(box_solid(5.0, 6.0), DMat4::IDENTITY, DEFAULT_COLOR, CsgOp::Difference, "P2");

    let bbox = chain.bounding_box();
    assert_eq!(bbox, BoundingBox::new(DVec3::ZERO, DVec3::ONE));
}

#[test]
fn test_bounding_box_includes_intersection() {
    let mut chain = Chain::new();
    chain.add(box_solid(0.0, 1.0), DMat4::IDENTITY, DEFAULT_COLOR, CsgOp::Union, "P1");
    chain.add(box_solid(5.0, 6.0), DMat4::IDENTITY, DEFAULT_COLOR, CsgOp::Intersection, "P2");

    let bbox = chain.bounding_box();
    assert_eq!(bbox, BoundingBox::new(DVec3::ZERO, DVec3::splat(6.0)));
}

#[test]
fn test_bounding_box_applies_transform() {
    let transform = DMat4::from_translation(DVec3::new(10.0, 0.0, -2.0))
        * DMat4::from_scale(DVec3::splat(2.0));
    let mut chain = Chain::new();
    chain.add(box_solid(0.0, 1.0), transform, DEFAULT_COLOR, CsgOp::Union, "P");

    let bbox = chain.bounding_box();
    assert_relative_eq!(bbox.min.x, 10.0);
    assert_relative_eq!(bbox.min.z, -2.0);
    assert_relative_eq!(bbox.max.x, 12.0);
    assert_relative_eq!(bbox.max.y, 2.0);
    assert_relative_eq!(bbox.max.z, 0.0);
}

#[test]
fn test_bounding_box_empty_geometry() {
    let mut chain = Chain::new();
    chain.add(
        Arc::new(BoundingBox::empty()),
        DMat4::IDENTITY,
        DEFAULT_COLOR,
        CsgOp::Union,
        "nothing",
    );
    assert!(chain.bounding_box().is_empty());
}

#[test]
fn test_bounding_box_empty_chain() {
    assert!(Chain::new().bounding_box().is_empty());
}

#[test]
fn test_bounding_box_only_differences() {
    let mut chain = Chain::new();
    chain.add(box_solid(0.0, 1.0), DMat4::IDENTITY, DEFAULT_COLOR, CsgOp::Difference, "hole");
    assert!(chain.bounding_box().is_empty());
}
