//! # CSG Chain
//!
//! Flattens a normalized term into an ordered list of primitives, each tagged
//! with its boolean role relative to the result accumulated so far. Renderers
//! walk the chain in order: union entries start a new product, intersection
//! entries clip it and difference entries carve it.
//!
//! The five per-entry attributes are stored in parallel, index-aligned
//! vectors.

use std::fmt;
use std::sync::Arc;

use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use glam::DMat4;
use stacker::maybe_grow;
use tracing::debug;

use crate::bounding_box::BoundingBox;
use crate::solid::SolidRef;
use crate::term::{Color, CsgOp, Term};

/// Borrowed view of one chain entry.
#[derive(Debug, Clone, Copy)]
pub struct ChainEntry<'a> {
    /// Shared geometry
    pub solid: &'a SolidRef,
    /// Local-to-world transform
    pub transform: &'a DMat4,
    /// Display color
    pub color: &'a Color,
    /// Boolean role of this primitive
    pub op: CsgOp,
    /// Diagnostic label
    pub label: &'a str,
}

/// Ordered, flattened primitives of a normalized CSG term.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    solids: Vec<SolidRef>,
    transforms: Vec<DMat4>,
    colors: Vec<Color>,
    ops: Vec<CsgOp>,
    labels: Vec<String>,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a normalized term, tagging the first primitive as a union.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use glam::DVec3;
    /// use openscad_csg::{normalize, BoundingBox, Chain, SolidRef, Term};
    ///
    /// let solid: SolidRef = Arc::new(BoundingBox::new(DVec3::ZERO, DVec3::ONE));
    /// let [a, b] = ["A", "B"].map(|label| Term::labeled(solid.clone(), label));
    ///
    /// let chain = Chain::from_term(&normalize(&Term::difference(a, b)).unwrap());
    /// assert_eq!(chain.dump(), "+A -B\n");
    /// ```
    pub fn from_term(term: &Term) -> Self {
        let mut chain = Self::new();
        chain.import(term, CsgOp::Union);
        debug!(entries = chain.len(), "imported csg chain");
        chain
    }

    /// Appends one entry.
    pub fn add(
        &mut self,
        solid: SolidRef,
        transform: DMat4,
        color: Color,
        op: CsgOp,
        label: impl Into<String>,
    ) {
        self.solids.push(solid);
        self.transforms.push(transform);
        self.colors.push(color);
        self.ops.push(op);
        self.labels.push(label.into());
    }

    /// Appends the primitives of `term` in left-to-right order.
    ///
    /// A primitive is tagged with `op`. For an operation node the left
    /// subtree inherits `op` and the right subtree is tagged with the node's
    /// own operation. `term` must already be normalized; other trees are
    /// flattened without complaint but do not describe the same solid.
    pub fn import(&mut self, term: &Term, op: CsgOp) {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match term {
            Term::Primitive(primitive) => self.add(
                Arc::clone(&primitive.solid),
                primitive.transform,
                primitive.color,
                op,
                primitive.label.as_str(),
            ),
            Term::Operation {
                op: own,
                left,
                right,
            } => {
                self.import(left, op);
                self.import(right, *own);
            }
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if the chain has no entries.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<ChainEntry<'_>> {
        Some(ChainEntry {
            solid: self.solids.get(index)?,
            transform: self.transforms.get(index)?,
            color: self.colors.get(index)?,
            op: *self.ops.get(index)?,
            label: self.labels.get(index)?,
        })
    }

    /// Iterates over entries in chain order.
    pub fn iter(&self) -> impl Iterator<Item = ChainEntry<'_>> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    /// Solid of each entry.
    pub fn solids(&self) -> &[SolidRef] {
        &self.solids
    }

    /// Transform of each entry.
    pub fn transforms(&self) -> &[DMat4] {
        &self.transforms
    }

    /// Color of each entry.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Boolean role of each entry.
    pub fn ops(&self) -> &[CsgOp] {
        &self.ops
    }

    /// Label of each entry.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Renders the chain one product per line.
    ///
    /// Union entries open a new line with `+`, difference and intersection
    /// entries continue it with ` -` and ` *`. The output always ends in a
    /// newline.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (index, (op, label)) in self.ops.iter().zip(&self.labels).enumerate() {
            match op {
                CsgOp::Union => {
                    if index != 0 {
                        out.push('\n');
                    }
                    out.push('+');
                }
                CsgOp::Difference => out.push_str(" -"),
                CsgOp::Intersection => out.push_str(" *"),
            }
            out.push_str(label);
        }
        out.push('\n');
        out
    }

    /// World-space bounds of the chain.
    ///
    /// Difference entries only remove material and are skipped, as are
    /// solids with empty local bounds. Each remaining entry contributes its
    /// transformed min and max corners.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for entry in self.iter().filter(|entry| entry.op != CsgOp::Difference) {
            let local = entry.solid.bounding_box();
            if local.is_empty() {
                continue;
            }
            bbox.extend(entry.transform.transform_point3(local.min));
            bbox.extend(entry.transform.transform_point3(local.max));
        }
        bbox
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

#[cfg(test)]
mod tests;
