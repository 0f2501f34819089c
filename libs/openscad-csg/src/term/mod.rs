//! # CSG Terms
//!
//! Immutable binary trees of boolean operations over primitive solids.
//!
//! Nodes are shared through [`Arc`] and never mutated after construction, so a
//! subtree may appear in several places of the same tree. Rewriting produces
//! new nodes and reuses untouched subtrees by reference.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use glam::DVec3;
//! use openscad_csg::{BoundingBox, SolidRef, Term};
//!
//! let solid: SolidRef = Arc::new(BoundingBox::new(DVec3::ZERO, DVec3::ONE));
//! let a = Term::labeled(solid.clone(), "A");
//! let b = Term::labeled(solid, "B");
//! assert_eq!(Term::difference(a, b).dump(), "(A - B)");
//! ```

use std::fmt;
use std::mem;
use std::sync::{Arc, OnceLock};

use config::constants::{DEFAULT_COLOR, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use glam::DMat4;
use stacker::maybe_grow;

use crate::bounding_box::BoundingBox;
use crate::solid::SolidRef;

/// RGBA color with components in `[0.0, 1.0]`.
pub type Color = [f32; 4];

/// CSG operation types.
///
/// # Variants
///
/// - `Union`: A ∪ B - combines both volumes
/// - `Difference`: A - B - subtracts B from A
/// - `Intersection`: A ∩ B - keeps only common volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsgOp {
    /// Union operation: A ∪ B
    Union,
    /// Difference operation: A - B
    Difference,
    /// Intersection operation: A ∩ B
    Intersection,
}

impl CsgOp {
    /// Returns the operation name for debugging.
    pub fn name(&self) -> &'static str {
        match self {
            CsgOp::Union => "union",
            CsgOp::Difference => "difference",
            CsgOp::Intersection => "intersection",
        }
    }

    /// Infix symbol used by term and chain dumps.
    pub fn symbol(&self) -> char {
        match self {
            CsgOp::Union => '+',
            CsgOp::Difference => '-',
            CsgOp::Intersection => '*',
        }
    }
}

/// A placed, colored reference to a solid.
#[derive(Debug, Clone)]
pub struct Primitive {
    /// Shared geometry
    pub solid: SolidRef,
    /// Local-to-world transform
    pub transform: DMat4,
    /// Display color
    pub color: Color,
    /// Diagnostic label
    pub label: String,
}

/// CSG tree node.
///
/// # Variants
///
/// - `Primitive`: A leaf referencing a solid
/// - `Operation`: A binary boolean operation on two subterms
#[derive(Debug, Clone)]
pub enum Term {
    /// Leaf node
    Primitive(Primitive),
    /// Binary CSG operation
    Operation {
        /// The operation type
        op: CsgOp,
        /// Left operand
        left: Arc<Term>,
        /// Right operand
        right: Arc<Term>,
    },
}

impl Term {
    /// Creates a primitive leaf.
    pub fn primitive(
        solid: SolidRef,
        transform: DMat4,
        color: Color,
        label: impl Into<String>,
    ) -> Arc<Term> {
        Arc::new(Term::Primitive(Primitive {
            solid,
            transform,
            color,
            label: label.into(),
        }))
    }

    /// Creates a primitive leaf with identity transform and default color.
    pub fn labeled(solid: SolidRef, label: impl Into<String>) -> Arc<Term> {
        Self::primitive(solid, DMat4::IDENTITY, DEFAULT_COLOR, label)
    }

    /// Creates an operation node.
    pub fn operation(op: CsgOp, left: Arc<Term>, right: Arc<Term>) -> Arc<Term> {
        Arc::new(Term::Operation { op, left, right })
    }

    /// Creates a union operation node.
    pub fn union(left: Arc<Term>, right: Arc<Term>) -> Arc<Term> {
        Self::operation(CsgOp::Union, left, right)
    }

    /// Creates a difference operation node.
    pub fn difference(left: Arc<Term>, right: Arc<Term>) -> Arc<Term> {
        Self::operation(CsgOp::Difference, left, right)
    }

    /// Creates an intersection operation node.
    pub fn intersection(left: Arc<Term>, right: Arc<Term>) -> Arc<Term> {
        Self::operation(CsgOp::Intersection, left, right)
    }

    /// Operation of this node, `None` for primitives.
    pub fn op(&self) -> Option<CsgOp> {
        match self {
            Term::Primitive(_) => None,
            Term::Operation { op, .. } => Some(*op),
        }
    }

    /// Left and right operands, `None` for primitives.
    pub fn children(&self) -> Option<(&Arc<Term>, &Arc<Term>)> {
        match self {
            Term::Primitive(_) => None,
            Term::Operation { left, right, .. } => Some((left, right)),
        }
    }

    /// The primitive payload, `None` for operation nodes.
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Term::Primitive(primitive) => Some(primitive),
            Term::Operation { .. } => None,
        }
    }

    /// Returns true for leaf nodes.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Term::Primitive(_))
    }

    /// Renders the tree as a fully parenthesized infix expression.
    ///
    /// Union is `+`, difference `-`, intersection `*`; primitives print their
    /// label.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.write_dump(&mut out);
        out
    }

    fn write_dump(&self, out: &mut String) {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match self {
            Term::Primitive(primitive) => out.push_str(&primitive.label),
            Term::Operation { op, left, right } => {
                out.push('(');
                left.write_dump(out);
                out.push(' ');
                out.push(op.symbol());
                out.push(' ');
                right.write_dump(out);
                out.push(')');
            }
        })
    }

    /// Counts primitive leaves, counting shared subtrees once per occurrence.
    pub fn leaf_count(&self) -> usize {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match self {
            Term::Primitive(_) => 1,
            Term::Operation { left, right, .. } => left.leaf_count() + right.leaf_count(),
        })
    }

    /// Counts the total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match self {
            Term::Primitive(_) => 1,
            Term::Operation { left, right, .. } => 1 + left.node_count() + right.node_count(),
        })
    }

    /// Height of the tree; a lone primitive has depth 1.
    pub fn depth(&self) -> usize {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match self {
            Term::Primitive(_) => 1,
            Term::Operation { left, right, .. } => 1 + left.depth().max(right.depth()),
        })
    }

    /// Returns true if no difference or intersection node anywhere in the
    /// tree has an operation node as its right operand.
    pub fn is_normalized(&self) -> bool {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match self {
            Term::Primitive(_) => true,
            Term::Operation { op, left, right } => {
                let right_ok = *op == CsgOp::Union || right.is_primitive();
                right_ok && left.is_normalized() && right.is_normalized()
            }
        })
    }
}

/// Shared leaf swapped into operand slots while a tree is torn down.
fn detached_leaf() -> Arc<Term> {
    static DETACHED: OnceLock<Arc<Term>> = OnceLock::new();
    Arc::clone(DETACHED.get_or_init(|| Term::labeled(Arc::new(BoundingBox::empty()), "")))
}

/// Returns true if dropping `child` would free an operation node.
fn owns_subtree(child: &Arc<Term>) -> bool {
    !child.is_primitive() && Arc::strong_count(child) == 1
}

impl Drop for Term {
    /// Frees uniquely owned operation subtrees with an explicit stack so that
    /// deep trees do not overflow the call stack.
    fn drop(&mut self) {
        let Term::Operation { left, right, .. } = self else {
            return;
        };
        if !owns_subtree(left) && !owns_subtree(right) {
            return;
        }

        let mut pending = vec![
            mem::replace(left, detached_leaf()),
            mem::replace(right, detached_leaf()),
        ];
        while let Some(node) = pending.pop() {
            // Still shared elsewhere: releasing this handle frees nothing.
            let Ok(mut term) = Arc::try_unwrap(node) else {
                continue;
            };
            if let Term::Operation { left, right, .. } = &mut term {
                pending.push(mem::replace(left, detached_leaf()));
                pending.push(mem::replace(right, detached_leaf()));
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}
