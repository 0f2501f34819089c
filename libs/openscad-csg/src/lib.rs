//! # OpenSCAD CSG
//!
//! Symbolic CSG term processing for incremental, image-based rendering.
//! Boolean operation trees are rewritten into a left-leaning normal form and
//! then flattened into an ordered chain of tagged primitives.
//!
//! ## Architecture
//!
//! ```text
//! Term tree → normalize (rewrite to fixed point) → Chain::from_term → renderer
//! ```
//!
//! No geometry is evaluated here. Primitives reference solids through the
//! [`Solid`] trait, which only reports a local bounding box.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use glam::DVec3;
//! use openscad_csg::{normalize, BoundingBox, Chain, SolidRef, Term};
//!
//! let solid: SolidRef = Arc::new(BoundingBox::new(DVec3::ZERO, DVec3::ONE));
//! let [a, b, c] = ["A", "B", "C"].map(|label| Term::labeled(solid.clone(), label));
//!
//! let tree = Term::difference(Term::union(a, b), c);
//! let normal = normalize(&tree)?;
//! let chain = Chain::from_term(&normal);
//! assert_eq!(chain.dump(), "+A -C\n+B -C\n");
//! # Ok::<(), openscad_csg::CsgError>(())
//! ```

pub mod bounding_box;
pub mod chain;
pub mod error;
pub mod normalize;
pub mod solid;
pub mod term;

pub use bounding_box::BoundingBox;
pub use chain::{Chain, ChainEntry};
pub use error::CsgError;
pub use normalize::{match_rule, normalize, normalize_tail, Normalizer, Rule};
pub use solid::{Solid, SolidRef};
pub use term::{Color, CsgOp, Primitive, Term};
