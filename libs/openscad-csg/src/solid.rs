//! Solid references held by primitive terms.
//!
//! The CSG layer never inspects geometry. A solid only has to report its
//! local (untransformed) bounding box.

use std::fmt::Debug;
use std::sync::Arc;

use crate::bounding_box::BoundingBox;

/// Geometry that can appear as a primitive in a CSG term.
pub trait Solid: Debug + Send + Sync {
    /// Local bounding box, or an empty box for empty geometry.
    fn bounding_box(&self) -> BoundingBox;
}

/// Shared, read-only handle to a solid.
pub type SolidRef = Arc<dyn Solid>;

impl Solid for BoundingBox {
    fn bounding_box(&self) -> BoundingBox {
        *self
    }
}
