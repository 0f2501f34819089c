//! # Bounding Box
//!
//! Axis-aligned bounding boxes with an explicit empty state.

use glam::DVec3;

/// Axis-aligned bounding box.
///
/// An empty box has `min = +inf` and `max = -inf`, so extending it with any
/// point yields a degenerate box around that point.
///
/// # Fields
///
/// - `min`: Minimum corner of the box
/// - `max`: Maximum corner of the box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (x, y, z)
    pub min: DVec3,
    /// Maximum corner (x, y, z)
    pub max: DVec3,
}

impl BoundingBox {
    /// Creates a new bounding box from min/max corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Creates an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// Returns true if the box contains no points.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grows this box so it contains `point`.
    pub fn extend(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns the smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Extent along each axis, zero for an empty box.
    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            return DVec3::ZERO;
        }
        self.max - self.min
    }

    /// Center point, `None` for an empty box.
    pub fn center(&self) -> Option<DVec3> {
        if self.is_empty() {
            return None;
        }
        Some((self.min + self.max) * 0.5)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
