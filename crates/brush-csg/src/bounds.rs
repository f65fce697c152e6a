//! Axis-aligned bounding boxes.

use nalgebra::{Point3, Vector3};

use crate::plane::ON_EPSILON;

/// Relationship of one box to another, see [`BoundingBox::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsRelation {
    /// The boxes do not touch.
    Disjoint,
    /// The box lies within the other one (also reported for equal boxes).
    Subset,
    /// The box contains the other one.
    Superset,
    /// The boxes partially overlap.
    Overlapping,
}

/// An axis-aligned box.
///
/// A freshly created box is empty: its mins are `+inf` and its maxs `-inf`,
/// so extending it by the first point yields exactly that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    mins: Point3<f64>,
    maxs: Point3<f64>,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Creates the empty box.
    pub fn empty() -> Self {
        Self {
            mins: Point3::from(Vector3::repeat(f64::INFINITY)),
            maxs: Point3::from(Vector3::repeat(f64::NEG_INFINITY)),
        }
    }

    /// Creates a box from two corners.
    pub fn new(mins: Point3<f64>, maxs: Point3<f64>) -> Self {
        Self { mins, maxs }
    }

    /// Creates the smallest box containing all `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.extend_point(point);
        }
        bounds
    }

    #[inline]
    pub fn mins(&self) -> Point3<f64> {
        self.mins
    }

    #[inline]
    pub fn maxs(&self) -> Point3<f64> {
        self.maxs
    }

    /// Returns true if nothing has been added to the box.
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.mins[i] > self.maxs[i])
    }

    /// Returns the extent along each axis (zero for an empty box).
    pub fn size(&self) -> Vector3<f64> {
        if self.is_empty() {
            Vector3::zeros()
        } else {
            self.maxs - self.mins
        }
    }

    /// Grows the box to contain `point`.
    pub fn extend_point(&mut self, point: &Point3<f64>) {
        for i in 0..3 {
            self.mins[i] = self.mins[i].min(point[i]);
            self.maxs[i] = self.maxs[i].max(point[i]);
        }
    }

    /// Grows the box to contain `other`.
    pub fn extend_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.extend_point(&other.mins);
        self.extend_point(&other.maxs);
    }

    /// Returns the box grown by `amount` on every side.
    pub fn expanded(&self, amount: f64) -> Self {
        if self.is_empty() {
            return *self;
        }
        let grow = Vector3::repeat(amount);
        Self {
            mins: self.mins - grow,
            maxs: self.maxs + grow,
        }
    }

    /// Returns true if the boxes are separated by more than `ON_EPSILON`
    /// along some axis. Empty boxes are disjoint from everything.
    pub fn disjoint(&self, other: &BoundingBox) -> bool {
        if self.is_empty() || other.is_empty() {
            return true;
        }
        (0..3).any(|i| {
            self.mins[i] > other.maxs[i] + ON_EPSILON || self.maxs[i] < other.mins[i] - ON_EPSILON
        })
    }

    /// Returns true if the boxes touch or overlap.
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !self.disjoint(other)
    }

    /// Returns true if this box lies within `other`.
    pub fn subset(&self, other: &BoundingBox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        (0..3).all(|i| {
            self.mins[i] >= other.mins[i] - ON_EPSILON && self.maxs[i] <= other.maxs[i] + ON_EPSILON
        })
    }

    /// Returns true if this box contains `other`.
    #[inline]
    pub fn superset(&self, other: &BoundingBox) -> bool {
        other.subset(self)
    }

    /// Classifies this box against `other`.
    ///
    /// Checks run in the order disjoint, subset, superset, so a box
    /// classified against an equal box reports [`BoundsRelation::Subset`].
    pub fn classify(&self, other: &BoundingBox) -> BoundsRelation {
        if self.disjoint(other) {
            BoundsRelation::Disjoint
        } else if self.subset(other) {
            BoundsRelation::Subset
        } else if self.superset(other) {
            BoundsRelation::Superset
        } else {
            BoundsRelation::Overlapping
        }
    }

    /// Returns true if any coordinate lies outside `[-extent, extent]`.
    pub fn exceeds(&self, extent: f64) -> bool {
        !self.is_empty() && (0..3).any(|i| self.mins[i] < -extent || self.maxs[i] > extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_box(mins: [f64; 3], maxs: [f64; 3]) -> BoundingBox {
        BoundingBox::new(
            Point3::new(mins[0], mins[1], mins[2]),
            Point3::new(maxs[0], maxs[1], maxs[2]),
        )
    }

    #[test]
    fn empty_is_identity_for_extend() {
        let mut bounds = BoundingBox::empty();
        assert!(bounds.is_empty());
        bounds.extend_point(&Point3::new(1.0, 2.0, 3.0));
        assert!(!bounds.is_empty());
        assert_eq!(bounds.mins(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.maxs(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn extend_box_unions() {
        let mut bounds = make_box([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        bounds.extend_box(&make_box([-2.0, 0.5, 0.5], [0.5, 0.5, 4.0]));
        bounds.extend_box(&BoundingBox::empty());
        assert_eq!(bounds, make_box([-2.0, 0.0, 0.0], [1.0, 1.0, 4.0]));
        assert_eq!(bounds.size(), Vector3::new(3.0, 1.0, 4.0));
    }

    #[test]
    fn classify_self_is_subset() {
        let a = make_box([0.0, 0.0, 0.0], [64.0, 64.0, 64.0]);
        assert_eq!(a.classify(&a), BoundsRelation::Subset);
    }

    #[test]
    fn classify_relations() {
        let big = make_box([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]);
        let small = make_box([2.0, 2.0, 2.0], [3.0, 3.0, 3.0]);
        let partial = make_box([5.0, 5.0, 5.0], [15.0, 15.0, 15.0]);
        let far = make_box([20.0, 0.0, 0.0], [30.0, 10.0, 10.0]);

        assert_eq!(small.classify(&big), BoundsRelation::Subset);
        assert_eq!(big.classify(&small), BoundsRelation::Superset);
        assert_eq!(big.classify(&partial), BoundsRelation::Overlapping);
        assert_eq!(big.classify(&far), BoundsRelation::Disjoint);
    }

    #[test]
    fn touching_boxes_are_not_disjoint() {
        let a = make_box([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = make_box([1.005, 0.0, 0.0], [2.0, 1.0, 1.0]);
        assert!(a.intersects(&b));
        let c = make_box([1.5, 0.0, 0.0], [2.0, 1.0, 1.0]);
        assert!(a.disjoint(&c));
    }

    #[test]
    fn empty_box_is_disjoint() {
        let a = make_box([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        assert!(a.disjoint(&BoundingBox::empty()));
        assert!(!BoundingBox::empty().subset(&a));
    }

    #[test]
    fn exceeds_world() {
        let a = make_box([-10.0, 0.0, 0.0], [10.0, 1.0, 1.0]);
        assert!(!a.exceeds(100.0));
        assert!(a.exceeds(5.0));
        assert!(!BoundingBox::empty().exceeds(1.0));
    }
}
