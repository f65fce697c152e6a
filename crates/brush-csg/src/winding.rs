//! Convex polygons ("windings") and plane clipping.

use nalgebra::{Point3, Vector3};

use crate::bounds::BoundingBox;
use crate::plane::{dominant_axis, Plane, PlaneSide};

/// Half-size of the quad created by [`Winding::from_plane`]. Must be larger
/// than any legal world coordinate.
pub const BOGUS_RANGE: f64 = 131072.0;

/// Consecutive points closer than this are merged.
const POINT_EPSILON: f64 = 0.001;

/// Windings with less area than this are treated as degenerate.
const AREA_EPSILON: f64 = 1e-6;

/// An ordered, convex polygon in 3D space.
///
/// Points run counter-clockwise when viewed from the front of the plane the
/// winding lies on, so `(p1 - p0) × (p2 - p0)` points along that plane's
/// normal. The closing edge from the last point to the first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Winding {
    points: Vec<Point3<f64>>,
}

impl Winding {
    /// Creates a winding from a list of points.
    ///
    /// # Panics (debug builds only)
    /// Panics if fewer than 3 points are provided.
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        debug_assert!(points.len() >= 3, "Winding must have at least 3 points");
        Self { points }
    }

    /// Creates a large quad lying on `plane`, facing the same way.
    ///
    /// Clipping it against the other planes of a brush shrinks it down to
    /// the actual face.
    pub fn from_plane(plane: &Plane) -> Self {
        let normal = plane.normal();

        // any vector not parallel to the normal will do
        let mut up = if dominant_axis(&normal) == 2 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };
        up -= normal * up.dot(&normal);
        up = up.normalize() * BOGUS_RANGE;
        let right = normal.cross(&up);

        let origin = Point3::from(normal * plane.dist());
        Self {
            points: vec![
                origin - right + up,
                origin + right + up,
                origin + right - up,
                origin - right - up,
            ],
        }
    }

    /// Returns the points of the winding.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the winding has no points (never true for windings
    /// produced by this module).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Computes the area by fan triangulation from the first point.
    pub fn area(&self) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        self.points
            .windows(2)
            .skip(1)
            .map(|pair| (pair[0] - first).cross(&(pair[1] - first)).norm() * 0.5)
            .sum()
    }

    /// Returns the average of the points. This is not the true centroid,
    /// only an interior sample point.
    pub fn center(&self) -> Point3<f64> {
        let sum: Vector3<f64> = self.points.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.points.len() as f64)
    }

    /// Returns the bounding box of the points.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Returns the plane the winding lies on, derived from its first three
    /// points. `None` if those points are collinear.
    pub fn plane(&self) -> Option<Plane> {
        if self.points.len() < 3 {
            return None;
        }
        Plane::from_points(self.points[0], self.points[1], self.points[2])
    }

    /// Returns the winding with its point order reversed, facing the other way.
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    /// Checks that the winding has at least 3 points, no near-zero edges
    /// and a non-negligible area.
    pub fn is_valid(&self) -> bool {
        let n = self.points.len();
        n >= 3
            && (0..n).all(|i| (self.points[(i + 1) % n] - self.points[i]).norm() >= POINT_EPSILON)
            && self.area() > AREA_EPSILON
    }

    /// Splits the winding by `plane`.
    ///
    /// Returns `(front, back)`:
    /// - no point behind the plane: `(Some(self), None)`, unchanged
    /// - no point in front: `(None, Some(self))`, unchanged
    /// - every point on the plane: goes to front if `keep_on`, back otherwise
    /// - otherwise both fragments, either of which may collapse to `None`
    ///   if it degenerates
    pub fn clip(&self, plane: &Plane, keep_on: bool) -> (Option<Winding>, Option<Winding>) {
        let dists: Vec<f64> = self.points.iter().map(|p| plane.signed_distance(p)).collect();
        let sides: Vec<PlaneSide> = self.points.iter().map(|p| plane.classify_point(p)).collect();

        let front = sides.iter().filter(|s| **s == PlaneSide::Front).count();
        let back = sides.iter().filter(|s| **s == PlaneSide::Back).count();

        if front == 0 && back == 0 {
            return if keep_on {
                (Some(self.clone()), None)
            } else {
                (None, Some(self.clone()))
            };
        }
        if front == 0 {
            return (None, Some(self.clone()));
        }
        if back == 0 {
            return (Some(self.clone()), None);
        }

        let (front_points, back_points) = self.split_points(plane, &dists, &sides);
        (cleanup(front_points), cleanup(back_points))
    }

    /// Keeps the part of the winding behind `plane` (inside the half-space).
    /// A winding lying on the plane is kept.
    pub fn chop(&self, plane: &Plane) -> Option<Winding> {
        self.clip(plane, false).1
    }

    /// Walks the edges, emitting each point to its side(s) and an
    /// interpolated point wherever an edge crosses the plane.
    fn split_points(
        &self,
        plane: &Plane,
        dists: &[f64],
        sides: &[PlaneSide],
    ) -> (Vec<Point3<f64>>, Vec<Point3<f64>>) {
        let n = self.points.len();
        let normal = plane.normal();
        let mut front = Vec::with_capacity(n + 4);
        let mut back = Vec::with_capacity(n + 4);

        for i in 0..n {
            let current = self.points[i];
            let next_idx = (i + 1) % n;

            match sides[i] {
                PlaneSide::On => {
                    front.push(current);
                    back.push(current);
                    continue;
                }
                PlaneSide::Front => front.push(current),
                PlaneSide::Back => back.push(current),
            }

            if sides[next_idx] == PlaneSide::On || sides[next_idx] == sides[i] {
                continue;
            }

            let next = self.points[next_idx];
            let t = dists[i] / (dists[i] - dists[next_idx]);
            let mut mid = Point3::origin();
            for axis in 0..3 {
                // avoid round off on axial planes
                mid[axis] = if normal[axis] == 1.0 {
                    plane.dist()
                } else if normal[axis] == -1.0 {
                    -plane.dist()
                } else {
                    current[axis] + t * (next[axis] - current[axis])
                };
            }
            front.push(mid);
            back.push(mid);
        }

        (front, back)
    }
}

/// Removes near-duplicate and collinear points; `None` if what remains is
/// not a proper polygon.
fn cleanup(points: Vec<Point3<f64>>) -> Option<Winding> {
    let mut merged: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for point in points {
        if merged
            .last()
            .is_none_or(|last| (point - last).norm() >= POINT_EPSILON)
        {
            merged.push(point);
        }
    }
    while merged.len() > 1 && (merged[0] - merged[merged.len() - 1]).norm() < POINT_EPSILON {
        merged.pop();
    }

    let n = merged.len();
    if n < 3 {
        return None;
    }

    let kept: Vec<Point3<f64>> = (0..n)
        .filter(|&i| {
            let prev = merged[(i + n - 1) % n];
            let next = merged[(i + 1) % n];
            let incoming = (merged[i] - prev).normalize();
            let outgoing = (next - merged[i]).normalize();
            incoming.dot(&outgoing) < 1.0 - NORMAL_COLINEAR_EPSILON
        })
        .map(|i| merged[i])
        .collect();

    let winding = Winding { points: kept };
    winding.is_valid().then_some(winding)
}

const NORMAL_COLINEAR_EPSILON: f64 = 1e-9;
