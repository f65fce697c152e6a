//! Collision hull shapes.
//!
//! Every brush is built four times: once as-is for the point hull, and once
//! per collision hull grown by that hull's shape (the box a player or
//! monster occupies). Growing a brush by a shape is a Minkowski sum, see
//! [`crate::brush`]. Shapes are boxes by default; a hull definition file can
//! replace them or define extra named convex shapes that individual brushes
//! select instead of the default.
//!
//! # File formats
//!
//! Two formats are accepted by [`HullLibrary::load`]:
//!
//! ```text
//! // legacy: full extents of hulls 1-3 (optionally preceded by "0 0 0")
//! 32 32 72
//! 64 64 64
//! 32 32 36
//! ```
//!
//! ```text
//! // named shapes
//! hull2 {
//!     box ( -24 -24 -32 ) ( 24 24 32 )
//! }
//! wedge {
//!     ( 0 0 -1 ) 0
//!     ( 1 0 1 ) 16
//!     ...
//! }
//! ```

mod file;

use std::collections::HashMap;

use bitflags::bitflags;
use nalgebra::{Point3, Vector3};

use crate::bounds::BoundingBox;
use crate::error::{CsgError, Result};
use crate::plane::Plane;
use crate::winding::{Winding, BOGUS_RANGE};

/// Number of hulls every brush is built for.
pub const NUM_HULLS: usize = 4;

/// Default hull boxes, `(mins, maxs)` per hull. Hull 0 is the point hull.
pub const DEFAULT_HULL_SIZES: [([f64; 3], [f64; 3]); NUM_HULLS] = [
    ([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
    ([-16.0, -16.0, -36.0], [16.0, 16.0, 36.0]),
    ([-32.0, -32.0, -32.0], [32.0, 32.0, 32.0]),
    ([-16.0, -16.0, -18.0], [16.0, 16.0, 18.0]),
];

/// Points of a polytope closer than this are the same vertex.
const VERTEX_EPSILON: f64 = 0.01;

bitflags! {
    /// Set of hulls a brush takes part in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HullMask: u8 {
        const POINT = 1 << 0;
        const HULL1 = 1 << 1;
        const HULL2 = 1 << 2;
        const HULL3 = 1 << 3;
        const ALL =
            Self::POINT.bits() | Self::HULL1.bits() | Self::HULL2.bits() | Self::HULL3.bits();
    }
}

impl Default for HullMask {
    fn default() -> Self {
        HullMask::ALL
    }
}

impl HullMask {
    /// Returns the flag for a single hull.
    #[inline]
    pub fn for_hull(hull: usize) -> Self {
        HullMask::from_bits_truncate(1 << hull)
    }

    /// Returns true if `hull` is part of the mask.
    #[inline]
    pub fn includes(self, hull: usize) -> bool {
        self.contains(Self::for_hull(hull))
    }
}

/// Vertices and edges of a convex polyhedron, extracted from its faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polytope {
    pub vertices: Vec<Point3<f64>>,
    pub edges: Vec<(Point3<f64>, Point3<f64>)>,
}

impl Polytope {
    /// Collects the unique vertices and edges of a set of face windings.
    pub fn from_windings<'a>(windings: impl IntoIterator<Item = &'a Winding>) -> Self {
        let mut polytope = Polytope::default();
        for winding in windings {
            let points = winding.points();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                polytope.add_vertex(*a);
                polytope.add_edge(*a, b);
            }
        }
        polytope
    }

    fn add_vertex(&mut self, point: Point3<f64>) {
        if !self
            .vertices
            .iter()
            .any(|v| (v - point).norm() < VERTEX_EPSILON)
        {
            self.vertices.push(point);
        }
    }

    fn add_edge(&mut self, a: Point3<f64>, b: Point3<f64>) {
        let same = |p: &Point3<f64>, q: &Point3<f64>| (p - q).norm() < VERTEX_EPSILON;
        if !self
            .edges
            .iter()
            .any(|(p, q)| (same(p, &a) && same(q, &b)) || (same(p, &b) && same(q, &a)))
        {
            self.edges.push((a, b));
        }
    }

    /// Largest projection of any vertex onto `direction`.
    pub fn support(&self, direction: &Vector3<f64>) -> f64 {
        self.vertices
            .iter()
            .map(|v| direction.dot(&v.coords))
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Builds one face winding per plane of a convex solid, dropping planes
/// that do not touch the solid. Returns `(plane index, winding)` pairs.
pub(crate) fn solid_faces(planes: &[Plane]) -> Vec<(usize, Winding)> {
    planes
        .iter()
        .enumerate()
        .filter_map(|(i, plane)| {
            let mut winding = Some(Winding::from_plane(plane));
            for (j, other) in planes.iter().enumerate() {
                if i == j {
                    continue;
                }
                winding = winding.and_then(|w| w.chop(other));
            }
            winding.map(|w| (i, w))
        })
        .collect()
}

/// A convex shape the collision hulls are grown by.
#[derive(Debug, Clone, PartialEq)]
pub struct HullShape {
    name: String,
    planes: Vec<Plane>,
    polytope: Polytope,
}

impl HullShape {
    /// A shape of zero size; growing by it leaves brushes unchanged.
    pub fn point(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            planes: Vec::new(),
            polytope: Polytope {
                vertices: vec![Point3::origin()],
                edges: Vec::new(),
            },
        }
    }

    /// An axis-aligned box. A box with zero extent is a point.
    pub fn from_box(name: impl Into<String>, mins: Point3<f64>, maxs: Point3<f64>) -> Result<Self> {
        let name = name.into();
        if mins == maxs && mins == Point3::origin() {
            return Ok(Self::point(name));
        }
        let mut planes = Vec::with_capacity(6);
        for axis in 0..3 {
            let mut normal = Vector3::zeros();
            normal[axis] = 1.0;
            planes.push(Plane::from_unit(normal, maxs[axis]));
            planes.push(Plane::from_unit(-normal, -mins[axis]));
        }
        Self::from_planes(name, planes)
    }

    /// A convex shape bounded by `planes` (normals pointing outward).
    pub fn from_planes(name: impl Into<String>, planes: Vec<Plane>) -> Result<Self> {
        let name = name.into();
        let faces = solid_faces(&planes);

        let mut bounds = BoundingBox::empty();
        for (_, winding) in &faces {
            bounds.extend_box(&winding.bounds());
        }
        if faces.len() < 4 || bounds.exceeds(BOGUS_RANGE * 0.5) {
            return Err(CsgError::DegenerateHullShape { name });
        }

        let polytope = Polytope::from_windings(faces.iter().map(|(_, w)| w));
        let planes = faces.iter().map(|(i, _)| planes[*i]).collect();
        Ok(Self {
            name,
            planes,
            polytope,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bounding planes of the shape (empty for a point).
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    #[inline]
    pub fn polytope(&self) -> &Polytope {
        &self.polytope
    }

    /// Returns true for the zero-size shape.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.planes.is_empty()
    }

    /// How far the shape reaches along `direction`.
    #[inline]
    pub fn support(&self, direction: &Vector3<f64>) -> f64 {
        self.polytope.support(direction)
    }

    /// Bounding box of the shape.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&self.polytope.vertices)
    }
}

/// The shapes of the four hulls plus any named custom shapes.
#[derive(Debug, Clone)]
pub struct HullLibrary {
    hulls: [HullShape; NUM_HULLS],
    custom: HashMap<String, HullShape>,
}

impl Default for HullLibrary {
    fn default() -> Self {
        let hulls = std::array::from_fn(|hull| {
            let (mins, maxs) = DEFAULT_HULL_SIZES[hull];
            HullShape::from_box(
                format!("hull{hull}"),
                Point3::from(mins),
                Point3::from(maxs),
            )
            .unwrap_or_else(|_| HullShape::point(format!("hull{hull}")))
        });
        Self {
            hulls,
            custom: HashMap::new(),
        }
    }
}

impl HullLibrary {
    /// Returns the default shape of `hull`.
    ///
    /// # Panics
    /// Panics if `hull >= NUM_HULLS`.
    #[inline]
    pub fn hull(&self, hull: usize) -> &HullShape {
        &self.hulls[hull]
    }

    /// Replaces the default shape of a collision hull.
    pub fn set_hull(&mut self, hull: usize, shape: HullShape) {
        self.hulls[hull] = shape;
    }

    /// Looks up a named custom shape.
    pub fn custom(&self, name: &str) -> Option<&HullShape> {
        self.custom.get(name)
    }

    /// Adds a named custom shape, returning the one it replaced.
    pub fn insert_custom(&mut self, shape: HullShape) -> Option<HullShape> {
        self.custom.insert(shape.name.clone(), shape)
    }

    /// Returns the number of named custom shapes.
    pub fn custom_count(&self) -> usize {
        self.custom.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn default_library_sizes() {
        let library = HullLibrary::default();
        assert!(library.hull(0).is_point());
        assert_eq!(library.hull(1).bounds().size(), Vector3::new(32.0, 32.0, 72.0));
        assert_eq!(library.hull(2).bounds().size(), Vector3::new(64.0, 64.0, 64.0));
        assert_eq!(library.hull(3).bounds().size(), Vector3::new(32.0, 32.0, 36.0));
        assert_eq!(library.hull(1).planes().len(), 6);
    }

    #[test]
    fn box_support_matches_projection() {
        let shape = HullShape::from_box(
            "player",
            Point3::new(-16.0, -16.0, -36.0),
            Point3::new(16.0, 16.0, 36.0),
        )
        .unwrap();
        let n = Vector3::new(0.6, -0.8, 0.0);
        assert_approx_eq!(shape.support(&n), 0.6 * 16.0 + 0.8 * 16.0, 1e-9);
        assert_approx_eq!(shape.support(&Vector3::z()), 36.0, 1e-9);
        assert_eq!(shape.polytope().vertices.len(), 8);
        assert_eq!(shape.polytope().edges.len(), 12);
    }

    #[test]
    fn point_support_is_zero() {
        let shape = HullShape::point("p");
        assert_eq!(shape.support(&Vector3::new(0.0, 1.0, 0.0)), 0.0);
    }

    #[test]
    fn open_plane_set_is_rejected() {
        let planes = vec![
            Plane::from_unit(Vector3::x(), 1.0),
            Plane::from_unit(-Vector3::x(), 1.0),
            Plane::from_unit(Vector3::y(), 1.0),
        ];
        assert!(matches!(
            HullShape::from_planes("open", planes),
            Err(CsgError::DegenerateHullShape { .. })
        ));
    }

    #[test]
    fn redundant_planes_are_dropped() {
        let mut planes: Vec<Plane> = HullShape::from_box(
            "b",
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, 1.0),
        )
        .unwrap()
        .planes()
        .to_vec();
        planes.push(Plane::from_unit(Vector3::x(), 5.0));
        let shape = HullShape::from_planes("b", planes).unwrap();
        assert_eq!(shape.planes().len(), 6);
    }

    #[test]
    fn mask_membership() {
        let mask = HullMask::HULL1 | HullMask::HULL3;
        assert!(mask.includes(1));
        assert!(!mask.includes(0));
        assert!(!mask.includes(2));
        assert!(HullMask::default().includes(2));
        assert_eq!(HullMask::for_hull(0), HullMask::POINT);
    }

    #[test]
    fn custom_shapes() {
        let mut library = HullLibrary::default();
        let shape = HullShape::from_box(
            "crate",
            Point3::new(-8.0, -8.0, -8.0),
            Point3::new(8.0, 8.0, 8.0),
        )
        .unwrap();
        assert!(library.insert_custom(shape).is_none());
        assert!(library.custom("crate").is_some());
        assert!(library.custom("barrel").is_none());
        assert_eq!(library.custom_count(), 1);
    }
}
