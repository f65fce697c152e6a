//! Plane representation and point classification.

use nalgebra::{Point3, Vector3};

/// Points within this distance of a plane are considered "on" the plane.
pub const ON_EPSILON: f64 = 0.01;

/// Tolerance on individual normal components when comparing or snapping planes.
pub const NORMAL_EPSILON: f64 = 0.00001;

/// Tolerance on plane distances when comparing or snapping planes.
pub const DIST_EPSILON: f64 = 0.01;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (outside the half-space)
    Front,
    /// Point is behind the plane (inside the half-space)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    On,
}

/// Axis classification of a plane, used by the partitioning stage to pick
/// cheap axial splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneType {
    X,
    Y,
    Z,
    AnyX,
    AnyY,
    AnyZ,
}

impl PlaneType {
    /// Classifies a unit normal.
    pub fn of(normal: &Vector3<f64>) -> Self {
        if normal.x == 1.0 || normal.x == -1.0 {
            return PlaneType::X;
        }
        if normal.y == 1.0 || normal.y == -1.0 {
            return PlaneType::Y;
        }
        if normal.z == 1.0 || normal.z == -1.0 {
            return PlaneType::Z;
        }
        match dominant_axis(normal) {
            0 => PlaneType::AnyX,
            1 => PlaneType::AnyY,
            _ => PlaneType::AnyZ,
        }
    }

    /// Returns the axis index (0, 1, 2) this type is dominated by.
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            PlaneType::X | PlaneType::AnyX => 0,
            PlaneType::Y | PlaneType::AnyY => 1,
            PlaneType::Z | PlaneType::AnyZ => 2,
        }
    }

    /// Returns true for planes whose normal is exactly a coordinate axis.
    #[inline]
    pub fn is_axial(self) -> bool {
        matches!(self, PlaneType::X | PlaneType::Y | PlaneType::Z)
    }
}

/// Index of the largest absolute normal component.
pub(crate) fn dominant_axis(v: &Vector3<f64>) -> usize {
    let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
    if ax >= ay && ax >= az {
        0
    } else if ay >= az {
        1
    } else {
        2
    }
}

/// A plane in 3D space, represented as `normal · point = dist`.
///
/// The half-space `normal · point <= dist` is the inside of whatever solid
/// the plane bounds, so the normal points outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector3<f64>,
    dist: f64,
}

impl Plane {
    /// Creates a new plane from a normal vector and distance.
    /// The normal will be normalized automatically.
    ///
    /// Returns `None` if the normal vector has (near) zero length.
    pub fn new(normal: Vector3<f64>, dist: f64) -> Option<Self> {
        let norm = normal.norm();
        if norm < NORMAL_EPSILON {
            return None;
        }
        Some(Self {
            normal: normal / norm,
            dist: dist / norm,
        })
    }

    /// Creates a plane from a point on the plane and a normal vector.
    pub fn from_point_and_normal(point: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        let norm = normal.norm();
        if norm < NORMAL_EPSILON {
            return None;
        }
        let unit_normal = normal / norm;
        Some(Self {
            normal: unit_normal,
            dist: unit_normal.dot(&point.coords),
        })
    }

    /// Creates a plane from three points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// Returns `None` if the points are collinear (or nearly so).
    pub fn from_points(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Option<Self> {
        Self::from_point_and_normal(a, (b - a).cross(&(c - a)))
    }

    /// Builds a plane from values already known to be a unit normal.
    #[inline]
    pub(crate) fn from_unit(normal: Vector3<f64>, dist: f64) -> Self {
        Self { normal, dist }
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn dist(&self) -> f64 {
        self.dist
    }

    /// Returns the axis classification of the plane.
    #[inline]
    pub fn plane_type(&self) -> PlaneType {
        PlaneType::of(&self.normal)
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (outside)
    /// - Negative: point is behind (inside)
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.dist
    }

    /// Classifies which side of the plane a point lies on, using `ON_EPSILON`.
    #[inline]
    pub fn classify_point(&self, point: &Point3<f64>) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > ON_EPSILON {
            PlaneSide::Front
        } else if dist < -ON_EPSILON {
            PlaneSide::Back
        } else {
            PlaneSide::On
        }
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            dist: -self.dist,
        }
    }

    /// Returns the same plane pushed `offset` units along its normal.
    #[inline]
    pub fn offset(&self, offset: f64) -> Self {
        Self {
            normal: self.normal,
            dist: self.dist + offset,
        }
    }

    /// Returns true if both planes match within the snapping tolerances.
    pub fn approx_eq(&self, other: &Plane) -> bool {
        (self.normal - other.normal).iter().all(|c| c.abs() < NORMAL_EPSILON)
            && (self.dist - other.dist).abs() < DIST_EPSILON
    }

    /// Snaps near-axial normals onto the axis and near-integer distances
    /// onto the integer, so planes typed in by hand compare equal.
    pub(crate) fn snapped(&self) -> Self {
        let mut normal = self.normal;
        for axis in 0..3 {
            if (normal[axis] - 1.0).abs() < NORMAL_EPSILON {
                normal = Vector3::zeros();
                normal[axis] = 1.0;
                break;
            }
            if (normal[axis] + 1.0).abs() < NORMAL_EPSILON {
                normal = Vector3::zeros();
                normal[axis] = -1.0;
                break;
            }
        }

        let rounded = self.dist.round();
        let dist = if (self.dist - rounded).abs() < DIST_EPSILON {
            rounded
        } else {
            self.dist
        };

        Self { normal, dist }
    }

    /// Returns true when the dominant normal component is positive; the
    /// plane table stores this orientation at even indices.
    #[inline]
    pub(crate) fn is_canonical(&self) -> bool {
        self.normal[dominant_axis(&self.normal)] > 0.0
    }
}
