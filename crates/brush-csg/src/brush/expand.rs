//! Growing a brush by a hull shape.
//!
//! The grown brush is the Minkowski sum of the brush and the shape. Its
//! bounding planes come from three sources:
//!
//! * every brush plane pushed out by the shape's reach along its normal,
//! * every shape plane pushed out by the brush's reach along its normal,
//! * for each pair of a brush edge and a shape edge, the plane spanned by
//!   both directions, when it supports both solids along those edges.
//!
//! Only the first kind corresponds to a brush side. The others are bevels:
//! without them a player box would snag on the sharp edges of a brush.

use nalgebra::{Point3, Vector3};

use super::build::Candidate;
use super::face::Face;
use crate::error::Result;
use crate::hull::{HullShape, Polytope};
use crate::plane::{Plane, ON_EPSILON};
use crate::plane_table::PlaneTable;

/// Edge pairs closer to parallel than this span no plane.
const PARALLEL_EPSILON: f64 = 1e-6;

/// Returns the candidate planes of `faces` grown by `shape`, in the order
/// brush planes, shape planes, edge planes.
pub(crate) fn expand(
    faces: &[Face],
    shape: &HullShape,
    planes: &PlaneTable,
) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();

    for face in faces {
        let normal = face.plane.normal();
        let plane = face.plane.offset(shape.support(&normal));
        candidates.push(Candidate::new(planes, plane, face.is_bevel, face.side)?);
    }

    if shape.is_point() {
        return Ok(candidates);
    }

    let brush = Polytope::from_windings(faces.iter().map(|face| &face.winding));

    for shape_plane in shape.planes() {
        let normal = shape_plane.normal();
        let plane = Plane::from_unit(normal, brush.support(&normal) + shape_plane.dist());
        candidates.push(Candidate::new(planes, plane, true, None)?);
    }

    let shape_poly = shape.polytope();
    for (a, b) in &brush.edges {
        let edge = b - a;
        for (c, d) in &shape_poly.edges {
            let other = d - c;
            let normal = edge.cross(&other);
            let length = normal.norm();
            if length < PARALLEL_EPSILON * edge.norm() * other.norm() {
                continue;
            }
            let normal = normal / length;
            for normal in [normal, -normal] {
                let Some(dist) = edge_support(&brush, shape_poly, &normal, [a, b], [c, d]) else {
                    continue;
                };
                let plane = Plane::from_unit(normal, dist);
                candidates.push(Candidate::new(planes, plane, true, None)?);
            }
        }
    }

    Ok(candidates)
}

/// Returns the distance of the plane with `normal` touching both solids
/// along the given edges, if both edges lie on their solid's support plane.
fn edge_support(
    brush: &Polytope,
    shape: &Polytope,
    normal: &Vector3<f64>,
    brush_edge: [&Point3<f64>; 2],
    shape_edge: [&Point3<f64>; 2],
) -> Option<f64> {
    let brush_reach = brush.support(normal);
    let shape_reach = shape.support(normal);
    let touches = |reach: f64, edge: [&Point3<f64>; 2]| {
        edge.iter()
            .all(|p| (normal.dot(&p.coords) - reach).abs() < ON_EPSILON)
    };
    (touches(brush_reach, brush_edge) && touches(shape_reach, shape_edge))
        .then_some(brush_reach + shape_reach)
}
