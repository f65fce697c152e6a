//! Diagnostics for brushes that overlap by a large fraction of their volume.

use std::fmt;

use log::warn;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::brush::{Brush, BrushHull, BrushSet, Face};
use crate::hull::NUM_HULLS;

/// One pair of brushes overlapping by more than the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionReport {
    pub hull: usize,
    /// Source map numbers of the entity and both brushes.
    pub entity: usize,
    pub brush: usize,
    pub other: usize,
    /// Positions of both brushes in the brush set.
    pub brush_id: usize,
    pub other_id: usize,
    pub overlap_volume: f64,
    /// Overlap as a percentage of the smaller brush.
    pub percent: f64,
}

impl fmt::Display for UnionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity {} : Brush {} intersects with brush {} by {:.3}%",
            self.entity, self.brush, self.other, self.percent
        )
    }
}

/// Finds same-contents brushes that overlap more than `threshold` percent.
#[derive(Debug, Clone, Copy)]
pub struct UnionAnalyzer {
    threshold: f64,
}

impl UnionAnalyzer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Analyzes every hull and logs one warning per report, in hull and
    /// brush order.
    pub fn analyze(&self, set: &BrushSet) -> Vec<UnionReport> {
        let reports: Vec<UnionReport> = (0..NUM_HULLS)
            .flat_map(|hull| self.analyze_hull(set, hull))
            .collect();
        for report in &reports {
            warn!("{}", report);
        }
        reports
    }

    /// Analyzes one hull without logging.
    pub fn analyze_hull(&self, set: &BrushSet, hull: usize) -> Vec<UnionReport> {
        let brushes = set.brushes();
        brushes
            .par_iter()
            .map(|brush| {
                let range = set.entity_range(brush.entity());
                brushes[brush.id() + 1..range.end]
                    .iter()
                    .filter_map(|other| self.compare(brush, other, hull))
                    .collect::<Vec<_>>()
            })
            .flatten()
            .collect()
    }

    fn compare(&self, brush: &Brush, other: &Brush, hull: usize) -> Option<UnionReport> {
        let a = brush.hull(hull);
        let b = other.hull(hull);
        if brush.contents() != other.contents()
            || brush.is_bevel()
            || other.is_bevel()
            || a.is_empty()
            || b.is_empty()
            || a.bounds().disjoint(b.bounds())
        {
            return None;
        }

        let overlap = solid_volume(&intersection(a, b));
        if overlap <= 0.0 {
            return None;
        }
        let percent = [solid_volume(a.faces()), solid_volume(b.faces())]
            .into_iter()
            .filter(|volume| *volume > 0.0)
            .map(|volume| 100.0 * overlap / volume)
            .fold(0.0, f64::max);

        (percent > self.threshold).then(|| UnionReport {
            hull,
            entity: brush.original_entity(),
            brush: brush.original_brush(),
            other: other.original_brush(),
            brush_id: brush.id(),
            other_id: other.id(),
            overlap_volume: overlap,
            percent,
        })
    }
}

/// Faces of the solid both hulls enclose.
fn intersection(a: &BrushHull, b: &BrushHull) -> Vec<Face> {
    let mut faces = chop_into(a, b, |_| false);
    let present: Vec<_> = faces.iter().map(Face::plane_index).collect();
    faces.extend(chop_into(b, a, |face| present.contains(&face.plane_index())));
    faces
}

/// Chops the faces of `outer` down to the inside of `inner`, leaving out
/// faces `skip` rejects.
fn chop_into(outer: &BrushHull, inner: &BrushHull, skip: impl Fn(&Face) -> bool) -> Vec<Face> {
    outer
        .faces()
        .iter()
        .filter(|face| !skip(face) && !inner.has_plane(face.plane_index().flipped()))
        .filter_map(|face| {
            let mut winding = Some(face.winding().clone());
            for other in inner.faces() {
                if other.plane_index() == face.plane_index() {
                    continue;
                }
                winding = winding.and_then(|w| w.chop(other.plane()));
            }
            winding.map(|w| face.with_winding(w))
        })
        .collect()
}

/// Volume of a convex solid given by its faces, as a sum of pyramids from
/// the mean of the face centres.
pub fn solid_volume(faces: &[Face]) -> f64 {
    if faces.is_empty() {
        return 0.0;
    }
    let sum = faces
        .iter()
        .fold(Vector3::zeros(), |acc, face| acc + face.winding().center().coords);
    let sample = Point3::from(sum / faces.len() as f64);

    faces
        .iter()
        .map(|face| face.area() * face.plane().signed_distance(&sample).abs())
        .sum::<f64>()
        / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    use crate::brush::{BuildContext, MapBrush};
    use crate::contents::Contents;
    use crate::hull::HullLibrary;
    use crate::plane_table::PlaneTable;

    fn make_set(brushes: &[MapBrush]) -> BrushSet {
        let planes = PlaneTable::new();
        let hulls = HullLibrary::default();
        let ctx = BuildContext {
            planes: &planes,
            hulls: &hulls,
            noclip: false,
            world_extent: 65536.0,
        };
        let mut set = BrushSet::default();
        set.add_entity(brushes, &ctx).unwrap();
        set
    }

    fn make_cube(brush: usize, contents: Contents, mins: [f64; 3], maxs: [f64; 3]) -> MapBrush {
        MapBrush::cuboid(7, brush, contents, Point3::from(mins), Point3::from(maxs), "wall")
    }

    #[test]
    fn cube_volume() {
        let set = make_set(&[make_cube(0, Contents::Solid, [0.0; 3], [2.0, 3.0, 4.0])]);
        assert_approx_eq!(solid_volume(set.brushes()[0].hull(0).faces()), 24.0, 1e-9);
        assert_eq!(solid_volume(&[]), 0.0);
    }

    #[test]
    fn identical_brushes_overlap_fully() {
        let set = make_set(&[
            make_cube(3, Contents::Solid, [0.0; 3], [8.0; 3]),
            make_cube(4, Contents::Solid, [0.0; 3], [8.0; 3]),
        ]);
        let reports = UnionAnalyzer::new(50.0).analyze_hull(&set, 0);
        assert_eq!(reports.len(), 1);
        assert_approx_eq!(reports[0].percent, 100.0, 1e-6);
        assert_approx_eq!(reports[0].overlap_volume, 512.0, 1e-6);
        assert_eq!(
            reports[0].to_string(),
            "Entity 7 : Brush 3 intersects with brush 4 by 100.000%"
        );
    }

    #[test]
    fn partial_overlap_uses_the_larger_ratio() {
        // a 4x8x8 slab entirely inside an 8x8x8 cube
        let set = make_set(&[
            make_cube(0, Contents::Solid, [0.0; 3], [8.0; 3]),
            make_cube(1, Contents::Solid, [2.0, 0.0, 0.0], [6.0, 8.0, 8.0]),
        ]);
        let reports = UnionAnalyzer::new(10.0).analyze_hull(&set, 0);
        assert_eq!(reports.len(), 1);
        assert_approx_eq!(reports[0].overlap_volume, 256.0, 1e-6);
        assert_approx_eq!(reports[0].percent, 100.0, 1e-6);
    }

    #[test]
    fn threshold_filters_small_overlaps() {
        let set = make_set(&[
            make_cube(0, Contents::Solid, [0.0; 3], [8.0; 3]),
            make_cube(1, Contents::Solid, [7.0, 0.0, 0.0], [15.0, 8.0, 8.0]),
        ]);
        // 1/8 of either brush
        assert!(UnionAnalyzer::new(20.0).analyze_hull(&set, 0).is_empty());
        let reports = UnionAnalyzer::new(10.0).analyze_hull(&set, 0);
        assert_eq!(reports.len(), 1);
        assert_approx_eq!(reports[0].percent, 12.5, 1e-6);
    }

    #[test]
    fn disjoint_touching_and_mixed_pairs_are_silent() {
        let set = make_set(&[
            make_cube(0, Contents::Solid, [0.0; 3], [8.0; 3]),
            make_cube(1, Contents::Solid, [8.0, 0.0, 0.0], [16.0, 8.0, 8.0]),
            make_cube(2, Contents::Solid, [100.0; 3], [108.0; 3]),
            make_cube(3, Contents::Water, [0.0; 3], [8.0; 3]),
        ]);
        assert!(UnionAnalyzer::new(0.0).analyze_hull(&set, 0).is_empty());
    }

    #[test]
    fn bevel_brushes_are_skipped() {
        let mut bevel = make_cube(1, Contents::Solid, [0.0; 3], [8.0; 3]);
        bevel.bevel = true;
        let set = make_set(&[make_cube(0, Contents::Solid, [0.0; 3], [8.0; 3]), bevel]);
        assert!(UnionAnalyzer::new(0.0).analyze(&set).is_empty());
    }

    #[test]
    fn reports_come_in_brush_order() {
        let brushes: Vec<MapBrush> = (0..6)
            .map(|i| make_cube(i, Contents::Solid, [0.0; 3], [8.0; 3]))
            .collect();
        let set = make_set(&brushes);
        let reports = UnionAnalyzer::new(50.0).analyze_hull(&set, 0);
        assert_eq!(reports.len(), 15);
        let pairs: Vec<(usize, usize)> = reports.iter().map(|r| (r.brush_id, r.other_id)).collect();
        let mut sorted = pairs.clone();
        sorted.sort();
        assert_eq!(pairs, sorted);
    }
}
