use log::debug;
use rayon::prelude::*;

use super::rule::{InsideFate, ResolutionRule, StandardRule};
use crate::brush::{Brush, BrushSet, Face};
use crate::hull::NUM_HULLS;

/// Removes the parts of brush faces hidden inside other brushes of the
/// same entity.
///
/// Every brush is resolved against the state of the set before resolution
/// started, so brushes can be processed in parallel and the result does
/// not depend on scheduling. Where two brushes have coplanar faces facing
/// the same way, the later brush keeps its face.
#[derive(Debug, Clone, Default)]
pub struct CsgResolver<R: ResolutionRule = StandardRule> {
    rule: R,
}

impl CsgResolver<StandardRule> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: ResolutionRule + Sync> CsgResolver<R> {
    pub fn with_rule(rule: R) -> Self {
        Self { rule }
    }

    /// Computes the resolved faces of every brush in `hull`, in brush order,
    /// without modifying the set.
    pub fn resolve_hull(&self, set: &BrushSet, hull: usize) -> Vec<Vec<Face>> {
        set.brushes()
            .par_iter()
            .map(|brush| self.resolve_brush(set, brush, hull))
            .collect()
    }

    /// Resolves `hull` and stores the result in the set.
    pub fn resolve(&self, set: &mut BrushSet, hull: usize) {
        let resolved = self.resolve_hull(set, hull);
        let mut count = 0;
        for (brush, faces) in set.brushes_mut().iter_mut().zip(resolved) {
            count += faces.len();
            brush.hull_mut(hull).faces = faces;
        }
        debug!("hull {}: {} faces after csg", hull, count);
    }

    /// Resolves every hull.
    pub fn resolve_all(&self, set: &mut BrushSet) {
        for hull in 0..NUM_HULLS {
            self.resolve(set, hull);
        }
    }

    fn resolve_brush(&self, set: &BrushSet, brush: &Brush, hull: usize) -> Vec<Face> {
        let own = brush.hull(hull);
        if own.is_empty() {
            return Vec::new();
        }

        let mut outside: Vec<Face> = own.faces().to_vec();
        for other in &set.brushes()[set.entity_range(brush.entity())] {
            if other.id() == brush.id() {
                continue;
            }
            let other_hull = other.hull(hull);
            if other_hull.is_empty()
                || other.detail_level() > brush.detail_level()
                || own.bounds().disjoint(other_hull.bounds())
            {
                continue;
            }
            let Some(inner) = other.contents().in_hull(hull) else {
                continue;
            };
            let later = other.id() > brush.id();

            let mut kept = Vec::with_capacity(outside.len());
            for face in outside {
                if face.bounds().disjoint(other_hull.bounds()) {
                    kept.push(face);
                    continue;
                }
                let (pieces, inside) = clip_inside(face, other_hull.faces(), later);
                kept.extend(pieces);
                let Some(inside) = inside else {
                    continue;
                };
                let fate = self.rule.inside(inside.contents_back(), inner);
                if let InsideFate::Keep(contents) = fate {
                    kept.push(Face {
                        contents_front: contents,
                        ..inside
                    });
                }
            }
            outside = kept;
        }

        let mirror = self.rule.mirrors(brush.contents(), hull);
        let capacity = if mirror { outside.len() * 2 } else { outside.len() };
        let mut resolved = Vec::with_capacity(capacity);
        for mut face in outside {
            face.used = true;
            if mirror {
                resolved.push(face.mirrored());
            }
            resolved.push(face);
        }
        resolved
    }
}

/// Splits `face` by the planes of another brush. Returns the fragments
/// outside that brush and the fragment inside it, if any.
///
/// A face lying on a face plane of the other brush counts as inside when
/// the other brush comes later (`later`) and as outside otherwise. A face
/// on the flipped plane of a face of the other brush is never cut by it.
fn clip_inside(face: Face, others: &[Face], later: bool) -> (Vec<Face>, Option<Face>) {
    let mut outside = Vec::new();
    let mut remaining = face;

    for other in others {
        if other.plane_index() == remaining.plane_index() {
            if later {
                continue;
            }
            outside.push(remaining);
            return (outside, None);
        }
        if other.plane_index() == remaining.plane_index().flipped() {
            continue;
        }

        let (front, back) = remaining.winding().clip(other.plane(), false);
        if let Some(front) = front {
            outside.push(remaining.with_winding(front));
        }
        match back {
            Some(back) => remaining = remaining.with_winding(back),
            None => return (outside, None),
        }
    }
    (outside, Some(remaining))
}
