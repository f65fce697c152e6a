use log::warn;

use super::expand::expand;
use super::face::{BrushHull, Face};
use super::input::MapBrush;
use super::{Brush, BrushSide};
use crate::contents::Contents;
use crate::error::Result;
use crate::hull::{HullLibrary, HullShape, NUM_HULLS};
use crate::plane::Plane;
use crate::plane_table::{PlaneIndex, PlaneTable};
use crate::winding::{Winding, BOGUS_RANGE};

/// Shared, read-only state needed to build brushes. The plane table is the
/// only part written to, through its own lock.
pub struct BuildContext<'a> {
    pub planes: &'a PlaneTable,
    pub hulls: &'a HullLibrary,
    /// Skip the collision hulls entirely.
    pub noclip: bool,
    /// Hulls reaching beyond this coordinate are dropped.
    pub world_extent: f64,
}

/// A plane that may bound a hull, already interned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    index: PlaneIndex,
    plane: Plane,
    is_bevel: bool,
    side: Option<usize>,
}

impl Candidate {
    pub(crate) fn new(
        planes: &PlaneTable,
        plane: Plane,
        is_bevel: bool,
        side: Option<usize>,
    ) -> Result<Self> {
        let index = planes.intern_plane(&plane)?;
        Ok(Self {
            index,
            plane: planes.plane(index),
            is_bevel,
            side,
        })
    }
}

/// Cuts one winding per candidate down to the convex solid all candidates
/// bound. Returns no faces if the solid is degenerate.
pub(crate) fn make_faces(candidates: &[Candidate], contents: Contents) -> Vec<Face> {
    let mut unique: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        // the first occurrence wins, so brush sides beat bevels on the same plane
        if !unique.iter().any(|c| c.index == candidate.index) {
            unique.push(*candidate);
        }
    }

    let faces: Vec<Face> = unique
        .iter()
        .filter_map(|candidate| {
            let mut winding = Some(Winding::from_plane(&candidate.plane));
            for other in &unique {
                if other.index == candidate.index {
                    continue;
                }
                winding = winding.and_then(|w| w.chop(&other.plane));
            }
            winding.map(|w| {
                Face::new(
                    w,
                    candidate.index,
                    candidate.plane,
                    contents,
                    candidate.is_bevel,
                    candidate.side,
                )
            })
        })
        .collect();

    // a solid still touching the initial windings is open on some side
    let open = faces
        .iter()
        .any(|face| face.bounds.exceeds(BOGUS_RANGE * 0.5));
    if faces.len() < 4 || open {
        return Vec::new();
    }
    faces
}

/// Builds every hull of one parsed brush. `id` is the brush's position in
/// the brush set and `entity` the index of its entity there.
pub(crate) fn build_brush(
    id: usize,
    entity: usize,
    map: &MapBrush,
    ctx: &BuildContext,
) -> Result<Brush> {
    let mut sides: Vec<BrushSide> = Vec::with_capacity(map.sides.len());
    let mut candidates = Vec::with_capacity(map.sides.len());

    for (number, side) in map.sides.iter().enumerate() {
        let plane = match Plane::new(side.normal, side.dist) {
            Some(plane) => plane,
            None => {
                warn!(
                    "Entity {}, Brush {}, Side {}: plane with no normal",
                    map.entity, map.brush, number
                );
                continue;
            }
        };
        let candidate = Candidate::new(ctx.planes, plane, map.bevel, Some(sides.len()))?;
        if sides.iter().any(|s| s.plane_index == candidate.index) {
            warn!(
                "Entity {}, Brush {}, Side {}: duplicate plane",
                map.entity, map.brush, number
            );
            continue;
        }
        if sides.iter().any(|s| s.plane_index == candidate.index.flipped()) {
            warn!(
                "Entity {}, Brush {}: mirrored plane pair on side {}",
                map.entity, map.brush, number
            );
        }
        sides.push(BrushSide {
            plane_index: candidate.index,
            texture: side.texture.clone(),
        });
        candidates.push(candidate);
    }

    let base = make_faces(&candidates, map.contents);
    if base.is_empty() && map.contents != Contents::Origin {
        warn!(
            "Entity {}, Brush {}: brush has no volume",
            map.entity, map.brush
        );
    }

    let mut hulls: [BrushHull; NUM_HULLS] = Default::default();
    for (hull, slot) in hulls.iter_mut().enumerate() {
        if base.is_empty() || !map.hull_mask.includes(hull) || (hull > 0 && ctx.noclip) {
            continue;
        }
        let Some(contents) = map.contents.in_hull(hull) else {
            continue;
        };

        let faces = if hull == 0 {
            if map.bevel {
                continue;
            }
            base.clone()
        } else {
            let shape = hull_shape(map, hull, ctx.hulls);
            make_faces(&expand(&base, shape, ctx.planes)?, contents)
        };
        if faces.is_empty() {
            warn!(
                "Entity {}, Brush {}: hull {} is degenerate",
                map.entity, map.brush, hull
            );
            continue;
        }

        let built = BrushHull::from_faces(
            faces
                .into_iter()
                .map(|face| Face {
                    contents_back: contents,
                    ..face
                })
                .collect(),
        );
        if built.bounds.exceeds(ctx.world_extent) {
            warn!(
                "Entity {}, Brush {}: hull {} extends beyond the world limit of {}",
                map.entity, map.brush, hull, ctx.world_extent
            );
            continue;
        }
        *slot = built;
    }

    Ok(Brush {
        id,
        entity,
        original_entity: map.entity,
        original_brush: map.brush,
        contents: map.contents,
        sides,
        hulls,
        bevel: map.bevel,
        detail_level: map.detail_level,
        hull_mask: map.hull_mask,
        hull_shapes: map.hull_shapes.clone(),
    })
}

/// Picks the shape a brush is grown by in `hull`.
fn hull_shape<'a>(map: &MapBrush, hull: usize, library: &'a HullLibrary) -> &'a HullShape {
    match map.hull_shapes[hull].as_deref() {
        None => library.hull(hull),
        Some(name) => library.custom(name).unwrap_or_else(|| {
            warn!(
                "Entity {}, Brush {}: unknown hull shape `{}`, using hull {}",
                map.entity, map.brush, name, hull
            );
            library.hull(hull)
        }),
    }
}
