//! JSON report written by `brushcsg`.

use brush_csg::csg::FnVisitor;
use brush_csg::{Brush, Contents, CsgOutput, Face, NUM_HULLS};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Report {
    pub stats: Stats,
    pub planes: Vec<PlaneOut>,
    pub hulls: Vec<HullOut>,
    pub union_warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub entities: usize,
    pub brushes: usize,
    pub planes: usize,
    pub faces: [usize; NUM_HULLS],
}

#[derive(Debug, Serialize)]
pub struct PlaneOut {
    pub normal: [f64; 3],
    pub dist: f64,
}

#[derive(Debug, Serialize)]
pub struct HullOut {
    pub hull: usize,
    pub faces: Vec<FaceOut>,
}

#[derive(Debug, Serialize)]
pub struct FaceOut {
    pub entity: usize,
    pub brush: usize,
    pub plane: usize,
    pub contents_front: Contents,
    pub contents_back: Contents,
    pub bevel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    pub points: Vec<[f64; 3]>,
}

impl FaceOut {
    fn new(brush: &Brush, face: &Face) -> Self {
        Self {
            entity: brush.original_entity(),
            brush: brush.original_brush(),
            plane: face.plane_index().index(),
            contents_front: face.contents_front(),
            contents_back: face.contents_back(),
            bevel: face.is_bevel(),
            texture: face
                .side()
                .and_then(|side| brush.sides().get(side))
                .map(|side| side.texture().name.clone()),
            points: face.winding().points().iter().map(|p| [p.x, p.y, p.z]).collect(),
        }
    }
}

impl Report {
    pub fn from_output(output: &CsgOutput) -> Self {
        let hulls: Vec<HullOut> = (0..NUM_HULLS)
            .map(|hull| {
                let mut faces = Vec::new();
                output.visit_hull(
                    hull,
                    &mut FnVisitor::new(|brush: &Brush, brush_faces: &[Face]| {
                        faces.extend(brush_faces.iter().map(|face| FaceOut::new(brush, face)));
                    }),
                );
                HullOut { hull, faces }
            })
            .collect();

        Self {
            stats: Stats {
                entities: output.brushes().entity_count(),
                brushes: output.brushes().len(),
                planes: output.planes().len(),
                faces: std::array::from_fn(|hull| hulls[hull].faces.len()),
            },
            planes: output
                .planes()
                .iter()
                .map(|(_, plane)| {
                    let n = plane.normal();
                    PlaneOut {
                        normal: [n.x, n.y, n.z],
                        dist: plane.dist(),
                    }
                })
                .collect(),
            hulls,
            union_warnings: output.union_reports().iter().map(ToString::to_string).collect(),
        }
    }
}
