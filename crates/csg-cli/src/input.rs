//! JSON brush file read by `brushcsg`.
//!
//! ```json
//! { "entities": [ { "classname": "worldspawn", "brushes": [ {
//!     "contents": "solid",
//!     "sides": [
//!         { "normal": [1, 0, 0], "distance": 64, "texture": { "name": "brick" } },
//!         { "points": [[0, 0, 0], [0, 0, 1], [0, 1, 0]] }
//!     ]
//! } ] } ] }
//! ```

use std::path::Path;

use brush_csg::{Contents, HullMask, MapBrush, MapSide, SideTexture, TextureProjection, NUM_HULLS};
use nalgebra::{Point3, Vector3};
use serde::Deserialize;

use crate::CliError;

#[derive(Debug, Deserialize)]
pub struct MapFile {
    pub entities: Vec<EntityInput>,
}

#[derive(Debug, Deserialize)]
pub struct EntityInput {
    #[serde(default)]
    pub classname: Option<String>,
    #[serde(default)]
    pub brushes: Vec<BrushInput>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrushInput {
    #[serde(default)]
    pub contents: Contents,
    pub sides: Vec<SideInput>,
    #[serde(default)]
    pub bevel: bool,
    #[serde(default)]
    pub detail_level: u32,
    /// Hull numbers the brush takes part in; all hulls if absent.
    #[serde(default)]
    pub hulls: Option<Vec<usize>>,
    /// Custom shape name per hull, `null` for the default.
    #[serde(default)]
    pub hull_shapes: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SideInput {
    #[serde(flatten)]
    pub geometry: SideGeometry,
    #[serde(default)]
    pub texture: TextureInput,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SideGeometry {
    Plane { normal: [f64; 3], distance: f64 },
    Points { points: [[f64; 3]; 3] },
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextureInput {
    pub name: String,
    pub shift: [f64; 2],
    pub rotation: f64,
    pub scale: [f64; 2],
    /// Explicit texture axes; both must be given.
    pub u_axis: Option<[f64; 3]>,
    pub v_axis: Option<[f64; 3]>,
}

impl Default for TextureInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            shift: [0.0, 0.0],
            rotation: 0.0,
            scale: [1.0, 1.0],
            u_axis: None,
            v_axis: None,
        }
    }
}

impl MapFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl EntityInput {
    /// The entity's classname, or `"unnamed"` when it has none.
    pub fn name(&self) -> &str {
        self.classname.as_deref().unwrap_or("unnamed")
    }

    /// Converts the brushes of entity number `entity`.
    pub fn to_map_brushes(&self, entity: usize) -> Result<Vec<MapBrush>, CliError> {
        self.brushes
            .iter()
            .enumerate()
            .map(|(number, brush)| brush.to_map_brush(entity, number))
            .collect()
    }
}

impl BrushInput {
    pub fn to_map_brush(&self, entity: usize, number: usize) -> Result<MapBrush, CliError> {
        let hull_mask = match &self.hulls {
            None => HullMask::ALL,
            Some(hulls) => hulls.iter().try_fold(HullMask::empty(), |mask, &hull| {
                if hull >= NUM_HULLS {
                    Err(CliError::InvalidHull { entity, brush: number, hull })
                } else {
                    Ok(mask | HullMask::for_hull(hull))
                }
            })?,
        };
        if self.hull_shapes.len() > NUM_HULLS {
            return Err(CliError::InvalidHull {
                entity,
                brush: number,
                hull: self.hull_shapes.len() - 1,
            });
        }

        let mut brush = MapBrush::new(entity, number, self.contents);
        brush.sides = self.sides.iter().map(SideInput::to_map_side).collect();
        brush.bevel = self.bevel;
        brush.detail_level = self.detail_level;
        brush.hull_mask = hull_mask;
        brush.hull_shapes =
            std::array::from_fn(|hull| self.hull_shapes.get(hull).cloned().flatten());
        Ok(brush)
    }
}

impl SideInput {
    fn to_map_side(&self) -> MapSide {
        let texture = self.texture.to_side_texture();
        match &self.geometry {
            SideGeometry::Plane { normal, distance } => {
                MapSide::new(Vector3::from(*normal), *distance, texture)
            }
            SideGeometry::Points { points } => {
                MapSide::from_points(points.map(Point3::from), texture)
            }
        }
    }
}

impl TextureInput {
    fn to_side_texture(&self) -> SideTexture {
        let projection = match (self.u_axis, self.v_axis) {
            (Some(u), Some(v)) => TextureProjection::Valve {
                u_axis: Vector3::from(u),
                v_axis: Vector3::from(v),
                shift: self.shift,
                rotation: self.rotation,
                scale: self.scale,
            },
            _ => TextureProjection::Standard {
                shift: self.shift,
                rotation: self.rotation,
                scale: self.scale,
            },
        };
        SideTexture {
            name: self.name.clone(),
            projection,
        }
    }
}
