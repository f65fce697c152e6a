//! Brush records as handed over by the map parser.

use nalgebra::{Point3, Vector3};

use crate::contents::Contents;
use crate::hull::{HullMask, NUM_HULLS};

/// How a texture is projected onto a side. Carried through the CSG stage
/// untouched; texture axes are computed later.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureProjection {
    /// Axes derived from the side's plane, adjusted by shift/rotation/scale.
    Standard {
        shift: [f64; 2],
        rotation: f64,
        scale: [f64; 2],
    },
    /// Explicit texture axes as written by Valve's map format.
    Valve {
        u_axis: Vector3<f64>,
        v_axis: Vector3<f64>,
        shift: [f64; 2],
        rotation: f64,
        scale: [f64; 2],
    },
}

impl Default for TextureProjection {
    fn default() -> Self {
        TextureProjection::Standard {
            shift: [0.0, 0.0],
            rotation: 0.0,
            scale: [1.0, 1.0],
        }
    }
}

/// Texture assignment of one brush side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideTexture {
    pub name: String,
    pub projection: TextureProjection,
}

impl SideTexture {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            projection: TextureProjection::default(),
        }
    }
}

/// One bounding plane `normal · p = dist` of a parsed brush, normal pointing
/// out of the brush. The normal need not be unit length.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSide {
    pub normal: Vector3<f64>,
    pub dist: f64,
    pub texture: SideTexture,
}

impl MapSide {
    pub fn new(normal: Vector3<f64>, dist: f64, texture: SideTexture) -> Self {
        Self {
            normal,
            dist,
            texture,
        }
    }

    /// A side through three points, normal by the right-hand rule.
    /// Collinear points give a zero normal, which brush building skips.
    pub fn from_points(points: [Point3<f64>; 3], texture: SideTexture) -> Self {
        let [a, b, c] = points;
        let normal = (b - a).cross(&(c - a));
        let length = normal.norm();
        if length == 0.0 {
            return Self::new(Vector3::zeros(), 0.0, texture);
        }
        let normal = normal / length;
        Self::new(normal, normal.dot(&a.coords), texture)
    }
}

/// A brush as parsed from the map, before any plane is interned.
#[derive(Debug, Clone, PartialEq)]
pub struct MapBrush {
    /// Entity number in the source map, used in diagnostics.
    pub entity: usize,
    /// Brush number within its entity in the source map.
    pub brush: usize,
    pub contents: Contents,
    pub sides: Vec<MapSide>,
    /// The brush only exists to bevel collision hulls; it is never rendered.
    pub bevel: bool,
    /// Brushes never clip faces of brushes with a lower detail level.
    pub detail_level: u32,
    pub hull_mask: HullMask,
    /// Custom hull shape per hull, by name.
    pub hull_shapes: [Option<String>; NUM_HULLS],
}

impl MapBrush {
    pub fn new(entity: usize, brush: usize, contents: Contents) -> Self {
        Self {
            entity,
            brush,
            contents,
            sides: Vec::new(),
            bevel: false,
            detail_level: 0,
            hull_mask: HullMask::ALL,
            hull_shapes: Default::default(),
        }
    }

    /// An axis-aligned box brush with every side textured `texture`.
    pub fn cuboid(
        entity: usize,
        brush: usize,
        contents: Contents,
        mins: Point3<f64>,
        maxs: Point3<f64>,
        texture: &str,
    ) -> Self {
        let mut map_brush = Self::new(entity, brush, contents);
        for axis in 0..3 {
            let mut normal = Vector3::zeros();
            normal[axis] = 1.0;
            map_brush.sides.push(MapSide::new(normal, maxs[axis], SideTexture::named(texture)));
            map_brush.sides.push(MapSide::new(-normal, -mins[axis], SideTexture::named(texture)));
        }
        map_brush
    }

    pub fn with_side(mut self, side: MapSide) -> Self {
        self.sides.push(side);
        self
    }
}
