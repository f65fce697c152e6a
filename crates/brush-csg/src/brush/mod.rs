//! Brushes and their per-hull faces.
//!
//! A parsed [`MapBrush`] becomes a [`Brush`] when it is added to a
//! [`BrushSet`]: its side planes are interned, one face is cut per plane,
//! and the result is grown into each collision hull. All brushes of an
//! entity are built in parallel.

mod build;
mod expand;
mod face;
mod input;
mod set;

pub use build::BuildContext;
pub use face::{BrushHull, Face};
pub use input::{MapBrush, MapSide, SideTexture, TextureProjection};
pub use set::{BrushSet, MAX_MAP_BRUSHES, MAX_MAP_SIDES};

use crate::contents::Contents;
use crate::hull::{HullMask, NUM_HULLS};
use crate::plane_table::PlaneIndex;

/// A brush side after its plane has been interned.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushSide {
    plane_index: PlaneIndex,
    texture: SideTexture,
}

impl BrushSide {
    #[inline]
    pub fn plane_index(&self) -> PlaneIndex {
        self.plane_index
    }

    #[inline]
    pub fn texture(&self) -> &SideTexture {
        &self.texture
    }
}

/// A convex brush, built for every hull.
#[derive(Debug, Clone)]
pub struct Brush {
    id: usize,
    entity: usize,
    original_entity: usize,
    original_brush: usize,
    contents: Contents,
    sides: Vec<BrushSide>,
    hulls: [BrushHull; NUM_HULLS],
    bevel: bool,
    detail_level: u32,
    hull_mask: HullMask,
    hull_shapes: [Option<String>; NUM_HULLS],
}

impl Brush {
    /// Position of the brush in its [`BrushSet`].
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Index of the entity the brush belongs to in its [`BrushSet`].
    #[inline]
    pub fn entity(&self) -> usize {
        self.entity
    }

    /// Entity number in the source map.
    #[inline]
    pub fn original_entity(&self) -> usize {
        self.original_entity
    }

    /// Brush number within its entity in the source map.
    #[inline]
    pub fn original_brush(&self) -> usize {
        self.original_brush
    }

    #[inline]
    pub fn contents(&self) -> Contents {
        self.contents
    }

    #[inline]
    pub fn sides(&self) -> &[BrushSide] {
        &self.sides
    }

    /// Returns the faces of the brush in `hull`.
    ///
    /// # Panics
    /// Panics if `hull >= NUM_HULLS`.
    #[inline]
    pub fn hull(&self, hull: usize) -> &BrushHull {
        &self.hulls[hull]
    }

    #[inline]
    pub(crate) fn hull_mut(&mut self, hull: usize) -> &mut BrushHull {
        &mut self.hulls[hull]
    }

    #[inline]
    pub fn is_bevel(&self) -> bool {
        self.bevel
    }

    #[inline]
    pub fn detail_level(&self) -> u32 {
        self.detail_level
    }

    #[inline]
    pub fn hull_mask(&self) -> HullMask {
        self.hull_mask
    }

    /// Name of the custom shape requested for `hull`, if any.
    #[inline]
    pub fn hull_shape(&self, hull: usize) -> Option<&str> {
        self.hull_shapes[hull].as_deref()
    }
}
