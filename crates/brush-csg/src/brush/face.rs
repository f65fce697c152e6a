//! Faces and the per-hull face lists of a brush.

use crate::bounds::BoundingBox;
use crate::contents::Contents;
use crate::plane::Plane;
use crate::plane_table::PlaneIndex;
use crate::winding::Winding;

/// One polygon of a brush hull.
///
/// The face's plane normal points out of the brush: `contents_back` is the
/// brush itself and `contents_front` is whatever the face looks into. CSG
/// only ever changes the front contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub(crate) winding: Winding,
    pub(crate) plane_index: PlaneIndex,
    pub(crate) plane: Plane,
    pub(crate) bounds: BoundingBox,
    pub(crate) contents_front: Contents,
    pub(crate) contents_back: Contents,
    pub(crate) is_bevel: bool,
    pub(crate) used: bool,
    pub(crate) side: Option<usize>,
}

impl Face {
    pub(crate) fn new(
        winding: Winding,
        plane_index: PlaneIndex,
        plane: Plane,
        contents: Contents,
        is_bevel: bool,
        side: Option<usize>,
    ) -> Self {
        Self {
            bounds: winding.bounds(),
            winding,
            plane_index,
            plane,
            contents_front: Contents::Empty,
            contents_back: contents,
            is_bevel,
            used: false,
            side,
        }
    }

    /// Returns a copy of this face carrying a different (clipped) winding.
    pub(crate) fn with_winding(&self, winding: Winding) -> Self {
        Self {
            bounds: winding.bounds(),
            winding,
            ..self.clone()
        }
    }

    /// The same polygon seen from the other side: flipped plane, reversed
    /// winding and swapped contents.
    pub(crate) fn mirrored(&self) -> Self {
        Self {
            winding: self.winding.reversed(),
            plane_index: self.plane_index.flipped(),
            plane: self.plane.flipped(),
            bounds: self.bounds,
            contents_front: self.contents_back,
            contents_back: self.contents_front,
            is_bevel: self.is_bevel,
            used: self.used,
            side: self.side,
        }
    }

    #[inline]
    pub fn winding(&self) -> &Winding {
        &self.winding
    }

    #[inline]
    pub fn plane_index(&self) -> PlaneIndex {
        self.plane_index
    }

    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Contents on the side the normal points to.
    #[inline]
    pub fn contents_front(&self) -> Contents {
        self.contents_front
    }

    /// Contents behind the face, i.e. of the brush it belongs to.
    #[inline]
    pub fn contents_back(&self) -> Contents {
        self.contents_back
    }

    /// Bevel faces only bound collision hulls and are never drawn.
    #[inline]
    pub fn is_bevel(&self) -> bool {
        self.is_bevel
    }

    /// Set on every face that survived CSG resolution.
    #[inline]
    pub fn used(&self) -> bool {
        self.used
    }

    /// Index of the originating brush side; `None` for generated bevels.
    #[inline]
    pub fn side(&self) -> Option<usize> {
        self.side
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.winding.area()
    }
}

/// The faces of a brush in one hull.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrushHull {
    pub(crate) bounds: BoundingBox,
    pub(crate) faces: Vec<Face>,
}

impl BrushHull {
    pub(crate) fn from_faces(faces: Vec<Face>) -> Self {
        let mut bounds = BoundingBox::empty();
        for face in &faces {
            bounds.extend_box(&face.bounds);
        }
        Self { bounds, faces }
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Bounds of the hull as built, before CSG clipped any face away.
    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// True if the brush takes no part in this hull.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Returns true if one of the faces lies on `index`.
    pub fn has_plane(&self, index: PlaneIndex) -> bool {
        self.faces.iter().any(|face| face.plane_index == index)
    }
}
