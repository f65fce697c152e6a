//! Rules for face fragments buried inside other brushes.
//!
//! Clipping a face against an overlapping brush leaves the part of the face
//! inside that brush. Most of the time nobody can see it and it is dropped,
//! but a solid wall reaching into water is visible from within the water.

use crate::contents::Contents;

/// What happens to a face fragment lying inside another brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsideFate {
    /// The fragment is hidden and dropped.
    Discard,
    /// The fragment is kept, facing the given contents.
    Keep(Contents),
}

/// Strategy deciding how overlapping contents interact.
pub trait ResolutionRule {
    /// Decides the fate of a fragment of a brush with contents `outer`
    /// that lies inside a brush with contents `inner`.
    fn inside(&self, outer: Contents, inner: Contents) -> InsideFate;

    /// Returns true if faces of a brush with `contents` in `hull` also need
    /// a copy facing inward, so the brush can be seen from inside.
    fn mirrors(&self, contents: Contents, hull: usize) -> bool;
}

/// Solids stay visible inside liquids, and liquid and translucent surfaces
/// are visible from both sides.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRule;

impl ResolutionRule for StandardRule {
    fn inside(&self, outer: Contents, inner: Contents) -> InsideFate {
        if outer == Contents::Solid && inner.is_liquid() {
            InsideFate::Keep(inner)
        } else {
            InsideFate::Discard
        }
    }

    fn mirrors(&self, contents: Contents, hull: usize) -> bool {
        hull == 0 && (contents.is_liquid() || contents == Contents::Translucent)
    }
}
