//! Brush contents and which hulls each kind takes part in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What fills the volume of a brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contents {
    Empty,
    #[default]
    Solid,
    Water,
    Slime,
    Lava,
    Sky,
    /// Invisible player/monster clipping; solid in the expanded hulls only.
    Clip,
    /// Marks an entity's rotation origin; produces no geometry.
    Origin,
    /// See-through solid; rendered but not collided with.
    Translucent,
}

impl Contents {
    /// Water, slime and lava.
    #[inline]
    pub fn is_liquid(self) -> bool {
        matches!(self, Contents::Water | Contents::Slime | Contents::Lava)
    }

    /// Returns the contents this brush has in `hull`, or `None` if the
    /// brush is not part of that hull at all.
    pub fn in_hull(self, hull: usize) -> Option<Contents> {
        match (self, hull) {
            (Contents::Origin | Contents::Empty, _) => None,
            (Contents::Clip, 0) => None,
            (Contents::Clip, _) => Some(Contents::Solid),
            (c, 0) => Some(c),
            // liquids and translucent brushes are not solid to movement
            (c, _) if c.is_liquid() || c == Contents::Translucent => None,
            (c, _) => Some(c),
        }
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Contents::Empty => "empty",
            Contents::Solid => "solid",
            Contents::Water => "water",
            Contents::Slime => "slime",
            Contents::Lava => "lava",
            Contents::Sky => "sky",
            Contents::Clip => "clip",
            Contents::Origin => "origin",
            Contents::Translucent => "translucent",
        };
        f.write_str(name)
    }
}
