//! Brush CSG stage of a BSP level compiler.
//!
//! Takes the convex brushes of a map, builds them for the point hull and
//! the three collision hulls, and removes the face area buried inside other
//! brushes. The result is a shared plane table plus per-hull face lists for
//! the partitioning stage.

mod bounds;
pub mod brush;
mod compile;
mod config;
mod contents;
pub mod csg;
mod error;
pub mod hull;
mod plane;
mod plane_table;
mod winding;

pub use bounds::{BoundingBox, BoundsRelation};
pub use brush::{
    Brush, BrushHull, BrushSet, Face, MapBrush, MapSide, SideTexture, TextureProjection,
};
pub use compile::{CsgCompiler, CsgOutput};
pub use config::{CsgConfig, DEFAULT_WORLD_EXTENT};
pub use contents::Contents;
pub use csg::{CsgResolver, FaceVisitor, UnionAnalyzer, UnionReport};
pub use error::{CsgError, Result};
pub use hull::{HullLibrary, HullMask, HullShape, NUM_HULLS};
pub use plane::{Plane, PlaneSide, PlaneType, DIST_EPSILON, NORMAL_EPSILON, ON_EPSILON};
pub use plane_table::{PlaneIndex, PlaneTable, Planes, MAX_MAP_PLANES};
pub use winding::{Winding, BOGUS_RANGE};
