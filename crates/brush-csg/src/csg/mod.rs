//! Constructive solid geometry between the brushes of an entity.
//!
//! Once every brush of a map has been built, overlapping brushes are
//! resolved hull by hull so that no visible face remains buried inside
//! another brush. Before that, an optional diagnostic pass reports pairs of
//! brushes that overlap by a large part of their volume, which usually
//! points at a mapping mistake.
//!
//! # Example
//!
//! ```ignore
//! use brush_csg::csg::{CollectingVisitor, CsgResolver, UnionAnalyzer};
//!
//! let reports = UnionAnalyzer::new(10.0).analyze(&brushes);
//! CsgResolver::new().resolve_all(&mut brushes);
//!
//! let mut visitor = CollectingVisitor::new();
//! for brush in brushes.brushes() {
//!     visitor.visit(brush, brush.hull(0).faces());
//! }
//! let faces = visitor.into_faces();
//! ```
//!
//! # Architecture
//!
//! - [`CsgResolver`]: clips faces of each brush against the other brushes
//! - [`ResolutionRule`]: strategy deciding the fate of buried fragments
//! - [`UnionAnalyzer`]: overlap volume diagnostics
//! - [`FaceVisitor`]: visitor trait for consuming the resolved faces

mod resolve;
mod rule;
mod union;
mod visitor;

pub use resolve::CsgResolver;
pub use rule::{InsideFate, ResolutionRule, StandardRule};
pub use union::{solid_volume, UnionAnalyzer, UnionReport};
pub use visitor::{CollectingVisitor, FaceVisitor, FnVisitor};
