//! The CSG stage as a whole: build brushes entity by entity, then resolve.

use log::info;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::brush::{Brush, BrushSet, BuildContext, Face, MapBrush};
use crate::config::CsgConfig;
use crate::csg::{CsgResolver, FaceVisitor, UnionAnalyzer, UnionReport};
use crate::error::Result;
use crate::hull::{HullLibrary, NUM_HULLS};
use crate::plane_table::{PlaneTable, Planes};

/// Drives one CSG run.
///
/// ```ignore
/// let mut compiler = CsgCompiler::new(CsgConfig::default())?;
/// compiler.add_entity(&world_brushes)?;
/// let output = compiler.run()?;
/// for (brush, face) in output.hull_faces(0) { /* ... */ }
/// ```
pub struct CsgCompiler {
    config: CsgConfig,
    planes: PlaneTable,
    hulls: HullLibrary,
    brushes: BrushSet,
    pool: Option<ThreadPool>,
}

impl CsgCompiler {
    /// Creates a compiler, loading the configured hull file if any.
    pub fn new(config: CsgConfig) -> Result<Self> {
        let hulls = match &config.hull_file {
            Some(path) => HullLibrary::load(path)?,
            None => HullLibrary::default(),
        };
        Self::with_hulls(config, hulls)
    }

    /// Creates a compiler using `hulls` instead of the configured hull file.
    pub fn with_hulls(config: CsgConfig, hulls: HullLibrary) -> Result<Self> {
        let pool = config
            .threads
            .map(|threads| ThreadPoolBuilder::new().num_threads(threads).build())
            .transpose()?;
        Ok(Self {
            planes: PlaneTable::with_capacity(config.max_planes),
            brushes: BrushSet::new(config.max_brushes, config.max_sides),
            hulls,
            pool,
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &CsgConfig {
        &self.config
    }

    #[inline]
    pub fn planes(&self) -> &PlaneTable {
        &self.planes
    }

    #[inline]
    pub fn hulls(&self) -> &HullLibrary {
        &self.hulls
    }

    #[inline]
    pub fn brushes(&self) -> &BrushSet {
        &self.brushes
    }

    /// Builds the brushes of one entity. Returns the entity's index.
    pub fn add_entity(&mut self, map_brushes: &[MapBrush]) -> Result<usize> {
        let ctx = BuildContext {
            planes: &self.planes,
            hulls: &self.hulls,
            noclip: self.config.noclip,
            world_extent: self.config.world_extent,
        };
        let brushes = &mut self.brushes;
        install(self.pool.as_ref(), || brushes.add_entity(map_brushes, &ctx))
    }

    /// Drops the most recently added entity. Planes it interned stay in the
    /// table.
    pub fn remove_last_entity(&mut self) -> Option<Vec<Brush>> {
        self.brushes.remove_last_entity()
    }

    /// Runs the overlap diagnostics on the brushes built so far.
    pub fn analyze_unions(&self, threshold: f64) -> Vec<UnionReport> {
        let analyzer = UnionAnalyzer::new(threshold);
        install(self.pool.as_ref(), || analyzer.analyze(&self.brushes))
    }

    /// Resolves all hulls and hands the result over.
    pub fn run(mut self) -> Result<CsgOutput> {
        info!(
            "csg: {} entities, {} brushes, {} planes",
            self.brushes.entity_count(),
            self.brushes.len(),
            self.planes.len()
        );

        let union_reports = match self.config.brush_union_threshold {
            Some(threshold) => self.analyze_unions(threshold),
            None => Vec::new(),
        };

        let brushes = &mut self.brushes;
        install(self.pool.as_ref(), || CsgResolver::new().resolve_all(brushes));

        let output = CsgOutput {
            planes: self.planes.snapshot(),
            brushes: self.brushes,
            union_reports,
        };
        for hull in 0..NUM_HULLS {
            info!("hull {}: {} faces", hull, output.face_count(hull));
        }
        Ok(output)
    }
}

/// Runs `op` inside `pool`, or on the global pool when there is none.
fn install<T: Send>(pool: Option<&ThreadPool>, op: impl FnOnce() -> T + Send) -> T {
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Result of a CSG run: the final plane table and the resolved brushes.
#[derive(Debug, Clone)]
pub struct CsgOutput {
    planes: Planes,
    brushes: BrushSet,
    union_reports: Vec<UnionReport>,
}

impl CsgOutput {
    #[inline]
    pub fn planes(&self) -> &Planes {
        &self.planes
    }

    #[inline]
    pub fn brushes(&self) -> &BrushSet {
        &self.brushes
    }

    #[inline]
    pub fn union_reports(&self) -> &[UnionReport] {
        &self.union_reports
    }

    /// Iterates the faces of `hull` together with the brush they belong to.
    pub fn hull_faces(&self, hull: usize) -> impl Iterator<Item = (&Brush, &Face)> {
        self.brushes
            .brushes()
            .iter()
            .flat_map(move |brush| brush.hull(hull).faces().iter().map(move |face| (brush, face)))
    }

    /// Calls `visitor` once per brush with faces in `hull`, in brush order.
    pub fn visit_hull<V: FaceVisitor>(&self, hull: usize, visitor: &mut V) {
        for brush in self.brushes.brushes() {
            let faces = brush.hull(hull).faces();
            if !faces.is_empty() {
                visitor.visit(brush, faces);
            }
        }
    }

    pub fn face_count(&self, hull: usize) -> usize {
        self.brushes
            .brushes()
            .iter()
            .map(|brush| brush.hull(hull).faces().len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    use crate::contents::Contents;
    use crate::csg::{CollectingVisitor, FnVisitor};
    use crate::error::CsgError;

    fn make_cube(brush: usize, mins: [f64; 3], maxs: [f64; 3]) -> MapBrush {
        MapBrush::cuboid(0, brush, Contents::Solid, Point3::from(mins), Point3::from(maxs), "wall")
    }

    #[test]
    fn run_resolves_every_hull() {
        let mut compiler = CsgCompiler::new(CsgConfig::default()).unwrap();
        compiler
            .add_entity(&[make_cube(0, [0.0; 3], [8.0; 3]), make_cube(1, [0.0; 3], [8.0; 3])])
            .unwrap();
        let output = compiler.run().unwrap();

        for hull in 0..NUM_HULLS {
            assert_eq!(output.face_count(hull), 6);
            assert!(output.hull_faces(hull).all(|(brush, face)| brush.id() == 1 && face.used()));
        }
        assert!(output.union_reports().is_empty());
        // six plane pairs per hull, except hull 3 shares its x and y planes with hull 1
        assert_eq!(output.planes().len(), 2 * (6 + 6 + 6 + 2));
    }

    #[test]
    fn union_reports_are_collected_when_enabled() {
        let config = CsgConfig {
            brush_union_threshold: Some(50.0),
            threads: Some(2),
            ..CsgConfig::default()
        };
        let mut compiler = CsgCompiler::new(config).unwrap();
        compiler
            .add_entity(&[make_cube(0, [0.0; 3], [8.0; 3]), make_cube(1, [0.0; 3], [8.0; 3])])
            .unwrap();
        let output = compiler.run().unwrap();
        // the same pair overlaps in every hull
        assert_eq!(output.union_reports().len(), NUM_HULLS);
    }

    #[test]
    fn visitors_see_brushes_in_order() {
        let mut compiler = CsgCompiler::new(CsgConfig::default()).unwrap();
        compiler
            .add_entity(&[make_cube(0, [0.0; 3], [8.0; 3]), make_cube(1, [200.0; 3], [208.0; 3])])
            .unwrap();
        let output = compiler.run().unwrap();

        let mut collecting = CollectingVisitor::new();
        output.visit_hull(0, &mut collecting);
        assert_eq!(collecting.faces().len(), 12);

        let mut ids = Vec::new();
        output.visit_hull(2, &mut FnVisitor::new(|brush: &Brush, faces: &[Face]| {
            ids.push((brush.id(), faces.len()));
        }));
        assert_eq!(ids, vec![(0, 6), (1, 6)]);
    }

    #[test]
    fn removed_entity_is_not_compiled() {
        let mut compiler = CsgCompiler::new(CsgConfig::default()).unwrap();
        compiler.add_entity(&[make_cube(0, [0.0; 3], [8.0; 3])]).unwrap();
        compiler.add_entity(&[make_cube(0, [32.0; 3], [40.0; 3])]).unwrap();
        assert_eq!(compiler.remove_last_entity().map(|b| b.len()), Some(1));
        let output = compiler.run().unwrap();
        assert_eq!(output.brushes().len(), 1);
        assert_eq!(output.face_count(0), 6);
    }

    #[test]
    fn missing_hull_file_fails_construction() {
        let config = CsgConfig {
            hull_file: Some("/nonexistent/hulls.txt".into()),
            ..CsgConfig::default()
        };
        assert!(matches!(CsgCompiler::new(config), Err(CsgError::Io { .. })));
    }
}
