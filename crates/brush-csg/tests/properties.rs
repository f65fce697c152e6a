use assert_approx_eq::assert_approx_eq;
use brush_csg::{
    BoundingBox, BoundsRelation, Contents, CsgCompiler, CsgConfig, CsgError, MapBrush, MapSide,
    Plane, PlaneTable, SideTexture, UnionAnalyzer, Winding,
};
use nalgebra::{Point3, Vector3};

fn make_cube(
    entity: usize,
    brush: usize,
    contents: Contents,
    mins: [f64; 3],
    maxs: [f64; 3],
) -> MapBrush {
    MapBrush::cuboid(entity, brush, contents, Point3::from(mins), Point3::from(maxs), "wall")
}

fn make_compiler(config: CsgConfig, entities: &[Vec<MapBrush>]) -> CsgCompiler {
    let mut compiler = CsgCompiler::new(config).unwrap();
    for brushes in entities {
        compiler.add_entity(brushes).unwrap();
    }
    compiler
}

#[test]
fn interning_is_idempotent_and_tolerant() {
    let table = PlaneTable::new();
    let normal = Vector3::new(0.3, -0.4, 0.866).normalize();
    let a = table.intern(normal, 120.25).unwrap();
    let b = table.intern(normal, 120.25).unwrap();
    let c = table.intern(normal + Vector3::new(1e-7, -1e-7, 0.0), 120.25 + 1e-4).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);

    let flipped = table.intern(-normal, -120.25).unwrap();
    assert_eq!(flipped, a.flipped());
    assert_eq!(flipped.index(), a.index() ^ 1);
}

#[test]
fn clipping_conserves_area() {
    let square = Winding::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(10.0, 0.0, 0.0),
        Point3::new(10.0, 10.0, 0.0),
        Point3::new(0.0, 10.0, 0.0),
    ]);
    let plane = Plane::new(Vector3::new(1.0, 1.0, 0.0), 7.0).unwrap();
    let (front, back) = square.clip(&plane, false);
    let (front, back) = (front.unwrap(), back.unwrap());
    assert_approx_eq!(front.area() + back.area(), square.area(), 1e-9);

    // the front fragment lies wholly in front now
    let (again, none) = front.clip(&plane, false);
    assert_eq!(again, Some(front.clone()));
    assert!(none.is_none());

    let far = Plane::new(Vector3::x(), 50.0).unwrap();
    assert_eq!(square.clip(&far, false), (None, Some(square.clone())));
}

#[test]
fn box_against_itself_is_subset() {
    let a = BoundingBox::new(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0));
    assert_eq!(a.classify(&a), BoundsRelation::Subset);
}

#[test]
fn unit_cube_has_six_unit_faces() {
    let compiler = make_compiler(
        CsgConfig::default(),
        &[vec![make_cube(0, 0, Contents::Solid, [0.0; 3], [1.0; 3])]],
    );
    let output = compiler.run().unwrap();
    let faces: Vec<_> = output.hull_faces(0).collect();
    assert_eq!(faces.len(), 6);
    for (_, face) in faces {
        assert_approx_eq!(face.area(), 1.0, 1e-9);
    }
}

#[test]
fn identical_brushes_overlap_fully_and_one_vanishes() {
    let config = CsgConfig {
        brush_union_threshold: Some(90.0),
        ..CsgConfig::default()
    };
    let compiler = make_compiler(
        config,
        &[vec![
            make_cube(0, 0, Contents::Solid, [0.0; 3], [32.0; 3]),
            make_cube(0, 1, Contents::Solid, [0.0; 3], [32.0; 3]),
        ]],
    );
    let output = compiler.run().unwrap();

    let point_reports: Vec<_> = output.union_reports().iter().filter(|r| r.hull == 0).collect();
    assert_eq!(point_reports.len(), 1);
    assert_approx_eq!(point_reports[0].percent, 100.0, 1e-6);

    let brushes = output.brushes().brushes();
    assert!(brushes[0].hull(0).faces().is_empty());
    assert_eq!(brushes[1].hull(0).faces().len(), 6);
}

#[test]
fn disjoint_brushes_are_untouched() {
    let config = CsgConfig {
        brush_union_threshold: Some(0.0),
        ..CsgConfig::default()
    };
    let entity = vec![
        make_cube(0, 0, Contents::Solid, [0.0; 3], [16.0; 3]),
        make_cube(0, 1, Contents::Solid, [512.0; 3], [528.0; 3]),
    ];
    let compiler = make_compiler(config, &[entity]);
    let before: Vec<Vec<Winding>> = compiler
        .brushes()
        .brushes()
        .iter()
        .map(|b| b.hull(0).faces().iter().map(|f| f.winding().clone()).collect())
        .collect();

    let output = compiler.run().unwrap();
    assert!(output.union_reports().is_empty());
    for (brush, windings) in output.brushes().brushes().iter().zip(before) {
        let after: Vec<Winding> =
            brush.hull(0).faces().iter().map(|f| f.winding().clone()).collect();
        assert_eq!(after, windings);
    }
}

#[test]
fn player_hull_grows_by_box_size() {
    let compiler = make_compiler(
        CsgConfig::default(),
        &[vec![make_cube(0, 0, Contents::Solid, [-40.0, 8.0, 0.0], [24.0, 72.0, 128.0])]],
    );
    let brush = &compiler.brushes().brushes()[0];
    let growth = brush.hull(1).bounds().size() - brush.hull(0).bounds().size();
    assert_approx_eq!(growth.x, 32.0, 1e-9);
    assert_approx_eq!(growth.y, 32.0, 1e-9);
    assert_approx_eq!(growth.z, 72.0, 1e-9);
}

#[test]
fn plane_overflow_is_reported() {
    let config = CsgConfig {
        // exactly the six plane pairs of one cube
        max_planes: 12,
        noclip: true,
        ..CsgConfig::default()
    };
    let mut compiler = CsgCompiler::new(config).unwrap();
    compiler
        .add_entity(&[make_cube(0, 0, Contents::Solid, [0.0; 3], [8.0; 3])])
        .unwrap();
    let result = compiler.add_entity(&[make_cube(1, 0, Contents::Solid, [16.0; 3], [24.0; 3])]);
    assert!(matches!(result, Err(CsgError::PlaneOverflow { limit: 12 })));
}

#[test]
fn brush_and_side_overflow_are_reported() {
    let config = CsgConfig {
        max_brushes: 1,
        ..CsgConfig::default()
    };
    let mut compiler = CsgCompiler::new(config).unwrap();
    let result = compiler.add_entity(&[
        make_cube(0, 0, Contents::Solid, [0.0; 3], [8.0; 3]),
        make_cube(0, 1, Contents::Solid, [16.0; 3], [24.0; 3]),
    ]);
    assert!(matches!(result, Err(CsgError::BrushOverflow { limit: 1 })));

    let config = CsgConfig {
        max_sides: 5,
        ..CsgConfig::default()
    };
    let mut compiler = CsgCompiler::new(config).unwrap();
    let result = compiler.add_entity(&[make_cube(0, 0, Contents::Solid, [0.0; 3], [8.0; 3])]);
    assert!(matches!(result, Err(CsgError::SideOverflow { limit: 5 })));
}

#[test]
fn entity_removal_restores_counts() {
    let mut compiler = make_compiler(
        CsgConfig::default(),
        &[vec![make_cube(0, 0, Contents::Solid, [0.0; 3], [8.0; 3])]],
    );
    compiler
        .add_entity(&[
            make_cube(1, 0, Contents::Solid, [0.0; 3], [8.0; 3]),
            make_cube(1, 1, Contents::Water, [8.0; 3], [16.0; 3]),
        ])
        .unwrap();
    assert_eq!(compiler.brushes().side_count(), 18);

    compiler.remove_last_entity();
    assert_eq!(compiler.brushes().len(), 1);
    assert_eq!(compiler.brushes().side_count(), 6);
    assert_eq!(compiler.brushes().entity_count(), 1);
}

#[test]
fn solid_inside_water_faces_the_water() {
    let compiler = make_compiler(
        CsgConfig::default(),
        &[vec![
            make_cube(0, 0, Contents::Water, [0.0; 3], [64.0; 3]),
            make_cube(0, 1, Contents::Solid, [16.0; 3], [32.0; 3]),
        ]],
    );
    let output = compiler.run().unwrap();
    let pillar: Vec<_> = output.hull_faces(0).filter(|(b, _)| b.id() == 1).collect();
    assert_eq!(pillar.len(), 6);
    for (_, face) in pillar {
        assert_eq!(face.contents_front(), Contents::Water);
        assert_eq!(face.contents_back(), Contents::Solid);
    }
}

#[test]
fn touching_solids_lose_the_shared_area() {
    let compiler = make_compiler(
        CsgConfig::default(),
        &[vec![
            make_cube(0, 0, Contents::Solid, [0.0; 3], [16.0; 3]),
            make_cube(0, 1, Contents::Solid, [16.0, 0.0, 0.0], [32.0, 16.0, 16.0]),
        ]],
    );
    let output = compiler.run().unwrap();
    let area: f64 = output.hull_faces(0).map(|(_, f)| f.area()).sum();
    // the outer surface of a 32x16x16 box
    assert_approx_eq!(area, 2.0 * (512.0 + 512.0 + 256.0), 1e-6);
}

#[test]
fn three_point_sides_build_the_same_brush() {
    let texture = || SideTexture::named("stone");
    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
    let side = |points: [Point3<f64>; 3]| MapSide::from_points(points, texture());
    let brush = MapBrush::new(0, 0, Contents::Solid)
        .with_side(side([p(8.0, 0.0, 0.0), p(8.0, 1.0, 0.0), p(8.0, 0.0, 1.0)]))
        .with_side(side([p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0), p(0.0, 1.0, 0.0)]))
        .with_side(side([p(0.0, 8.0, 0.0), p(0.0, 8.0, 1.0), p(1.0, 8.0, 0.0)]))
        .with_side(side([p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 0.0, 1.0)]))
        .with_side(side([p(0.0, 0.0, 8.0), p(1.0, 0.0, 8.0), p(0.0, 1.0, 8.0)]))
        .with_side(side([p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(1.0, 0.0, 0.0)]));
    let compiler = make_compiler(CsgConfig::default(), &[vec![brush]]);
    let hull = compiler.brushes().brushes()[0].hull(0);
    assert_eq!(hull.faces().len(), 6);
    assert_eq!(hull.bounds().mins(), Point3::new(0.0, 0.0, 0.0));
    assert_eq!(hull.bounds().maxs(), Point3::new(8.0, 8.0, 8.0));
}

#[test]
fn union_analysis_runs_without_a_compile() {
    let compiler = make_compiler(
        CsgConfig::default(),
        &[vec![
            make_cube(3, 0, Contents::Solid, [0.0; 3], [8.0; 3]),
            make_cube(3, 1, Contents::Solid, [0.0, 0.0, 4.0], [8.0, 8.0, 12.0]),
        ]],
    );
    let reports = UnionAnalyzer::new(25.0).analyze_hull(compiler.brushes(), 0);
    assert_eq!(reports.len(), 1);
    assert_approx_eq!(reports[0].percent, 50.0, 1e-6);
    assert_eq!(reports[0].to_string(), "Entity 3 : Brush 0 intersects with brush 1 by 50.000%");
}
