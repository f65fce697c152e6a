//! Shared visualization utilities for the CSG viewer.

use std::hash::{Hash, Hasher};

use brush_csg::{Contents, Face, MapBrush, MapSide, SideTexture};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};

pub mod navigator;
pub use navigator::HullNavigator;

/// Base colour of a face by what lies behind it.
fn contents_color(contents: Contents) -> (u8, u8, u8) {
    match contents {
        Contents::Water => (40, 90, 220),
        Contents::Slime => (60, 180, 60),
        Contents::Lava => (230, 90, 20),
        Contents::Sky => (120, 200, 240),
        Contents::Translucent => (200, 200, 230),
        _ => (170, 160, 140),
    }
}

/// Generates a deterministic color for a face: the contents' base colour,
/// shaded by a hash of the plane index so neighbouring planes differ.
pub fn face_color(face: &Face) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    face.plane_index().hash(&mut hasher);
    let shade = 0.6 + (hasher.finish() & 0xFF) as f32 / 255.0 * 0.4;

    let (r, g, b) = contents_color(face.contents_back());
    let alpha = if face.contents_back() == Contents::Solid { 255 } else { 160 };
    Color::from_rgba(
        (r as f32 * shade) as u8,
        (g as f32 * shade) as u8,
        (b as f32 * shade) as u8,
        alpha,
    )
}

fn to_vec3(p: &Point3<f64>) -> Vec3 {
    vec3(p.x as f32, p.y as f32, p.z as f32)
}

/// Draws a single face by triangulating its winding (fan triangulation).
pub fn draw_face(face: &Face) {
    let points = face.winding().points();
    if points.len() < 3 {
        return;
    }

    let color = face_color(face);
    let vertices: Vec<Vertex> = points
        .iter()
        .map(|p| Vertex::new2(to_vec3(p), vec2(0.0, 0.0), color))
        .collect();

    let mut indices: Vec<u16> = Vec::with_capacity((points.len() - 2) * 3);
    for i in 1..points.len() - 1 {
        indices.push(0);
        indices.push(i as u16);
        indices.push((i + 1) as u16);
    }

    draw_mesh(&Mesh {
        vertices,
        indices,
        texture: None,
    });
}

/// Draws the edges of a face.
pub fn draw_face_outline(face: &Face, color: Color) {
    let points = face.winding().points();
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        draw_line_3d(to_vec3(p), to_vec3(q), color);
    }
}

/// An axis-aligned box brush.
pub fn box_brush(
    entity: usize,
    brush: usize,
    contents: Contents,
    mins: [f64; 3],
    maxs: [f64; 3],
) -> MapBrush {
    MapBrush::cuboid(
        entity,
        brush,
        contents,
        Point3::from(mins),
        Point3::from(maxs),
        "demo",
    )
}

/// A ramp rising along +x from `mins` to `maxs`.
pub fn ramp_brush(entity: usize, brush: usize, mins: [f64; 3], maxs: [f64; 3]) -> MapBrush {
    let texture = || SideTexture::named("ramp");
    let run = maxs[0] - mins[0];
    let rise = maxs[2] - mins[2];
    let slope = Vector3::new(-rise, 0.0, run);
    let point = Point3::new(mins[0], mins[1], mins[2]);
    MapBrush::new(entity, brush, Contents::Solid)
        .with_side(MapSide::new(-Vector3::z(), -mins[2], texture()))
        .with_side(MapSide::new(Vector3::x(), maxs[0], texture()))
        .with_side(MapSide::new(Vector3::y(), maxs[1], texture()))
        .with_side(MapSide::new(-Vector3::y(), -mins[1], texture()))
        .with_side(MapSide::new(slope, slope.dot(&point.coords), texture()))
}

/// The built-in demo map: a walled room with a pool, a pillar standing in
/// the pool, a ramp and a pile of overlapping crates.
pub fn demo_scene() -> Vec<Vec<MapBrush>> {
    let world = vec![
        box_brush(0, 0, Contents::Solid, [-256.0, -256.0, -16.0], [256.0, 256.0, 0.0]),
        box_brush(0, 1, Contents::Solid, [-256.0, -256.0, 0.0], [-240.0, 256.0, 160.0]),
        box_brush(0, 2, Contents::Solid, [240.0, -256.0, 0.0], [256.0, 256.0, 160.0]),
        box_brush(0, 3, Contents::Solid, [-256.0, 240.0, 0.0], [256.0, 256.0, 160.0]),
        box_brush(0, 4, Contents::Water, [-200.0, -200.0, -16.0], [-40.0, -40.0, 48.0]),
        box_brush(0, 5, Contents::Solid, [-136.0, -136.0, -16.0], [-104.0, -104.0, 96.0]),
        ramp_brush(0, 6, [0.0, 64.0, 0.0], [160.0, 160.0, 64.0]),
        box_brush(0, 7, Contents::Solid, [64.0, -160.0, 0.0], [128.0, -96.0, 64.0]),
        box_brush(0, 8, Contents::Solid, [96.0, -128.0, 32.0], [144.0, -80.0, 80.0]),
        box_brush(0, 9, Contents::Clip, [-240.0, 200.0, 0.0], [240.0, 240.0, 160.0]),
    ];
    let door = vec![box_brush(1, 0, Contents::Solid, [-16.0, -256.0, 0.0], [16.0, -240.0, 112.0])];
    vec![world, door]
}

/// Simple orbit camera for 3D scene navigation, with +z up.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 40.0,
            min_distance: 64.0,
            max_distance: 2048.0,
        }
    }

    /// Sets the zoom configuration (speed and distance limits).
    pub fn with_zoom(mut self, speed: f32, min: f32, max: f32) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = mouse_wheel().1;
        self.distance -= scroll * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.cos();
        let y = self.distance * self.pitch.cos() * self.yaw.sin();
        let z = self.distance * self.pitch.sin();
        self.target + vec3(x, y, z)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 0.0, 1.0),
            target: self.target,
            ..Default::default()
        }
    }

    /// Returns the eye point in map coordinates.
    pub fn eye_point(&self) -> Point3<f64> {
        let pos = self.position();
        Point3::new(pos.x as f64, pos.y as f64, pos.z as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brush_csg::{CsgCompiler, CsgConfig};

    #[test]
    fn demo_scene_compiles() {
        let mut compiler = CsgCompiler::new(CsgConfig::default()).unwrap();
        for entity in demo_scene() {
            compiler.add_entity(&entity).unwrap();
        }
        let output = compiler.run().unwrap();
        assert_eq!(output.brushes().len(), 11);
        // the clip brush only exists in the collision hulls
        assert!(output.brushes().brushes()[9].hull(0).is_empty());
        assert!(output.face_count(0) > 0);
    }

    #[test]
    fn ramp_has_five_faces() {
        let mut compiler = CsgCompiler::new(CsgConfig::default()).unwrap();
        compiler.add_entity(&[ramp_brush(0, 0, [0.0; 3], [64.0, 64.0, 32.0])]).unwrap();
        assert_eq!(compiler.brushes().brushes()[0].hull(0).faces().len(), 5);
    }
}
