use brush_csg::{CsgCompiler, CsgConfig};
use csg_viz::{demo_scene, HullNavigator, OrbitCamera};
use log::{error, info};
use macroquad::prelude::*;

#[macroquad::main("Brush CSG")]
async fn main() {
    env_logger::init();

    let mut compiler = match CsgCompiler::new(CsgConfig::default()) {
        Ok(compiler) => compiler,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    for entity in demo_scene() {
        if let Err(err) = compiler.add_entity(&entity) {
            error!("{err}");
            return;
        }
    }
    let built = compiler.brushes().clone();
    let output = match compiler.run() {
        Ok(output) => output,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    info!(
        "demo scene: {} brushes, {} planes, {} visible faces",
        output.brushes().len(),
        output.planes().len(),
        output.face_count(0)
    );

    let mut camera = OrbitCamera::new(700.0, 0.8, 0.6).with_zoom(40.0, 64.0, 2048.0);
    let mut navigator = HullNavigator::new();

    loop {
        camera.update();
        navigator.update(built.len());
        let brushes = navigator.stage(&built, output.brushes());

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        navigator.render(brushes, camera.eye_point());

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(64.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 64.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 64.0), BLUE);

        set_default_camera();

        draw_text(
            &format!("Brush CSG - {} brushes", brushes.len()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Planes: {} | Overlaps reported: {}",
                output.planes().len(),
                output.union_reports().len()
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(brushes, 70.0);

        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 135.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 155.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
