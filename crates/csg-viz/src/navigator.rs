//! Hull and brush selection for interactive visualization.

use brush_csg::{Brush, BrushSet, Face, NUM_HULLS};
use macroquad::prelude::*;
use nalgebra::Point3;

use crate::{draw_face, draw_face_outline};

/// Interactive navigator choosing which hull, which stage and which brush
/// is on screen.
pub struct HullNavigator {
    hull: usize,
    resolved: bool,
    focus: Option<usize>,
}

impl Default for HullNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl HullNavigator {
    /// Starts on the resolved point hull with no brush in focus.
    pub fn new() -> Self {
        Self {
            hull: 0,
            resolved: true,
            focus: None,
        }
    }

    pub fn hull(&self) -> usize {
        self.hull
    }

    /// Whether the resolved faces are shown rather than the built ones.
    pub fn resolved(&self) -> bool {
        self.resolved
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn select_hull(&mut self, hull: usize) -> bool {
        if hull >= NUM_HULLS || hull == self.hull {
            return false;
        }
        self.hull = hull;
        true
    }

    pub fn toggle_stage(&mut self) {
        self.resolved = !self.resolved;
    }

    /// Moves the focus to the next brush, wrapping to none after the last.
    pub fn focus_next(&mut self, brush_count: usize) -> bool {
        if brush_count == 0 {
            return false;
        }
        self.focus = match self.focus {
            None => Some(0),
            Some(id) if id + 1 < brush_count => Some(id + 1),
            Some(_) => None,
        };
        true
    }

    /// Moves the focus to the previous brush, wrapping to none before the first.
    pub fn focus_previous(&mut self, brush_count: usize) -> bool {
        if brush_count == 0 {
            return false;
        }
        self.focus = match self.focus {
            None => Some(brush_count - 1),
            Some(0) => None,
            Some(id) => Some(id - 1),
        };
        true
    }

    pub fn clear_focus(&mut self) -> bool {
        self.focus.take().is_some()
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update(&mut self, brush_count: usize) -> bool {
        let mut changed = false;

        for (hull, key) in [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4]
            .into_iter()
            .enumerate()
        {
            if is_key_pressed(key) {
                changed |= self.select_hull(hull);
            }
        }
        if is_key_pressed(KeyCode::Tab) {
            self.toggle_stage();
            changed = true;
        }
        if is_key_pressed(KeyCode::N) {
            changed |= self.focus_next(brush_count);
        }
        if is_key_pressed(KeyCode::P) {
            changed |= self.focus_previous(brush_count);
        }
        if is_key_pressed(KeyCode::R) {
            changed |= self.clear_focus();
        }

        changed
    }

    /// The brush set for the current stage.
    pub fn stage<'a>(&self, built: &'a BrushSet, resolved: &'a BrushSet) -> &'a BrushSet {
        if self.resolved { resolved } else { built }
    }

    /// Renders the selected hull, farthest faces first.
    pub fn render(&self, brushes: &BrushSet, eye: Point3<f64>) {
        let mut faces: Vec<(f64, &Brush, &Face)> = brushes
            .brushes()
            .iter()
            .flat_map(|brush| {
                brush
                    .hull(self.hull)
                    .faces()
                    .iter()
                    .map(move |face| ((face.winding().center() - eye).norm_squared(), brush, face))
            })
            .collect();
        faces.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (_, brush, face) in faces {
            draw_face(face);
            if self.focus == Some(brush.id()) {
                draw_face_outline(face, YELLOW);
            }
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, brushes: &BrushSet, y_offset: f32) {
        let faces: usize = brushes
            .brushes()
            .iter()
            .map(|brush| brush.hull(self.hull).faces().len())
            .sum();

        draw_text(
            &format!(
                "Hull {} ({}): {} faces",
                self.hull,
                if self.resolved { "after csg" } else { "before csg" },
                faces
            ),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );

        let focus = match self.focus.and_then(|id| brushes.brushes().get(id)) {
            Some(brush) => format!(
                "Brush: entity {} brush {} ({:?}, {} faces)",
                brush.original_entity(),
                brush.original_brush(),
                brush.contents(),
                brush.hull(self.hull).faces().len()
            ),
            None => "Brush: all".to_string(),
        };
        draw_text(&focus, 10.0, y_offset + 20.0, 18.0, YELLOW);

        draw_text(
            "[1-4] hull | [Tab] before/after | [N]ext [P]revious [R]eset brush",
            10.0,
            y_offset + 40.0,
            16.0,
            DARKGRAY,
        );
    }
}
