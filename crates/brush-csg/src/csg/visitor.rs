//! Visitor pattern for walking resolved faces.
//!
//! Visitors let callers consume the faces of one hull brush by brush
//! without collecting them into intermediate vectors first.

use crate::brush::{Brush, Face};

/// Visitor receiving the faces of one hull, one brush at a time.
pub trait FaceVisitor {
    /// Called once per brush that has faces in the visited hull.
    fn visit(&mut self, brush: &Brush, faces: &[Face]);
}

/// A simple visitor that collects all visited faces.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<Face>,
}

impl CollectingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_faces(self) -> Vec<Face> {
        self.collected
    }

    pub fn faces(&self) -> &[Face] {
        &self.collected
    }
}

impl FaceVisitor for CollectingVisitor {
    fn visit(&mut self, _brush: &Brush, faces: &[Face]) {
        self.collected.extend(faces.iter().cloned());
    }
}

/// A visitor that calls a closure for each brush.
pub struct FnVisitor<F>
where
    F: FnMut(&Brush, &[Face]),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(&Brush, &[Face]),
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> FaceVisitor for FnVisitor<F>
where
    F: FnMut(&Brush, &[Face]),
{
    fn visit(&mut self, brush: &Brush, faces: &[Face]) {
        (self.func)(brush, faces);
    }
}
