//! Verlet vertices: a position and the position one step ago.

use crate::float::Float;
use crate::vec::Vec2;

/// A Verlet particle. Velocity is implicit: `position - old_position`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex<F: Float> {
    pub position: Vec2<F>,
    pub old_position: Vec2<F>,
}

impl<F: Float> Vertex<F> {
    /// A vertex at rest at `position`.
    pub fn new(position: Vec2<F>) -> Self {
        Vertex { position, old_position: position }
    }

    pub fn at(x: F, y: F) -> Self {
        Self::new(Vec2::new(x, y))
    }

    /// Displacement over the last step.
    pub fn velocity(&self) -> Vec2<F> {
        self.position - self.old_position
    }
}
