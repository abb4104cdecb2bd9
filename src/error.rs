//! Error types for building and inspecting a world.

use alloc::string::String;
use core::fmt;

/// Errors that can occur while assembling a world or checking fixtures.
///
/// Stepping a world never fails; these cover the construction and lookup
/// surface around it.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be positive and finite.
    InvalidMass,
    /// A body needs at least one vertex.
    InsufficientVertices,
    /// Vertex index is out of bounds for the body or world it was used with.
    VertexOutOfBounds { index: usize, count: usize },
    /// Constraint index is out of bounds for the world.
    ConstraintOutOfBounds { index: usize, count: usize },
    /// A constraint joins coincident vertices, so its rest value is zero.
    DegenerateConstraint { a: usize, b: usize },
    /// No body with this id lives in the world.
    UnknownBody(u32),
    /// The constraint at this index is not a drag.
    NotADrag(usize),
    /// The constraint at this index is not a pin.
    NotAPin(usize),
    /// Solver iteration count must be at least one.
    InvalidIterations,
    /// World bounds must be positive and finite.
    InvalidBounds,
    /// A recording could not be encoded or decoded.
    Serialization(String),
    /// Two recordings disagree beyond the comparison tolerance.
    FixtureMismatch {
        frame: usize,
        phase: String,
        body: usize,
        field: &'static str,
        expected: f64,
        actual: f64,
    },
    /// Two recordings do not share the same frame, phase or body layout.
    FixtureLayout(String),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass => write!(f, "mass must be positive and finite"),
            PhysicsError::InsufficientVertices => write!(f, "body needs at least one vertex"),
            PhysicsError::VertexOutOfBounds { index, count } => {
                write!(f, "vertex index {} out of bounds (count: {})", index, count)
            }
            PhysicsError::ConstraintOutOfBounds { index, count } => {
                write!(f, "constraint index {} out of bounds (count: {})", index, count)
            }
            PhysicsError::DegenerateConstraint { a, b } => {
                write!(f, "vertices {} and {} coincide, constraint has no rest length", a, b)
            }
            PhysicsError::UnknownBody(id) => write!(f, "no body with id {}", id),
            PhysicsError::NotADrag(index) => write!(f, "constraint {} is not a drag", index),
            PhysicsError::NotAPin(index) => write!(f, "constraint {} is not a pin", index),
            PhysicsError::InvalidIterations => write!(f, "iteration count must be at least 1"),
            PhysicsError::InvalidBounds => write!(f, "world bounds must be positive and finite"),
            PhysicsError::Serialization(msg) => write!(f, "recording serialization failed: {}", msg),
            PhysicsError::FixtureMismatch { frame, phase, body, field, expected, actual } => write!(
                f,
                "frame {} phase {} body {}: {} differs ({} != {})",
                frame, phase, body, field, expected, actual
            ),
            PhysicsError::FixtureLayout(msg) => write!(f, "recording layout differs: {}", msg),
        }
    }
}
