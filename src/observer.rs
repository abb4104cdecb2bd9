//! Step observer trait for monitoring simulation progress.

use core::fmt;

use crate::float::Float;
use crate::world::World;

/// A labelled stage of [`World::step`].
///
/// The relaxation stages carry the zero-based pass index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    BeforeIntegrate,
    Integrate,
    ConstraintSolve(usize),
    BoundingBox(usize),
    /// Only emitted while collision is enabled.
    Collision(usize),
    BoundsChecking,
}

/// Which parts of a body a snapshot of a phase should capture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordScope {
    All,
    BodyVertices,
    BodyData,
}

impl Phase {
    pub fn scope(self) -> RecordScope {
        match self {
            Phase::BeforeIntegrate => RecordScope::All,
            Phase::BoundingBox(_) => RecordScope::BodyData,
            Phase::Integrate | Phase::ConstraintSolve(_) | Phase::Collision(_) | Phase::BoundsChecking => {
                RecordScope::BodyVertices
            }
        }
    }
}

impl RecordScope {
    pub fn includes_vertices(self) -> bool {
        !matches!(self, RecordScope::BodyData)
    }

    /// Mass, projection interval and bounding box.
    pub fn includes_body_data(self) -> bool {
        !matches!(self, RecordScope::BodyVertices)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::BeforeIntegrate => write!(f, "beforeIntegrate"),
            Phase::Integrate => write!(f, "integrate"),
            Phase::ConstraintSolve(i) => write!(f, "constrain_solve_{}", i),
            Phase::BoundingBox(i) => write!(f, "boundingbox_{}", i),
            Phase::Collision(i) => write!(f, "collision_{}", i),
            Phase::BoundsChecking => write!(f, "boundsChecking"),
        }
    }
}

/// Trait for observing simulation steps.
///
/// Implement this trait to snapshot or visualize a world while it steps.
/// All methods have default no-op implementations, and an observer never
/// changes the outcome of a step.
pub trait StepObserver<F: Float> {
    /// Called before anything in the frame runs.
    fn begin_frame(&mut self, _dt: F) {}

    fn begin_phase(&mut self, _phase: Phase) {}

    /// Called once the phase has finished, with the world as it left it.
    fn end_phase(&mut self, _phase: Phase, _world: &World<F>) {}

    /// Called after the frame counter has advanced.
    fn end_frame(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl<F: Float> StepObserver<F> for NoOpStepObserver {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::BeforeIntegrate.to_string(), "beforeIntegrate");
        assert_eq!(Phase::Integrate.to_string(), "integrate");
        assert_eq!(Phase::ConstraintSolve(2).to_string(), "constrain_solve_2");
        assert_eq!(Phase::BoundingBox(0).to_string(), "boundingbox_0");
        assert_eq!(Phase::Collision(4).to_string(), "collision_4");
        assert_eq!(Phase::BoundsChecking.to_string(), "boundsChecking");
    }

    #[test]
    fn phase_scopes() {
        assert_eq!(Phase::BeforeIntegrate.scope(), RecordScope::All);
        assert_eq!(Phase::BoundingBox(1).scope(), RecordScope::BodyData);
        assert_eq!(Phase::Collision(1).scope(), RecordScope::BodyVertices);

        assert!(RecordScope::All.includes_vertices() && RecordScope::All.includes_body_data());
        assert!(!RecordScope::BodyData.includes_vertices());
        assert!(!RecordScope::BodyVertices.includes_body_data());
    }
}
