//! Configuration types for the simulation.

use crate::error::PhysicsError;
use crate::float::Float;

/// How vertices are advanced at the start of a step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntegrationMode {
    /// Verlet step with velocity decay and floor friction.
    Soft,
    /// Viscous Verlet step with screen limits applied during integration.
    Hard,
}

/// Simulation parameters owned by a [`World`](crate::World).
///
/// The configuration survives [`World::reset`](crate::World::reset); only
/// the scene is cleared.
///
/// # Builder Pattern
/// ```
/// use jello::config::WorldConfig;
///
/// let config: WorldConfig<f32> = WorldConfig::new()
///     .with_iterations(8)
///     .with_gravity(0.2)
///     .with_friction(1.0)
///     .with_friction_floor(0.8);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig<F: Float> {
    /// Added to every vertex's y each step. Default: 0.1.
    pub gravity: F,
    /// Relaxation passes per step. Default: 5.
    pub iterations: usize,
    /// Velocity retained per step in soft integration, also the contact
    /// friction coefficient. Default: 0.2.
    pub friction: F,
    /// Velocity scale for vertices resting on the floor. Default: 0.1.
    pub friction_floor: F,
    /// Velocity scale used by hard integration. Default: 1.0.
    pub viscosity: F,
    /// Divisor applied (with body mass) by [`World::pull_vertex`](crate::World::pull_vertex). Default: 5.0.
    pub drag_force: F,
    /// Default: [`IntegrationMode::Soft`].
    pub integration: IntegrationMode,
    /// Default: true.
    pub gravity_enabled: bool,
    /// Default: true.
    pub collision_enabled: bool,
}

impl<F: Float> WorldConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        WorldConfig {
            gravity: F::from_f32(0.1),
            iterations: 5,
            friction: F::from_f32(0.2),
            friction_floor: F::from_f32(0.1),
            viscosity: F::one(),
            drag_force: F::from_f32(5.0),
            integration: IntegrationMode::Soft,
            gravity_enabled: true,
            collision_enabled: true,
        }
    }

    /// Set the gravity added along y each step.
    pub fn with_gravity(mut self, gravity: F) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the number of relaxation passes.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the velocity decay / contact friction.
    pub fn with_friction(mut self, friction: F) -> Self {
        self.friction = friction;
        self
    }

    /// Set the floor friction.
    pub fn with_friction_floor(mut self, friction_floor: F) -> Self {
        self.friction_floor = friction_floor;
        self
    }

    /// Set the hard-integration viscosity.
    pub fn with_viscosity(mut self, viscosity: F) -> Self {
        self.viscosity = viscosity;
        self
    }

    /// Set the drag force divisor.
    pub fn with_drag_force(mut self, drag_force: F) -> Self {
        self.drag_force = drag_force;
        self
    }

    /// Choose the integration scheme.
    pub fn with_integration(mut self, integration: IntegrationMode) -> Self {
        self.integration = integration;
        self
    }

    /// Turn gravity on or off.
    pub fn with_gravity_enabled(mut self, enabled: bool) -> Self {
        self.gravity_enabled = enabled;
        self
    }

    /// Turn body-body collision on or off.
    pub fn with_collision(mut self, enabled: bool) -> Self {
        self.collision_enabled = enabled;
        self
    }

    /// Per-pass weight handed to constraints: `1 / iterations`.
    pub fn step_coef(&self) -> F {
        F::one() / F::from_f32(self.iterations as f32)
    }

    /// Check the parameters a step depends on.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.iterations == 0 {
            return Err(PhysicsError::InvalidIterations);
        }
        Ok(())
    }
}

impl<F: Float> Default for WorldConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
