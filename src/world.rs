//! The simulation world: flat vertex and constraint storage, the bodies
//! over them, and the per-frame step.

use crate::body::{Body, BodyBuilder, BodyId};
use crate::collision::{self, ClosestVertex};
use crate::config::{IntegrationMode, WorldConfig};
use crate::constraint::{solve_all, Constraint, DragConstraint, DragTarget, PinConstraint};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::{Phase, StepObserver};
use crate::vec::Vec2;
use crate::vertex::Vertex;
use alloc::vec::Vec as AllocVec;

/// A rectangular world of soft bodies.
///
/// Vertices and constraints of every body are stored in two flat lists,
/// in registration order; constraints are solved in that order.
pub struct World<F: Float> {
    width: F,
    height: F,
    config: WorldConfig<F>,
    bodies: AllocVec<Body<F>>,
    vertices: AllocVec<Vertex<F>>,
    constraints: AllocVec<Constraint<F>>,
    frame: u64,
    next_id: u32,
}

impl<F: Float> World<F> {
    /// An empty world spanning `[0, width] x [0, height]`, y growing
    /// towards the floor.
    pub fn new(width: F, height: F, config: WorldConfig<F>) -> Result<Self, PhysicsError> {
        let valid = |v: F| v > F::zero() && v.is_finite();
        if !valid(width) || !valid(height) {
            return Err(PhysicsError::InvalidBounds);
        }
        config.validate()?;

        Ok(World {
            width,
            height,
            config,
            bodies: AllocVec::new(),
            vertices: AllocVec::new(),
            constraints: AllocVec::new(),
            frame: 0,
            next_id: 0,
        })
    }

    pub fn width(&self) -> F { self.width }
    pub fn height(&self) -> F { self.height }

    pub fn config(&self) -> &WorldConfig<F> { &self.config }

    /// Parameters may be changed between steps. They must still pass
    /// [`WorldConfig::validate`] when the next step runs.
    pub fn config_mut(&mut self) -> &mut WorldConfig<F> { &mut self.config }

    /// Validate and register a body, appending its vertices and constraints.
    pub fn add_body(&mut self, builder: BodyBuilder<F>) -> Result<BodyId, PhysicsError> {
        builder.validate()?;
        let (vertices, constraints, mass) = builder.into_parts();

        let id = BodyId(self.next_id);
        self.next_id += 1;

        let first_vertex = self.vertices.len();
        let first_constraint = self.constraints.len();
        self.vertices.extend(vertices);
        self.constraints.extend(constraints.into_iter().map(|mut c| {
            c.offset_vertices(first_vertex);
            c
        }));

        let owned = (first_constraint..self.constraints.len()).collect();
        let mut body = Body::new(id, first_vertex..self.vertices.len(), owned, &mut self.constraints, mass);
        body.update_bounding_box(&self.vertices);

        tracing::debug!(
            body = id.0,
            vertices = body.vertex_count(),
            edges = body.edges().len(),
            "body added"
        );
        self.bodies.push(body);
        Ok(id)
    }

    /// Append a constraint owned by no body, solved after everything
    /// registered before it. Vertex indices are world indices.
    pub fn add_global_constraint(&mut self, constraint: Constraint<F>) -> Result<usize, PhysicsError> {
        if let Some(v) = constraint.max_vertex() {
            if v >= self.vertices.len() {
                return Err(PhysicsError::VertexOutOfBounds { index: v, count: self.vertices.len() });
            }
        }
        if let Constraint::Drag(DragConstraint { target: Some(DragTarget::Pin(pin)), .. }) = constraint {
            self.check_pin(pin)?;
        }

        let index = self.constraints.len();
        tracing::debug!(index, kind = ?constraint.kind(), "global constraint added");
        self.constraints.push(constraint);
        Ok(index)
    }

    /// Pin a body's `local`-th vertex where it currently is.
    pub fn pin(&mut self, body: BodyId, local: usize) -> Result<usize, PhysicsError> {
        let b = self.body_slot(body)?;
        let vertex = self.bodies[b].vertex_index(local)?;
        let anchor = self.vertices[vertex].position;
        Ok(self.push_pin(b, vertex, anchor))
    }

    /// Pin a body's `local`-th vertex to `anchor`.
    pub fn pin_at(&mut self, body: BodyId, local: usize, anchor: Vec2<F>) -> Result<usize, PhysicsError> {
        let b = self.body_slot(body)?;
        let vertex = self.bodies[b].vertex_index(local)?;
        Ok(self.push_pin(b, vertex, anchor))
    }

    /// Pin several vertices of one body. Nothing is added unless every
    /// index is valid.
    pub fn pins(&mut self, body: BodyId, locals: &[usize]) -> Result<AllocVec<usize>, PhysicsError> {
        let b = self.body_slot(body)?;
        for &local in locals {
            self.bodies[b].vertex_index(local)?;
        }
        locals.iter().map(|&local| self.pin(body, local)).collect()
    }

    fn push_pin(&mut self, body: usize, vertex: usize, anchor: Vec2<F>) -> usize {
        let index = self.constraints.len();
        self.constraints.push(Constraint::Pin(PinConstraint::new(vertex, anchor)));
        self.bodies[body].push_constraint(index);
        tracing::debug!(body = self.bodies[body].id().0, vertex, index, "pin added");
        index
    }

    fn body_slot(&self, id: BodyId) -> Result<usize, PhysicsError> {
        self.bodies
            .iter()
            .position(|b| b.id() == id)
            .ok_or(PhysicsError::UnknownBody(id.0))
    }

    fn check_pin(&self, index: usize) -> Result<(), PhysicsError> {
        match self.constraints.get(index) {
            Some(Constraint::Pin(_)) => Ok(()),
            Some(_) => Err(PhysicsError::NotAPin(index)),
            None => Err(PhysicsError::ConstraintOutOfBounds { index, count: self.constraints.len() }),
        }
    }

    /// First body, in registration order, whose polygon contains `point`.
    pub fn body_at(&self, point: Vec2<F>) -> Option<BodyId> {
        self.bodies
            .iter()
            .find(|b| collision::is_point_inside_body(point, b, &self.vertices))
            .map(|b| b.id())
    }

    /// Nearest vertex within `radius` of `point`, with the pin holding it.
    pub fn closest_vertex(&self, point: Vec2<F>, radius: F) -> Option<ClosestVertex> {
        collision::closest_vertex_within(&self.bodies, &self.vertices, &self.constraints, point, radius)
    }

    /// Move a vertex part of the way to `target`, less for heavier bodies:
    /// `position += (target - position) / (mass * drag_force)`.
    pub fn pull_vertex(&mut self, vertex: usize, target: Vec2<F>) -> Result<(), PhysicsError> {
        let count = self.vertices.len();
        let body = self
            .bodies
            .iter()
            .find(|b| b.vertex_range().contains(&vertex))
            .ok_or(PhysicsError::VertexOutOfBounds { index: vertex, count })?;

        let divisor = body.mass * self.config.drag_force;
        let v = &mut self.vertices[vertex];
        v.position = v.position + (target - v.position).scale(F::one() / divisor);
        Ok(())
    }

    pub fn bodies(&self) -> &[Body<F>] { &self.bodies }

    pub fn body(&self, id: BodyId) -> Option<&Body<F>> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn vertices(&self) -> &[Vertex<F>] { &self.vertices }

    pub fn vertex_mut(&mut self, index: usize) -> Option<&mut Vertex<F>> {
        self.vertices.get_mut(index)
    }

    pub fn constraints(&self) -> &[Constraint<F>] { &self.constraints }

    pub fn constraint_mut(&mut self, index: usize) -> Option<&mut Constraint<F>> {
        self.constraints.get_mut(index)
    }

    /// The drag registered at `index`, for driving it from input.
    pub fn drag_mut(&mut self, index: usize) -> Result<&mut DragConstraint<F>, PhysicsError> {
        let count = self.constraints.len();
        match self.constraints.get_mut(index) {
            Some(Constraint::Drag(drag)) => Ok(drag),
            Some(_) => Err(PhysicsError::NotADrag(index)),
            None => Err(PhysicsError::ConstraintOutOfBounds { index, count }),
        }
    }

    /// Point the drag at `index` to a picked vertex, or to the pin holding
    /// it. The pick is checked against this world.
    pub fn activate_drag(&mut self, index: usize, picked: &ClosestVertex) -> Result<(), PhysicsError> {
        if picked.vertex >= self.vertices.len() {
            return Err(PhysicsError::VertexOutOfBounds { index: picked.vertex, count: self.vertices.len() });
        }
        if let Some(pin) = picked.pin {
            self.check_pin(pin)?;
        }
        self.drag_mut(index)?.activate(picked);
        Ok(())
    }

    /// Frames stepped since creation or the last reset.
    pub fn frame(&self) -> u64 { self.frame }

    /// Advance the world by one frame.
    ///
    /// `dt` is handed to the observer only; the integrator works in
    /// fixed frames.
    pub fn step<O: StepObserver<F>>(&mut self, dt: F, observer: &mut O) {
        debug_assert!(self.config.iterations > 0, "step with zero relaxation passes");
        observer.begin_frame(dt);
        observer.begin_phase(Phase::BeforeIntegrate);
        observer.end_phase(Phase::BeforeIntegrate, self);

        observer.begin_phase(Phase::Integrate);
        match self.config.integration {
            IntegrationMode::Soft => self.integrate_soft(),
            IntegrationMode::Hard => self.integrate_hard(),
        }
        observer.end_phase(Phase::Integrate, self);

        let step_coef = self.config.step_coef();
        for i in 0..self.config.iterations {
            observer.begin_phase(Phase::ConstraintSolve(i));
            solve_all(&mut self.constraints, &mut self.vertices, step_coef);
            observer.end_phase(Phase::ConstraintSolve(i), self);

            observer.begin_phase(Phase::BoundingBox(i));
            for body in self.bodies.iter_mut() {
                body.update_bounding_box(&self.vertices);
            }
            observer.end_phase(Phase::BoundingBox(i), self);

            if self.config.collision_enabled {
                observer.begin_phase(Phase::Collision(i));
                self.collide();
                observer.end_phase(Phase::Collision(i), self);
            }
        }

        observer.begin_phase(Phase::BoundsChecking);
        self.clamp_to_bounds();
        observer.end_phase(Phase::BoundsChecking, self);

        self.frame += 1;
        observer.end_frame();
    }

    /// Drop every body, vertex and constraint and rewind the frame
    /// counter. The configuration is kept and body ids keep counting.
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.vertices.clear();
        self.constraints.clear();
        self.frame = 0;
        tracing::debug!("world reset");
    }

    fn integrate_soft(&mut self) {
        let WorldConfig { gravity, friction, friction_floor, gravity_enabled, .. } = self.config;
        let floor = self.height - F::one();
        let resting = F::from_f32(1e-6);

        for v in self.vertices.iter_mut() {
            let mut velocity = (v.position - v.old_position).scale(friction);
            if v.position.y >= floor && velocity.length_sq() > resting {
                velocity = velocity.scale(friction_floor);
            }

            v.old_position = v.position;
            if gravity_enabled {
                v.position.y = v.position.y + gravity;
            }
            v.position = v.position + velocity;
        }
    }

    fn integrate_hard(&mut self) {
        let WorldConfig { gravity, friction_floor, viscosity, gravity_enabled, .. } = self.config;
        let (width, height) = (self.width, self.height);

        for v in self.vertices.iter_mut() {
            let previous = v.position;
            let mut p = previous + (previous - v.old_position).scale(viscosity);
            if gravity_enabled {
                p.y = p.y + gravity;
            }
            v.old_position = previous;

            if p.y < F::zero() {
                p.y = F::zero();
            }
            if p.y > height {
                p.x = p.x - (p.y - height) * (p.x - v.old_position.x) * friction_floor;
                p.y = height;
            }
            p.x = p.x.clamp(F::zero(), width);
            v.position = p;
        }
    }

    fn collide(&mut self) {
        let friction = self.config.friction;
        let count = self.bodies.len();
        for i in 0..count {
            for j in i + 1..count {
                let (head, tail) = self.bodies.split_at_mut(j);
                let contact = collision::detect(&mut head[i], &mut tail[0], &self.vertices, &self.constraints);
                if let Some(contact) = contact {
                    collision::resolve(&contact, &mut self.vertices, friction);
                }
            }
        }
    }

    fn clamp_to_bounds(&mut self) {
        let max_x = self.width - F::one();
        let max_y = self.height - F::one();
        for v in self.vertices.iter_mut() {
            v.position.x = v.position.x.clamp(F::zero(), max_x);
            v.position.y = v.position.y.clamp(F::zero(), max_y);
        }
    }
}
