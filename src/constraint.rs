//! Relaxation rules over vertices: distance, spring, pin, angle, drag.
//!
//! Every constraint refers to vertices by their index in the world's vertex
//! list and is solved in place, once per relaxation pass.

use crate::body::BodyId;
use crate::collision::ClosestVertex;
use crate::float::Float;
use crate::vec::{signed_angle, Vec2};
use crate::vertex::Vertex;

/// Classification tag for code that only needs to branch on the variant
/// (renderers, pickers).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Distance,
    Spring,
    Pin,
    Angle,
    Drag,
}

/// A constraint that can be applied to the world's vertices.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint<F: Float> {
    Distance(DistanceConstraint<F>),
    Spring(SpringConstraint<F>),
    Pin(PinConstraint<F>),
    Angle(AngleConstraint<F>),
    Drag(DragConstraint<F>),
}

/// Keeps two vertices at their construction-time separation.
///
/// Edge-flagged distance constraints form a body's polygon boundary and
/// remember the body that owns them.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraint<F: Float> {
    pub a: usize,
    pub b: usize,
    rest_sq: F,
    edge: bool,
    owner: Option<BodyId>,
}

/// A soft link pulling two vertices towards a Euclidean rest length.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringConstraint<F: Float> {
    pub a: usize,
    pub b: usize,
    pub stiffness: F,
    pub rest_length: F,
}

/// Nails a vertex to an anchor. The anchor may be moved between steps.
#[derive(Clone, Debug, PartialEq)]
pub struct PinConstraint<F: Float> {
    pub vertex: usize,
    pub anchor: Vec2<F>,
}

/// Keeps the angle `a-b-c` (pivot `b`) near its construction-time value.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleConstraint<F: Float> {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub stiffness: F,
    rest_angle: F,
}

/// What a drag is currently holding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragTarget {
    /// A free vertex, by world vertex index.
    Vertex(usize),
    /// A pin, by world constraint index. Dragging moves the pin's anchor.
    Pin(usize),
}

/// Interactive grab: forces its target to `position` while active.
#[derive(Clone, Debug, PartialEq)]
pub struct DragConstraint<F: Float> {
    pub target: Option<DragTarget>,
    pub position: Vec2<F>,
}

impl<F: Float> Constraint<F> {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Distance(_) => ConstraintKind::Distance,
            Constraint::Spring(_) => ConstraintKind::Spring,
            Constraint::Pin(_) => ConstraintKind::Pin,
            Constraint::Angle(_) => ConstraintKind::Angle,
            Constraint::Drag(_) => ConstraintKind::Drag,
        }
    }

    /// Apply one relaxation pass to `vertices`.
    ///
    /// A drag holding a pin needs the pin itself; that case is handled by
    /// [`solve_all`] and is a no-op here.
    pub fn solve(&self, vertices: &mut [Vertex<F>], step_coef: F) {
        match self {
            Constraint::Distance(c) => c.solve(vertices),
            Constraint::Spring(c) => c.solve(vertices, step_coef),
            Constraint::Pin(c) => c.solve(vertices),
            Constraint::Angle(c) => c.solve(vertices, step_coef),
            Constraint::Drag(c) => c.solve(vertices),
        }
    }

    /// Shift every vertex index by `offset`.
    pub(crate) fn offset_vertices(&mut self, offset: usize) {
        match self {
            Constraint::Distance(c) => {
                c.a += offset;
                c.b += offset;
            }
            Constraint::Spring(c) => {
                c.a += offset;
                c.b += offset;
            }
            Constraint::Pin(c) => c.vertex += offset,
            Constraint::Angle(c) => {
                c.a += offset;
                c.b += offset;
                c.c += offset;
            }
            Constraint::Drag(c) => {
                if let Some(DragTarget::Vertex(v)) = c.target.as_mut() {
                    *v += offset;
                }
            }
        }
    }

    pub(crate) fn max_vertex(&self) -> Option<usize> {
        match self {
            Constraint::Distance(c) => Some(c.a.max(c.b)),
            Constraint::Spring(c) => Some(c.a.max(c.b)),
            Constraint::Pin(c) => Some(c.vertex),
            Constraint::Angle(c) => Some(c.a.max(c.b).max(c.c)),
            Constraint::Drag(c) => match c.target {
                Some(DragTarget::Vertex(v)) => Some(v),
                _ => None,
            },
        }
    }

    pub fn as_distance(&self) -> Option<&DistanceConstraint<F>> {
        match self {
            Constraint::Distance(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_pin(&self) -> Option<&PinConstraint<F>> {
        match self {
            Constraint::Pin(c) => Some(c),
            _ => None,
        }
    }
}

/// Solve every constraint once, in order.
pub fn solve_all<F: Float>(constraints: &mut [Constraint<F>], vertices: &mut [Vertex<F>], step_coef: F) {
    for i in 0..constraints.len() {
        if let Constraint::Drag(DragConstraint { target: Some(DragTarget::Pin(pin)), position }) = constraints[i] {
            if let Some(Constraint::Pin(pin)) = constraints.get_mut(pin) {
                pin.anchor = position;
            }
            continue;
        }
        constraints[i].solve(vertices, step_coef);
    }
}

impl<F: Float> DistanceConstraint<F> {
    /// An internal (bracing) constraint at the current separation of `a` and `b`.
    pub fn new(a: usize, b: usize, vertices: &[Vertex<F>]) -> Self {
        let rest_sq = vertices[a].position.distance_sq(vertices[b].position);
        DistanceConstraint { a, b, rest_sq, edge: false, owner: None }
    }

    /// A polygon-boundary constraint at the current separation of `a` and `b`.
    pub fn edge(a: usize, b: usize, vertices: &[Vertex<F>]) -> Self {
        DistanceConstraint { edge: true, ..Self::new(a, b, vertices) }
    }

    pub fn rest_squared(&self) -> F { self.rest_sq }
    pub fn is_edge(&self) -> bool { self.edge }

    /// The body whose boundary this edge belongs to.
    pub fn owner(&self) -> Option<BodyId> { self.owner }

    pub(crate) fn set_owner(&mut self, owner: BodyId) {
        self.owner = Some(owner);
    }

    /// Sqrt-free correction: `delta = d0 / (d1 + d0) - 0.5`, split evenly.
    pub fn solve(&self, vertices: &mut [Vertex<F>]) {
        debug_assert!(self.rest_sq > F::zero(), "distance constraint with zero rest length");
        let d = vertices[self.b].position - vertices[self.a].position;
        let delta = self.rest_sq / (d.length_sq() + self.rest_sq) - F::half();
        let d = d.scale(delta);

        vertices[self.b].position = vertices[self.b].position + d;
        vertices[self.a].position = vertices[self.a].position - d;
    }
}

impl<F: Float> SpringConstraint<F> {
    /// A zero `rest_length` means "use the current separation".
    pub fn new(a: usize, b: usize, stiffness: F, rest_length: F, vertices: &[Vertex<F>]) -> Self {
        let rest_length = if rest_length == F::zero() {
            vertices[a].position.distance_sq(vertices[b].position).sqrt()
        } else {
            rest_length
        };
        SpringConstraint { a, b, stiffness, rest_length }
    }

    pub fn solve(&self, vertices: &mut [Vertex<F>], step_coef: F) {
        let normal = vertices[self.a].position - vertices[self.b].position;
        let m = normal.length_sq();
        debug_assert!(m > F::zero(), "spring endpoints coincide");
        let normal = normal.scale((self.rest_length * self.rest_length - m) / m * self.stiffness * step_coef);

        vertices[self.a].position = vertices[self.a].position + normal;
        vertices[self.b].position = vertices[self.b].position - normal;
    }
}

impl<F: Float> PinConstraint<F> {
    pub fn new(vertex: usize, anchor: Vec2<F>) -> Self {
        PinConstraint { vertex, anchor }
    }

    pub fn solve(&self, vertices: &mut [Vertex<F>]) {
        vertices[self.vertex].position = self.anchor;
    }
}

impl<F: Float> AngleConstraint<F> {
    /// Pivot `b`, arms `a` and `c`; the rest angle is the current one.
    pub fn new(a: usize, b: usize, c: usize, stiffness: F, vertices: &[Vertex<F>]) -> Self {
        let rest_angle = Self::angle_of(vertices, a, b, c);
        AngleConstraint { a, b, c, stiffness, rest_angle }
    }

    pub fn rest_angle(&self) -> F { self.rest_angle }

    /// Current signed angle at the pivot.
    pub fn current_angle(&self, vertices: &[Vertex<F>]) -> F {
        Self::angle_of(vertices, self.a, self.b, self.c)
    }

    fn angle_of(vertices: &[Vertex<F>], a: usize, b: usize, c: usize) -> F {
        let pivot = vertices[b].position;
        signed_angle(vertices[a].position - pivot, vertices[c].position - pivot)
    }

    pub fn solve(&self, vertices: &mut [Vertex<F>], step_coef: F) {
        let diff = wrap_angle(self.current_angle(vertices) - self.rest_angle) * step_coef * self.stiffness;

        // Each rotation uses the already-updated reference point.
        let b = vertices[self.b].position;
        vertices[self.a].position = vertices[self.a].position.rotate_about(b, diff);
        vertices[self.c].position = vertices[self.c].position.rotate_about(b, -diff);
        let a = vertices[self.a].position;
        let c = vertices[self.c].position;
        let b = b.rotate_about(a, diff);
        vertices[self.b].position = b.rotate_about(c, -diff);
    }
}

/// Wrap an angle difference into `(-pi, pi]`.
pub fn wrap_angle<F: Float>(diff: F) -> F {
    let two_pi = F::two() * F::pi();
    if diff <= -F::pi() {
        diff + two_pi
    } else if diff > F::pi() {
        diff - two_pi
    } else {
        diff
    }
}

impl<F: Float> DragConstraint<F> {
    /// An inactive drag.
    pub fn new() -> Self {
        DragConstraint { target: None, position: Vec2::zero() }
    }

    /// Grab a picked vertex, or the pin holding it when there is one.
    ///
    /// `picked` is not checked here; use
    /// [`World::activate_drag`](crate::World::activate_drag) for picks that
    /// did not come from [`World::closest_vertex`](crate::World::closest_vertex).
    pub fn activate(&mut self, picked: &ClosestVertex) {
        self.target = Some(match picked.pin {
            Some(pin) => DragTarget::Pin(pin),
            None => DragTarget::Vertex(picked.vertex),
        });
    }

    pub fn deactivate(&mut self) {
        self.target = None;
    }

    pub fn set_position(&mut self, position: Vec2<F>) {
        self.position = position;
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub fn solve(&self, vertices: &mut [Vertex<F>]) {
        if let Some(DragTarget::Vertex(v)) = self.target {
            vertices[v].position = self.position;
        }
    }
}

impl<F: Float> Default for DragConstraint<F> {
    fn default() -> Self {
        Self::new()
    }
}
