//! Bodies: a closed polygon of vertices held together by constraints.

use crate::constraint::{
    AngleConstraint, Constraint, DistanceConstraint, PinConstraint, SpringConstraint,
};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec2;
use crate::vertex::Vertex;
use alloc::vec::Vec as AllocVec;
use core::ops::Range;

/// Stable identifier of a body within a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// A registered body.
///
/// Vertices and constraints live in the world's flat lists; the body keeps
/// the indices it owns, its boundary edges and a cached bounding box and
/// projection interval.
#[derive(Clone, Debug)]
pub struct Body<F: Float> {
    id: BodyId,
    vertices: Range<usize>,
    constraints: AllocVec<usize>,
    edges: AllocVec<usize>,
    pub mass: F,
    pub center: Vec2<F>,
    pub half_extent: Vec2<F>,
    /// Lower end of the last [`project_axis`](Body::project_axis) interval.
    pub min: F,
    /// Upper end of the last [`project_axis`](Body::project_axis) interval.
    pub max: F,
}

impl<F: Float> Body<F> {
    /// Take ownership of already-registered constraints.
    ///
    /// Edges are derived from the owned constraints first, then each edge is
    /// pointed back at this body.
    pub(crate) fn new(
        id: BodyId,
        vertices: Range<usize>,
        constraints: AllocVec<usize>,
        all_constraints: &mut [Constraint<F>],
        mass: F,
    ) -> Self {
        let edges: AllocVec<usize> = constraints
            .iter()
            .copied()
            .filter(|&i| all_constraints[i].as_distance().map_or(false, |d| d.is_edge()))
            .collect();

        for &i in &edges {
            if let Constraint::Distance(edge) = &mut all_constraints[i] {
                edge.set_owner(id);
            }
        }

        Body {
            id,
            vertices,
            constraints,
            edges,
            mass,
            center: Vec2::zero(),
            half_extent: Vec2::zero(),
            min: F::zero(),
            max: F::zero(),
        }
    }

    pub fn id(&self) -> BodyId { self.id }

    /// World indices of this body's vertices, in polygon order.
    pub fn vertex_range(&self) -> Range<usize> { self.vertices.clone() }

    pub fn vertex_count(&self) -> usize { self.vertices.len() }

    /// World indices of every constraint the body owns, pins included.
    pub fn constraint_indices(&self) -> &[usize] { &self.constraints }

    /// World indices of the boundary edges.
    pub fn edges(&self) -> &[usize] { &self.edges }

    pub(crate) fn push_constraint(&mut self, index: usize) {
        self.constraints.push(index);
    }

    /// World index of the body's `local`-th vertex.
    pub fn vertex_index(&self, local: usize) -> Result<usize, PhysicsError> {
        if local < self.vertices.len() {
            Ok(self.vertices.start + local)
        } else {
            Err(PhysicsError::VertexOutOfBounds { index: local, count: self.vertices.len() })
        }
    }

    /// Recompute `center` and `half_extent` from the current positions.
    pub fn update_bounding_box(&mut self, vertices: &[Vertex<F>]) {
        let mut min = Vec2::new(F::max_value(), F::max_value());
        let mut max = Vec2::new(-F::max_value(), -F::max_value());

        for v in &vertices[self.vertices.clone()] {
            let p = v.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        self.center = (min + max).scale(F::half());
        self.half_extent = (max - min).scale(F::half());
    }

    /// Project every vertex on `axis`, cache and return the `[min, max]` interval.
    pub fn project_axis(&mut self, vertices: &[Vertex<F>], axis: Vec2<F>) -> (F, F) {
        let own = &vertices[self.vertices.clone()];
        let first = own[0].position.dot(axis);
        let (min, max) = own[1..].iter().fold((first, first), |(min, max), v| {
            let d = v.position.dot(axis);
            (min.min(d), max.max(d))
        });
        self.min = min;
        self.max = max;
        (min, max)
    }

    /// Strict overlap of the cached bounding boxes.
    pub fn aabb_overlaps(&self, other: &Body<F>) -> bool {
        let d = other.center - self.center;
        d.x.abs() - (other.half_extent.x + self.half_extent.x) < F::zero()
            && d.y.abs() - (other.half_extent.y + self.half_extent.y) < F::zero()
    }

    /// Whether `point` lies within the cached bounding box (edges included).
    pub fn aabb_contains(&self, point: Vec2<F>) -> bool {
        point.x >= self.center.x - self.half_extent.x
            && point.x <= self.center.x + self.half_extent.x
            && point.y >= self.center.y - self.half_extent.y
            && point.y <= self.center.y + self.half_extent.y
    }
}

/// A link declared on a [`BodyBuilder`], by local vertex index.
#[derive(Clone, Debug, PartialEq)]
enum Link<F: Float> {
    Edge(usize, usize),
    Brace(usize, usize),
    Spring { a: usize, b: usize, stiffness: F, rest_length: F },
    Angle { a: usize, b: usize, c: usize, stiffness: F },
    Pin(usize),
}

/// Describes a body before it is registered with
/// [`World::add_body`](crate::World::add_body).
///
/// Vertices are numbered in the order they are added. Edges must run around
/// the polygon with a consistent winding.
///
/// ```
/// use jello::body::BodyBuilder;
///
/// let square: BodyBuilder<f32> = BodyBuilder::new()
///     .vertex(0.0, 0.0)
///     .vertex(10.0, 0.0)
///     .vertex(10.0, 10.0)
///     .vertex(0.0, 10.0)
///     .polygon_edges()
///     .brace(0, 2)
///     .brace(3, 1)
///     .mass(2.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BodyBuilder<F: Float> {
    vertices: AllocVec<Vertex<F>>,
    links: AllocVec<Link<F>>,
    mass: F,
}

impl<F: Float> BodyBuilder<F> {
    /// An empty body of mass 1.
    pub fn new() -> Self {
        BodyBuilder { vertices: AllocVec::new(), links: AllocVec::new(), mass: F::one() }
    }

    pub fn vertex(mut self, x: F, y: F) -> Self {
        self.vertices.push(Vertex::at(x, y));
        self
    }

    /// Boundary edge from `a` to `b`.
    pub fn edge(mut self, a: usize, b: usize) -> Self {
        self.links.push(Link::Edge(a, b));
        self
    }

    /// Edges `0 -> 1 -> ... -> n-1 -> 0` over the vertices added so far.
    pub fn polygon_edges(mut self) -> Self {
        let n = self.vertices.len();
        for i in 0..n {
            self.links.push(Link::Edge(i, (i + 1) % n));
        }
        self
    }

    /// Internal distance constraint.
    pub fn brace(mut self, a: usize, b: usize) -> Self {
        self.links.push(Link::Brace(a, b));
        self
    }

    /// A zero `rest_length` keeps the current separation.
    pub fn spring(mut self, a: usize, b: usize, stiffness: F, rest_length: F) -> Self {
        self.links.push(Link::Spring { a, b, stiffness, rest_length });
        self
    }

    /// Angle constraint with pivot `b`.
    pub fn angle(mut self, a: usize, b: usize, c: usize, stiffness: F) -> Self {
        self.links.push(Link::Angle { a, b, c, stiffness });
        self
    }

    /// Pin vertex `v` where it stands.
    pub fn pin(mut self, v: usize) -> Self {
        self.links.push(Link::Pin(v));
        self
    }

    pub fn mass(mut self, mass: F) -> Self {
        self.mass = mass;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.mass > F::zero()) || !self.mass.is_finite() {
            return Err(PhysicsError::InvalidMass);
        }
        let count = self.vertices.len();
        if count == 0 {
            return Err(PhysicsError::InsufficientVertices);
        }
        let check = |index: usize| {
            if index < count {
                Ok(())
            } else {
                Err(PhysicsError::VertexOutOfBounds { index, count })
            }
        };
        let coincide = |a: usize, b: usize| self.vertices[a].position == self.vertices[b].position;

        for link in &self.links {
            match *link {
                Link::Edge(a, b) | Link::Brace(a, b) => {
                    check(a)?;
                    check(b)?;
                    if coincide(a, b) {
                        return Err(PhysicsError::DegenerateConstraint { a, b });
                    }
                }
                Link::Spring { a, b, .. } => {
                    check(a)?;
                    check(b)?;
                    if coincide(a, b) {
                        return Err(PhysicsError::DegenerateConstraint { a, b });
                    }
                }
                Link::Angle { a, b, c, .. } => {
                    check(a)?;
                    check(b)?;
                    check(c)?;
                }
                Link::Pin(v) => check(v)?,
            }
        }
        Ok(())
    }

    /// Split into vertices, the mass, and constraints built against
    /// `vertices` with local indices.
    pub(crate) fn into_parts(self) -> (AllocVec<Vertex<F>>, AllocVec<Constraint<F>>, F) {
        let vertices = self.vertices;
        let constraints = self
            .links
            .into_iter()
            .map(|link| match link {
                Link::Edge(a, b) => Constraint::Distance(DistanceConstraint::edge(a, b, &vertices)),
                Link::Brace(a, b) => Constraint::Distance(DistanceConstraint::new(a, b, &vertices)),
                Link::Spring { a, b, stiffness, rest_length } => {
                    Constraint::Spring(SpringConstraint::new(a, b, stiffness, rest_length, &vertices))
                }
                Link::Angle { a, b, c, stiffness } => {
                    Constraint::Angle(AngleConstraint::new(a, b, c, stiffness, &vertices))
                }
                Link::Pin(v) => Constraint::Pin(PinConstraint::new(v, vertices[v].position)),
            })
            .collect();
        (vertices, constraints, self.mass)
    }
}

impl<F: Float> Default for BodyBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}
