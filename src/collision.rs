//! Separating-axis detection between bodies, contact resolution and
//! point queries.

use crate::body::{Body, BodyId};
use crate::constraint::Constraint;
use crate::float::Float;
use crate::vec::Vec2;
use crate::vertex::Vertex;

/// A detected penetration, handed from [`detect`] to [`resolve`].
///
/// The reference body owns the edge; the incident body owns the vertex
/// that reached deepest into it. `axis` points from the reference body
/// towards the incident one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact<F: Float> {
    pub axis: Vec2<F>,
    pub depth: F,
    /// World constraint index of the reference edge.
    pub edge: usize,
    /// World vertex indices of the reference edge's endpoints.
    pub edge_vertices: (usize, usize),
    pub reference: BodyId,
    pub reference_mass: F,
    /// World vertex index of the contact vertex.
    pub vertex: usize,
    pub incident: BodyId,
    pub incident_mass: F,
}

/// Result of a bounded nearest-vertex search over a whole world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClosestVertex {
    pub body: BodyId,
    /// World vertex index.
    pub vertex: usize,
    /// World constraint index of a pin holding the vertex, if any.
    pub pin: Option<usize>,
}

/// Test two bodies with the separating axis theorem.
///
/// Bounding boxes must be current. Both bodies' cached projection
/// intervals are left at the last tested axis. Bodies without edges never
/// collide.
pub fn detect<F: Float>(
    b0: &mut Body<F>,
    b1: &mut Body<F>,
    vertices: &[Vertex<F>],
    constraints: &[Constraint<F>],
) -> Option<Contact<F>> {
    if !b0.aabb_overlaps(b1) {
        return None;
    }
    let n0 = b0.edges().len();
    let n1 = b1.edges().len();
    if n0 == 0 || n1 == 0 {
        return None;
    }

    let mut min_distance = F::max_value();
    let mut best = None;

    for i in 0..n0 + n1 {
        let e = if i < n0 { b0.edges()[i] } else { b1.edges()[i - n0] };
        let edge = constraints[e].as_distance()?;
        let axis = Vec2::edge_normal(vertices[edge.a].position, vertices[edge.b].position);

        let (min0, max0) = b0.project_axis(vertices, axis);
        let (min1, max1) = b1.project_axis(vertices, axis);

        let distance = if min0 < min1 { min1 - max0 } else { min0 - max1 };
        if distance >= F::zero() {
            return None;
        }
        if distance.abs() < min_distance {
            min_distance = distance.abs();
            best = Some((axis, e));
        }
    }

    let (mut axis, e) = best?;
    let edge = constraints[e].as_distance()?;

    let (incident, reference): (&Body<F>, &Body<F>) = if edge.owner() == Some(b1.id()) {
        (&*b0, &*b1)
    } else {
        (&*b1, &*b0)
    };

    if (incident.center - reference.center).dot(axis) < F::zero() {
        axis = -axis;
    }

    let mut smallest = F::max_value();
    let mut contact_vertex = incident.vertex_range().start;
    for i in incident.vertex_range() {
        let d = axis.dot(vertices[i].position - reference.center);
        if d < smallest {
            smallest = d;
            contact_vertex = i;
        }
    }

    tracing::trace!(
        reference = reference.id().0,
        incident = incident.id().0,
        vertex = contact_vertex,
        "contact"
    );

    Some(Contact {
        axis,
        depth: min_distance,
        edge: e,
        edge_vertices: (edge.a, edge.b),
        reference: reference.id(),
        reference_mass: reference.mass,
        vertex: contact_vertex,
        incident: incident.id(),
        incident_mass: incident.mass,
    })
}

/// Push the contact vertex and the reference edge apart, then apply
/// friction to their previous positions.
pub fn resolve<F: Float>(contact: &Contact<F>, vertices: &mut [Vertex<F>], friction: F) {
    let one = F::one();
    let (e0, e1) = contact.edge_vertices;
    let (p0, o0) = (vertices[e0].position, vertices[e0].old_position);
    let (p1, o1) = (vertices[e1].position, vertices[e1].old_position);
    let (vp, vo) = (vertices[contact.vertex].position, vertices[contact.vertex].old_position);
    debug_assert!(p0 != p1, "reference edge has zero length");

    let response = contact.axis.scale(contact.depth);

    // Parametrise along the edge's dominant direction.
    let t = if (p0.x - p1.x).abs() > (p0.y - p1.y).abs() {
        (vp.x - response.x - p0.x) / (p1.x - p0.x)
    } else {
        (vp.y - response.y - p0.y) / (p1.y - p0.y)
    };
    let lambda = one / (t * t + (one - t) * (one - t));

    let total = contact.incident_mass + contact.reference_mass;
    let m0 = contact.incident_mass / total;
    let m1 = contact.reference_mass / total;

    let p0 = p0 - response.scale((one - t) * lambda * m0);
    let p1 = p1 - response.scale(t * lambda * m0);
    let vp = vp + response.scale(m1);
    vertices[e0].position = p0;
    vertices[e1].position = p1;
    vertices[contact.vertex].position = vp;

    let relative = (vp - vo) - (p0 + p1 - o0 - o1).scale(F::half());
    let tangent = contact.axis.perp();
    let tangential = tangent.scale(relative.dot(tangent));

    vertices[contact.vertex].old_position = vo + tangential.scale(friction * m1);
    vertices[e0].old_position = o0 - tangential.scale((one - t) * friction * lambda * m0);
    vertices[e1].old_position = o1 - tangential.scale(t * friction * lambda * m0);
}

/// Even-odd test against the body's vertex ring, after a bounding box check.
pub fn is_point_inside_body<F: Float>(point: Vec2<F>, body: &Body<F>, vertices: &[Vertex<F>]) -> bool {
    if !body.aabb_contains(point) {
        return false;
    }

    let ring = &vertices[body.vertex_range()];
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let pi = ring[i].position;
        let pj = ring[j].position;
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// World index of the body's vertex nearest to `point`.
pub fn closest_vertex<F: Float>(body: &Body<F>, vertices: &[Vertex<F>], point: Vec2<F>) -> Option<usize> {
    let mut min_distance = F::max_value();
    let mut closest = None;
    for i in body.vertex_range() {
        let d = vertices[i].position.distance_sq(point);
        if d < min_distance {
            min_distance = d;
            closest = Some(i);
        }
    }
    closest
}

/// Nearest vertex to `point` within `radius` across all bodies, with the
/// pin holding it when the owning body has one.
pub fn closest_vertex_within<F: Float>(
    bodies: &[Body<F>],
    vertices: &[Vertex<F>],
    constraints: &[Constraint<F>],
    point: Vec2<F>,
    radius: F,
) -> Option<ClosestVertex> {
    let radius_sq = radius * radius;
    let mut min_distance = F::max_value();
    let mut found: Option<(&Body<F>, usize)> = None;

    for body in bodies {
        for i in body.vertex_range() {
            let d = vertices[i].position.distance_sq(point);
            if d < radius_sq && d < min_distance {
                min_distance = d;
                found = Some((body, i));
            }
        }
    }

    let (body, vertex) = found?;
    let pin = body
        .constraint_indices()
        .iter()
        .copied()
        .filter(|&c| constraints[c].as_pin().map_or(false, |p| p.vertex == vertex))
        .last();

    Some(ClosestVertex { body: body.id(), vertex, pin })
}
