#![allow(dead_code)]

use jello::{BodyBuilder, Vec2, World, WorldConfig};

/// A braced rectangle with its top-left corner at `(x, y)`, wound clockwise
/// on screen.
pub fn rectangle(x: f32, y: f32, w: f32, h: f32) -> BodyBuilder<f32> {
    BodyBuilder::new()
        .vertex(x, y)
        .vertex(x + w, y)
        .vertex(x + w, y + h)
        .vertex(x, y + h)
        .polygon_edges()
        .brace(0, 2)
        .brace(3, 1)
}

pub fn triangle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> BodyBuilder<f32> {
    BodyBuilder::new()
        .vertex(a.0, a.1)
        .vertex(b.0, b.1)
        .vertex(c.0, c.1)
        .polygon_edges()
}

/// A lone vertex: no edges, no constraints.
pub fn particle(x: f32, y: f32) -> BodyBuilder<f32> {
    BodyBuilder::new().vertex(x, y)
}

pub fn world(width: f32, height: f32, config: WorldConfig<f32>) -> World<f32> {
    World::new(width, height, config).unwrap()
}

/// Positions of every vertex in the world.
pub fn positions(world: &World<f32>) -> Vec<Vec2<f32>> {
    world.vertices().iter().map(|v| v.position).collect()
}

/// Average vertex position of a body.
pub fn centroid(world: &World<f32>, body: jello::BodyId) -> Vec2<f32> {
    let range = world.body(body).unwrap().vertex_range();
    let n = range.len() as f32;
    let sum = world.vertices()[range]
        .iter()
        .fold(Vec2::zero(), |acc, v| acc + v.position);
    sum.scale(1.0 / n)
}
