//! Benchmarks for jello simulation.

use criterion::{criterion_group, criterion_main, Criterion};
use jello::*;

fn rectangle(x: f32, y: f32, w: f32, h: f32) -> BodyBuilder<f32> {
    BodyBuilder::new()
        .vertex(x, y)
        .vertex(x + w, y)
        .vertex(x + w, y + h)
        .vertex(x, y + h)
        .polygon_edges()
        .brace(0, 2)
        .brace(3, 1)
}

fn bench_single_body(c: &mut Criterion) {
    c.bench_function("single_box_drop_300_steps", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::new(200.0, 200.0, WorldConfig::new()).unwrap();
            world.add_body(rectangle(100.0, 100.0, 10.0, 10.0)).unwrap();
            for _ in 0..300 {
                world.step(1.0 / 60.0, &mut NoOpStepObserver);
            }
            world.vertices()[0].position
        });
    });
}

fn bench_box_pile(c: &mut Criterion) {
    c.bench_function("box_pile_24_bodies_120_steps", |b| {
        b.iter(|| {
            let config = WorldConfig::new().with_gravity(0.3);
            let mut world: World<f32> = World::new(400.0, 300.0, config).unwrap();
            for i in 0..24 {
                let x = 40.0 + (i % 6) as f32 * 50.0;
                let y = 40.0 + (i / 6) as f32 * 40.0;
                world.add_body(rectangle(x, y, 30.0, 20.0)).unwrap();
            }
            for _ in 0..120 {
                world.step(1.0 / 60.0, &mut NoOpStepObserver);
            }
            world.frame()
        });
    });
}

fn bench_recording(c: &mut Criterion) {
    c.bench_function("record_two_bodies_60_steps", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::new(200.0, 200.0, WorldConfig::new()).unwrap();
            world.add_body(rectangle(60.0, 150.0, 30.0, 20.0)).unwrap();
            world.add_body(rectangle(65.0, 138.0, 10.0, 10.0)).unwrap();
            let mut recorder = Recorder::new(world.config());
            for _ in 0..60 {
                world.step(1.0 / 60.0, &mut recorder);
            }
            recorder.into_recording().frames.len()
        });
    });
}

criterion_group!(benches, bench_single_body, bench_box_pile, bench_recording);
criterion_main!(benches);
