mod common;

use common::{positions, rectangle, world};
use jello::recorder::Recording;
use jello::{NoOpStepObserver, PhysicsError, Recorder, World, WorldConfig};

const DT: f32 = 1.0 / 60.0;

fn scene(config: WorldConfig<f32>) -> World<f32> {
    let mut w = world(200.0, 200.0, config);
    w.add_body(rectangle(60.0, 150.0, 30.0, 20.0)).unwrap();
    w.add_body(rectangle(65.0, 138.0, 10.0, 10.0).mass(3.0)).unwrap();
    w
}

fn record(config: WorldConfig<f32>, frames: usize) -> (World<f32>, Recording) {
    let mut w = scene(config);
    let mut recorder = Recorder::new(w.config());
    for _ in 0..frames {
        w.step(DT, &mut recorder);
    }
    (w, recorder.into_recording())
}

#[test]
fn phases_are_recorded_in_step_order() {
    let (_, recording) = record(WorldConfig::new().with_iterations(2), 3);
    assert_eq!(recording.frames.len(), 3);
    assert_eq!(recording.frames[2].frame, 2);

    let names: Vec<&str> = recording.frames[0].phases.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "beforeIntegrate",
            "integrate",
            "constrain_solve_0",
            "boundingbox_0",
            "collision_0",
            "constrain_solve_1",
            "boundingbox_1",
            "collision_1",
            "boundsChecking",
        ]
    );
}

#[test]
fn collision_phases_are_skipped_when_disabled() {
    let (_, recording) = record(WorldConfig::new().with_iterations(2).with_collision(false), 1);
    assert!(recording.frames[0].phases.iter().all(|p| !p.name.starts_with("collision")));
    assert_eq!(recording.frames[0].phases.len(), 7);
}

#[test]
fn phase_scope_selects_fields() {
    let (_, recording) = record(WorldConfig::new(), 1);
    let phases = &recording.frames[0].phases;

    let all = &phases[0].bodies[1];
    assert_eq!(all.id, 1);
    assert_eq!(all.mass, Some(3.0));
    assert!(all.center.is_some() && all.vertices.as_ref().map(Vec::len) == Some(4));

    let bbox = &phases[3].bodies[0];
    assert!(bbox.half_extent.is_some() && bbox.vertices.is_none());

    let integrate = &phases[1].bodies[0];
    assert!(integrate.mass.is_none() && integrate.vertices.is_some());
}

#[test]
fn parameters_are_recorded() {
    let config = WorldConfig::new().with_gravity(0.25).with_friction_floor(0.8).with_drag_force(7.0);
    let (_, recording) = record(config, 0);
    assert!(recording.frames.is_empty());
    assert_eq!(recording.gravity, 0.25);
    assert!((recording.friction - 0.2).abs() < 1e-6);
    assert!((recording.friction_floor - 0.8).abs() < 1e-6);
    assert_eq!(recording.viscosity, 1.0);
    assert_eq!(recording.drag_force, 7.0);
}

#[test]
fn recording_does_not_change_the_simulation() {
    let (recorded, _) = record(WorldConfig::new(), 120);
    let mut plain = scene(WorldConfig::new());
    for _ in 0..120 {
        plain.step(DT, &mut NoOpStepObserver);
    }
    assert_eq!(positions(&recorded), positions(&plain));
}

#[test]
fn json_fixture_matches_a_fresh_run() {
    let (_, fixture) = record(WorldConfig::new(), 30);
    let json = fixture.to_json().unwrap();
    let loaded = Recording::from_json(&json).unwrap();

    let (_, rerun) = record(WorldConfig::new(), 30);
    assert_eq!(loaded.compare(&rerun, 1e-4), Ok(()));
}

#[test]
fn fixture_catches_a_diverging_run() {
    let (_, fixture) = record(WorldConfig::new(), 10);
    let (_, heavier) = record(WorldConfig::new().with_gravity(0.3), 10);

    match fixture.compare(&heavier, 1e-4) {
        Err(PhysicsError::FixtureMismatch { frame, phase, field, .. }) => {
            assert_eq!(frame, 0);
            assert_eq!(phase, "integrate");
            assert_eq!(field, "y");
        }
        other => panic!("expected a mismatch, got {:?}", other),
    }

    let (_, shorter) = record(WorldConfig::new(), 9);
    assert!(matches!(fixture.compare(&shorter, 1e-4), Err(PhysicsError::FixtureLayout(_))));
}

/// One frame of a lone vertex at (50, 50), one relaxation pass, no
/// collision pass, in the layout older fixtures were written in: phases
/// under `steps`, `forceDrag`, no `dt`, and zeroed fields outside a
/// phase's scope.
const LONE_VERTEX_FIXTURE: &str = r#"{
    "frames": [
        {
            "frame": 0,
            "steps": [
                {
                    "name": "beforeIntegrate",
                    "bodies": [
                        {
                            "id": 0,
                            "vertices": [{ "x": 50.0, "y": 50.0, "ox": 50.0, "oy": 50.0 }],
                            "mass": 1.0, "min": 0.0, "max": 0.0,
                            "center": { "x": 50.0, "y": 50.0 },
                            "halfExtent": { "x": 0.0, "y": 0.0 }
                        }
                    ]
                },
                {
                    "name": "integrate",
                    "bodies": [
                        {
                            "id": 0,
                            "vertices": [{ "x": 50.0, "y": 50.1, "ox": 50.0, "oy": 50.0 }],
                            "mass": 0.0, "min": 0.0, "max": 0.0,
                            "center": { "x": 0.0, "y": 0.0 },
                            "halfExtent": { "x": 0.0, "y": 0.0 }
                        }
                    ]
                },
                {
                    "name": "constrain_solve_0",
                    "bodies": [
                        {
                            "id": 0,
                            "vertices": [{ "x": 50.0, "y": 50.1, "ox": 50.0, "oy": 50.0 }],
                            "mass": 0.0, "min": 0.0, "max": 0.0,
                            "center": { "x": 0.0, "y": 0.0 },
                            "halfExtent": { "x": 0.0, "y": 0.0 }
                        }
                    ]
                },
                {
                    "name": "boundingbox_0",
                    "bodies": [
                        {
                            "id": 0,
                            "vertices": [],
                            "mass": 1.0, "min": 0.0, "max": 0.0,
                            "center": { "x": 50.0, "y": 50.1 },
                            "halfExtent": { "x": 0.0, "y": 0.0 }
                        }
                    ]
                },
                {
                    "name": "boundsChecking",
                    "bodies": [
                        {
                            "id": 0,
                            "vertices": [{ "x": 50.0, "y": 50.1, "ox": 50.0, "oy": 50.0 }],
                            "mass": 0.0, "min": 0.0, "max": 0.0,
                            "center": { "x": 0.0, "y": 0.0 },
                            "halfExtent": { "x": 0.0, "y": 0.0 }
                        }
                    ]
                }
            ]
        }
    ],
    "gravity": 0.1,
    "friction": 0.2,
    "frictionFloor": 0.1,
    "viscosity": 1.0,
    "forceDrag": 5.0
}"#;

#[test]
fn loads_fixtures_in_the_legacy_layout() {
    let fixture = Recording::from_json(LONE_VERTEX_FIXTURE).unwrap();
    assert_eq!(fixture.frames[0].dt, 0.0);
    assert_eq!(fixture.frames[0].phases.len(), 5);
    assert_eq!(fixture.drag_force, 5.0);

    let json = fixture.to_json().unwrap();
    assert!(json.contains("\"steps\"") && json.contains("\"forceDrag\""));
    assert_eq!(Recording::from_json(&json).unwrap(), fixture);
}

#[test]
fn legacy_fixture_matches_a_fresh_run() {
    let fixture = Recording::from_json(LONE_VERTEX_FIXTURE).unwrap();

    let config = WorldConfig::new().with_iterations(1).with_collision(false);
    let mut w = world(200.0, 200.0, config);
    w.add_body(common::particle(50.0, 50.0)).unwrap();
    let mut recorder = Recorder::new(w.config());
    w.step(DT, &mut recorder);

    assert_eq!(fixture.compare(&recorder.into_recording(), 1e-4), Ok(()));
}
