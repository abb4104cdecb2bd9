//! Phase-by-phase recording of a running world, for regression fixtures.
//!
//! A [`Recorder`] is a [`StepObserver`] that snapshots every body at the end
//! of every phase. Recordings serialize to JSON and compare field by field
//! within a tolerance, after rounding to four decimals.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec as AllocVec;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::error::PhysicsError;
use crate::float::{round_to, Float};
use crate::observer::{Phase, StepObserver};
use crate::vec::Vec2;
use crate::world::World;

const DIGITS: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vector2d {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexInfo {
    pub x: f64,
    pub y: f64,
    pub ox: f64,
    pub oy: f64,
}

/// One body at the end of one phase. Which fields are present depends on
/// the phase's [`RecordScope`](crate::observer::RecordScope).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyInfo {
    /// Position of the body in the world's body list.
    pub id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Vector2d>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_extent: Option<Vector2d>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<AllocVec<VertexInfo>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub name: String,
    pub bodies: AllocVec<BodyInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub frame: usize,
    /// Absent from fixtures written by older recorders.
    #[serde(default)]
    pub dt: f64,
    #[serde(rename = "steps")]
    pub phases: AllocVec<PhaseRecord>,
}

/// A full recording plus the parameters it was made with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub frames: AllocVec<Frame>,
    pub gravity: f64,
    pub friction: f64,
    pub friction_floor: f64,
    pub viscosity: f64,
    #[serde(rename = "forceDrag")]
    pub drag_force: f64,
}

/// Observer that builds a [`Recording`].
pub struct Recorder {
    recording: Recording,
    current: Option<Frame>,
}

impl Recorder {
    /// Start an empty recording of a world running with `config`.
    pub fn new<F: Float>(config: &WorldConfig<F>) -> Self {
        Recorder {
            recording: Recording {
                frames: AllocVec::new(),
                gravity: config.gravity.to_f64(),
                friction: config.friction.to_f64(),
                friction_floor: config.friction_floor.to_f64(),
                viscosity: config.viscosity.to_f64(),
                drag_force: config.drag_force.to_f64(),
            },
            current: None,
        }
    }

    /// Frames completed so far.
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn into_recording(self) -> Recording {
        self.recording
    }
}

fn vector<F: Float>(v: Vec2<F>) -> Vector2d {
    Vector2d { x: v.x.to_f64(), y: v.y.to_f64() }
}

fn snapshot<F: Float>(phase: Phase, world: &World<F>) -> PhaseRecord {
    let scope = phase.scope();
    let vertices = world.vertices();

    let bodies = world
        .bodies()
        .iter()
        .enumerate()
        .map(|(id, body)| {
            let mut info = BodyInfo {
                id,
                mass: None,
                min: None,
                max: None,
                center: None,
                half_extent: None,
                vertices: None,
            };
            if scope.includes_body_data() {
                info.mass = Some(body.mass.to_f64());
                info.min = Some(body.min.to_f64());
                info.max = Some(body.max.to_f64());
                info.center = Some(vector(body.center));
                info.half_extent = Some(vector(body.half_extent));
            }
            if scope.includes_vertices() {
                info.vertices = Some(
                    vertices[body.vertex_range()]
                        .iter()
                        .map(|v| VertexInfo {
                            x: v.position.x.to_f64(),
                            y: v.position.y.to_f64(),
                            ox: v.old_position.x.to_f64(),
                            oy: v.old_position.y.to_f64(),
                        })
                        .collect(),
                );
            }
            info
        })
        .collect();

    PhaseRecord { name: phase.to_string(), bodies }
}

impl<F: Float> StepObserver<F> for Recorder {
    fn begin_frame(&mut self, dt: F) {
        self.current = Some(Frame {
            frame: self.recording.frames.len(),
            dt: dt.to_f64(),
            phases: AllocVec::new(),
        });
    }

    fn end_phase(&mut self, phase: Phase, world: &World<F>) {
        if let Some(frame) = self.current.as_mut() {
            frame.phases.push(snapshot(phase, world));
        }
    }

    fn end_frame(&mut self) {
        if let Some(frame) = self.current.take() {
            self.recording.frames.push(frame);
        }
    }
}

impl Vector2d {
    fn rounded(self) -> Self {
        Vector2d { x: round_to(self.x, DIGITS), y: round_to(self.y, DIGITS) }
    }
}

impl BodyInfo {
    fn rounded(&self) -> Self {
        let r = |v: Option<f64>| v.map(|v| round_to(v, DIGITS));
        BodyInfo {
            id: self.id,
            mass: r(self.mass),
            min: r(self.min),
            max: r(self.max),
            center: self.center.map(Vector2d::rounded),
            half_extent: self.half_extent.map(Vector2d::rounded),
            vertices: self.vertices.as_ref().map(|vs| {
                vs.iter()
                    .map(|v| VertexInfo {
                        x: round_to(v.x, DIGITS),
                        y: round_to(v.y, DIGITS),
                        ox: round_to(v.ox, DIGITS),
                        oy: round_to(v.oy, DIGITS),
                    })
                    .collect()
            }),
        }
    }

    /// Every numeric field as `(name, value)`, unrecorded fields as `None`.
    fn fields(&self) -> AllocVec<(&'static str, Option<f64>)> {
        let mut out = AllocVec::from([
            ("mass", self.mass),
            ("min", self.min),
            ("max", self.max),
            ("center.x", self.center.map(|c| c.x)),
            ("center.y", self.center.map(|c| c.y)),
            ("halfExtent.x", self.half_extent.map(|h| h.x)),
            ("halfExtent.y", self.half_extent.map(|h| h.y)),
        ]);
        if let Some(vs) = &self.vertices {
            for v in vs {
                out.extend([("x", Some(v.x)), ("y", Some(v.y)), ("ox", Some(v.ox)), ("oy", Some(v.oy))]);
            }
        }
        out
    }
}

impl Recording {
    /// A copy with every float rounded to four decimals.
    pub fn rounded(&self) -> Self {
        let frames = self
            .frames
            .iter()
            .map(|frame| Frame {
                frame: frame.frame,
                dt: frame.dt,
                phases: frame
                    .phases
                    .iter()
                    .map(|phase| PhaseRecord {
                        name: phase.name.clone(),
                        bodies: phase.bodies.iter().map(BodyInfo::rounded).collect(),
                    })
                    .collect(),
            })
            .collect();

        Recording {
            frames,
            gravity: round_to(self.gravity, DIGITS),
            friction: round_to(self.friction, DIGITS),
            friction_floor: round_to(self.friction_floor, DIGITS),
            viscosity: round_to(self.viscosity, DIGITS),
            drag_force: round_to(self.drag_force, DIGITS),
        }
    }

    /// Pretty-printed JSON of the rounded recording.
    pub fn to_json(&self) -> Result<String, PhysicsError> {
        serde_json::to_string_pretty(&self.rounded()).map_err(|e| PhysicsError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, PhysicsError> {
        serde_json::from_str(json).map_err(|e| PhysicsError::Serialization(e.to_string()))
    }

    /// Compare against `actual` after rounding both, treating `self` as the
    /// expected fixture. Reports the first difference larger than
    /// `tolerance`. A field recorded on only one side is skipped.
    pub fn compare(&self, actual: &Recording, tolerance: f64) -> Result<(), PhysicsError> {
        let expected = self.rounded();
        let actual = actual.rounded();

        if expected.frames.len() != actual.frames.len() {
            return Err(PhysicsError::FixtureLayout(format!(
                "{} frames expected, {} recorded",
                expected.frames.len(),
                actual.frames.len()
            )));
        }

        for (f, (ef, af)) in expected.frames.iter().zip(&actual.frames).enumerate() {
            if ef.phases.len() != af.phases.len() {
                return Err(PhysicsError::FixtureLayout(format!(
                    "frame {}: {} phases expected, {} recorded",
                    f,
                    ef.phases.len(),
                    af.phases.len()
                )));
            }
            for (ep, ap) in ef.phases.iter().zip(&af.phases) {
                if ep.name != ap.name || ep.bodies.len() != ap.bodies.len() {
                    return Err(PhysicsError::FixtureLayout(format!(
                        "frame {}: phase {} with {} bodies expected, {} with {} recorded",
                        f,
                        ep.name,
                        ep.bodies.len(),
                        ap.name,
                        ap.bodies.len()
                    )));
                }
                for (eb, ab) in ep.bodies.iter().zip(&ap.bodies) {
                    compare_body(f, &ep.name, eb, ab, tolerance)?;
                }
            }
        }
        Ok(())
    }
}

fn compare_body(frame: usize, phase: &str, expected: &BodyInfo, actual: &BodyInfo, tolerance: f64) -> Result<(), PhysicsError> {
    let ef = expected.fields();
    let af = actual.fields();
    if expected.id != actual.id || ef.len() != af.len() {
        return Err(PhysicsError::FixtureLayout(format!(
            "frame {} phase {} body {}: body layout differs",
            frame, phase, expected.id
        )));
    }

    for ((field, e), (_, a)) in ef.into_iter().zip(af) {
        match (e, a) {
            (Some(e), Some(a)) if (e - a).abs() <= tolerance => {}
            // Fields outside a phase's scope are not compared.
            (None, _) | (_, None) => {}
            (Some(e), Some(a)) => {
                return Err(PhysicsError::FixtureMismatch {
                    frame,
                    phase: phase.to_string(),
                    body: expected.id,
                    field,
                    expected: e,
                    actual: a,
                })
            }
        }
    }
    Ok(())
}
