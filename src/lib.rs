//! Deformable 2D bodies for games: Verlet particles held together by
//! relaxed constraints, colliding through the separating axis theorem.
//!
//! A [`World`] owns every vertex and constraint in two flat lists. Bodies
//! are polygons over a slice of those vertices whose boundary edges double
//! as collision axes.
//!
//! # Features
//!
//! - **Verlet integration**: implicit velocity, floor friction, optional viscous "hard" mode
//! - **Constraints**: distance, spring, pin, angle and drag, relaxed in declaration order
//! - **Collision**: SAT between body polygons with mass-weighted, friction-aware response
//! - **Picking**: point-in-body and nearest-vertex queries for interactive dragging
//! - **Observable**: monitor each phase of a step via the `StepObserver` trait
//! - **Fixtures**: record steps to JSON and compare runs with [`Recorder`]
//! - **`no_std` compatible**: works in embedded and WASM environments
//!
//! ```
//! use jello::{BodyBuilder, NoOpStepObserver, World, WorldConfig};
//!
//! let mut world: World<f32> = World::new(200.0, 200.0, WorldConfig::new()).unwrap();
//! let square = BodyBuilder::new()
//!     .vertex(95.0, 95.0)
//!     .vertex(105.0, 95.0)
//!     .vertex(105.0, 105.0)
//!     .vertex(95.0, 105.0)
//!     .polygon_edges()
//!     .brace(0, 2)
//!     .brace(3, 1);
//! world.add_body(square).unwrap();
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0, &mut NoOpStepObserver);
//! }
//! assert_eq!(world.frame(), 60);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod vertex;
pub mod constraint;
pub mod body;
pub mod collision;
pub mod world;
pub mod observer;
pub mod recorder;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use vertex::Vertex;
pub use constraint::{
    AngleConstraint, Constraint, ConstraintKind, DistanceConstraint, DragConstraint, DragTarget, PinConstraint,
    SpringConstraint,
};
pub use body::{Body, BodyBuilder, BodyId};
pub use collision::{ClosestVertex, Contact};
pub use world::World;
pub use observer::{NoOpStepObserver, Phase, RecordScope, StepObserver};
pub use recorder::{Recorder, Recording};
pub use config::{IntegrationMode, WorldConfig};
pub use error::PhysicsError;
