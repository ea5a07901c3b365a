//! Physics backend: owns the rapier3d world and exposes the narrow surface
//! the synchronization layer needs — body/collider lifecycle, timestep
//! control, impulse application, and debug wireframe extraction.
//!
//! # Invariants
//! - Exactly one simulation step per [`PhysicsWorld::step`] call; no
//!   sub-stepping or accumulation happens here.
//! - Shape data is validated at collider creation, never mid-step.
//! - Pose readback is read-only; all mutation goes through explicit calls.

mod convert;

pub mod body;
pub mod wireframe;
pub mod world;

pub use body::{BodyDesc, BodyKind, Pose, ShapeDesc, ShapeError};
pub use wireframe::{DebugWireframe, WireframeExtractor};
pub use world::{ImpulseOutcome, ImpulsePoint, PhysicsWorld};

/// Opaque handle to a simulation rigid body.
pub type BodyHandle = rapier3d::prelude::RigidBodyHandle;

/// Opaque handle to a collider attached to a body.
pub type ColliderHandle = rapier3d::prelude::ColliderHandle;

pub fn crate_info() -> &'static str {
    "kinesis-physics v0.1.0"
}
