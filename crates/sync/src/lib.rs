//! Synchronization between the physics simulation and the render scene.
//!
//! # Invariants
//! - Bindings are one-to-one: a proxy pairs with at most one body and vice
//!   versa, and both sides exist for as long as the binding does.
//! - Transforms are copied simulation-to-scene, never the other way.
//! - At most one impulse is pending at a time; a new pick replaces it.
//! - After a successful frame, every bound proxy carries the exact pose the
//!   simulation reported this frame (no smoothing or interpolation).

mod clock;
mod impulse;
mod picker;
mod registry;
pub mod rig;
mod stage;
mod stepper;

pub use clock::SimulationClock;
pub use impulse::{ImpulseSlot, PendingImpulse};
pub use picker::{pick, pick_with_ray, PickConfig};
pub use registry::{BindingId, BodyBinding, BodyRegistry, RegistryError};
pub use stage::{
    sync_transforms, BodySetup, FrameError, FrameReport, PhysicsStage, SpawnError, SyncError,
};
pub use stepper::{advance, StepConfig, StepError, StepOutcome};

pub fn crate_info() -> &'static str {
    "kinesis-sync v0.1.0"
}
