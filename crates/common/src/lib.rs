//! Shared spatial types used across the kinesis workspace.
//!
//! # Invariants
//! - `Transform::rotation` is always a unit quaternion.
//! - Scale is a render-only property; simulation code never reads it.

pub mod types;

pub use types::Transform;
