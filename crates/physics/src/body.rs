use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Motion type of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Integrated by the solver; responds to gravity and impulses.
    Dynamic,
    /// Immovable; collides but never moves.
    Fixed,
}

/// Description of a rigid body to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec3,
    pub rotation: Quat,
    /// When false the body never auto-sleeps. The demo scene disables sleep
    /// so high-restitution bodies keep bouncing indefinitely.
    pub can_sleep: bool,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            can_sleep: true,
        }
    }
}

impl BodyDesc {
    /// Dynamic body at `position` with identity rotation.
    pub fn dynamic_at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Fixed body at `position` with identity rotation.
    pub fn fixed_at(position: Vec3) -> Self {
        Self {
            kind: BodyKind::Fixed,
            position,
            ..Self::default()
        }
    }
}

/// Collision shape descriptor, resolved into a rapier shape at collider
/// creation. Hull and mesh variants validate their input there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeDesc {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    Cylinder { half_height: f32, radius: f32 },
    ConvexHull { points: Vec<Vec3> },
    TriMesh { vertices: Vec<Vec3>, indices: Vec<[u32; 3]> },
}

/// Position + orientation readback for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Shape data rejected at collider creation.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("convex hull could not be computed from {point_count} points")]
    DegenerateConvexHull { point_count: usize },
    #[error("triangle mesh rejected: {0}")]
    InvalidTriMesh(String),
    #[error("collider target body not found")]
    BodyNotFound,
}
