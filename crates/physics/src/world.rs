use glam::Vec3;
use rapier3d::prelude::*;

use crate::body::{BodyDesc, BodyKind, Pose, ShapeDesc, ShapeError};
use crate::convert;

/// Where an impulse is applied on the target body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpulsePoint {
    CenterOfMass,
    /// World-space application point; off-center application induces spin.
    World(Vec3),
}

/// Outcome of an impulse application attempt.
///
/// `Ignored` is a normal result, not an error: fixed bodies and missing
/// handles legitimately cannot receive momentum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseOutcome {
    Applied,
    Ignored,
}

/// Owns the rapier simulation state and advances it one step at a time.
///
/// The synchronization layer above holds body handles; all reads and writes
/// of simulation state go through this wrapper. Iteration parameters keep
/// rapier defaults apart from `dt`, which is set per step by the caller.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity vector.
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: convert::vec_to_na(gravity),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    pub fn gravity(&self) -> Vec3 {
        convert::vec_from_na(&self.gravity)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Insert a rigid body from its description. The handle stays valid until
    /// [`remove_body`](Self::remove_body).
    pub fn spawn_body(&mut self, desc: &BodyDesc) -> RigidBodyHandle {
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
        };
        let body = builder
            .position(convert::isometry(desc.position, desc.rotation))
            .can_sleep(desc.can_sleep)
            .build();
        let handle = self.bodies.insert(body);
        tracing::debug!(kind = ?desc.kind, ?handle, "spawned rigid body");
        handle
    }

    /// Build a collider from `shape` and attach it to `body` with the given
    /// mass and restitution. Hull and mesh shapes are validated here so bad
    /// geometry never enters the world.
    pub fn attach_collider(
        &mut self,
        body: RigidBodyHandle,
        shape: &ShapeDesc,
        mass: f32,
        restitution: f32,
    ) -> Result<ColliderHandle, ShapeError> {
        if self.bodies.get(body).is_none() {
            return Err(ShapeError::BodyNotFound);
        }
        let shared = build_shape(shape)?;
        let collider = ColliderBuilder::new(shared)
            .mass(mass)
            .restitution(restitution)
            .build();
        Ok(self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies))
    }

    /// Remove a body and all colliders attached to it. Returns false if the
    /// handle was already gone.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        let removed = self
            .bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some();
        if removed {
            tracing::debug!(?handle, "removed rigid body");
        }
        removed
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.get(handle).is_some()
    }

    /// Current world position and orientation of a body.
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<Pose> {
        let body = self.bodies.get(handle)?;
        Some(Pose {
            position: convert::vec_from_na(body.translation()),
            rotation: convert::quat_from_na(body.rotation()),
        })
    }

    pub fn is_dynamic(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.get(handle).is_some_and(|b| b.is_dynamic())
    }

    /// Apply an instantaneous momentum change. Non-dynamic or massless
    /// targets yield [`ImpulseOutcome::Ignored`] and are left untouched.
    pub fn apply_impulse(
        &mut self,
        handle: RigidBodyHandle,
        impulse: Vec3,
        point: ImpulsePoint,
        wake: bool,
    ) -> ImpulseOutcome {
        let Some(body) = self.bodies.get_mut(handle) else {
            return ImpulseOutcome::Ignored;
        };
        if !body.is_dynamic() || body.mass() == 0.0 {
            tracing::debug!(?handle, "impulse ignored: target cannot move");
            return ImpulseOutcome::Ignored;
        }
        match point {
            ImpulsePoint::CenterOfMass => body.apply_impulse(convert::vec_to_na(impulse), wake),
            ImpulsePoint::World(p) => {
                body.apply_impulse_at_point(convert::vec_to_na(impulse), convert::point_to_na(p), wake)
            }
        }
        ImpulseOutcome::Applied
    }

    /// Advance the simulation by exactly one step of `dt` seconds.
    ///
    /// Clamping and validation of `dt` are the caller's responsibility; this
    /// method runs whatever timestep it is handed.
    pub fn step(&mut self, dt: f32) {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    pub(crate) fn bodies(&self) -> &RigidBodySet {
        &self.bodies
    }

    pub(crate) fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    pub(crate) fn impulse_joints(&self) -> &ImpulseJointSet {
        &self.impulse_joints
    }

    pub(crate) fn multibody_joints(&self) -> &MultibodyJointSet {
        &self.multibody_joints
    }

    pub(crate) fn narrow_phase(&self) -> &NarrowPhase {
        &self.narrow_phase
    }
}

fn build_shape(shape: &ShapeDesc) -> Result<SharedShape, ShapeError> {
    match shape {
        ShapeDesc::Cuboid { half_extents } => Ok(SharedShape::cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
        )),
        ShapeDesc::Ball { radius } => Ok(SharedShape::ball(*radius)),
        ShapeDesc::Cylinder {
            half_height,
            radius,
        } => Ok(SharedShape::cylinder(*half_height, *radius)),
        ShapeDesc::ConvexHull { points } => {
            let pts: Vec<Point<Real>> = points.iter().map(|p| convert::point_to_na(*p)).collect();
            SharedShape::convex_hull(&pts).ok_or(ShapeError::DegenerateConvexHull {
                point_count: points.len(),
            })
        }
        ShapeDesc::TriMesh { vertices, indices } => {
            if vertices.is_empty() || indices.is_empty() {
                return Err(ShapeError::InvalidTriMesh(
                    "empty vertex or index data".into(),
                ));
            }
            if let Some(tri) = indices
                .iter()
                .find(|t| t.iter().any(|&i| i as usize >= vertices.len()))
            {
                return Err(ShapeError::InvalidTriMesh(format!(
                    "triangle index out of range: {tri:?}"
                )));
            }
            let pts: Vec<Point<Real>> = vertices.iter().map(|p| convert::point_to_na(*p)).collect();
            SharedShape::trimesh(pts, indices.clone())
                .map_err(|e| ShapeError::InvalidTriMesh(e.to_string()))
        }
    }
}
