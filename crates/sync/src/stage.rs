use glam::{Vec3, Vec4};
use kinesis_common::Transform;
use kinesis_physics::{
    BodyDesc, ImpulsePoint, PhysicsWorld, ShapeDesc, ShapeError, WireframeExtractor,
};
use kinesis_scene::{LineSet, MeshHandle, OrbitCamera, ProxyBounds, ProxyId, RenderProxy, Scene};
use thiserror::Error;

use crate::impulse::{ImpulseSlot, PendingImpulse};
use crate::picker::{pick, PickConfig};
use crate::registry::{BindingId, BodyBinding, BodyRegistry, RegistryError};
use crate::stepper::{advance, StepConfig, StepError, StepOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("binding {binding:?} refers to a body missing from the simulation")]
    MissingBody { binding: BindingId },
    #[error("binding {binding:?} refers to a proxy missing from the scene")]
    MissingProxy { binding: BindingId },
}

/// Copies the authoritative pose of every bound body into its render proxy.
///
/// Position and orientation are written verbatim; proxy scale is untouched.
/// Bindings are validated up front so a broken one fails the whole pass and
/// every proxy keeps its previous pose.
pub fn sync_transforms(
    registry: &BodyRegistry,
    world: &PhysicsWorld,
    scene: &mut Scene,
) -> Result<usize, SyncError> {
    for binding in registry.bindings() {
        if !world.contains_body(binding.body) {
            return Err(SyncError::MissingBody {
                binding: binding.id,
            });
        }
        if !scene.contains(binding.proxy) {
            return Err(SyncError::MissingProxy {
                binding: binding.id,
            });
        }
    }

    let mut synced = 0;
    for binding in registry.bindings() {
        let pose = world
            .body_pose(binding.body)
            .ok_or(SyncError::MissingBody {
                binding: binding.id,
            })?;
        let proxy = scene
            .get_mut(binding.proxy)
            .ok_or(SyncError::MissingProxy {
                binding: binding.id,
            })?;
        proxy.transform.position = pose.position;
        proxy.transform.rotation = pose.rotation;
        synced += 1;
    }
    Ok(synced)
}

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FrameError {
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Everything needed to spawn one simulated object: the body, its collision
/// shape, and the render proxy that mirrors it.
#[derive(Debug, Clone)]
pub struct BodySetup {
    pub body: BodyDesc,
    pub shape: ShapeDesc,
    pub mass: f32,
    pub restitution: f32,
    pub mesh: MeshHandle,
    pub bounds: ProxyBounds,
    pub color: Vec4,
    /// Render-only scale; the simulation never sees it.
    pub scale: Vec3,
}

impl BodySetup {
    pub fn new(body: BodyDesc, shape: ShapeDesc, mesh: MeshHandle, bounds: ProxyBounds) -> Self {
        Self {
            body,
            shape,
            mass: 1.0,
            restitution: 0.0,
            mesh,
            bounds,
            color: Vec4::ONE,
            scale: Vec3::ONE,
        }
    }
}

/// What one successful frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub step: StepOutcome,
    /// Number of bindings whose proxies were updated.
    pub synced: usize,
    /// Segments in the refreshed debug overlay (0 while the overlay is off).
    pub overlay_segments: usize,
}

/// Owns the simulation, the scene, and everything that ties them together.
///
/// All mutation funnels through here: the frame loop calls [`frame`] once per
/// tick, input handlers call [`pointer_event`], and scene content comes and
/// goes through [`spawn`]/[`despawn`] so body, collider, proxy, and binding
/// stay in lockstep.
///
/// [`frame`]: PhysicsStage::frame
/// [`pointer_event`]: PhysicsStage::pointer_event
/// [`spawn`]: PhysicsStage::spawn
/// [`despawn`]: PhysicsStage::despawn
pub struct PhysicsStage {
    world: PhysicsWorld,
    scene: Scene,
    registry: BodyRegistry,
    slot: ImpulseSlot,
    extractor: WireframeExtractor,
    overlay: LineSet,
    pub step_config: StepConfig,
    pub pick_config: PickConfig,
    /// When false, [`frame`] skips wireframe extraction and clears the
    /// overlay.
    ///
    /// [`frame`]: PhysicsStage::frame
    pub overlay_enabled: bool,
}

impl Default for PhysicsStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsStage {
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            world: PhysicsWorld::new(gravity),
            scene: Scene::new(),
            registry: BodyRegistry::new(),
            slot: ImpulseSlot::new(),
            extractor: WireframeExtractor::new(),
            overlay: LineSet::new(),
            step_config: StepConfig::default(),
            pick_config: PickConfig::default(),
            overlay_enabled: true,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Debug wireframe from the most recent frame.
    pub fn overlay(&self) -> &LineSet {
        &self.overlay
    }

    pub fn pending_impulse(&self) -> Option<&PendingImpulse> {
        self.slot.peek()
    }

    /// Creates body, collider, proxy, and binding as one unit. On any
    /// failure everything already created is rolled back, so a failed spawn
    /// leaves no debris.
    pub fn spawn(&mut self, setup: &BodySetup) -> Result<BodyBinding, SpawnError> {
        let body = self.world.spawn_body(&setup.body);
        if let Err(err) =
            self.world
                .attach_collider(body, &setup.shape, setup.mass, setup.restitution)
        {
            self.world.remove_body(body);
            return Err(err.into());
        }

        let transform = Transform {
            position: setup.body.position,
            rotation: setup.body.rotation,
            scale: setup.scale,
        };
        let proxy = self.scene.spawn(RenderProxy::new(
            transform,
            setup.mesh,
            setup.bounds,
            setup.color,
        ));
        match self.registry.register(proxy, body) {
            Ok(binding) => Ok(binding),
            Err(err) => {
                self.scene.remove(proxy);
                self.world.remove_body(body);
                Err(err.into())
            }
        }
    }

    /// Removes a bound object from simulation and scene together.
    pub fn despawn(&mut self, id: BindingId) -> Result<BodyBinding, RegistryError> {
        let binding = self.registry.unregister(id)?;
        self.world.remove_body(binding.body);
        self.scene.remove(binding.proxy);
        Ok(binding)
    }

    /// Adds a scene-only proxy with no simulation body. Decorations keep
    /// their transform forever and never participate in picking.
    pub fn add_decoration(&mut self, proxy: RenderProxy) -> ProxyId {
        self.scene.spawn(proxy)
    }

    /// Runs one frame: drain the impulse slot, step the simulation by the
    /// clamped delta, mirror poses into the scene, refresh the overlay.
    ///
    /// On error nothing after the failing phase runs, so the scene keeps the
    /// previous frame's poses and stays drawable.
    pub fn frame(&mut self, raw_dt: f32) -> Result<FrameReport, FrameError> {
        let _span = tracing::info_span!("stage_frame").entered();
        let step = advance(&mut self.world, &mut self.slot, raw_dt, &self.step_config)?;
        let synced = sync_transforms(&self.registry, &self.world, &mut self.scene)?;

        if self.overlay_enabled {
            let wire = self.extractor.refresh(&self.world);
            self.overlay.replace(&wire.positions, &wire.colors);
        } else {
            self.overlay.clear();
        }

        Ok(FrameReport {
            step,
            synced,
            overlay_segments: self.overlay.segment_count(),
        })
    }

    /// Resolves a pointer position to the body under it and queues the
    /// configured impulse against that body. Returns the hit binding, or
    /// `None` when the pointer was over empty space.
    pub fn pointer_event(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        camera: &OrbitCamera,
    ) -> Option<BodyBinding> {
        let binding = pick(x, y, width, height, camera, &self.scene, &self.registry)?;
        let displaced = self.slot.queue(PendingImpulse {
            body: binding.body,
            impulse: self.pick_config.impulse,
            point: ImpulsePoint::CenterOfMass,
        });
        tracing::debug!(
            binding = ?binding.id,
            displaced = displaced.is_some(),
            "queued pick impulse"
        );
        Some(binding)
    }

    /// Queues an impulse directly, bypassing picking.
    pub fn queue_impulse(&mut self, pending: PendingImpulse) -> Option<PendingImpulse> {
        self.slot.queue(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinesis_physics::ImpulseOutcome;

    fn ball_setup(position: Vec3) -> BodySetup {
        BodySetup::new(
            BodyDesc::dynamic_at(position),
            ShapeDesc::Ball { radius: 0.5 },
            MeshHandle(0),
            ProxyBounds::Sphere { radius: 0.5 },
        )
    }

    fn floor_setup() -> BodySetup {
        let half = Vec3::new(50.0, 0.5, 50.0);
        BodySetup {
            mass: 0.0,
            ..BodySetup::new(
                BodyDesc::fixed_at(Vec3::new(0.0, -1.0, 0.0)),
                ShapeDesc::Cuboid { half_extents: half },
                MeshHandle(1),
                ProxyBounds::Obb { half_extents: half },
            )
        }
    }

    #[test]
    fn spawn_creates_body_collider_proxy_and_binding() {
        let mut stage = PhysicsStage::new();
        let binding = stage.spawn(&ball_setup(Vec3::new(0.0, 5.0, 0.0))).unwrap();

        assert_eq!(stage.world().body_count(), 1);
        assert_eq!(stage.world().collider_count(), 1);
        assert_eq!(stage.scene().len(), 1);
        assert_eq!(stage.registry().len(), 1);
        assert_eq!(
            stage.registry().binding_for_proxy(binding.proxy),
            Some(binding)
        );
    }

    #[test]
    fn failed_spawn_leaves_no_debris() {
        let mut stage = PhysicsStage::new();
        let degenerate = BodySetup::new(
            BodyDesc::dynamic_at(Vec3::ZERO),
            ShapeDesc::ConvexHull {
                points: vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0],
            },
            MeshHandle(0),
            ProxyBounds::Sphere { radius: 1.0 },
        );

        let err = stage.spawn(&degenerate).unwrap_err();
        assert!(matches!(err, SpawnError::Shape(_)));
        assert_eq!(stage.world().body_count(), 0);
        assert_eq!(stage.scene().len(), 0);
        assert!(stage.registry().is_empty());
    }

    #[test]
    fn despawn_removes_every_part() {
        let mut stage = PhysicsStage::new();
        let binding = stage.spawn(&ball_setup(Vec3::ZERO)).unwrap();

        stage.despawn(binding.id).unwrap();
        assert_eq!(stage.world().body_count(), 0);
        assert_eq!(stage.world().collider_count(), 0);
        assert_eq!(stage.scene().len(), 0);
        assert!(stage.registry().is_empty());

        let err = stage.despawn(binding.id).unwrap_err();
        assert_eq!(err, RegistryError::NotFound(binding.id));
    }

    #[test]
    fn falling_body_descends_monotonically() {
        let mut stage = PhysicsStage::new();
        let binding = stage.spawn(&ball_setup(Vec3::new(0.0, 5.0, 0.0))).unwrap();

        let mut last_y = 5.0;
        for _ in 0..60 {
            stage.frame(1.0 / 60.0).unwrap();
            let y = stage.scene().get(binding.proxy).unwrap().transform.position.y;
            assert!(y < last_y, "height did not decrease: {y} vs {last_y}");
            last_y = y;
        }
        assert!(last_y < 5.0);
    }

    #[test]
    fn synced_pose_matches_simulation_exactly() {
        let mut stage = PhysicsStage::new();
        let binding = stage.spawn(&ball_setup(Vec3::new(0.3, 7.0, -1.2))).unwrap();

        for _ in 0..10 {
            stage.frame(1.0 / 60.0).unwrap();
        }
        let pose = stage.world().body_pose(binding.body).unwrap();
        let proxy = stage.scene().get(binding.proxy).unwrap();
        assert_eq!(proxy.transform.position, pose.position);
        assert_eq!(proxy.transform.rotation, pose.rotation);
    }

    #[test]
    fn sync_leaves_render_scale_alone() {
        let mut stage = PhysicsStage::new();
        let setup = BodySetup {
            scale: Vec3::splat(2.5),
            ..ball_setup(Vec3::new(0.0, 5.0, 0.0))
        };
        let binding = stage.spawn(&setup).unwrap();

        stage.frame(1.0 / 60.0).unwrap();
        let proxy = stage.scene().get(binding.proxy).unwrap();
        assert_eq!(proxy.transform.scale, Vec3::splat(2.5));
    }

    #[test]
    fn pointer_event_picks_and_queues_the_configured_impulse() {
        let mut stage = PhysicsStage::new();
        let target = Vec3::new(0.0, 5.0, 0.0);
        let binding = stage.spawn(&ball_setup(target)).unwrap();

        let mut camera = OrbitCamera::looking_from(Vec3::new(0.0, 5.0, 10.0), target);
        camera.set_viewport(800, 600);
        let (sx, sy) = camera.project_to_screen(target, 800.0, 600.0).unwrap();

        let hit = stage.pointer_event(sx, sy, 800.0, 600.0, &camera).unwrap();
        assert_eq!(hit.id, binding.id);
        let pending = stage.pending_impulse().unwrap();
        assert_eq!(pending.body, binding.body);
        assert_eq!(pending.impulse, stage.pick_config.impulse);

        let report = stage.frame(1.0 / 60.0).unwrap();
        assert_eq!(report.step.impulse, Some(ImpulseOutcome::Applied));
        assert!(stage.pending_impulse().is_none());
    }

    #[test]
    fn pointer_event_over_empty_space_queues_nothing() {
        let mut stage = PhysicsStage::new();
        stage.spawn(&ball_setup(Vec3::new(0.0, 5.0, 0.0))).unwrap();

        let camera = OrbitCamera::looking_from(Vec3::new(0.0, 5.0, 10.0), Vec3::new(0.0, 5.0, 0.0));
        assert!(stage.pointer_event(0.0, 0.0, 800.0, 600.0, &camera).is_none());
        assert!(stage.pending_impulse().is_none());
    }

    #[test]
    fn picking_the_floor_is_ignored_by_the_step() {
        let mut stage = PhysicsStage::new();
        let floor = stage.spawn(&floor_setup()).unwrap();

        let camera =
            OrbitCamera::looking_from(Vec3::new(0.0, 10.0, 0.01), Vec3::new(0.0, -1.0, 0.0));
        let hit = stage.pointer_event(400.0, 300.0, 800.0, 600.0, &camera);
        assert_eq!(hit.map(|b| b.id), Some(floor.id));

        let report = stage.frame(1.0 / 60.0).unwrap();
        assert_eq!(report.step.impulse, Some(ImpulseOutcome::Ignored));
        let pose = stage.world().body_pose(floor.body).unwrap();
        assert_eq!(pose.position, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn overlay_follows_collider_population() {
        let mut stage = PhysicsStage::new();
        let binding = stage.spawn(&ball_setup(Vec3::new(0.0, 5.0, 0.0))).unwrap();

        let report = stage.frame(1.0 / 60.0).unwrap();
        assert!(report.overlay_segments > 0);
        assert!(!stage.overlay().is_empty());

        stage.despawn(binding.id).unwrap();
        let report = stage.frame(1.0 / 60.0).unwrap();
        assert_eq!(report.overlay_segments, 0);
        assert!(stage.overlay().is_empty());
    }

    #[test]
    fn disabling_the_overlay_clears_it() {
        let mut stage = PhysicsStage::new();
        stage.spawn(&ball_setup(Vec3::new(0.0, 5.0, 0.0))).unwrap();
        stage.frame(1.0 / 60.0).unwrap();
        assert!(!stage.overlay().is_empty());

        stage.overlay_enabled = false;
        let report = stage.frame(1.0 / 60.0).unwrap();
        assert_eq!(report.overlay_segments, 0);
        assert!(stage.overlay().is_empty());
    }

    #[test]
    fn rejected_delta_keeps_previous_poses() {
        let mut stage = PhysicsStage::new();
        let binding = stage.spawn(&ball_setup(Vec3::new(0.0, 5.0, 0.0))).unwrap();
        stage.frame(1.0 / 60.0).unwrap();
        let before = stage.scene().get(binding.proxy).unwrap().transform.position;

        let err = stage.frame(f32::NAN).unwrap_err();
        assert!(matches!(err, FrameError::Step(_)));
        let after = stage.scene().get(binding.proxy).unwrap().transform.position;
        assert_eq!(before, after);
    }

    #[test]
    fn decorations_never_move_and_never_pick() {
        let mut stage = PhysicsStage::new();
        let marker = stage.add_decoration(RenderProxy::new(
            Transform::from_position(Vec3::new(0.0, 3.0, 0.0)),
            MeshHandle(9),
            ProxyBounds::Sphere { radius: 1.0 },
            Vec4::ONE,
        ));

        let camera = OrbitCamera::looking_from(Vec3::new(0.0, 3.0, 10.0), Vec3::new(0.0, 3.0, 0.0));
        assert!(stage.pointer_event(400.0, 300.0, 800.0, 600.0, &camera).is_none());

        stage.frame(1.0 / 60.0).unwrap();
        let proxy = stage.scene().get(marker).unwrap();
        assert_eq!(proxy.transform.position, Vec3::new(0.0, 3.0, 0.0));
    }
}
