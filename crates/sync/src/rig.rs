//! The falling-bodies demo rig shared by the viewer and the CLI.
//!
//! Five dynamic bodies drop from y = 5 onto a fixed floor: a cuboid, a ball,
//! a cylinder, an icosahedron with a convex-hull collider, and a torus with a
//! trimesh collider. Restitution above 1 keeps the rig lively; auto-sleep is
//! off so bodies never settle out of the simulation.

use glam::{Vec3, Vec4};
use kinesis_physics::{BodyDesc, ShapeDesc};
use kinesis_scene::mesh::{self, MeshData};
use kinesis_scene::{MeshHandle, ProxyBounds};

use crate::registry::BodyBinding;
use crate::stage::{BodySetup, PhysicsStage, SpawnError};

pub const SPAWN_HEIGHT: f32 = 5.0;
pub const RESTITUTION: f32 = 1.1;
pub const FLOOR_HALF_EXTENTS: Vec3 = Vec3::new(50.0, 0.5, 50.0);

/// Mesh data for every rig shape. Generated once; the same vertices feed the
/// renderer and the convex-hull/trimesh collider descriptors, so collision
/// geometry matches what is drawn.
pub struct RigMeshes {
    pub cube: MeshData,
    pub sphere: MeshData,
    pub cylinder: MeshData,
    pub icosahedron: MeshData,
    pub torus: MeshData,
    pub floor: MeshData,
}

impl RigMeshes {
    pub fn generate() -> Self {
        Self {
            cube: mesh::cuboid(Vec3::splat(0.5)),
            sphere: mesh::uv_sphere(1.0, 16, 24),
            cylinder: mesh::cylinder(1.0, 1.0, 16),
            icosahedron: mesh::icosahedron(1.0),
            torus: mesh::torus(1.0, 0.4, 24, 12),
            floor: mesh::cuboid(FLOOR_HALF_EXTENTS),
        }
    }
}

/// Renderer-assigned handles for the rig meshes, in [`RigMeshes`] field
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigHandles {
    pub cube: MeshHandle,
    pub sphere: MeshHandle,
    pub cylinder: MeshHandle,
    pub icosahedron: MeshHandle,
    pub torus: MeshHandle,
    pub floor: MeshHandle,
}

impl RigHandles {
    /// Handles for consumers that never upload meshes (the text renderer).
    pub fn sequential() -> Self {
        Self {
            cube: MeshHandle(0),
            sphere: MeshHandle(1),
            cylinder: MeshHandle(2),
            icosahedron: MeshHandle(3),
            torus: MeshHandle(4),
            floor: MeshHandle(5),
        }
    }
}

/// Spawns the whole rig. Returns the six bindings in spawn order, floor
/// last.
pub fn spawn_rig(
    stage: &mut PhysicsStage,
    meshes: &RigMeshes,
    handles: &RigHandles,
) -> Result<Vec<BodyBinding>, SpawnError> {
    let mut bindings = Vec::with_capacity(6);

    let dynamic = |position: Vec3,
                   shape: ShapeDesc,
                   mesh: MeshHandle,
                   bounds: ProxyBounds,
                   color: Vec4| BodySetup {
        restitution: RESTITUTION,
        color,
        ..BodySetup::new(
            BodyDesc {
                can_sleep: false,
                ..BodyDesc::dynamic_at(position)
            },
            shape,
            mesh,
            bounds,
        )
    };

    bindings.push(stage.spawn(&dynamic(
        Vec3::new(-5.0, SPAWN_HEIGHT, 0.0),
        ShapeDesc::Cuboid {
            half_extents: Vec3::splat(0.5),
        },
        handles.cube,
        ProxyBounds::Obb {
            half_extents: Vec3::splat(0.5),
        },
        Vec4::new(0.9, 0.3, 0.25, 1.0),
    ))?);

    bindings.push(stage.spawn(&dynamic(
        Vec3::new(-2.5, SPAWN_HEIGHT, 0.0),
        ShapeDesc::Ball { radius: 1.0 },
        handles.sphere,
        ProxyBounds::Sphere { radius: 1.0 },
        Vec4::new(0.3, 0.7, 0.9, 1.0),
    ))?);

    bindings.push(stage.spawn(&dynamic(
        Vec3::new(0.0, SPAWN_HEIGHT, 0.0),
        ShapeDesc::Cylinder {
            half_height: 1.0,
            radius: 1.0,
        },
        handles.cylinder,
        ProxyBounds::Obb {
            half_extents: Vec3::new(1.0, 1.0, 1.0),
        },
        Vec4::new(0.4, 0.85, 0.4, 1.0),
    ))?);

    bindings.push(stage.spawn(&dynamic(
        Vec3::new(2.5, SPAWN_HEIGHT, 0.0),
        ShapeDesc::ConvexHull {
            points: meshes.icosahedron.positions().collect(),
        },
        handles.icosahedron,
        ProxyBounds::Sphere {
            radius: meshes.icosahedron.bounding_radius(),
        },
        Vec4::new(0.95, 0.8, 0.3, 1.0),
    ))?);

    bindings.push(stage.spawn(&dynamic(
        Vec3::new(5.0, SPAWN_HEIGHT, 0.0),
        ShapeDesc::TriMesh {
            vertices: meshes.torus.positions().collect(),
            indices: meshes.torus.triangles(),
        },
        handles.torus,
        ProxyBounds::Sphere {
            radius: meshes.torus.bounding_radius(),
        },
        Vec4::new(0.75, 0.45, 0.9, 1.0),
    ))?);

    bindings.push(stage.spawn(&BodySetup {
        mass: 0.0,
        color: Vec4::new(0.45, 0.45, 0.5, 1.0),
        ..BodySetup::new(
            BodyDesc::fixed_at(Vec3::new(0.0, -1.0, 0.0)),
            ShapeDesc::Cuboid {
                half_extents: FLOOR_HALF_EXTENTS,
            },
            handles.floor,
            ProxyBounds::Obb {
                half_extents: FLOOR_HALF_EXTENTS,
            },
        )
    })?);

    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rigged_stage() -> (PhysicsStage, Vec<BodyBinding>) {
        let mut stage = PhysicsStage::new();
        let meshes = RigMeshes::generate();
        let bindings = spawn_rig(&mut stage, &meshes, &RigHandles::sequential()).unwrap();
        (stage, bindings)
    }

    #[test]
    fn rig_spawns_five_dynamic_bodies_and_a_floor() {
        let (stage, bindings) = rigged_stage();
        assert_eq!(bindings.len(), 6);
        assert_eq!(stage.world().body_count(), 6);
        assert_eq!(stage.world().collider_count(), 6);
        assert_eq!(stage.scene().len(), 6);

        let dynamic = bindings
            .iter()
            .filter(|b| stage.world().is_dynamic(b.body))
            .count();
        assert_eq!(dynamic, 5);
        assert!(!stage.world().is_dynamic(bindings[5].body));
    }

    #[test]
    fn rig_bodies_never_fall_through_the_floor() {
        let (mut stage, bindings) = rigged_stage();
        for _ in 0..120 {
            stage.frame(1.0 / 60.0).unwrap();
        }
        for binding in &bindings[..5] {
            let pose = stage.world().body_pose(binding.body).unwrap();
            assert!(pose.position.y > -1.0, "body sank to {}", pose.position.y);
        }
    }

    #[test]
    fn rig_meshes_carry_valid_collider_data() {
        let meshes = RigMeshes::generate();
        assert!(meshes.icosahedron.positions().count() >= 4);
        let triangles = meshes.torus.triangles();
        assert!(!triangles.is_empty());
        let max = meshes.torus.positions().count() as u32;
        assert!(triangles.iter().flatten().all(|&i| i < max));
    }
}
