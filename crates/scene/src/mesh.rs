//! CPU-side mesh generation.
//!
//! Generators emit counter-clockwise triangles (viewed from outside) with
//! per-vertex normals, sized in world units so the same data can seed both a
//! GPU vertex buffer and a collision shape.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Index triples, one per triangle.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect()
    }

    /// Radius of the tightest origin-centered sphere containing the mesh.
    pub fn bounding_radius(&self) -> f32 {
        self.positions()
            .map(|p| p.length())
            .fold(0.0_f32, f32::max)
    }

    /// Half extents of the tightest origin-centered box containing the mesh.
    pub fn half_extents(&self) -> Vec3 {
        self.positions()
            .fold(Vec3::ZERO, |acc, p| acc.max(p.abs()))
    }
}

/// Axis-aligned box with per-face normals, 24 vertices.
pub fn cuboid(half_extents: Vec3) -> MeshData {
    let h = half_extents;
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        (
            Vec3::X,
            [
                Vec3::new(h.x, -h.y, h.z),
                Vec3::new(h.x, -h.y, -h.z),
                Vec3::new(h.x, h.y, -h.z),
                Vec3::new(h.x, h.y, h.z),
            ],
        ),
        (
            Vec3::NEG_X,
            [
                Vec3::new(-h.x, -h.y, -h.z),
                Vec3::new(-h.x, -h.y, h.z),
                Vec3::new(-h.x, h.y, h.z),
                Vec3::new(-h.x, h.y, -h.z),
            ],
        ),
        (
            Vec3::Y,
            [
                Vec3::new(-h.x, h.y, h.z),
                Vec3::new(h.x, h.y, h.z),
                Vec3::new(h.x, h.y, -h.z),
                Vec3::new(-h.x, h.y, -h.z),
            ],
        ),
        (
            Vec3::NEG_Y,
            [
                Vec3::new(h.x, -h.y, h.z),
                Vec3::new(-h.x, -h.y, h.z),
                Vec3::new(-h.x, -h.y, -h.z),
                Vec3::new(h.x, -h.y, -h.z),
            ],
        ),
        (
            Vec3::Z,
            [
                Vec3::new(-h.x, -h.y, h.z),
                Vec3::new(h.x, -h.y, h.z),
                Vec3::new(h.x, h.y, h.z),
                Vec3::new(-h.x, h.y, h.z),
            ],
        ),
        (
            Vec3::NEG_Z,
            [
                Vec3::new(h.x, -h.y, -h.z),
                Vec3::new(-h.x, -h.y, -h.z),
                Vec3::new(-h.x, h.y, -h.z),
                Vec3::new(h.x, h.y, -h.z),
            ],
        ),
    ];

    let mut mesh = MeshData::default();
    for (normal, corners) in faces {
        let base = mesh.vertices.len() as u32;
        for position in corners {
            mesh.vertices.push(MeshVertex { position, normal });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Latitude/longitude sphere with smooth normals.
pub fn uv_sphere(radius: f32, rings: u32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for ring in 0..=rings {
        let theta = ring as f32 / rings as f32 * std::f32::consts::PI;
        let (sin_t, cos_t) = theta.sin_cos();
        for seg in 0..=segments {
            let phi = seg as f32 / segments as f32 * std::f32::consts::TAU;
            let (sin_p, cos_p) = phi.sin_cos();
            let normal = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
            mesh.vertices.push(MeshVertex {
                position: normal * radius,
                normal,
            });
        }
    }
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * (segments + 1) + seg;
            let b = a + segments + 1;
            mesh.indices
                .extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    mesh
}

/// Capped cylinder around the Y axis.
pub fn cylinder(half_height: f32, radius: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();

    // Side wall, smooth radial normals.
    for &y in &[half_height, -half_height] {
        for seg in 0..=segments {
            let phi = seg as f32 / segments as f32 * std::f32::consts::TAU;
            let (sin_p, cos_p) = phi.sin_cos();
            mesh.vertices.push(MeshVertex {
                position: Vec3::new(radius * cos_p, y, radius * sin_p),
                normal: Vec3::new(cos_p, 0.0, sin_p),
            });
        }
    }
    for seg in 0..segments {
        let t = seg;
        let b = seg + segments + 1;
        mesh.indices
            .extend_from_slice(&[t, t + 1, b, t + 1, b + 1, b]);
    }

    // Caps, flat normals and their own ring so the silhouette edge stays hard.
    for &(y, normal) in &[(half_height, Vec3::Y), (-half_height, Vec3::NEG_Y)] {
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(MeshVertex {
            position: Vec3::new(0.0, y, 0.0),
            normal,
        });
        for seg in 0..=segments {
            let phi = seg as f32 / segments as f32 * std::f32::consts::TAU;
            let (sin_p, cos_p) = phi.sin_cos();
            mesh.vertices.push(MeshVertex {
                position: Vec3::new(radius * cos_p, y, radius * sin_p),
                normal,
            });
        }
        for seg in 0..segments {
            let ring = center + 1 + seg;
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, ring + 1, ring]);
            } else {
                mesh.indices.extend_from_slice(&[center, ring, ring + 1]);
            }
        }
    }
    mesh
}

/// Regular icosahedron, flat-shaded (three vertices per face).
pub fn icosahedron(radius: f32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let corners = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .map(|v| v.normalize() * radius);
    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    let mut mesh = MeshData::default();
    for face in FACES {
        let [a, b, c] = face.map(|i| corners[i]);
        let normal = (b - a).cross(c - a).normalize();
        let base = mesh.vertices.len() as u32;
        for position in [a, b, c] {
            mesh.vertices.push(MeshVertex { position, normal });
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
    mesh
}

/// Torus around the Y axis with smooth normals. `major_radius` is the ring
/// radius, `minor_radius` the tube radius.
pub fn torus(
    major_radius: f32,
    minor_radius: f32,
    major_segments: u32,
    minor_segments: u32,
) -> MeshData {
    let mut mesh = MeshData::default();
    for major in 0..=major_segments {
        let u = major as f32 / major_segments as f32 * std::f32::consts::TAU;
        let (sin_u, cos_u) = u.sin_cos();
        for minor in 0..=minor_segments {
            let v = minor as f32 / minor_segments as f32 * std::f32::consts::TAU;
            let (sin_v, cos_v) = v.sin_cos();
            let ring = major_radius + minor_radius * cos_v;
            mesh.vertices.push(MeshVertex {
                position: Vec3::new(ring * cos_u, minor_radius * sin_v, ring * sin_u),
                normal: Vec3::new(cos_v * cos_u, sin_v, cos_v * sin_u),
            });
        }
    }
    for major in 0..major_segments {
        for minor in 0..minor_segments {
            let a = major * (minor_segments + 1) + minor;
            let b = a + minor_segments + 1;
            mesh.indices
                .extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_bounds(mesh: &MeshData) {
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    fn assert_unit_normals(mesh: &MeshData) {
        for v in &mesh.vertices {
            assert!((v.normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cuboid_has_one_quad_per_face() {
        let mesh = cuboid(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_indices_in_bounds(&mesh);
        assert_unit_normals(&mesh);
        assert_eq!(mesh.half_extents(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn cuboid_winding_faces_outward() {
        let mesh = cuboid(Vec3::ONE);
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.vertices[i as usize].position);
            let face = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn sphere_counts_and_radius() {
        let mesh = uv_sphere(2.0, 8, 16);
        assert_eq!(mesh.vertices.len(), (8 + 1) * (16 + 1));
        assert_eq!(mesh.indices.len(), (6 * 8 * 16) as usize);
        assert_indices_in_bounds(&mesh);
        assert_unit_normals(&mesh);
        assert!((mesh.bounding_radius() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn sphere_winding_faces_outward() {
        let mesh = uv_sphere(1.0, 6, 12);
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.vertices[i as usize].position);
            let face = (b - a).cross(c - a);
            if face.length_squared() < 1e-10 {
                continue; // pole triangles collapse
            }
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn cylinder_counts() {
        let segments = 12;
        let mesh = cylinder(1.5, 0.5, segments);
        let side = 2 * (segments + 1);
        let caps = 2 * (segments + 2);
        assert_eq!(mesh.vertices.len(), (side + caps) as usize);
        assert_eq!(mesh.indices.len(), (6 * segments + 6 * segments) as usize);
        assert_indices_in_bounds(&mesh);
        assert_unit_normals(&mesh);
        assert_eq!(mesh.half_extents(), Vec3::new(0.5, 1.5, 0.5));
    }

    #[test]
    fn icosahedron_is_flat_shaded() {
        let mesh = icosahedron(1.0);
        assert_eq!(mesh.vertices.len(), 60);
        assert_eq!(mesh.triangles().len(), 20);
        assert_indices_in_bounds(&mesh);
        assert_unit_normals(&mesh);
        // All corners sit on the sphere.
        for p in mesh.positions() {
            assert!((p.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn icosahedron_winding_faces_outward() {
        let mesh = icosahedron(1.0);
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.vertices[i as usize].position);
            let face = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn torus_counts_and_extent() {
        let mesh = torus(2.0, 0.5, 16, 8);
        assert_eq!(mesh.vertices.len(), ((16 + 1) * (8 + 1)) as usize);
        assert_eq!(mesh.indices.len(), (6 * 16 * 8) as usize);
        assert_indices_in_bounds(&mesh);
        assert_unit_normals(&mesh);
        assert!((mesh.bounding_radius() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn torus_winding_faces_outward() {
        let mesh = torus(2.0, 0.5, 12, 6);
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.vertices[i as usize].position);
            let face = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            // Outward here means away from the tube core circle.
            let core = Vec3::new(centroid.x, 0.0, centroid.z)
                .normalize_or_zero()
                * 2.0;
            assert!(face.dot(centroid - core) > 0.0);
        }
    }
}
