use glam::{Quat, Vec3};
use kinesis_common::Transform;
use serde::{Deserialize, Serialize};

/// World-space ray used for picking. `dir` is expected to be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Bounding geometry a proxy exposes for picking.
///
/// Extents are in world units around the proxy's position; the proxy's
/// render scale is not applied (bounds are sized for the actual geometry at
/// creation). Boxes honor the proxy's rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProxyBounds {
    Sphere { radius: f32 },
    Obb { half_extents: Vec3 },
}

impl ProxyBounds {
    /// Nearest non-negative ray parameter hitting these bounds placed at the
    /// proxy's transform, or `None` on a miss.
    pub fn intersect(&self, ray: &Ray, transform: &Transform) -> Option<f32> {
        match *self {
            ProxyBounds::Sphere { radius } => ray_sphere(ray, transform.position, radius),
            ProxyBounds::Obb { half_extents } => {
                ray_obb(ray, transform.position, transform.rotation, half_extents)
            }
        }
    }
}

/// Ray/sphere intersection. Returns the nearest non-negative root, which is
/// the far root when the origin is inside the sphere.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.dir.length_squared();
    let b = 2.0 * oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_d = disc.sqrt();
    let t0 = (-b - sqrt_d) / (2.0 * a);
    let t1 = (-b + sqrt_d) / (2.0 * a);
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}

/// Ray/oriented-box intersection: transform the ray into box-local space,
/// then run the slab test.
pub fn ray_obb(ray: &Ray, center: Vec3, rotation: Quat, half_extents: Vec3) -> Option<f32> {
    let inv = rotation.inverse();
    let local = Ray {
        origin: inv * (ray.origin - center),
        dir: inv * ray.dir,
    };
    ray_aabb(&local, half_extents)
}

fn ray_aabb(ray: &Ray, half: Vec3) -> Option<f32> {
    let origin = ray.origin.to_array();
    let dir = ray.dir.to_array();
    let half = half.to_array();

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        if dir[axis].abs() < 1e-9 {
            // Parallel to this slab: miss unless the origin is inside it.
            if origin[axis].abs() > half[axis] {
                return None;
            }
        } else {
            let inv_d = 1.0 / dir[axis];
            let mut t0 = (-half[axis] - origin[axis]) * inv_d;
            let mut t1 = (half[axis] - origin[axis]) * inv_d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
    }
    if t_min >= 0.0 {
        Some(t_min)
    } else if t_max >= 0.0 {
        Some(t_max)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    fn ray_z() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn ray_hits_sphere_at_near_root() {
        let t = ray_sphere(&ray_z(), Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_offset_sphere() {
        assert!(ray_sphere(&ray_z(), Vec3::new(5.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn sphere_behind_origin_is_not_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_sphere(&ray, Vec3::new(0.0, 0.0, 10.0), 1.0).is_none());
    }

    #[test]
    fn origin_inside_sphere_returns_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = ray_sphere(&ray, Vec3::ZERO, 2.0).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn ray_hits_axis_aligned_box() {
        let t = ray_obb(
            &ray_z(),
            Vec3::ZERO,
            Quat::IDENTITY,
            Vec3::new(1.0, 1.0, 1.0),
        )
        .unwrap();
        assert!((t - 9.0).abs() < 1e-5);
    }

    #[test]
    fn ray_parallel_to_slab_outside_misses() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_obb(&ray, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE).is_none());
    }

    #[test]
    fn rotated_box_is_hit_through_its_corner_gap() {
        // A thin slab rotated 45 degrees around Y now faces the +Z ray.
        let rot = Quat::from_rotation_y(FRAC_PI_4);
        let half = Vec3::new(2.0, 1.0, 0.1);
        let hit = ray_obb(&ray_z(), Vec3::ZERO, rot, half);
        assert!(hit.is_some());

        // Aim past the rotated extent: misses.
        let off = Ray::new(Vec3::new(3.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_obb(&off, Vec3::ZERO, rot, half).is_none());
    }

    #[test]
    fn bounds_intersect_uses_proxy_position() {
        let bounds = ProxyBounds::Sphere { radius: 1.0 };
        let mut transform = Transform::default();
        transform.position = Vec3::new(0.0, 0.0, 5.0);
        let t = bounds.intersect(&ray_z(), &transform).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn nearer_hit_has_smaller_parameter() {
        let near = ProxyBounds::Sphere { radius: 1.0 };
        let far = ProxyBounds::Sphere { radius: 1.0 };
        let t_near = near
            .intersect(&ray_z(), &Transform::from_position(Vec3::new(0.0, 0.0, 5.0)))
            .unwrap();
        let t_far = far
            .intersect(&ray_z(), &Transform::from_position(Vec3::new(0.0, 0.0, -3.0)))
            .unwrap();
        assert!(t_near < t_far);
    }
}
