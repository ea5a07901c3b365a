use glam::Vec3;
use kinesis_scene::{OrbitCamera, Ray, Scene};

use crate::registry::{BodyBinding, BodyRegistry};

/// Picking policy: what a successful pick does to the body it hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickConfig {
    /// Impulse applied at the picked body's center of mass, in N·s.
    pub impulse: Vec3,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            impulse: Vec3::new(0.0, 5.0, 0.0),
        }
    }
}

/// Resolves a pointer position to the bound proxy under it, if any.
pub fn pick(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    camera: &OrbitCamera,
    scene: &Scene,
    registry: &BodyRegistry,
) -> Option<BodyBinding> {
    pick_with_ray(&camera.screen_ray(x, y, width, height), scene, registry)
}

/// Finds the bound proxy nearest along `ray`.
///
/// Only registered proxies participate; scene decorations without a body
/// never pick. Candidates are tested in registration order and a hit must be
/// strictly nearer to displace the current best, so exact ties resolve to the
/// earliest-registered binding. Hits behind the ray origin are discarded.
pub fn pick_with_ray(ray: &Ray, scene: &Scene, registry: &BodyRegistry) -> Option<BodyBinding> {
    let mut best: Option<(f32, BodyBinding)> = None;
    for binding in registry.bindings() {
        let Some(proxy) = scene.get(binding.proxy) else {
            continue;
        };
        let Some(t) = proxy.bounds.intersect(ray, &proxy.transform) else {
            continue;
        };
        if best.is_none_or(|(best_t, _)| t < best_t) {
            best = Some((t, *binding));
        }
    }
    best.map(|(_, binding)| binding)
}
