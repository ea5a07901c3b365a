use std::fmt::Write as _;

use crate::camera::OrbitCamera;
use crate::lineset::LineSet;
use crate::scene::Scene;

/// Backend-agnostic frame sink.
///
/// Implementations read the scene, camera, and overlay lines for one frame
/// and produce whatever their backend produces: a GPU submission, a text
/// dump, nothing at all.
pub trait SceneRenderer {
    type Output;

    fn render(&mut self, scene: &Scene, camera: &OrbitCamera, lines: &LineSet) -> Self::Output;
}

/// Renders a frame as plain text. Used by the CLI and by tests that want to
/// inspect a frame without a GPU.
#[derive(Debug, Default)]
pub struct TextFrameRenderer {
    pub precision: usize,
}

impl TextFrameRenderer {
    pub fn new() -> Self {
        Self { precision: 2 }
    }
}

impl SceneRenderer for TextFrameRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene, camera: &OrbitCamera, lines: &LineSet) -> String {
        let mut out = String::new();
        let eye = camera.eye();
        let p = self.precision;
        let _ = writeln!(
            out,
            "eye ({:.p$}, {:.p$}, {:.p$}) proxies {} overlay segments {}",
            eye.x,
            eye.y,
            eye.z,
            scene.len(),
            lines.segment_count(),
        );
        for (id, proxy) in scene.proxies() {
            let pos = proxy.transform.position;
            let _ = writeln!(
                out,
                "  proxy {} mesh {} at ({:.p$}, {:.p$}, {:.p$})",
                id.0, proxy.mesh.0, pos.x, pos.y, pos.z,
            );
        }
        out
    }
}
