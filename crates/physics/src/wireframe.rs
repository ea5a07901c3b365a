use rapier3d::pipeline::{
    DebugRenderBackend, DebugRenderMode, DebugRenderObject, DebugRenderPipeline, DebugRenderStyle,
};
use rapier3d::prelude::{Point, Real};

use crate::world::PhysicsWorld;

/// Flat line-list snapshot of every active collider's shape.
///
/// `positions` holds 3 floats per vertex, `colors` 4 floats (RGBA) per
/// vertex; consecutive vertex pairs form one segment, no index buffer. The
/// buffers are replaced wholesale on every [`WireframeExtractor::refresh`];
/// nothing persists across frames.
#[derive(Debug, Clone, Default)]
pub struct DebugWireframe {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl DebugWireframe {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn segment_count(&self) -> usize {
        self.vertex_count() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
    }
}

/// Pulls collider wireframes out of the physics world via rapier's debug
/// render pipeline. Holds its output buffer so repeated refreshes reuse the
/// allocation.
pub struct WireframeExtractor {
    pipeline: DebugRenderPipeline,
    buffer: DebugWireframe,
}

impl Default for WireframeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl WireframeExtractor {
    pub fn new() -> Self {
        Self {
            pipeline: DebugRenderPipeline::new(
                DebugRenderStyle::default(),
                DebugRenderMode::COLLIDER_SHAPES,
            ),
            buffer: DebugWireframe::default(),
        }
    }

    /// Rebuild the wireframe buffers from the current world state. A world
    /// with no colliders yields empty buffers.
    pub fn refresh(&mut self, world: &PhysicsWorld) -> &DebugWireframe {
        self.buffer.clear();
        let mut collector = LineCollector {
            out: &mut self.buffer,
        };
        self.pipeline.render(
            &mut collector,
            world.bodies(),
            world.colliders(),
            world.impulse_joints(),
            world.multibody_joints(),
            world.narrow_phase(),
        );
        &self.buffer
    }

    /// Buffer from the most recent refresh.
    pub fn buffer(&self) -> &DebugWireframe {
        &self.buffer
    }
}

struct LineCollector<'a> {
    out: &'a mut DebugWireframe,
}

impl DebugRenderBackend for LineCollector<'_> {
    fn draw_line(
        &mut self,
        _object: DebugRenderObject,
        a: Point<Real>,
        b: Point<Real>,
        color: [f32; 4],
    ) {
        // rapier hands out HSLA colors; the renderer wants RGBA.
        let rgba = hsla_to_rgba(color);
        self.out
            .positions
            .extend_from_slice(&[a.x, a.y, a.z, b.x, b.y, b.z]);
        self.out.colors.extend_from_slice(&rgba);
        self.out.colors.extend_from_slice(&rgba);
    }
}

/// Convert an HSLA color (hue in degrees, saturation/lightness/alpha in
/// [0, 1]) to RGBA in [0, 1].
fn hsla_to_rgba([h, s, l, a]: [f32; 4]) -> [f32; 4] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m, a]
}
