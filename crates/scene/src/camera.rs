use glam::{Mat4, Vec3};

use crate::bounds::Ray;

/// Orbit camera circling a target point.
///
/// Yaw and pitch are in radians; pitch is clamped short of the poles so the
/// view matrix never degenerates. Projection follows wgpu conventions
/// (right-handed, 0..1 depth).
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
}

const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;
const MIN_DISTANCE: f32 = 0.5;

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(Vec3::new(0.0, 2.0, 20.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// Builds a camera whose orbit parameters place the eye at `eye` while
    /// looking at `target`.
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(MIN_DISTANCE);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        Self {
            target,
            yaw,
            pitch,
            distance,
            fov_y: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            sensitivity: 0.005,
            zoom_speed: 1.0,
        }
    }

    /// World-space eye position derived from the orbit parameters.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Rotates the orbit by a mouse delta, keeping pitch off the poles.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Moves the eye along the view direction. Positive `delta` zooms in.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta * self.zoom_speed).max(MIN_DISTANCE);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Unprojects a cursor position into a world-space ray.
    ///
    /// `x`/`y` are in pixels with the origin at the top-left, matching the
    /// coordinates window backends report.
    pub fn screen_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Ray {
        let ndc_x = (x / width) * 2.0 - 1.0;
        let ndc_y = -((y / height) * 2.0 - 1.0);
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(near, (far - near).normalize())
    }

    /// Projects a world point to pixel coordinates, or `None` when the point
    /// sits behind the camera.
    pub fn project_to_screen(&self, world: Vec3, width: f32, height: f32) -> Option<(f32, f32)> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip / clip.w;
        Some((
            (ndc.x + 1.0) * 0.5 * width,
            (1.0 - ndc.y) * 0.5 * height,
        ))
    }
}
