use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
///
/// Position and rotation are the authoritative pose mirrored from the
/// simulation each frame; scale only affects rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform at `position` with identity rotation and unit scale.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Model matrix for rendering.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn from_position_keeps_identity_rotation() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn matrix_places_translation_in_last_column() {
        let t = Transform::from_position(Vec3::new(4.0, 5.0, 6.0));
        let m = t.matrix();
        assert_eq!(m.w_axis.truncate(), Vec3::new(4.0, 5.0, 6.0));
    }
}
