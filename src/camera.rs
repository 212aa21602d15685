use crate::constants::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_Z};
use glam::{Mat4, Vec3};

/// Perspective camera shared by both compositor slots.
///
/// Slots render at a fixed target size, so only the canvas aspect is tracked;
/// scenes stretch back to the canvas when composited.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_FOV_DEGREES.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Returns `true` when the aspect changed.
    pub fn sync_aspect(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let aspect = width as f32 / height as f32;
        if (aspect - self.aspect).abs() > f32::EPSILON {
            self.aspect = aspect;
            true
        } else {
            false
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Clip space back to world space; scenes use it to build view rays.
    pub fn inverse_view_projection(&self) -> Mat4 {
        (self.projection_matrix() * self.view_matrix()).inverse()
    }
}
