use glam::{Mat4, Quat, Vec3};
use kartway_common::{CameraSettings, KartPose};

use crate::renderer::RenderView;

/// Chase camera that trails the kart with a fixed-fraction lag each tick.
///
/// The camera lives outside the session; it only reads poses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Offset behind the kart in kart-local space.
    pub offset: Vec3,
    pub lerp_factor: f32,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

impl FollowCamera {
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            position: settings.offset,
            target: Vec3::ZERO,
            offset: settings.offset,
            lerp_factor: settings.lerp_factor,
            fov_degrees: settings.fov_degrees,
            aspect: 16.0 / 9.0,
            near: settings.near,
            far: settings.far,
        }
    }

    /// Where the camera wants to be for `pose`.
    pub fn ideal_position(&self, pose: &KartPose) -> Vec3 {
        Quat::from_rotation_y(pose.yaw) * self.offset + pose.position
    }

    /// Jump straight to the ideal position, skipping the lag.
    pub fn snap_to(&mut self, pose: &KartPose) {
        self.position = self.ideal_position(pose);
        self.target = pose.position;
    }

    /// Move a `lerp_factor` fraction toward the ideal position and aim at the kart.
    pub fn follow(&mut self, pose: &KartPose) {
        let ideal = self.ideal_position(pose);
        self.position = self.position.lerp(ideal, self.lerp_factor);
        self.target = pose.position;
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            eye: self.position,
            target: self.target,
            fov_degrees: self.fov_degrees,
        }
    }
}
