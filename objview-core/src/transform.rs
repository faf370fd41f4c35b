//! Camera and per-frame transforms.

use glam::{Mat4, Vec3};

/// A fixed perspective camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// The look-at matrix from `position` towards `position + front`.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// OpenGL-style perspective projection (clip depth in `[-1, 1]`).
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Rotation of `elapsed` radians about the Y axis.
#[inline]
pub fn model_matrix(elapsed: f32) -> Mat4 {
    Mat4::from_axis_angle(Vec3::Y, elapsed)
}

/// The three matrices uploaded to the shader every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSet {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl TransformSet {
    /// Computes the transforms for a frame drawn `elapsed` seconds after start.
    pub fn at(camera: &Camera, elapsed: f32) -> Self {
        Self {
            model: model_matrix(elapsed),
            view: camera.view(),
            projection: camera.projection(),
        }
    }
}
