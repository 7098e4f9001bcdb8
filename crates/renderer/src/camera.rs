//! Scene camera: a pose aimed at a target plus cached matrices.

use bytemuck::{Pod, Zeroable};
use engine_core::Transform;
use glam::{Mat4, Vec3};

/// Where the camera is and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

/// Perspective camera with configurable FOV and clipping planes.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Point the camera is aimed at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane. Must reach past the far side of the star shell.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    view: Mat4,
    view_proj: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            transform: Transform::default(),
            target: Vec3::NEG_Z,
            fov_degrees: 75.0,
            near: 0.1,
            far: 10000.0,
            aspect: 16.0 / 9.0,
            view: Mat4::IDENTITY,
            view_proj: Mat4::IDENTITY,
        };
        camera.update_matrices();
        camera
    }
}

impl Camera {
    /// Create a camera at `pose`.
    pub fn new(pose: CameraPose) -> Self {
        let mut camera = Self::default();
        camera.set_pose(pose);
        camera
    }

    /// Update aspect ratio (call on surface resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
        self.update_matrices();
    }

    /// Move the camera and aim it. Matrices are refreshed immediately.
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.transform = Transform::looking_at(pose.position, pose.target);
        self.target = pose.target;
        self.update_matrices();
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.transform.position, self.target)
    }

    /// Recompute cached view and view-projection matrices.
    pub fn update_matrices(&mut self) {
        self.view = Mat4::look_at_rh(self.transform.position, self.target, Vec3::Y);
        self.view_proj = self.projection_matrix() * self.view;
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_proj
    }

    /// Get camera position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Get camera forward direction.
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &Camera) {
        self.view = camera.view_matrix().to_cols_array_2d();
        self.proj = camera.projection_matrix().to_cols_array_2d();
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        let pos = camera.position();
        self.position = [pos.x, pos.y, pos.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Camera> for CameraUniform {
    fn from(camera: &Camera) -> Self {
        let mut uniform = Self::new();
        uniform.update(camera);
        uniform
    }
}
