use glam::{Affine3A, Mat4};

/// Perspective camera.
///
/// `fov` is stored in radians; [`Camera::new_perspective`] takes degrees.
#[derive(Debug, Clone)]
pub struct Camera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh maps depth to [0, 1] like wgpu/Vulkan.
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Refreshes the view matrix from the camera's world transform.
    pub fn update_view(&mut self, world_transform: &Affine3A) {
        self.view_matrix = Mat4::from(*world_transform).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }
}
