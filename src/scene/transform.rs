use glam::{Affine3A, Mat3, Mat4, Quat, Vec3};

/// Local TRS transform of a scene node plus its cached matrices.
///
/// The public `position` / `rotation` / `scale` fields may be written freely;
/// [`update_local_matrix`](Self::update_local_matrix) compares them against a
/// shadow copy and only rebuilds the local matrix when something changed.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// Rebuilds the local matrix if any TRS component changed.
    ///
    /// Returns `true` when the matrix was recomputed.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Multiplies the current scale by `factor` on every axis.
    pub fn scale_uniform(&mut self, factor: f32) {
        self.scale *= factor;
    }

    /// Rotates so that local -Z points at `target`.
    ///
    /// `target` and `up` are expressed in the parent's space. Degenerate
    /// inputs (target on the up axis) leave the rotation untouched.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();

        if forward.cross(up).length_squared() < 1e-4 {
            return;
        }

        let right = forward.cross(up).normalize();
        let new_up = right.cross(forward).normalize();

        let rot_mat = Mat3::from_cols(right, new_up, -forward);
        self.rotation = Quat::from_mat3(&rot_mat);
    }

    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_matrix_only_rebuilds_on_change() {
        let mut t = Transform::new();
        assert!(t.update_local_matrix());
        assert!(!t.update_local_matrix());

        t.position = Vec3::new(1.0, 2.0, 3.0);
        assert!(t.update_local_matrix());
        assert_eq!(Vec3::from(t.local_matrix().translation), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn look_at_points_negative_z_at_target() {
        let mut t = Transform::new();
        t.position = Vec3::new(0.0, 0.0, 5.0);
        t.look_at(Vec3::ZERO, Vec3::Y);

        let forward = t.rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }
}
