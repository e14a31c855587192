use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::controls::input::{Input, PointerButton};
use crate::scene::transform::Transform;

const EPS: f32 = 1e-6;

/// Orbit camera controller.
///
/// Rotates around `target` with the primary button, pans with the secondary
/// button and dollies with the wheel. With damping enabled each update
/// applies `damping_factor` of the pending motion and keeps the rest for the
/// following updates, so motion eases out over a fixed number of frames
/// regardless of frame time.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,

    pub enable_damping: bool,
    pub damping_factor: f32,

    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,

    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    // (theta, phi) still to be applied
    spherical_delta: Vec2,
    pan_offset: Vec3,
    scale: f32,
}

impl OrbitControls {
    #[must_use]
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Motion still waiting to be applied by later updates.
    #[must_use]
    pub fn pending_rotation(&self) -> Vec2 {
        self.spherical_delta
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.x -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.y -= angle;
    }

    /// Multiplies the orbit radius by `1 / factor` on the next update.
    pub fn dolly_in(&mut self, factor: f32) {
        self.scale /= factor;
    }

    pub fn dolly_out(&mut self, factor: f32) {
        self.scale *= factor;
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    fn consume_input(&mut self, camera: &Transform, fov: f32, input: &Input) {
        let height = input.screen_size.y.max(1.0);

        if self.enable_rotate && input.is_button_pressed(PointerButton::Primary) {
            let per_pixel = 2.0 * PI / height * self.rotate_speed;
            self.rotate_left(input.cursor_delta.x * per_pixel);
            self.rotate_up(input.cursor_delta.y * per_pixel);
        }

        if self.enable_zoom && input.scroll_delta.y != 0.0 {
            let steps = input.scroll_delta.y.abs();
            let factor = self.zoom_scale().powf(steps);
            if input.scroll_delta.y > 0.0 {
                self.dolly_in(1.0 / factor);
            } else {
                self.dolly_out(1.0 / factor);
            }
        }

        if self.enable_pan && input.is_button_pressed(PointerButton::Secondary) {
            // Scale so the point under the cursor at target depth follows it.
            let distance = (camera.position - self.target).length() * (fov * 0.5).tan();
            let left = 2.0 * input.cursor_delta.x * distance / height * self.pan_speed;
            let up = 2.0 * input.cursor_delta.y * distance / height * self.pan_speed;

            let right_axis = camera.rotation * Vec3::X;
            let up_axis = camera.rotation * Vec3::Y;
            self.pan_offset += right_axis * -left + up_axis * up;
        }
    }

    /// Advances the controller by one step and writes the camera transform.
    ///
    /// `fov` is the camera's vertical field of view in radians. Returns
    /// `true` if the camera moved.
    pub fn update(&mut self, camera: &mut Transform, fov: f32, input: &Input) -> bool {
        self.consume_input(camera, fov, input);

        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > EPS {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI * 0.5)
        };

        if self.enable_damping {
            theta += self.spherical_delta.x * self.damping_factor;
            phi += self.spherical_delta.y * self.damping_factor;
            self.target += self.pan_offset * self.damping_factor;
        } else {
            theta += self.spherical_delta.x;
            phi += self.spherical_delta.y;
            self.target += self.pan_offset;
        }

        // Limits may be inverted; the upper bound wins.
        phi = phi
            .max(self.min_polar_angle)
            .min(self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        radius = (radius * self.scale).max(self.min_distance).min(self.max_distance);

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );

        let old_position = camera.position;
        camera.position = self.target + new_offset;
        camera.look_at(self.target, Vec3::Y);

        if self.enable_damping {
            let retention = 1.0 - self.damping_factor;
            self.spherical_delta *= retention;
            self.pan_offset *= retention;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(old_position) > EPS
    }
}
