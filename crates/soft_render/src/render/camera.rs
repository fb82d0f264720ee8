//! # Camera and per-frame projection setup
//!
//! Builds the matrices a frame starts from:
//! - world-to-camera (`Xiw`): orthonormal basis from position, look-at and
//!   world-up via Gram-Schmidt, with the camera position translated to the
//!   origin. Camera space is left-handed: +X right, +Y up, +Z forward.
//! - perspective (`Xpi`): scales z by `1/d` where `d = 1 / tan(fov / 2)` and
//!   copies it into w.
//! - screen-space (`Xsp`): maps the normalized view to raster coordinates,
//!   flipping Y because image rows grow downward.
//!
//! Also generates the primary rays the frame driver casts per pixel.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat4, Vec3};

use super::{raycast::Ray, RenderError};

/// Field of view used by [`RayGeneration::Legacy`], in degrees
pub const LEGACY_RAY_FOV: f32 = 60.0;

/// How the frame driver builds primary rays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RayGeneration {
    /// Fixed 60 degree frustum, origin at `(0, 0, camera.position.z)`.
    /// Reproduces the reference renderer's images.
    #[default]
    Legacy,
    /// Rays leave the camera-space origin through the camera's own field of
    /// view, matching the world-to-camera transform applied at submission.
    Camera,
}

/// Orthonormal camera axes in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Right
    pub x: Vec3,
    /// Up, with the forward component removed
    pub y: Vec3,
    /// Forward
    pub z: Vec3,
}

/// Camera definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera looks at in world space
    pub lookat: Vec3,

    /// World up direction; need not be perpendicular to the view direction
    pub worldup: Vec3,

    /// Field of view in degrees
    pub fov: f32,
}

impl Camera {
    /// Create a camera
    pub fn new(position: Vec3, lookat: Vec3, worldup: Vec3, fov: f32) -> Self {
        Self { position, lookat, worldup, fov }
    }

    /// Orthonormal basis for the current position, look-at and world-up.
    ///
    /// Fails when the camera looks at its own position or when world-up is
    /// parallel to the view direction.
    pub fn basis(&self) -> Result<CameraBasis, RenderError> {
        let z = utils::checked_normalize(&(self.lookat - self.position))
            .ok_or_else(|| RenderError::DegenerateCamera("look-at equals position".to_string()))?;

        let up_along_view = z * self.worldup.dot(&z);
        let y = utils::checked_normalize(&(self.worldup - up_along_view))
            .ok_or_else(|| RenderError::DegenerateCamera("world-up is parallel to view direction".to_string()))?;

        let x = y.cross(&z);
        Ok(CameraBasis { x, y, z })
    }

    /// World-to-camera matrix (`Xiw`)
    #[rustfmt::skip]
    pub fn world_to_camera(&self) -> Result<Mat4, RenderError> {
        let CameraBasis { x, y, z } = self.basis()?;
        let p = self.position;
        Ok(Mat4::new(
            x.x, x.y, x.z, -x.dot(&p),
            y.x, y.y, y.z, -y.dot(&p),
            z.x, z.y, z.z, -z.dot(&p),
            0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// Perspective matrix (`Xpi`) for the camera's field of view
    #[rustfmt::skip]
    pub fn perspective(&self) -> Mat4 {
        let inv_d = (utils::deg_to_rad(self.fov) / 2.0).tan();
        Mat4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, inv_d, 0.0,
            0.0, 0.0, inv_d, 1.0,
        )
    }

    /// Screen-space matrix (`Xsp`) for a `width` x `height` raster
    #[rustfmt::skip]
    pub fn screen_space(width: usize, height: usize) -> Mat4 {
        let half_w = width as f32 / 2.0;
        let half_h = height as f32 / 2.0;
        Mat4::new(
            half_w, 0.0, 0.0, half_w,
            0.0, -half_h, 0.0, half_h,
            0.0, 0.0, i32::MAX as f32, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Primary ray through the centre of pixel `(col, row)`.
    ///
    /// The direction is expressed in camera space; `Legacy` places the origin
    /// at `(0, 0, position.z)` and ignores the configured field of view.
    pub fn pixel_ray(&self, col: usize, row: usize, width: usize, height: usize, mode: RayGeneration) -> Ray {
        let (fov, origin) = match mode {
            RayGeneration::Legacy => (LEGACY_RAY_FOV, Vec3::new(0.0, 0.0, self.position.z)),
            RayGeneration::Camera => (self.fov, Vec3::zeros()),
        };

        let aspect = width as f32 / height as f32;
        let half = (utils::deg_to_rad(fov) / 2.0).tan();
        let (left, right) = (-aspect * half, aspect * half);
        let (top, bottom) = (half, -half);

        let cx = (2 * col + 1) as f32 / (2 * width) as f32;
        let cy = (2 * row + 1) as f32 / (2 * height) as f32;

        let direction = Vec3::new(
            (1.0 - cx) * left + cx * right,
            cy * bottom + (1.0 - cy) * top,
            1.0,
        );
        Ray::new(origin, direction)
    }

    /// Update camera position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Point the camera at `lookat` with the given world-up
    pub fn look_at(&mut self, lookat: Vec3, worldup: Vec3) {
        self.lookat = lookat;
        self.worldup = worldup;
        log::trace!("Camera look_at updated - lookat: {:?}, up: {:?}", lookat, worldup);
    }
}

impl Default for Camera {
    /// Position (-10, 5, -10) looking at the origin, +Y up, 35 degree FOV
    fn default() -> Self {
        Self {
            position: Vec3::new(-10.0, 5.0, -10.0),
            lookat: Vec3::zeros(),
            worldup: Vec3::new(0.0, 1.0, 0.0),
            fov: 35.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec4};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = Camera::default();
        let b = camera.basis().unwrap();

        assert_relative_eq!(b.x.magnitude(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(b.y.magnitude(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(b.z.magnitude(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(b.x.dot(&b.y), 0.0, epsilon = EPSILON);
        assert_relative_eq!(b.y.dot(&b.z), 0.0, epsilon = EPSILON);
        assert_relative_eq!(b.z.dot(&b.x), 0.0, epsilon = EPSILON);
        // Up keeps a positive component along world-up
        assert!(b.y.dot(&camera.worldup) > 0.0);
    }

    #[test]
    fn test_world_to_camera_for_axis_aligned_camera() {
        let camera = Camera::new(
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::zeros(),
            Vec3::new(0.0, 1.0, 0.0),
            35.0,
        );
        let xiw = camera.world_to_camera().unwrap();

        // The camera itself lands on the origin
        assert_relative_eq!(xiw.apply_to_point(&camera.position), Vec3::zeros(), epsilon = EPSILON);
        // The look-at point is straight ahead
        assert_relative_eq!(xiw.apply_to_point(&Vec3::zeros()), Vec3::new(0.0, 0.0, 10.0), epsilon = EPSILON);
        // World +X stays to the right
        assert_relative_eq!(
            xiw.apply_to_point(&Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(1.0, 0.0, 10.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_lookat_lands_on_positive_z_axis() {
        let camera = Camera::default();
        let xiw = camera.world_to_camera().unwrap();
        let distance = (camera.lookat - camera.position).magnitude();
        assert_relative_eq!(
            xiw.apply_to_point(&camera.lookat),
            Vec3::new(0.0, 0.0, distance),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_parallel_up_is_degenerate() {
        let camera = Camera::new(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::zeros(),
            Vec3::new(0.0, 1.0, 0.0),
            35.0,
        );
        assert!(matches!(camera.basis(), Err(RenderError::DegenerateCamera(_))));
        assert!(camera.world_to_camera().is_err());
    }

    #[test]
    fn test_lookat_at_position_is_degenerate() {
        let camera = Camera::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(0.0, 1.0, 0.0), 35.0);
        assert!(matches!(camera.basis(), Err(RenderError::DegenerateCamera(_))));
    }

    #[test]
    fn test_perspective_shrinks_with_distance() {
        let camera = Camera::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0), 90.0);
        let xpi = camera.perspective();
        // tan(45 deg) = 1, so w = z + 1
        let near = xpi * Vec4::new(1.0, 1.0, 1.0, 1.0);
        let far = xpi * Vec4::new(1.0, 1.0, 3.0, 1.0);
        assert_relative_eq!(near.w, 2.0, epsilon = EPSILON);
        assert_relative_eq!(far.w, 4.0, epsilon = EPSILON);
        assert!(far.x / far.w < near.x / near.w);
    }

    #[test]
    fn test_screen_space_flips_vertical() {
        let xsp = Camera::screen_space(10, 20);
        assert_relative_eq!(xsp.apply_to_point(&Vec3::new(-1.0, 1.0, 0.0)), Vec3::new(0.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(xsp.apply_to_point(&Vec3::new(1.0, -1.0, 0.0)), Vec3::new(10.0, 20.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_legacy_ray_ignores_camera_fov_and_xy() {
        let mut camera = Camera::default();
        camera.fov = 10.0;
        let ray = camera.pixel_ray(0, 0, 10, 10, RayGeneration::Legacy);

        assert_relative_eq!(ray.origin, Vec3::new(0.0, 0.0, -10.0), epsilon = EPSILON);

        // Corner pixel centre sits at 0.9 of the 60 degree half-extent
        let half = (30.0_f32).to_radians().tan();
        let expected = Vec3::new(-0.9 * half, 0.9 * half, 1.0).normalize();
        assert_relative_eq!(ray.direction, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_camera_ray_uses_camera_fov_from_origin() {
        let camera = Camera::new(Vec3::new(3.0, 4.0, 5.0), Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), 90.0);
        let ray = camera.pixel_ray(1, 0, 2, 2, RayGeneration::Camera);

        assert_relative_eq!(ray.origin, Vec3::zeros(), epsilon = EPSILON);
        let expected = Vec3::new(0.5, 0.5, 1.0).normalize();
        assert_relative_eq!(ray.direction, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_centre_ray_points_forward() {
        let camera = Camera::default();
        let ray = camera.pixel_ray(1, 1, 3, 3, RayGeneration::Camera);
        assert_relative_eq!(ray.direction, Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
    }
}
