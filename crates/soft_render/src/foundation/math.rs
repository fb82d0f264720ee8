//! Math utilities and types
//!
//! Provides the vector and matrix types used by the transform stack, the
//! camera and the ray caster, plus the handful of operations nalgebra does not
//! provide in the exact form the pipeline needs: degree-based transform
//! builders, homogeneous lift/drop helpers and the normal-matrix rule.

pub use nalgebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type (texture coordinates)
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Homogeneous 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Smallest length accepted by checked normalisation
pub const NORMALIZE_EPSILON: f32 = 1.0e-8;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3, Vec4, NORMALIZE_EPSILON};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Lift a point into homogeneous space (w = 1)
    pub fn point_to_homogeneous(v: &Vec3) -> Vec4 {
        Vec4::new(v.x, v.y, v.z, 1.0)
    }

    /// Lift a direction into homogeneous space (w = 0)
    pub fn direction_to_homogeneous(v: &Vec3) -> Vec4 {
        Vec4::new(v.x, v.y, v.z, 0.0)
    }

    /// Drop a homogeneous vector back to three components.
    ///
    /// The w component is divided out when it is non-zero. Affine transforms
    /// leave w at exactly 1, so for them this is the same as ignoring w.
    pub fn from_homogeneous(v: &Vec4) -> Vec3 {
        if v.w == 0.0 || v.w == 1.0 {
            Vec3::new(v.x, v.y, v.z)
        } else {
            Vec3::new(v.x / v.w, v.y / v.w, v.z / v.w)
        }
    }

    /// Normalize a vector, returning `None` instead of dividing by zero
    pub fn checked_normalize(v: &Vec3) -> Option<Vec3> {
        let normalized = v.try_normalize(NORMALIZE_EPSILON)?;
        normalized.iter().all(|c| c.is_finite()).then_some(normalized)
    }
}

/// Extension trait for Mat4 with the transform builders used by the pipeline.
///
/// Angles are in degrees.
pub trait Mat4Ext {
    /// Rotation about the X axis
    fn rotate_x(degrees: f32) -> Mat4;

    /// Rotation about the Y axis
    fn rotate_y(degrees: f32) -> Mat4;

    /// Rotation about the Z axis
    fn rotate_z(degrees: f32) -> Mat4;

    /// Translation by `offset`
    fn translate(offset: &Vec3) -> Mat4;

    /// Non-uniform scale
    fn scaling(factors: &Vec3) -> Mat4;

    /// Inverse-transpose of the upper 3x3 block, embedded in a 4x4 with no
    /// translation. `None` when the block is singular.
    fn normal_matrix(&self) -> Option<Mat4>;

    /// Transform a point (w = 1) and drop back to three components
    fn apply_to_point(&self, point: &Vec3) -> Vec3;

    /// Transform a direction (w = 0) and drop back to three components
    fn apply_to_direction(&self, direction: &Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    #[rustfmt::skip]
    fn rotate_x(degrees: f32) -> Mat4 {
        let (s, c) = utils::deg_to_rad(degrees).sin_cos();
        Mat4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    fn rotate_y(degrees: f32) -> Mat4 {
        let (s, c) = utils::deg_to_rad(degrees).sin_cos();
        Mat4::new(
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    fn rotate_z(degrees: f32) -> Mat4 {
        let (s, c) = utils::deg_to_rad(degrees).sin_cos();
        Mat4::new(
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn translate(offset: &Vec3) -> Mat4 {
        Mat4::new_translation(offset)
    }

    fn scaling(factors: &Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(factors)
    }

    fn normal_matrix(&self) -> Option<Mat4> {
        let linear: Mat3 = self.fixed_view::<3, 3>(0, 0).into_owned();
        let inverse_transpose = linear.try_inverse()?.transpose();
        Some(inverse_transpose.to_homogeneous())
    }

    fn apply_to_point(&self, point: &Vec3) -> Vec3 {
        utils::from_homogeneous(&(self * utils::point_to_homogeneous(point)))
    }

    fn apply_to_direction(&self, direction: &Vec3) -> Vec3 {
        utils::from_homogeneous(&(self * utils::direction_to_homogeneous(direction)))
    }
}
