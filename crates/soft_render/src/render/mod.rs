//! Rendering core
//!
//! The pieces a frame flows through, leaf-first:
//! - [`transform_stack`]: accumulated image-space and normal-space matrices
//! - [`camera`]: world-to-camera, perspective and screen-space matrices
//! - [`pixel_buffer`]: depth-tested color grid
//! - [`scene`]: transformed triangles awaiting the ray caster
//! - [`raycast`]: nearest-hit ray/triangle search
//! - [`renderer`]: owns all of the above and drives a frame
//!
//! Shading inputs ([`attributes`], [`lighting`], [`material`]) are stored and
//! exposed for a shading model but do not affect the depth-marked ray trace.

pub mod attributes;
pub mod camera;
pub mod lighting;
pub mod material;
pub mod output;
pub mod pixel_buffer;
pub mod raycast;
pub mod renderer;
pub mod scene;
pub mod transform_stack;

pub use attributes::{Attribute, Interpolation, ShadingState, TextureFn};
pub use camera::{Camera, CameraBasis, RayGeneration};
pub use lighting::Light;
pub use material::{HitRecord, Lambertian, Material, Metal, Phong, Scatter};
pub use pixel_buffer::{Depth, Intensity, Pixel, PixelBuffer, FAR_DEPTH, MAX_INTENSITY};
pub use raycast::{Ray, RayHit};
pub use renderer::Renderer;
pub use scene::{SceneList, Triangle, TriangleData};
pub use transform_stack::{NormalUpdate, TransformStack};

use thiserror::Error;

/// Rendering errors
///
/// Depth-rejected pixel writes and ray misses are ordinary outcomes and never
/// show up here.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Pixel coordinates outside the buffer
    #[error("Pixel ({col}, {row}) outside {width}x{height} buffer")]
    PixelOutOfBounds {
        /// Requested column
        col: i32,
        /// Requested row
        row: i32,
        /// Buffer width
        width: usize,
        /// Buffer height
        height: usize,
    },

    /// Push on a full transform stack
    #[error("Transform stack overflow: capacity is {capacity} levels")]
    StackOverflow {
        /// Number of levels the stack holds
        capacity: usize,
    },

    /// Submission on a full scene list
    #[error("Scene capacity exceeded: at most {capacity} triangles")]
    SceneCapacityExceeded {
        /// Maximum number of triangles
        capacity: usize,
    },

    /// Camera vectors cannot form an orthonormal basis
    #[error("Degenerate camera: {0}")]
    DegenerateCamera(String),

    /// Attempted to normalize a zero-length vector
    #[error("Cannot normalize zero-length {0}")]
    DegenerateVector(&'static str),

    /// Non-rigid transform whose linear part has no inverse
    #[error("Transform is singular; no normal matrix exists")]
    SingularTransform,

    /// Ray trace requested on triangles already projected to raster space
    #[error("Ray trace needs camera-space triangles; projection is composed into the transform stack")]
    ProjectedScene,

    /// Renderer configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Output stream error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image export failed: {0}")]
    Image(String),
}
