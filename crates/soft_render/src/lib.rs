//! # Soft Render
//!
//! A CPU renderer core: transform stack, camera matrices, a depth-tested
//! 12-bit pixel buffer and a ray caster over camera-space triangles.
//!
//! ## Features
//!
//! - **Transform Stack**: Paired image-space and normal-space matrix stacks
//! - **Camera**: World-to-camera, perspective and screen-space matrices
//! - **Ray Casting**: Nearest-hit search over submitted triangles
//! - **Output**: PPM streams, BGR framebuffers and PNG files
//! - **Configuration**: Renderer settings and whole scenes from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use soft_render::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut renderer = Renderer::new(RenderConfig::new(64, 64))?;
//!     renderer.set_camera(Camera::new(
//!         Vec3::new(0.0, 0.0, -10.0),
//!         Vec3::zeros(),
//!         Vec3::new(0.0, 1.0, 0.0),
//!         35.0,
//!     ));
//!     renderer.begin_frame()?;
//!
//!     renderer.push_matrix(&Mat4::rotate_y(30.0))?;
//!     renderer.submit_triangle(&TriangleData::flat([
//!         Vec3::new(-1.0, -1.0, 0.0),
//!         Vec3::new(1.0, -1.0, 0.0),
//!         Vec3::new(0.0, 1.0, 0.0),
//!     ])?)?;
//!     renderer.pop_matrix();
//!
//!     renderer.request_ray_trace();
//!     renderer.save_png("frame.png")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for renderer users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, MeshConfig, ModelTransform, RenderConfig, SceneConfig},
        foundation::math::{Mat4, Mat4Ext, Vec2, Vec3},
        render::{
            Attribute, Camera, Light, NormalUpdate, Pixel, RayGeneration, RenderError, Renderer,
            TriangleData,
        },
    };
}
