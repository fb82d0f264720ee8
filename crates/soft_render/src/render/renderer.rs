//! # Renderer
//!
//! Owns the camera, transform stack, scene list, pixel buffer and shading
//! state, and drives a frame through them:
//!
//! 1. [`Renderer::set_camera`] (optional; a default camera is installed)
//! 2. [`Renderer::begin_frame`] clears the pixels and seeds the stack with
//!    the world-to-camera matrix
//! 3. [`Renderer::push_matrix`] / [`Renderer::submit_triangle`] /
//!    [`Renderer::pop_matrix`] populate the scene list in camera space
//! 4. [`Renderer::ray_trace`] casts one ray per pixel and marks hits
//! 5. the pixel buffer is exported through [`super::output`]
//!
//! Storage is sized once at construction and never grows.

use std::io::Write;
use std::path::Path;

use crate::config::RenderConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext};

use super::attributes::{Attribute, ShadingState};
use super::camera::Camera;
use super::output;
use super::pixel_buffer::{Pixel, PixelBuffer};
use super::raycast::{self, Ray, RayHit};
use super::scene::{SceneList, Triangle, TriangleData};
use super::transform_stack::{NormalUpdate, TransformStack};
use super::RenderError;

/// Color and alpha written for a ray hit
pub const HIT_MARKER: Pixel = Pixel::new(0, 0, 0, 1, 1);

/// Software renderer
#[derive(Debug)]
pub struct Renderer {
    config: RenderConfig,
    camera: Camera,
    stack: TransformStack,
    scene: SceneList,
    pixels: PixelBuffer,
    shading: ShadingState,
    world_to_camera: Mat4,
    perspective: Mat4,
    screen_space: Mat4,
    ray_trace_pending: bool,
}

impl Renderer {
    /// Create a renderer for a validated configuration
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        log::info!(
            "Creating {}x{} renderer ({} triangles, {} stack levels)",
            config.width,
            config.height,
            config.max_triangles,
            config.max_levels
        );

        let camera = Camera::default();
        Ok(Self {
            stack: TransformStack::new(config.max_levels),
            scene: SceneList::new(config.max_triangles),
            pixels: PixelBuffer::with_background(config.width, config.height, config.background),
            shading: ShadingState::new(config.max_lights),
            world_to_camera: Mat4::identity(),
            perspective: camera.perspective(),
            screen_space: Camera::screen_space(config.width, config.height),
            camera,
            config,
            ray_trace_pending: false,
        })
    }

    /// Create a renderer with default settings at the given resolution
    pub fn with_resolution(width: usize, height: usize) -> Result<Self, RenderError> {
        Self::new(RenderConfig::new(width, height))
    }

    /// Active configuration
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the camera. Takes effect at the next [`Self::begin_frame`].
    pub fn set_camera(&mut self, camera: Camera) {
        log::trace!("Camera set: {:?}", camera);
        self.camera = camera;
    }

    /// Current camera
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Start a frame.
    ///
    /// Resets the pixel buffer and transform stack, derives the camera
    /// matrices and pushes the world-to-camera matrix. With
    /// `compose_projection` the screen-space and perspective matrices are
    /// pushed first, so the stack top maps world space to raster space.
    /// The scene list is left untouched.
    pub fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.pixels.reset();
        self.stack.reset();

        self.world_to_camera = self.camera.world_to_camera()?;
        self.perspective = self.camera.perspective();
        self.screen_space = Camera::screen_space(self.config.width, self.config.height);

        if self.config.compose_projection {
            self.stack.push(&self.screen_space, NormalUpdate::Identity)?;
            self.stack.push(&self.perspective, NormalUpdate::Identity)?;
        }
        self.stack.push(&self.world_to_camera, NormalUpdate::InverseTranspose)?;

        log::info!("Frame started at stack level {}", self.stack.level());
        Ok(())
    }

    /// Compose a model transform onto the stack
    pub fn push_matrix(&mut self, matrix: &Mat4) -> Result<(), RenderError> {
        self.stack.push(matrix, NormalUpdate::InverseTranspose)
    }

    /// Compose a transform with an explicit normal-stack rule
    pub fn push_matrix_with(&mut self, matrix: &Mat4, normal_update: NormalUpdate) -> Result<(), RenderError> {
        self.stack.push(matrix, normal_update)
    }

    /// Discard the top transform; harmless at the root
    pub fn pop_matrix(&mut self) {
        self.stack.pop();
    }

    /// Apply attributes in order, skipping (and logging) any that cannot be
    /// stored. Returns the number applied.
    pub fn put_attributes<I>(&mut self, attributes: I) -> usize
    where
        I: IntoIterator<Item = Attribute>,
    {
        self.shading.apply_all(attributes)
    }

    /// Transform a triangle by the current stack top and append it to the
    /// scene list. Returns the new triangle's index.
    pub fn submit_triangle(&mut self, data: &TriangleData) -> Result<usize, RenderError> {
        if self.scene.len() >= self.scene.capacity() {
            log::warn!("Scene list full, dropping triangle");
            return Err(RenderError::SceneCapacityExceeded {
                capacity: self.scene.capacity(),
            });
        }

        let (image, normal) = self.stack.top();

        let positions = data.positions.map(|p| image.apply_to_point(&p));
        let mut normals = data.normals;
        for n in &mut normals {
            *n = utils::checked_normalize(&normal.apply_to_direction(n))
                .ok_or(RenderError::DegenerateVector("vertex normal"))?;
        }

        let index = self.scene.push(Triangle {
            positions,
            normals,
            uvs: data.uvs,
        })?;
        log::debug!("Submitted triangle {}", index);
        Ok(index)
    }

    /// Remove every submitted triangle
    pub fn clear_scene(&mut self) {
        self.scene.clear();
    }

    /// Nearest scene triangle hit by `ray`
    pub fn cast_ray(&self, ray: &Ray) -> Option<RayHit> {
        raycast::cast_ray(ray, self.scene.as_slice())
    }

    /// Cast one primary ray per pixel and write [`HIT_MARKER`] where it hits.
    ///
    /// Rays are generated in camera space, so this fails with
    /// [`RenderError::ProjectedScene`] when `compose_projection` is enabled.
    /// Returns the number of pixels hit.
    pub fn ray_trace(&mut self) -> Result<usize, RenderError> {
        if self.config.compose_projection {
            log::warn!("Ray trace skipped: submitted triangles are in raster space");
            return Err(RenderError::ProjectedScene);
        }

        let (width, height) = (self.config.width, self.config.height);
        let mode = self.config.ray_generation;
        let mut hits = 0;

        for col in 0..width {
            for row in 0..height {
                let ray = self.camera.pixel_ray(col, row, width, height, mode);
                if self.cast_ray(&ray).is_some() {
                    // Resolution is validated to fit in i32
                    self.pixels.put(col as i32, row as i32, HIT_MARKER)?;
                    hits += 1;
                }
            }
        }

        log::info!(
            "Ray trace complete: {} of {} pixels hit {} triangles",
            hits,
            width * height,
            self.scene.len()
        );
        Ok(hits)
    }

    /// Run a ray trace before the next flush
    pub fn request_ray_trace(&mut self) {
        self.ray_trace_pending = true;
    }

    fn run_pending_ray_trace(&mut self) -> Result<(), RenderError> {
        if self.ray_trace_pending {
            self.ray_trace_pending = false;
            self.ray_trace()?;
        }
        Ok(())
    }

    /// Depth-tested pixel write; see [`PixelBuffer::put`]
    pub fn put(&mut self, col: i32, row: i32, pixel: Pixel) -> Result<bool, RenderError> {
        self.pixels.put(col, row, pixel)
    }

    /// Pixel read; see [`PixelBuffer::get`]
    pub fn get(&self, col: i32, row: i32) -> Result<Pixel, RenderError> {
        self.pixels.get(col, row)
    }

    /// Write the frame as PPM
    pub fn flush_to_ppm<W: Write>(&mut self, writer: &mut W) -> Result<(), RenderError> {
        self.run_pending_ray_trace()?;
        output::write_ppm(&self.pixels, writer)
    }

    /// Frame as blue, green, red bytes
    pub fn flush_to_framebuffer(&mut self) -> Result<Vec<u8>, RenderError> {
        self.run_pending_ray_trace()?;
        Ok(output::to_framebuffer(&self.pixels))
    }

    /// Save the frame as PNG
    pub fn save_png<P: AsRef<Path>>(&mut self, path: P) -> Result<(), RenderError> {
        self.run_pending_ray_trace()?;
        output::save_png(&self.pixels, path)
    }

    /// Pixel buffer
    pub const fn pixel_buffer(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Scene list
    pub const fn scene(&self) -> &SceneList {
        &self.scene
    }

    /// Transform stack
    pub const fn transform_stack(&self) -> &TransformStack {
        &self.stack
    }

    /// Stored shading inputs
    pub const fn shading(&self) -> &ShadingState {
        &self.shading
    }

    /// World-to-camera matrix from the last [`Self::begin_frame`]
    pub const fn world_to_camera_matrix(&self) -> &Mat4 {
        &self.world_to_camera
    }

    /// Perspective matrix from the last [`Self::begin_frame`]
    pub const fn perspective_matrix(&self) -> &Mat4 {
        &self.perspective
    }

    /// Screen-space matrix for this resolution
    pub const fn screen_space_matrix(&self) -> &Mat4 {
        &self.screen_space
    }
}
