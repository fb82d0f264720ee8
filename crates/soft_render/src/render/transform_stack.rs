//! Hierarchical transform stack
//!
//! Two stacks move in lockstep: the image stack accumulates point transforms,
//! the normal stack accumulates the matching normal transforms. Level 0 of
//! both is always identity.

use crate::foundation::math::{Mat4, Mat4Ext};

use super::RenderError;

/// How a pushed matrix affects the normal stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalUpdate {
    /// Compose the inverse-transpose of the matrix's linear part
    #[default]
    InverseTranspose,
    /// Compose the stack root instead, leaving normals as they were.
    /// Used for the screen-space and perspective stages.
    Identity,
}

/// Bounded stack of accumulated image-space and normal-space matrices
#[derive(Debug, Clone)]
pub struct TransformStack {
    image: Vec<Mat4>,
    normal: Vec<Mat4>,
    level: usize,
}

impl TransformStack {
    /// Create a stack holding at most `capacity` levels (including the root).
    ///
    /// A capacity below one is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            image: vec![Mat4::identity(); capacity],
            normal: vec![Mat4::identity(); capacity],
            level: 0,
        }
    }

    /// Maximum number of levels
    pub fn capacity(&self) -> usize {
        self.image.len()
    }

    /// Current depth; 0 is the root
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Return every level to identity and the depth to 0
    pub fn reset(&mut self) {
        self.image.fill(Mat4::identity());
        self.normal.fill(Mat4::identity());
        self.level = 0;
    }

    /// Compose `matrix` onto the current top and make the result the new top
    pub fn push(&mut self, matrix: &Mat4, normal_update: NormalUpdate) -> Result<(), RenderError> {
        if self.level + 1 >= self.capacity() {
            log::warn!("Transform push rejected at level {}", self.level);
            return Err(RenderError::StackOverflow { capacity: self.capacity() });
        }

        let normal_step = match normal_update {
            NormalUpdate::InverseTranspose => matrix.normal_matrix().ok_or(RenderError::SingularTransform)?,
            NormalUpdate::Identity => self.normal[0],
        };

        let next = self.level + 1;
        self.image[next] = self.image[self.level] * matrix;
        self.normal[next] = self.normal[self.level] * normal_step;
        self.level = next;

        log::debug!("Pushed transform, stack level {}", self.level);
        Ok(())
    }

    /// Discard the top level. Popping the root is a no-op.
    pub fn pop(&mut self) {
        if self.level == 0 {
            return;
        }
        self.image[self.level] = Mat4::identity();
        self.normal[self.level] = Mat4::identity();
        self.level -= 1;
        log::debug!("Popped transform, stack level {}", self.level);
    }

    /// Accumulated image-space and normal-space matrices at the current level
    pub fn top(&self) -> (&Mat4, &Mat4) {
        (&self.image[self.level], &self.normal[self.level])
    }
}
