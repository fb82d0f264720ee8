//! Light sources stored for shading

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Light source. Ambient lights only use `color`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Direction the light travels (normalized for directional lights)
    pub direction: Vec3,
    /// Light color
    pub color: Vec3,
}

impl Light {
    /// Create a directional light
    pub fn directional(direction: Vec3, color: Vec3) -> Self {
        Self {
            direction: direction.try_normalize(f32::EPSILON).unwrap_or(direction),
            color,
        }
    }

    /// Create an ambient light
    pub fn ambient(color: Vec3) -> Self {
        Self {
            direction: Vec3::zeros(),
            color,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::ambient(Vec3::zeros())
    }
}
