//! Renderer attributes
//!
//! Typed replacement for name/value attribute lists. Each [`Attribute`]
//! carries its own payload; [`ShadingState`] stores the result for a shading
//! model to consume.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

use super::lighting::Light;

/// Texture lookup: `(u, v)` to an RGB color
pub type TextureFn = fn(f32, f32) -> Vec3;

/// Shading interpolation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// One color per triangle
    #[default]
    Flat,
    /// Colors computed at vertices and interpolated (Gouraud)
    Color,
    /// Normals interpolated and shaded per pixel (Phong)
    Normals,
}

/// A single renderer attribute
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Attribute {
    /// Flat color used when no lighting applies
    RgbColor(Vec3),
    /// Interpolation mode
    Interpolate(Interpolation),
    /// Add a directional light
    DirectionalLight(Light),
    /// Replace the ambient light
    AmbientLight(Light),
    /// Ambient reflection coefficient (Ka)
    AmbientCoefficient(Vec3),
    /// Diffuse reflection coefficient (Kd)
    DiffuseCoefficient(Vec3),
    /// Specular reflection coefficient (Ks)
    SpecularCoefficient(Vec3),
    /// Specular power
    Distribution(f32),
    /// Texture function; cannot come from a scene file
    #[serde(skip)]
    TextureMap(TextureFn),
}

/// Stored shading inputs
#[derive(Debug, Clone)]
pub struct ShadingState {
    /// Flat color
    pub flat_color: Vec3,
    /// Interpolation mode
    pub interpolation: Interpolation,
    /// Directional lights, in the order they were added
    pub lights: Vec<Light>,
    /// Ambient light
    pub ambient_light: Light,
    /// Ambient coefficient
    pub ka: Vec3,
    /// Diffuse coefficient
    pub kd: Vec3,
    /// Specular coefficient
    pub ks: Vec3,
    /// Specular power
    pub spec: f32,
    /// Texture function, if any
    pub texture: Option<TextureFn>,
    max_lights: usize,
}

impl ShadingState {
    /// Default shading state accepting up to `max_lights` directional lights
    pub fn new(max_lights: usize) -> Self {
        Self {
            flat_color: Vec3::new(1.0, 1.0, 1.0),
            interpolation: Interpolation::Flat,
            lights: Vec::with_capacity(max_lights),
            ambient_light: Light::default(),
            ka: Vec3::new(0.1, 0.1, 0.1),
            kd: Vec3::new(0.7, 0.7, 0.7),
            ks: Vec3::new(0.3, 0.3, 0.3),
            spec: 32.0,
            texture: None,
            max_lights,
        }
    }

    /// Maximum number of directional lights
    pub const fn max_lights(&self) -> usize {
        self.max_lights
    }

    /// Apply one attribute. Returns `false` when it was ignored.
    pub fn apply(&mut self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::RgbColor(color) => self.flat_color = color,
            Attribute::Interpolate(mode) => self.interpolation = mode,
            Attribute::DirectionalLight(light) => {
                if self.lights.len() >= self.max_lights {
                    log::warn!("Light list full ({} lights), ignoring directional light", self.max_lights);
                    return false;
                }
                self.lights.push(light);
            }
            Attribute::AmbientLight(light) => self.ambient_light = light,
            Attribute::AmbientCoefficient(k) => self.ka = k,
            Attribute::DiffuseCoefficient(k) => self.kd = k,
            Attribute::SpecularCoefficient(k) => self.ks = k,
            Attribute::Distribution(power) => self.spec = power,
            Attribute::TextureMap(texture) => self.texture = Some(texture),
        }
        true
    }

    /// Apply attributes in order; ignored ones are logged and skipped.
    /// Returns how many were applied.
    pub fn apply_all<I>(&mut self, attributes: I) -> usize
    where
        I: IntoIterator<Item = Attribute>,
    {
        attributes.into_iter().filter(|a| self.apply(*a)).count()
    }

    /// Sample the texture, if one is set
    pub fn sample_texture(&self, u: f32, v: f32) -> Option<Vec3> {
        self.texture.map(|texture| texture(u, v))
    }
}

impl Default for ShadingState {
    fn default() -> Self {
        Self::new(10)
    }
}
