//! Configuration system
//!
//! Renderer settings and scene descriptions, loadable from TOML or RON files.

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::camera::{Camera, RayGeneration};
use crate::render::pixel_buffer::Pixel;
use crate::render::{Attribute, TriangleData};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let is_toml = path.ends_with(".toml");
        if !is_toml && !path.ends_with(".ron") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        let config = if is_toml {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        };
        log::info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that cannot configure a renderer
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Renderer Configuration
///
/// Resolution, fixed capacities and the frame driver's ray and projection
/// behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Horizontal resolution in pixels
    pub width: usize,
    /// Vertical resolution in pixels
    pub height: usize,
    /// Scene list capacity
    pub max_triangles: usize,
    /// Transform stack depth, including the identity root
    pub max_levels: usize,
    /// Directional light capacity
    pub max_lights: usize,
    /// Color every frame starts from
    pub background: Pixel,
    /// How primary rays are generated
    pub ray_generation: RayGeneration,
    /// Push screen-space and perspective matrices beneath the camera matrix
    /// at the start of each frame
    pub compose_projection: bool,
}

impl RenderConfig {
    /// Configuration for a `width` x `height` image with default capacities
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Set ray generation mode
    pub fn with_ray_generation(mut self, mode: RayGeneration) -> Self {
        self.ray_generation = mode;
        self
    }

    /// Set scene capacity
    pub fn with_max_triangles(mut self, max_triangles: usize) -> Self {
        self.max_triangles = max_triangles;
        self
    }

    /// Set transform stack depth
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    /// Enable or disable composing projection into the stack
    pub fn with_compose_projection(mut self, enabled: bool) -> Self {
        self.compose_projection = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(ConfigError::Invalid("Resolution exceeds pixel coordinate range".to_string()));
        }
        if self.max_triangles == 0 {
            return Err(ConfigError::Invalid("Scene capacity must be at least 1".to_string()));
        }
        // Root plus camera, optionally screen-space and perspective
        let needed = if self.compose_projection { 4 } else { 2 };
        if self.max_levels < needed {
            return Err(ConfigError::Invalid(format!(
                "Transform stack needs at least {} levels, got {}",
                needed, self.max_levels
            )));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            max_triangles: 4096,
            max_levels: 100,
            max_lights: 10,
            background: Pixel::default(),
            ray_generation: RayGeneration::Legacy,
            compose_projection: false,
        }
    }
}

impl Config for RenderConfig {}

/// Model transform step in a scene file. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelTransform {
    /// Rotation about X
    RotateX(f32),
    /// Rotation about Y
    RotateY(f32),
    /// Rotation about Z
    RotateZ(f32),
    /// Translation
    Translate(Vec3),
    /// Non-uniform scale
    Scale(Vec3),
}

impl ModelTransform {
    /// Matrix for this step
    pub fn to_matrix(&self) -> Mat4 {
        match self {
            Self::RotateX(degrees) => Mat4::rotate_x(*degrees),
            Self::RotateY(degrees) => Mat4::rotate_y(*degrees),
            Self::RotateZ(degrees) => Mat4::rotate_z(*degrees),
            Self::Translate(offset) => Mat4::translate(offset),
            Self::Scale(factors) => Mat4::scaling(factors),
        }
    }
}

/// Triangles sharing one set of model transforms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Transforms pushed in order before the triangles are submitted
    #[serde(default)]
    pub transforms: Vec<ModelTransform>,
    /// Triangles in model space
    pub triangles: Vec<TriangleData>,
}

/// # Scene Configuration
///
/// Everything needed to render one frame from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Renderer settings
    pub render: RenderConfig,
    /// Camera; the renderer default is used when absent
    pub camera: Option<Camera>,
    /// Attributes applied after the frame begins
    pub attributes: Vec<Attribute>,
    /// Meshes to submit
    pub meshes: Vec<MeshConfig>,
}

impl Config for SceneConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_render_config_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_levels, 100);
        assert_eq!(config.ray_generation, RayGeneration::Legacy);
        assert!(!config.compose_projection);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(RenderConfig::new(0, 10).validate().is_err());
        assert!(RenderConfig::new(10, 10).with_max_triangles(0).validate().is_err());
        assert!(RenderConfig::new(10, 10).with_max_levels(1).validate().is_err());
        assert!(RenderConfig::new(10, 10)
            .with_max_levels(3)
            .with_compose_projection(true)
            .validate()
            .is_err());
    }

    #[test]
    fn test_render_config_from_toml_fills_defaults() {
        let text = r#"
            width = 64
            height = 48
            ray_generation = "Camera"
        "#;
        let config: RenderConfig = toml::from_str(text).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 48);
        assert_eq!(config.ray_generation, RayGeneration::Camera);
        assert_eq!(config.max_triangles, RenderConfig::default().max_triangles);
    }

    #[test]
    fn test_scene_config_from_ron() {
        let text = r#"(
            render: (width: 10, height: 10),
            attributes: [Distribution(12.0)],
            meshes: [(
                transforms: [Translate((0.0, 0.0, 5.0)), RotateZ(90.0)],
                triangles: [(
                    positions: ((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)),
                    normals: ((0.0, 0.0, 1.0), (0.0, 0.0, 1.0), (0.0, 0.0, 1.0)),
                )],
            )],
        )"#;
        let scene: SceneConfig = ron::from_str(text).unwrap();
        assert_eq!(scene.render.width, 10);
        assert!(scene.camera.is_none());
        assert_eq!(scene.attributes.len(), 1);
        assert_eq!(scene.meshes[0].transforms.len(), 2);
        assert_eq!(scene.meshes[0].triangles[0].positions[1], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_model_transform_matrices() {
        let p = Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(
            ModelTransform::RotateZ(90.0).to_matrix().apply_to_point(&p),
            Vec3::new(0.0, 1.0, 0.0),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            ModelTransform::Translate(Vec3::new(0.0, 2.0, 0.0)).to_matrix().apply_to_point(&p),
            Vec3::new(1.0, 2.0, 0.0),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            ModelTransform::Scale(Vec3::new(3.0, 1.0, 1.0)).to_matrix().apply_to_point(&p),
            Vec3::new(3.0, 0.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_save_and_load_round_trip_through_file() {
        let path = std::env::temp_dir().join("soft_render_config_test.toml");
        let path = path.to_str().unwrap();
        let config = RenderConfig::new(32, 16).with_ray_generation(RayGeneration::Camera);

        config.save_to_file(path).unwrap();
        let loaded = RenderConfig::load_from_file(path).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("soft_render_config_test.json");
        let path = path.to_str().unwrap();
        std::fs::write(path, "{}").unwrap();

        let loaded = RenderConfig::load_from_file(path);
        let saved = RenderConfig::default().save_to_file(path);
        std::fs::remove_file(path).ok();

        assert!(matches!(loaded, Err(ConfigError::UnsupportedFormat(_))));
        assert!(matches!(saved, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("soft_render_missing_config.toml");
        assert!(matches!(
            RenderConfig::load_from_file(path.to_str().unwrap()),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join("soft_render_malformed_config.ron");
        let path = path.to_str().unwrap();
        std::fs::write(path, "(width: ").unwrap();

        let loaded = RenderConfig::load_from_file(path);
        std::fs::remove_file(path).ok();

        assert!(matches!(loaded, Err(ConfigError::Parse(_))));
    }
}
