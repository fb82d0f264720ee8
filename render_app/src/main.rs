//! Render demo application
//!
//! Renders a scene file (or a built-in cube) to `output.ppm` and a PNG next
//! to it.
//!
//! Usage: `render_app [scene.ron|scene.toml] [output.ppm]`

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use soft_render::foundation::logging;
use soft_render::prelude::*;

/// Demo application errors
#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error("Failed to load scene: {0}")]
    Scene(#[from] ConfigError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Cannot create {path}: {source}")]
    Output {
        path: String,
        source: std::io::Error,
    },
}

/// Unit cube centred on the origin, two triangles per face
fn cube_triangles() -> Result<Vec<TriangleData>, RenderError> {
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
    let faces = [
        // -Z
        [corner(-1.0, -1.0, -1.0), corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, -1.0, -1.0)],
        // +Z
        [corner(1.0, -1.0, 1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, -1.0, 1.0)],
        // -X
        [corner(-1.0, -1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, 1.0, -1.0), corner(-1.0, -1.0, -1.0)],
        // +X
        [corner(1.0, -1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0), corner(1.0, -1.0, 1.0)],
        // +Y
        [corner(-1.0, 1.0, -1.0), corner(-1.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), corner(1.0, 1.0, -1.0)],
        // -Y
        [corner(-1.0, -1.0, 1.0), corner(-1.0, -1.0, -1.0), corner(1.0, -1.0, -1.0), corner(1.0, -1.0, 1.0)],
    ];

    let mut triangles = Vec::with_capacity(faces.len() * 2);
    for [a, b, c, d] in faces {
        triangles.push(TriangleData::flat([a, b, c])?);
        triangles.push(TriangleData::flat([a, c, d])?);
    }
    Ok(triangles)
}

/// Built-in scene: a rotated cube in front of the default camera
fn default_scene() -> Result<SceneConfig, RenderError> {
    Ok(SceneConfig {
        render: RenderConfig::new(256, 256),
        camera: Some(Camera::default()),
        attributes: vec![
            Attribute::RgbColor(Vec3::new(0.8, 0.7, 0.5)),
            Attribute::DirectionalLight(Light::directional(
                Vec3::new(-0.7071, 0.7071, 0.0),
                Vec3::new(0.5, 0.5, 0.9),
            )),
            Attribute::AmbientLight(Light::ambient(Vec3::new(0.3, 0.3, 0.3))),
        ],
        meshes: vec![MeshConfig {
            transforms: vec![
                ModelTransform::RotateY(30.0),
                ModelTransform::RotateX(-20.0),
                ModelTransform::Scale(Vec3::new(2.0, 2.0, 2.0)),
            ],
            triangles: cube_triangles()?,
        }],
    })
}

fn render_scene(scene: &SceneConfig, output: &str) -> Result<(), AppError> {
    let mut renderer = Renderer::new(scene.render.clone())?;
    if let Some(camera) = &scene.camera {
        renderer.set_camera(camera.clone());
    }
    renderer.begin_frame()?;

    let applied = renderer.put_attributes(scene.attributes.iter().copied());
    log::info!("Applied {} of {} attributes", applied, scene.attributes.len());

    for (index, mesh) in scene.meshes.iter().enumerate() {
        for transform in &mesh.transforms {
            renderer.push_matrix(&transform.to_matrix())?;
        }
        for triangle in &mesh.triangles {
            renderer.submit_triangle(triangle)?;
        }
        for _ in &mesh.transforms {
            renderer.pop_matrix();
        }
        log::debug!("Mesh {} submitted ({} triangles)", index, mesh.triangles.len());
    }

    renderer.request_ray_trace();

    let file = File::create(output).map_err(|source| AppError::Output {
        path: output.to_string(),
        source,
    })?;
    renderer.flush_to_ppm(&mut BufWriter::new(file))?;
    log::info!("Wrote {}", output);

    renderer.save_png(Path::new(output).with_extension("png"))?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("info");
    log::info!("Starting render demo");

    let mut args = std::env::args().skip(1);
    let scene = match args.next() {
        Some(path) => SceneConfig::load_from_file(&path).map_err(AppError::from)?,
        None => {
            log::info!("No scene file given, using built-in cube");
            default_scene()?
        }
    };
    let output = args.next().unwrap_or_else(|| "output.ppm".to_string());

    render_scene(&scene, &output)?;
    log::info!("Render demo finished");
    Ok(())
}
