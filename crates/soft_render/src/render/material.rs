//! Material scatter interface
//!
//! A material decides whether an incoming ray scatters off a hit and, if so,
//! the outgoing ray and its color attenuation. Colors are RGB in `Vec3`.

use rand::{Rng, RngCore};

use crate::foundation::math::Vec3;

use super::raycast::{Ray, RayHit};

/// Components below this count as zero when checking scatter directions
const NEAR_ZERO: f32 = 1.0e-8;

/// Surface information at a ray hit, with the normal facing the ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Hit point
    pub point: Vec3,
    /// Unit normal, oriented against the incoming ray
    pub normal: Vec3,
    /// Ray parameter of the hit
    pub distance: f32,
    /// Whether the ray struck the side the face normal points to
    pub front_face: bool,
}

impl HitRecord {
    /// Build a record from a cast result, flipping the normal toward the ray
    pub fn from_hit(ray: &Ray, hit: &RayHit) -> Self {
        let front_face = ray.direction.dot(&hit.normal) < 0.0;
        Self {
            point: hit.point,
            normal: if front_face { hit.normal } else { -hit.normal },
            distance: hit.distance,
            front_face,
        }
    }
}

/// Outgoing ray and attenuation produced by a scatter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Color attenuation
    pub attenuation: Vec3,
    /// Scattered ray
    pub ray: Ray,
}

/// Scatter behaviour of a surface
pub trait Material {
    /// Scatter `ray_in` at `hit`; `None` when the ray is absorbed
    fn scatter(&self, ray_in: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter>;
}

/// Uniformly distributed unit vector
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let len_sq = p.magnitude_squared();
        if len_sq > 1.0e-12 && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Mirror `v` about `normal`
pub fn reflect(v: &Vec3, normal: &Vec3) -> Vec3 {
    v - normal * (2.0 * v.dot(normal))
}

fn near_zero(v: &Vec3) -> bool {
    v.iter().all(|c| c.abs() < NEAR_ZERO)
}

/// Diffuse material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    /// Surface color
    pub albedo: Vec3,
}

impl Lambertian {
    /// Create a diffuse material
    pub fn new(albedo: Vec3) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let mut direction = hit.normal + random_unit_vector(rng);
        if near_zero(&direction) {
            direction = hit.normal;
        }
        Some(Scatter {
            attenuation: self.albedo,
            ray: Ray::new(hit.point, direction),
        })
    }
}

/// Reflective material with optional fuzz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    /// Surface color
    pub albedo: Vec3,
    fuzz: f32,
}

impl Metal {
    /// Create a metal; fuzz above 1 is clamped to 1
    pub fn new(albedo: Vec3, fuzz: f32) -> Self {
        Self { albedo, fuzz: fuzz.min(1.0) }
    }

    /// Fuzz radius
    pub const fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let reflected = reflect(&ray_in.direction, &hit.normal).normalize() + random_unit_vector(rng) * self.fuzz;
        let scattered = Ray::new(hit.point, reflected);
        (scattered.direction.dot(&hit.normal) > 0.0).then_some(Scatter {
            attenuation: self.albedo,
            ray: scattered,
        })
    }
}

/// Phong coefficients. Holds shading parameters only; never scatters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phong {
    /// Diffuse coefficient
    pub kd: Vec3,
    /// Ambient coefficient
    pub ka: Vec3,
    /// Specular coefficient
    pub ks: Vec3,
    /// Specular power
    pub shininess: f32,
    /// Reflection coefficient
    pub kr: Vec3,
    fuzz: f32,
}

impl Phong {
    /// Create Phong coefficients; fuzz above 1 is clamped to 1
    pub fn new(kd: Vec3, ka: Vec3, ks: Vec3, shininess: f32, kr: Vec3, fuzz: f32) -> Self {
        Self { kd, ka, ks, shininess, kr, fuzz: fuzz.min(1.0) }
    }

    /// Fuzz radius
    pub const fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Phong {
    fn scatter(&self, _ray_in: &Ray, _hit: &HitRecord, _rng: &mut dyn RngCore) -> Option<Scatter> {
        None
    }
}
