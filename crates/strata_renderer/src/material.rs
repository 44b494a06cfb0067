//! Material handles carried by primitives.
//!
//! Geometry never interprets materials; it stores an `Arc<dyn Material>` and
//! hands a reference to it back in every `HitRecord`. The shading stage owns
//! what the queries below mean for light transport.

use std::fmt;
use std::sync::Arc;

use strata_core::Color;
use strata_math::DVec3;

/// Trait for surface descriptions queried by the shading stage.
pub trait Material: Send + Sync + fmt::Debug {
    /// Reflectance at the given texture coordinates and point.
    fn albedo(&self, u: f64, v: f64, p: DVec3) -> Color;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f64, _v: f64, _p: DVec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material with a constant albedo.
#[derive(Clone, Debug, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    /// Shared handle, ready to pass to primitives.
    pub fn shared(albedo: Color) -> Arc<dyn Material> {
        Arc::new(Self::new(albedo))
    }
}

impl Material for Lambertian {
    fn albedo(&self, _u: f64, _v: f64, _p: DVec3) -> Color {
        self.albedo
    }
}
