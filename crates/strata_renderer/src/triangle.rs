//! Triangle primitive for ray tracing.
//!
//! Intersects the supporting plane first, then classifies the hit point with
//! signed sub-triangle areas. Edges are inclusive so neighbouring triangles
//! leave no cracks.

use std::fmt;
use std::sync::Arc;

use strata_math::{Aabb, DVec3, Interval, Ray};

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};

/// Rays closer to parallel than this never hit.
const PARALLEL_EPSILON: f64 = 1e-8;

/// A triangle primitive.
///
/// Everything but the vertices and material is derived once in `new`.
pub struct Triangle {
    /// Vertices, in front-facing winding order
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
    /// Unit plane normal; zero for degenerate triangles
    normal: DVec3,
    /// Plane constant: dot(normal, v0)
    d: f64,
    /// Unnormalized area vector (v1 - v0) x (v2 - v0)
    area: DVec3,
    /// dot(area, area)
    area_sq: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: DVec3, v1: DVec3, v2: DVec3, material: Arc<dyn Material>) -> Self {
        let area = (v1 - v0).cross(v2 - v0);
        let normal = area.normalize_or_zero();
        let d = normal.dot(v0);

        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);

        Self {
            v0,
            v1,
            v2,
            normal,
            d,
            area,
            area_sq: area.dot(area),
            material,
            bbox: Aabb::from_points(min, max),
        }
    }

    pub fn vertices(&self) -> [DVec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Geometric normal (not flipped toward any ray).
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    pub fn plane_constant(&self) -> f64 {
        self.d
    }

    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }

    /// True when the vertices are collinear and the triangle can never be hit.
    pub fn is_degenerate(&self) -> bool {
        self.normal == DVec3::ZERO
    }

    /// Signed barycentric weights `(u, v, w)` of `p` for `v0`, `v1`, `v2`.
    ///
    /// Each weight is the sub-triangle opposite its vertex, projected onto the
    /// full area vector. All three are non-negative iff `p` lies inside the
    /// triangle or on its boundary.
    fn barycentric(&self, p: DVec3) -> (f64, f64, f64) {
        let na = (self.v2 - self.v1).cross(p - self.v1);
        let nb = (self.v0 - self.v2).cross(p - self.v2);
        let nc = (self.v1 - self.v0).cross(p - self.v0);

        (
            na.dot(self.area) / self.area_sq,
            nb.dot(self.area) / self.area_sq,
            nc.dot(self.area) / self.area_sq,
        )
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane (or degenerate triangle)
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let p = ray.at(t);
        let (u, v, w) = self.barycentric(p);
        if u < 0.0 || v < 0.0 || w < 0.0 {
            return None;
        }

        // Texture coordinates are (v, w); u is implied.
        Some(HitRecord::new(
            ray,
            t,
            p,
            self.normal,
            (v, w),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

impl fmt::Debug for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triangle")
            .field("v0", &self.v0)
            .field("v1", &self.v1)
            .field("v2", &self.v2)
            .field("normal", &self.normal)
            .field("material", &self.material)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use strata_core::Color;

    fn grey() -> Arc<dyn Material> {
        Lambertian::shared(Color::new(0.5, 0.5, 0.5))
    }

    /// Triangle in the XY plane at z = -1, facing +Z.
    fn test_triangle() -> Triangle {
        Triangle::new(
            DVec3::new(-1.0, -1.0, -1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(0.0, 1.0, -1.0),
            grey(),
        )
    }

    fn random_point<R: Rng>(rng: &mut R) -> DVec3 {
        DVec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = test_triangle();
        let ray = Ray::new_simple(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));

        let rec = tri.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-12);
        assert_eq!(rec.p, DVec3::new(0.0, 0.0, -1.0));
        assert!(rec.front_face);
        assert_eq!(rec.normal, DVec3::Z);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = test_triangle();

        // Ray pointing away
        let ray = Ray::new_simple(DVec3::ZERO, DVec3::new(0.0, 0.0, 1.0));
        assert!(tri.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());

        // Outside the triangle, in front of the plane
        let ray = Ray::new_simple(DVec3::new(5.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_back_face_flips_normal() {
        let tri = test_triangle();
        let ray = Ray::new_simple(DVec3::new(0.0, 0.0, -3.0), DVec3::new(0.0, 0.0, 1.0));

        let rec = tri.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -DVec3::Z);
        assert_eq!(tri.normal(), DVec3::Z);
    }

    #[test]
    fn test_interval_bounds_are_inclusive() {
        let tri = test_triangle();
        let ray = Ray::new_simple(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));

        assert!(tri.hit(&ray, Interval::new(1.0, 1.0)).is_some());
        assert!(tri.hit(&ray, Interval::new(0.0, 0.999)).is_none());
        assert!(tri.hit(&ray, Interval::new(1.001, 5.0)).is_none());
    }

    #[test]
    fn test_uv_is_v_and_w() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y, grey());
        let target = DVec3::new(0.25, 0.5, 0.0);
        let ray = Ray::new_simple(target + DVec3::Z, -DVec3::Z);

        let rec = tri.hit(&ray, Interval::UNIVERSE).unwrap();
        // weights: u (v0) = 0.25, v (v1) = 0.25, w (v2) = 0.5
        assert!((rec.u - 0.25).abs() < 1e-12);
        assert!((rec.v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_edges_and_vertices_count_as_hits() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y, grey());
        for target in [
            DVec3::new(0.5, 0.0, 0.0),
            DVec3::new(0.0, 0.5, 0.0),
            DVec3::new(0.5, 0.5, 0.0),
            DVec3::ZERO,
            DVec3::X,
        ] {
            let ray = Ray::new_simple(target + DVec3::Z, -DVec3::Z);
            assert!(tri.hit(&ray, Interval::UNIVERSE).is_some(), "missed {target}");
        }
    }

    #[test]
    fn test_shared_diagonal_has_no_gap() {
        let mat = grey();
        let v00 = DVec3::new(0.0, 0.0, 0.0);
        let v10 = DVec3::new(1.0, 0.0, 0.0);
        let v01 = DVec3::new(0.0, 0.0, 1.0);
        let v11 = DVec3::new(1.0, 0.0, 1.0);
        let a = Triangle::new(v00, v10, v01, mat.clone());
        let b = Triangle::new(v01, v10, v11, mat);

        for i in 0..=10 {
            let s = i as f64 / 10.0;
            let on_edge = v10 * (1.0 - s) + v01 * s;
            let ray = Ray::new_simple(on_edge + DVec3::Y, -DVec3::Y);
            assert!(
                a.hit(&ray, Interval::UNIVERSE).is_some() || b.hit(&ray, Interval::UNIVERSE).is_some()
            );
        }
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::X * 2.0, grey());
        assert!(tri.is_degenerate());
        assert_eq!(tri.normal(), DVec3::ZERO);

        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let ray = Ray::new_simple(random_point(&mut rng), random_point(&mut rng));
            assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
        }

        let coincident = Triangle::new(DVec3::ONE, DVec3::ONE, DVec3::ONE, grey());
        let ray = Ray::new_simple(DVec3::ZERO, DVec3::ONE);
        assert!(coincident.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_interior_hits_match_plane_distance() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut checked = 0;

        while checked < 500 {
            let (v0, v1, v2) = (random_point(&mut rng), random_point(&mut rng), random_point(&mut rng));
            let tri = Triangle::new(v0, v1, v2, grey());
            let n = (v1 - v0).cross(v2 - v0);
            if n.length() < 1.0 {
                continue;
            }

            // Strictly positive barycentric target
            let a: f64 = rng.gen_range(0.05..1.0);
            let b: f64 = rng.gen_range(0.05..1.0);
            let c: f64 = rng.gen_range(0.05..1.0);
            let target = (v0 * a + v1 * b + v2 * c) / (a + b + c);

            let origin = random_point(&mut rng) * 3.0;
            let direction = target - origin;
            if n.normalize().dot(direction).abs() < 1e-2 * direction.length() {
                continue;
            }
            let ray = Ray::new_simple(origin, direction);

            let rec = tri
                .hit(&ray, Interval::UNIVERSE)
                .expect("interior target must hit");

            // Analytic plane distance; the target sits at t = 1
            let expected = n.dot(v0 - origin) / n.dot(direction);
            assert!(((rec.t - expected) / expected).abs() < 1e-9);
            assert!((rec.t - 1.0).abs() < 1e-9);
            checked += 1;
        }
    }

    #[test]
    fn test_parallel_rays_never_hit() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let (v0, v1, v2) = (random_point(&mut rng), random_point(&mut rng), random_point(&mut rng));
            let tri = Triangle::new(v0, v1, v2, grey());

            // Any direction inside the plane
            let edge_mix = (v1 - v0) * rng.gen_range(-1.0..1.0) + (v2 - v0) * rng.gen_range(-1.0..1.0);
            let in_plane = edge_mix - tri.normal() * tri.normal().dot(edge_mix);
            let ray = Ray::new_simple(random_point(&mut rng), in_plane);

            assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
        }
    }

    #[test]
    fn test_exterior_points_never_hit() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut checked = 0;

        while checked < 500 {
            let (v0, v1, v2) = (random_point(&mut rng), random_point(&mut rng), random_point(&mut rng));
            let tri = Triangle::new(v0, v1, v2, grey());
            if (v1 - v0).cross(v2 - v0).length() < 1.0 {
                continue;
            }

            // Weights summing to one with exactly one clearly negative
            let negative: f64 = -rng.gen_range(0.05..1.0);
            let other: f64 = rng.gen_range(0.0..1.0);
            let rest = 1.0 - negative - other;
            let w = match rng.gen_range(0..3) {
                0 => [negative, other, rest],
                1 => [other, negative, rest],
                _ => [other, rest, negative],
            };
            let target = v0 * w[0] + v1 * w[1] + v2 * w[2];

            let origin = target + tri.normal() * 4.0;
            let ray = Ray::new_simple(origin, target - origin);
            assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
            checked += 1;
        }
    }

    #[test]
    fn test_bounding_box_any_vertex_order() {
        let a = DVec3::new(3.0, -1.0, 2.0);
        let b = DVec3::new(-2.0, 4.0, 0.5);
        let c = DVec3::new(1.0, 0.0, -6.0);
        let expected = Aabb::from_points(DVec3::new(-2.0, -1.0, -6.0), DVec3::new(3.0, 4.0, 2.0));

        for [p, q, r] in [[a, b, c], [a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
            let tri = Triangle::new(p, q, r, grey());
            assert_eq!(tri.bounding_box(), expected);
            assert_eq!(tri.bounding_box().min(), DVec3::new(-2.0, -1.0, -6.0));
            assert_eq!(tri.bounding_box().max(), DVec3::new(3.0, 4.0, 2.0));
        }
    }

    #[test]
    fn test_plane_constant() {
        let tri = test_triangle();
        assert!((tri.plane_constant() - (-1.0)).abs() < 1e-12);
        assert_eq!(tri.vertices()[2], DVec3::new(0.0, 1.0, -1.0));
    }
}
