//! Hittable trait and HitRecord for ray-object intersection.
//!
//! This is the whole surface an acceleration structure needs: a bounding box
//! to sort by and a hit query to traverse with.

use std::fmt;

use strata_math::{Aabb, DVec3, Interval, Ray};

use crate::Material;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: DVec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: DVec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Texture coordinates
    pub u: f64,
    pub v: f64,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f64,
        p: DVec3,
        outward_normal: DVec3,
        (u, v): (f64, f64),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p,
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: DVec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        // Normal always points against the ray
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

impl fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitRecord")
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("material", &self.material)
            .field("u", &self.u)
            .field("v", &self.v)
            .field("t", &self.t)
            .field("front_face", &self.front_face)
            .finish()
    }
}

/// Trait for objects that can be hit by rays.
///
/// Implementations are immutable after construction, so queries may run
/// from any number of threads at once.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// Nearest hit over a sequence of objects, shrinking the interval as hits
/// are found.
pub(crate) fn hit_nearest<'a, H, I>(objects: I, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>
where
    H: Hittable + ?Sized + 'a,
    I: IntoIterator<Item = &'a H>,
{
    let mut closest: Option<HitRecord<'a>> = None;

    for object in objects {
        let max = closest.map_or(ray_t.max, |rec| rec.t);
        if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max)) {
            closest = Some(rec);
        }
    }

    closest
}

/// A list of hittable objects.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Add every object from an iterator.
    pub fn extend<I: IntoIterator<Item = Box<dyn Hittable>>>(&mut self, objects: I) {
        for object in objects {
            self.add(object);
        }
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand the objects to an aggregate (e.g. a BVH builder).
    pub fn into_objects(self) -> Vec<Box<dyn Hittable>> {
        self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_nearest(self.objects.iter().map(|o| &**o), ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
