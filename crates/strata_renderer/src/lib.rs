//! Strata scene geometry.
//!
//! Ray-triangle intersection, ASCII STL meshes and procedural terrain, all
//! exposed through the [`Hittable`] trait so an external aggregate (BVH,
//! camera loop, shading) can consume them without knowing where the
//! triangles came from.

mod hittable;
mod material;
mod mesh;
mod terrain;
mod triangle;

pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Lambertian, Material};
pub use mesh::{load_stl, load_stl_from_str, parse_ascii_stl, try_load_stl, Mesh, MeshError, MeshResult};
pub use terrain::Terrain;
pub use triangle::Triangle;

/// Re-export common math types from strata_math
pub use strata_math::{Aabb, DVec3, Interval, Ray};
