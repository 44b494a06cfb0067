//! ASCII STL mesh loading.
//!
//! The loader is deliberately permissive: it never validates the
//! `solid`/`facet`/`outer loop` structure. Every `vertex x y z` line is
//! collected in file order and each run of three becomes a triangle.
//!
//! # Example
//!
//! ```ignore
//! use strata_renderer::{load_stl, Lambertian};
//!
//! let mesh = load_stl("bot.stl", Lambertian::shared(Color::new(0.12, 0.45, 0.15)));
//! println!("Loaded {} triangles", mesh.len());
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use strata_math::{Aabb, DVec3, Interval, Ray};
use thiserror::Error;

use crate::hittable::{hit_nearest, HitRecord, Hittable, HittableList};
use crate::{Material, Triangle};

/// Keyword that introduces a vertex line.
const VERTEX_KEYWORD: &str = "vertex";

/// Errors that can occur during mesh loading.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mesh loading operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Triangles loaded from one file, all sharing one material.
#[derive(Debug)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    bbox: Aabb,
}

impl Mesh {
    /// Build a mesh from already constructed triangles.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let bbox = triangles
            .iter()
            .fold(Aabb::EMPTY, |acc, tri| Aabb::surrounding(&acc, &tri.bounding_box()));
        Self { triangles, bbox }
    }

    /// A mesh with no triangles.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get the number of triangles in the mesh.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Box each triangle for an aggregate (e.g. a BVH builder).
    pub fn into_objects(self) -> Vec<Box<dyn Hittable>> {
        self.triangles
            .into_iter()
            .map(|tri| Box::new(tri) as Box<dyn Hittable>)
            .collect()
    }

    /// One list entry per triangle, ready to share a scene with other objects.
    pub fn into_list(self) -> HittableList {
        let mut list = HittableList::new();
        list.extend(self.into_objects());
        list
    }
}

impl Hittable for Mesh {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_nearest(&self.triangles, ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Load an ASCII STL file, falling back to an empty mesh.
///
/// A file that cannot be opened is logged and yields no triangles, so a
/// missing asset only removes that object from the scene.
pub fn load_stl<P: AsRef<Path>>(path: P, material: Arc<dyn Material>) -> Mesh {
    let path = path.as_ref();
    match try_load_stl(path, material) {
        Ok(mesh) => mesh,
        Err(e) => {
            log::error!("Failed to open STL {}: {}", path.display(), e);
            Mesh::empty()
        }
    }
}

/// Load an ASCII STL file, reporting a failure to open it.
pub fn try_load_stl<P: AsRef<Path>>(path: P, material: Arc<dyn Material>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mesh = parse_ascii_stl(BufReader::new(file), material);

    log::debug!("Loaded {} triangles from {}", mesh.len(), path.display());
    Ok(mesh)
}

/// Parse ASCII STL text held in memory.
pub fn load_stl_from_str(text: &str, material: Arc<dyn Material>) -> Mesh {
    parse_ascii_stl(text.as_bytes(), material)
}

/// Parse ASCII STL from any buffered reader.
///
/// Lines are decoded lossily, so stray non-UTF-8 bytes only affect the line
/// they appear on. A read error ends the parse; triangles completed before it
/// are kept.
pub fn parse_ascii_stl<R: BufRead>(reader: R, material: Arc<dyn Material>) -> Mesh {
    let mut triangles = Vec::new();
    let mut pending: Vec<DVec3> = Vec::with_capacity(3);

    for (line_no, line) in reader.split(b'\n').enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Stopped reading STL at line {}: {}", line_no + 1, e);
                break;
            }
        };
        let line = String::from_utf8_lossy(&line);

        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(VERTEX_KEYWORD) {
            continue;
        }

        let Some(vertex) = parse_vertex(tokens) else {
            log::trace!("Skipping malformed vertex on line {}: {:?}", line_no + 1, line.trim());
            continue;
        };

        pending.push(vertex);
        if pending.len() == 3 {
            log::trace!(
                "Triangle {}: {}, {}, {}",
                triangles.len(),
                pending[0],
                pending[1],
                pending[2]
            );
            triangles.push(Triangle::new(
                pending[0],
                pending[1],
                pending[2],
                Arc::clone(&material),
            ));
            pending.clear();
        }
    }

    if !pending.is_empty() {
        log::debug!(
            "Dropping {} trailing vertex(es) that do not form a triangle",
            pending.len()
        );
    }

    Mesh::new(triangles)
}

/// Parse the three coordinates after a `vertex` keyword.
///
/// `x` and `y` must be whole numeric tokens. `z` may carry trailing junk
/// (`3abc` reads as `3`) since nothing is read after it. Tokens past the
/// third are ignored; non-finite values are rejected.
fn parse_vertex<'a, I: Iterator<Item = &'a str>>(mut tokens: I) -> Option<DVec3> {
    let x = tokens.next()?.parse::<f64>().ok()?;
    let y = tokens.next()?.parse::<f64>().ok()?;
    let z = parse_numeric_prefix(tokens.next()?)?;

    let vertex = DVec3::new(x, y, z);
    vertex.is_finite().then_some(vertex)
}

/// Longest leading part of `token` that parses as a number.
fn parse_numeric_prefix(token: &str) -> Option<f64> {
    token
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| token[..end].parse::<f64>().ok())
}
