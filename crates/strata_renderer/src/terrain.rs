//! Procedural terrain geometry.
//!
//! Turns a [`Heightfield`] into triangles: two per grid cell, both sharing the
//! cell's flat palette color through a single material handle.

use std::sync::Arc;

use strata_core::{Color, Heightfield, ImageBuffer, TerrainConfig, Turbulence};
use strata_math::{Aabb, Interval, Ray};

use crate::hittable::{hit_nearest, HitRecord, Hittable};
use crate::{Lambertian, Material, Triangle};

/// Triangulated, color-banded heightfield.
#[derive(Debug)]
pub struct Terrain {
    triangles: Vec<Triangle>,
    cell_colors: Vec<Color>,
    rows: usize,
    cols: usize,
    bbox: Aabb,
}

impl Terrain {
    /// Build terrain with a flat Lambertian material per cell.
    pub fn build<N: Turbulence + ?Sized>(config: &TerrainConfig, noise: &N) -> Self {
        Self::build_with(config, noise, Lambertian::shared)
    }

    /// Build terrain, creating each cell's material from its color.
    ///
    /// `material_for` is called once per cell in row-major order.
    pub fn build_with<N, F>(config: &TerrainConfig, noise: &N, mut material_for: F) -> Self
    where
        N: Turbulence + ?Sized,
        F: FnMut(Color) -> Arc<dyn Material>,
    {
        let field = Heightfield::generate(config, noise);
        let palette = config.terrain_palette();
        let (rows, cols) = field.cell_dims();

        let mut triangles = Vec::with_capacity(rows * cols * 2);
        let mut cell_colors = Vec::with_capacity(rows * cols);
        let mut bbox = Aabb::EMPTY;

        for cell in field.cells(&palette) {
            let material = material_for(cell.color);
            for [a, b, c] in cell.triangles() {
                let tri = Triangle::new(a, b, c, Arc::clone(&material));
                bbox = Aabb::surrounding(&bbox, &tri.bounding_box());
                triangles.push(tri);
            }
            cell_colors.push(cell.color);
        }

        log::debug!(
            "Built terrain: {}x{} cells, {} triangles",
            rows,
            cols,
            triangles.len()
        );

        Self {
            triangles,
            cell_colors,
            rows,
            cols,
            bbox,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of cell rows (grid height - 1).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cell columns (grid width - 1).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Flat color of the cell at `(row, col)`.
    pub fn cell_color(&self, row: usize, col: usize) -> Option<Color> {
        if row < self.rows && col < self.cols {
            Some(self.cell_colors[row * self.cols + col])
        } else {
            None
        }
    }

    /// One pixel per cell, rows top to bottom.
    pub fn preview_image(&self) -> ImageBuffer {
        ImageBuffer {
            width: self.cols as u32,
            height: self.rows as u32,
            pixels: self.cell_colors.clone(),
        }
    }

    /// Box each triangle for an aggregate (e.g. a BVH builder).
    pub fn into_objects(self) -> Vec<Box<dyn Hittable>> {
        self.triangles
            .into_iter()
            .map(|tri| Box::new(tri) as Box<dyn Hittable>)
            .collect()
    }
}

impl Hittable for Terrain {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_nearest(&self.triangles, ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
