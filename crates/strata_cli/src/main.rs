// Strata command line driver
// Run with: cargo run --release -- terrain [config.json] [out.ppm|out.png]
//           cargo run --release -- mesh <path_to.stl>

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use strata_core::{Color, Perlin, TerrainConfig};
use strata_math::{Aabb, DVec3, Interval, Ray};
use strata_renderer::{load_stl, Hittable, Lambertian, Terrain};

const DEFAULT_OUTPUT: &str = "terrain.ppm";

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("terrain") => run_terrain(args.get(2), args.get(3)),
        Some("mesh") => match args.get(2) {
            Some(path) => run_mesh(path),
            None => usage(&args[0]),
        },
        _ => usage(&args[0]),
    }
}

fn usage(program: &str) -> Result<()> {
    eprintln!("Usage: {} terrain [config.json] [output.ppm|output.png]", program);
    eprintln!("       {} mesh <path_to.stl>", program);
    std::process::exit(1);
}

fn run_terrain(config_path: Option<&String>, output: Option<&String>) -> Result<()> {
    let config = match config_path {
        Some(path) => TerrainConfig::from_json_file(path)
            .with_context(|| format!("Failed to load terrain config {}", path))?,
        None => TerrainConfig::default(),
    };
    log::info!(
        "Terrain {}x{} (seed {}, max height {})",
        config.width,
        config.height,
        config.seed,
        config.max_height
    );

    let noise = Perlin::with_seed(config.seed);
    let terrain = Terrain::build(&config, &noise);
    log::info!(
        "Built {} triangles over {}x{} cells",
        terrain.triangles().len(),
        terrain.rows(),
        terrain.cols()
    );
    log_bounds(&terrain.bounding_box());

    probe_centre(&terrain, &config);

    let output = output.map_or(DEFAULT_OUTPUT, String::as_str);
    let preview = terrain.preview_image();
    let is_png = Path::new(output)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        preview.save_png(output)?;
    } else {
        preview.save_ppm(output)?;
    }
    log::info!("Wrote {}x{} preview to {}", preview.width, preview.height, output);

    Ok(())
}

/// Cast one ray straight down through the middle of the grid.
fn probe_centre(terrain: &Terrain, config: &TerrainConfig) {
    let bbox = terrain.bounding_box();
    if terrain.triangles().is_empty() {
        log::warn!("Terrain is empty, skipping centre probe");
        return;
    }

    let centre_x = (config.height / 2) as f64 * config.tile_scale;
    let centre_z = (config.width / 2) as f64 * config.tile_scale;
    let origin = DVec3::new(centre_x, bbox.y.max + 1.0, centre_z);
    let ray = Ray::new_simple(origin, DVec3::new(0.0, -1.0, 0.0));

    match terrain.hit(&ray, Interval::new(0.001, f64::INFINITY)) {
        Some(rec) => {
            let albedo: Color = rec.material.albedo(rec.u, rec.v, rec.p);
            log::info!(
                "Centre probe hit at {} (t={:.4}, uv=({:.3}, {:.3}), albedo {})",
                rec.p,
                rec.t,
                rec.u,
                rec.v,
                albedo
            );
        }
        None => log::warn!("Centre probe missed the terrain"),
    }
}

fn run_mesh(path: &str) -> Result<()> {
    let material = Lambertian::shared(Color::new(0.12, 0.45, 0.15));
    let mesh = load_stl(path, material);

    if mesh.is_empty() {
        log::warn!("{} produced no triangles", path);
        return Ok(());
    }

    log::info!("Loaded {} triangles from {}", mesh.len(), path);
    let bbox = mesh.bounding_box();
    log_bounds(&bbox);

    let degenerate = mesh.triangles().iter().filter(|t| t.is_degenerate()).count();
    if degenerate > 0 {
        log::warn!("{} degenerate triangle(s) will never be hit", degenerate);
    }

    // Drop straight down through the middle of the bounds
    let scene = mesh.into_list();
    let centre = (bbox.min() + bbox.max()) * 0.5;
    let origin = DVec3::new(centre.x, bbox.y.max + 1.0, centre.z);
    let ray = Ray::new_simple(origin, DVec3::new(0.0, -1.0, 0.0));
    match scene.hit(&ray, Interval::new(0.001, f64::INFINITY)) {
        Some(rec) => log::info!("Centre probe hit at {} (t={:.4})", rec.p, rec.t),
        None => log::info!("Centre probe passed through {} objects without a hit", scene.len()),
    }

    Ok(())
}

fn log_bounds(bbox: &Aabb) {
    log::info!("Bounds: min {} max {}", bbox.min(), bbox.max());
}
