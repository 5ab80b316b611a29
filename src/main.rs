use std::path::Path;

use clap::Parser;

use terrain_deform::export;
use terrain_deform::synthetic;
use terrain_deform::{
    DeformConfig, DeformError, DeformPreset, HeightGrid, MemorySurface, TerrainController, TerrainExtents,
};

#[derive(Parser, Debug)]
#[command(name = "terrain_deform")]
#[command(about = "Apply layered ripple, flow, noise and smoothing deformation to a heightfield")]
struct Args {
    /// Grid resolution (cells per side) for the synthetic baseline
    #[arg(short = 'R', long, default_value = "257")]
    resolution: usize,

    /// World size along x
    #[arg(long, default_value = "1000")]
    width: f32,

    /// Vertical world extent (heights are fractions of this)
    #[arg(long, default_value = "600")]
    vertical: f32,

    /// World size along z
    #[arg(long, default_value = "1000")]
    depth: f32,

    /// Seed for the synthetic baseline (random if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Baseline heightmap: square grayscale PNG or JSON height dump
    #[arg(short, long)]
    baseline: Option<String>,

    /// Layer configuration JSON (overrides --preset)
    #[arg(short, long)]
    config: Option<String>,

    /// Preset: none, subtle, default, dramatic
    #[arg(short, long, default_value = "default")]
    preset: String,

    /// Host ticks to simulate after the initial apply
    #[arg(short, long, default_value = "0")]
    ticks: usize,

    /// Seconds per tick
    #[arg(long, default_value = "0.016666")]
    dt: f32,

    /// Animate the flow layer
    #[arg(long)]
    animate: bool,

    /// Output image path
    #[arg(short, long, default_value = "deformed.png")]
    output: String,

    /// Write a plain grayscale image instead of the shaded colormap
    #[arg(long)]
    gray: bool,

    /// Hillshade exaggeration for the shaded image
    #[arg(long, default_value = "400")]
    relief: f32,

    /// Also write the baseline image to this path
    #[arg(long)]
    export_baseline: Option<String>,

    /// Write the deformed heights as JSON
    #[arg(long)]
    export_json: Option<String>,

    /// Write the effective layer configuration as JSON
    #[arg(long)]
    dump_config: Option<String>,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), DeformError> {
    let mut config = load_config(args)?;
    if args.animate {
        config.flow.animate = true;
    }
    for warning in config.warnings() {
        eprintln!("Warning: {}", warning);
    }

    let (baseline, extents) = load_baseline(args)?;
    println!(
        "World size: {} x {} x {} ({}x{} cells)",
        extents.width, extents.vertical, extents.depth, baseline.resolution, baseline.resolution
    );
    print_range("Baseline", &baseline, extents);

    if let Some(path) = &args.export_baseline {
        write_image(&baseline, path, args)?;
        println!("Saved baseline: {}", path);
    }

    let mut controller = TerrainController::new(MemorySurface::new(baseline), extents, config)?;
    controller.start()?;
    for _ in 0..args.ticks {
        controller.update(args.dt)?;
    }
    if args.ticks > 0 {
        println!(
            "Ran {} ticks (flow clock {:.3})",
            args.ticks,
            controller.pipeline().clock().value()
        );
    }

    let deformed = controller.surface().heights();
    print_range("Deformed", deformed, extents);
    if let Some(baseline) = controller.pipeline().baseline() {
        let change = deformed.max_abs_diff(baseline)?;
        println!("Max change: {:.2} world units", change * extents.vertical);
    }

    write_image(deformed, &args.output, args)?;
    println!("Saved: {}", args.output);

    if let Some(path) = &args.export_json {
        export::write_heights_json(deformed, extents, path)?;
        println!("Saved heights: {}", path);
    }
    if let Some(path) = &args.dump_config {
        controller.config().save(path)?;
        println!("Saved config: {}", path);
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<DeformConfig, DeformError> {
    if let Some(path) = &args.config {
        println!("Loading config: {}", path);
        return DeformConfig::load(path);
    }
    match DeformPreset::from_name(&args.preset) {
        Some(preset) => {
            println!("Preset: {} ({})", preset, preset.description());
            Ok(preset.config())
        }
        None => {
            let names: Vec<String> = DeformPreset::all().iter().map(|p| p.to_string()).collect();
            Err(DeformError::Config(format!(
                "unknown preset '{}' (expected one of: {})",
                args.preset,
                names.join(", ")
            )))
        }
    }
}

fn load_baseline(args: &Args) -> Result<(HeightGrid, TerrainExtents), DeformError> {
    let cli_extents = TerrainExtents::new(args.width, args.vertical, args.depth)?;

    match &args.baseline {
        Some(path) if Path::new(path).extension().is_some_and(|ext| ext == "json") => {
            println!("Loading baseline heights: {}", path);
            export::read_heights_json(path)
        }
        Some(path) => {
            println!("Loading baseline image: {}", path);
            Ok((export::import_heightmap_png(path)?, cli_extents))
        }
        None => {
            let seed = args.seed.unwrap_or_else(rand::random);
            println!("Generating synthetic baseline with seed: {}", seed);
            Ok((synthetic::fbm_baseline(args.resolution, seed, 0.4, 0.15), cli_extents))
        }
    }
}

fn write_image(grid: &HeightGrid, path: &str, args: &Args) -> Result<(), DeformError> {
    if args.gray {
        export::export_heightmap_gray(grid, path)
    } else {
        export::export_heightmap_shaded(grid, path, args.relief)
    }
}

fn print_range(label: &str, grid: &HeightGrid, extents: TerrainExtents) {
    let (min_h, max_h) = grid.min_max();
    println!(
        "{} range: {:.4} to {:.4} ({:.1} to {:.1} world units)",
        label,
        min_h,
        max_h,
        min_h * extents.vertical,
        max_h * extents.vertical
    );
}
