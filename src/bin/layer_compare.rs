//! Debug tool for comparing deformation layers visually
//! Renders the baseline, each layer on its own, and the full stack into one grid image

use image::{ImageBuffer, Rgb, RgbImage};
use terrain_deform::export::render_shaded;
use terrain_deform::synthetic::fbm_baseline;
use terrain_deform::{DeformConfig, DeformationPipeline, HeightGrid, TerrainExtents};

const RESOLUTION: usize = 257;
const SEED: u32 = 42;
const RELIEF: f32 = 400.0;

/// Label bar colors, one per tile
const TILE_COLORS: [[u8; 3]; 6] = [
    [120, 120, 120],
    [0, 180, 200],
    [230, 200, 40],
    [90, 200, 90],
    [200, 80, 200],
    [230, 90, 60],
];

fn main() {
    println!("Generating layer comparison grid...");

    let extents = TerrainExtents::default();
    let baseline = fbm_baseline(RESOLUTION, SEED, 0.4, 0.15);
    let mut pipeline = match DeformationPipeline::new(extents) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    pipeline.capture_baseline(&baseline);

    let full = DeformConfig {
        smoothing: terrain_deform::SmoothingParams {
            enabled: true,
            radius: 150.0,
            ..Default::default()
        },
        ..DeformConfig::default()
    };

    let variants: Vec<(&str, DeformConfig)> = vec![
        ("1. Baseline", DeformConfig::disabled()),
        ("2. Ripple", isolate(&full, 0)),
        ("3. Flow", isolate(&full, 1)),
        ("4. Noise", isolate(&full, 2)),
        ("5. Smoothing", isolate(&full, 3)),
        ("6. Full stack", full.clone()),
    ];

    // Shared color range so tiles are comparable
    let mut grids: Vec<(&str, HeightGrid)> = Vec::new();
    for (name, config) in &variants {
        println!("  Processing: {}", name);
        match pipeline.recompute(config) {
            Ok(grid) => grids.push((*name, grid)),
            Err(e) => eprintln!("Warning: {} failed: {}", name, e),
        }
    }
    let (min_h, max_h) = grids.iter().fold((f32::MAX, f32::MIN), |(lo, hi), (_, g)| {
        let (a, b) = g.min_max();
        (lo.min(a), hi.max(b))
    });

    let images: Vec<RgbImage> = grids
        .iter()
        .map(|(_, g)| render_shaded(g, min_h, max_h, RELIEF))
        .collect();

    let grid = create_grid(&images, 3, 2);
    match grid.save("layer_comparison.png") {
        Ok(()) => println!("Saved: layer_comparison.png"),
        Err(e) => eprintln!("Error: failed to save grid: {}", e),
    }
    for (i, (name, _)) in grids.iter().enumerate() {
        let c = TILE_COLORS[i % TILE_COLORS.len()];
        println!("  Tile {} (bar rgb {},{},{}): {}", i + 1, c[0], c[1], c[2], name);
    }
}

/// Copy of `full` with only one layer left enabled (0 ripple, 1 flow, 2 noise, 3 smoothing).
fn isolate(full: &DeformConfig, layer: usize) -> DeformConfig {
    let mut config = full.clone();
    config.ripple.enabled = layer == 0;
    config.flow.enabled = layer == 1;
    config.noise.enabled = layer == 2;
    config.smoothing.enabled = layer == 3;
    config
}

fn create_grid(images: &[RgbImage], cols: usize, rows: usize) -> RgbImage {
    if images.is_empty() {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images[0].width();
    let cell_height = images[0].height();
    let bar_height = 8u32;
    let gap = 4u32;
    let total_cell_width = cell_width + gap;
    let total_cell_height = cell_height + bar_height + gap;

    let mut grid: RgbImage = ImageBuffer::from_pixel(
        total_cell_width * cols as u32,
        total_cell_height * rows as u32,
        Rgb([40, 40, 40]),
    );

    for (idx, img) in images.iter().enumerate() {
        let col = idx % cols;
        let row = idx / cols;
        if row >= rows {
            break;
        }

        let x_offset = col as u32 * total_cell_width;
        let y_offset = row as u32 * total_cell_height;

        let bar = Rgb(TILE_COLORS[idx % TILE_COLORS.len()]);
        for y in 0..bar_height {
            for x in 0..cell_width {
                grid.put_pixel(x_offset + x, y_offset + y, bar);
            }
        }

        for y in 0..cell_height {
            for x in 0..cell_width {
                grid.put_pixel(x_offset + x, y_offset + bar_height + y, *img.get_pixel(x, y));
            }
        }
    }

    grid
}
