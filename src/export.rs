use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::DeformError;
use crate::extents::TerrainExtents;
use crate::grid::HeightGrid;
use crate::layers::lerp;

/// Map a height into `[0, 1]` over the given range. A flat range maps to 0.5.
fn normalize(h: f32, min_h: f32, max_h: f32) -> f32 {
    let range = max_h - min_h;
    if range <= f32::EPSILON {
        0.5
    } else {
        ((h - min_h) / range).clamp(0.0, 1.0)
    }
}

/// Grayscale rendering, stretched to the grid's own height range.
pub fn render_gray(grid: &HeightGrid) -> GrayImage {
    let (min_h, max_h) = grid.min_max();
    let size = grid.resolution as u32;
    ImageBuffer::from_fn(size, size, |x, y| {
        let t = normalize(grid.get(x as usize, y as usize), min_h, max_h);
        Luma([(t * 255.0).round() as u8])
    })
}

/// Spectral colormap rendering over an explicit height range.
/// Sharing a range between grids keeps their colors comparable.
pub fn render_spectral(grid: &HeightGrid, min_h: f32, max_h: f32) -> RgbImage {
    let size = grid.resolution as u32;
    ImageBuffer::from_fn(size, size, |x, y| {
        let t = normalize(grid.get(x as usize, y as usize), min_h, max_h);
        Rgb(spectral_colormap(t))
    })
}

/// Spectral rendering with hillshade, so small ripples stay visible.
pub fn render_shaded(grid: &HeightGrid, min_h: f32, max_h: f32, exaggeration: f32) -> RgbImage {
    let size = grid.resolution as u32;
    let light_dir = unit([-1.0, -1.0, 2.0]);

    ImageBuffer::from_fn(size, size, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let normal = calculate_normal(grid, x, y, exaggeration);

        // Lambert shading
        let diffuse = (normal[0] * light_dir[0] + normal[1] * light_dir[1] + normal[2] * light_dir[2]).max(0.0);
        let ambient = 0.4;
        let shade = ambient + (1.0 - ambient) * diffuse;

        let base = spectral_colormap(normalize(grid.get(x, y), min_h, max_h));
        Rgb([
            (base[0] as f32 * shade).clamp(0.0, 255.0) as u8,
            (base[1] as f32 * shade).clamp(0.0, 255.0) as u8,
            (base[2] as f32 * shade).clamp(0.0, 255.0) as u8,
        ])
    })
}

pub fn export_heightmap_gray<P: AsRef<Path>>(grid: &HeightGrid, path: P) -> Result<(), DeformError> {
    render_gray(grid).save(path)?;
    Ok(())
}

pub fn export_heightmap_spectral<P: AsRef<Path>>(grid: &HeightGrid, path: P) -> Result<(), DeformError> {
    let (min_h, max_h) = grid.min_max();
    render_spectral(grid, min_h, max_h).save(path)?;
    Ok(())
}

pub fn export_heightmap_shaded<P: AsRef<Path>>(
    grid: &HeightGrid,
    path: P,
    exaggeration: f32,
) -> Result<(), DeformError> {
    let (min_h, max_h) = grid.min_max();
    render_shaded(grid, min_h, max_h, exaggeration).save(path)?;
    Ok(())
}

/// Read a square grayscale heightmap. Pixel values map linearly to `[0, 1]`.
pub fn import_heightmap_png<P: AsRef<Path>>(path: P) -> Result<HeightGrid, DeformError> {
    let img = image::open(path)?.into_luma16();
    let (width, height) = img.dimensions();
    if width != height {
        return Err(DeformError::NotSquare {
            width: width as usize,
            height: height as usize,
        });
    }

    let data = img.pixels().map(|p| p.0[0] as f32 / u16::MAX as f32).collect();
    HeightGrid::from_vec(width as usize, data)
}

/// Height dump written next to rendered images.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeightDump {
    pub resolution: usize,
    pub extents: TerrainExtents,
    /// Row-major normalized heights
    pub heights: Vec<f32>,
}

pub fn write_heights_json<P: AsRef<Path>>(
    grid: &HeightGrid,
    extents: TerrainExtents,
    path: P,
) -> Result<(), DeformError> {
    let dump = HeightDump {
        resolution: grid.resolution,
        extents,
        heights: grid.as_slice().to_vec(),
    };
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer(writer, &dump)?;
    Ok(())
}

pub fn read_heights_json<P: AsRef<Path>>(path: P) -> Result<(HeightGrid, TerrainExtents), DeformError> {
    let contents = std::fs::read_to_string(path)?;
    let dump: HeightDump = serde_json::from_str(&contents)?;
    dump.extents.validate()?;
    let grid = HeightGrid::from_vec(dump.resolution, dump.heights)?;
    Ok((grid, dump.extents))
}

/// Diverging color stops, low (violet) to high (crimson).
const SPECTRAL_STOPS: [[u8; 3]; 11] = [
    [94, 79, 162],
    [51, 136, 189],
    [102, 194, 165],
    [171, 221, 164],
    [230, 245, 152],
    [255, 255, 191],
    [254, 224, 139],
    [253, 174, 97],
    [244, 109, 67],
    [213, 62, 79],
    [158, 1, 66],
];

fn spectral_colormap(t: f32) -> [u8; 3] {
    let pos = t.clamp(0.0, 1.0) * (SPECTRAL_STOPS.len() - 1) as f32;
    let lo = (pos as usize).min(SPECTRAL_STOPS.len() - 2);
    let frac = pos - lo as f32;
    let (a, b) = (SPECTRAL_STOPS[lo], SPECTRAL_STOPS[lo + 1]);
    std::array::from_fn(|i| lerp(a[i] as f32, b[i] as f32, frac).round() as u8)
}

/// Unit surface normal from central differences, clamped at the borders.
fn calculate_normal(grid: &HeightGrid, x: usize, y: usize, exaggeration: f32) -> [f32; 3] {
    let last = grid.resolution - 1;
    let slope_x = grid.get((x + 1).min(last), y) - grid.get(x.saturating_sub(1), y);
    let slope_y = grid.get(x, (y + 1).min(last)) - grid.get(x, y.saturating_sub(1));

    // Image y grows downward
    unit([-slope_x * exaggeration, slope_y * exaggeration, 1.0])
}

fn unit(v: [f32; 3]) -> [f32; 3] {
    let len = v.iter().map(|c| c * c).sum::<f32>().sqrt();
    v.map(|c| c / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ramp(resolution: usize) -> HeightGrid {
        let mut grid = HeightGrid::new(resolution);
        for (x, _, h) in grid.iter_mut() {
            *h = x as f32 / (resolution - 1) as f32;
        }
        grid
    }

    #[test]
    fn test_gray_png_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ramp.png");
        let grid = ramp(16);
        export_heightmap_gray(&grid, &path).unwrap();

        let loaded = import_heightmap_png(&path).unwrap();
        assert_eq!(loaded.resolution, 16);
        // 8-bit quantization
        assert!(loaded.max_abs_diff(&grid).unwrap() < 1.0 / 255.0 + 1e-4);
    }

    #[test]
    fn test_import_rejects_non_square() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        let img: GrayImage = ImageBuffer::new(8, 4);
        img.save(&path).unwrap();
        assert!(matches!(
            import_heightmap_png(&path),
            Err(DeformError::NotSquare { width: 8, height: 4 })
        ));
    }

    #[test]
    fn test_json_dump() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("heights.json");
        let grid = ramp(5);
        let extents = TerrainExtents::new(50.0, 10.0, 50.0).unwrap();
        write_heights_json(&grid, extents, &path).unwrap();

        let (loaded, loaded_extents) = read_heights_json(&path).unwrap();
        assert_eq!(loaded, grid);
        assert_eq!(loaded_extents, extents);
    }

    #[test]
    fn test_flat_grid_renders_midgray() {
        let img = render_gray(&HeightGrid::new_with(4, 0.3));
        assert!(img.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn test_spectral_png_endpoints() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ramp_spectral.png");
        export_heightmap_spectral(&ramp(11), &path).unwrap();

        let img = image::open(&path).unwrap().into_rgb8();
        assert_eq!(img.dimensions(), (11, 11));
        assert_eq!(img.get_pixel(0, 5).0, SPECTRAL_STOPS[0]);
        assert_eq!(img.get_pixel(5, 5).0, SPECTRAL_STOPS[5]);
        assert_eq!(img.get_pixel(10, 5).0, SPECTRAL_STOPS[10]);
    }

    #[test]
    fn test_shaded_dimensions() {
        let grid = ramp(12);
        let img = render_shaded(&grid, 0.0, 1.0, 4.0);
        assert_eq!(img.dimensions(), (12, 12));
    }
}
