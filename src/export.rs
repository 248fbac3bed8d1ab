//! PNG and JSON writers for generated islands.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::coastline::{CellClass, Classification, CornerClass};
use crate::error::{GenError, Result};
use crate::generator::IslandMap;
use crate::tilemap::Tilemap;

/// Export a heightmap as a PNG with the spectral colormap.
pub fn export_heightmap(heightmap: &Tilemap<f32>, path: impl AsRef<Path>) -> Result<()> {
    render_heightmap(heightmap).save(path)?;
    Ok(())
}

pub fn render_heightmap(heightmap: &Tilemap<f32>) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, y, &val) in heightmap.iter() {
        img.put_pixel(x as u32, y as u32, Rgb(spectral_colormap(val.clamp(0.0, 1.0))));
    }

    img
}

/// Export a heightmap as a 16-bit grayscale PNG, 0 black and 1 white.
pub fn export_heightmap_gray16(heightmap: &Tilemap<f32>, path: impl AsRef<Path>) -> Result<()> {
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, y, &val) in heightmap.iter() {
        let level = (val.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16;
        img.put_pixel(x as u32, y as u32, Luma([level]));
    }

    img.save(path)?;
    Ok(())
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.67, 0.87, 0.64],
        [0.90, 0.96, 0.60],
        [1.00, 1.00, 0.75],
        [1.00, 0.88, 0.55],
        [0.99, 0.68, 0.38],
        [0.96, 0.43, 0.26],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

const OCEAN_COLOR: [u8; 3] = [40, 80, 160];
const LAND_COLOR: [u8; 3] = [90, 160, 70];
const COAST_COLOR: [u8; 3] = [230, 210, 140];
const RIVER_COLOR: [u8; 3] = [80, 170, 230];
const UNCLASSIFIED_COLOR: [u8; 3] = [255, 0, 255];

fn cell_color(class: CellClass) -> [u8; 3] {
    match class {
        CellClass::Ocean => OCEAN_COLOR,
        CellClass::Land => LAND_COLOR,
        CellClass::Unclassified => UNCLASSIFIED_COLOR,
    }
}

fn corner_color(class: CornerClass) -> [u8; 3] {
    match class {
        CornerClass::Ocean => OCEAN_COLOR,
        CornerClass::Land => LAND_COLOR,
        CornerClass::Coast => COAST_COLOR,
        CornerClass::River => RIVER_COLOR,
        CornerClass::Unclassified => UNCLASSIFIED_COLOR,
    }
}

/// Cells and corners on one `(2m + 1) x (2n + 1)` lattice: corner `(x, y)` at
/// pixel `(2x, 2y)`, cell `(x, y)` at `(2x + 1, 2y + 1)`, edges take the cell
/// colour. Upscaled by `scale` with nearest-neighbour filtering.
pub fn render_classification(classification: &Classification, scale: u32) -> RgbImage {
    let m = classification.cells.width;
    let n = classification.cells.height;
    let (w, h) = (2 * m + 1, 2 * n + 1);
    let mut img: RgbImage = ImageBuffer::new(w as u32, h as u32);

    for py in 0..h {
        for px in 0..w {
            let color = if px % 2 == 0 && py % 2 == 0 {
                corner_color(*classification.corners.get(px / 2, py / 2))
            } else {
                let cx = (px / 2).min(m.saturating_sub(1));
                let cy = (py / 2).min(n.saturating_sub(1));
                cell_color(*classification.cells.get(cx, cy))
            };
            img.put_pixel(px as u32, py as u32, Rgb(color));
        }
    }

    let scale = scale.max(1);
    if scale == 1 {
        return img;
    }
    imageops::resize(&img, w as u32 * scale, h as u32 * scale, FilterType::Nearest)
}

pub fn export_classification(
    classification: &Classification,
    scale: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    render_classification(classification, scale).save(path)?;
    Ok(())
}

// =============================================================================
// JSON
// =============================================================================

/// On-disk form of a heightmap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightmapFile {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` values in [0, 1]
    pub values: Vec<f32>,
}

impl HeightmapFile {
    pub fn from_map(map: &IslandMap) -> Self {
        Self {
            seed: map.seed(),
            width: map.heightmap.width,
            height: map.heightmap.height,
            values: map.heightmap.as_slice().to_vec(),
        }
    }

    pub fn into_tilemap(self) -> Option<Tilemap<f32>> {
        Tilemap::from_vec(self.width, self.height, self.values)
    }
}

pub fn export_heightmap_json(map: &IslandMap, path: impl AsRef<Path>) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, &HeightmapFile::from_map(map))?;
    Ok(())
}

pub fn load_heightmap_json(path: impl AsRef<Path>) -> Result<Tilemap<f32>> {
    let reader = BufReader::new(File::open(path)?);
    let file: HeightmapFile = serde_json::from_reader(reader)?;
    let (width, height) = (file.width, file.height);
    file.into_tilemap().ok_or_else(|| {
        GenError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("heightmap data does not fill {}x{}", width, height),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::generator;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("island_export_{}_{}", std::process::id(), name))
    }

    fn small_map() -> IslandMap {
        generator::generate(&GeneratorConfig {
            seed: Some(3),
            width: 32.0,
            height: 32.0,
            columns: 8,
            resolution: 33,
            island: crate::config::IslandConfig::Circle {
                center: None,
                radius: 10.0,
                noise: Default::default(),
            },
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_spectral_endpoints() {
        assert_eq!(spectral_colormap(0.0), [94, 79, 163]);
        assert_eq!(spectral_colormap(1.0), [158, 0, 66]);
    }

    #[test]
    fn test_png_exports() {
        let map = small_map();

        let color = temp_path("height.png");
        export_heightmap(&map.heightmap, &color).unwrap();
        let img = image::open(&color).unwrap();
        assert_eq!((img.width(), img.height()), (33, 33));
        let _ = std::fs::remove_file(&color);

        let gray = temp_path("height16.png");
        export_heightmap_gray16(&map.heightmap, &gray).unwrap();
        let img = image::open(&gray).unwrap().into_luma16();
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        let _ = std::fs::remove_file(&gray);
    }

    #[test]
    fn test_classification_render() {
        let map = small_map();
        let img = render_classification(&map.classification, 3);
        assert_eq!((img.width(), img.height()), (17 * 3, 17 * 3));
        // corner (0, 0) is always ocean
        assert_eq!(img.get_pixel(0, 0).0, OCEAN_COLOR);
    }

    #[test]
    fn test_json_round_trip() {
        let map = small_map();
        let path = temp_path("height.json");
        export_heightmap_json(&map, &path).unwrap();
        let loaded = load_heightmap_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, map.heightmap);
    }
}
