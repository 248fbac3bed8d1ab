//! Heightmap sampling over the jittered raster.
//!
//! Every pixel is mapped to a world point, the cell containing it is found
//! (the cell under the regular lattice first, then its 8 neighbours), and the
//! cell's four corner elevations are interpolated at that point.

use rayon::prelude::*;
use tracing::debug;

use crate::coastline::{Classification, COAST_ELEVATION};
use crate::elevation::ElevationField;
use crate::error::{GenError, Result};
use crate::geometry::{interpolate_in_quad, point_in_quad, Vec2};
use crate::raster::{GridIndex, Raster};
use crate::tilemap::Tilemap;

/// Samples a raster into a regular grid of heights in `[0, 1]`.
pub struct HeightmapSampler<'a> {
    raster: &'a Raster,
    classification: &'a Classification,
    elevation: &'a ElevationField,
    width: usize,
    height: usize,
    /// Pixels per cell side.
    samples_per_cell: usize,
    pixel_width: f32,
    pixel_height: f32,
}

impl<'a> HeightmapSampler<'a> {
    /// `resolution` is the output width in pixels. The height follows the
    /// raster's aspect ratio, so a square raster gives a square heightmap.
    pub fn new(
        raster: &'a Raster,
        classification: &'a Classification,
        elevation: &'a ElevationField,
        resolution: usize,
    ) -> Result<Self> {
        let m = raster.m() as usize;
        let n = raster.n() as usize;

        let samples_per_cell = resolution.saturating_sub(1) / m;
        if samples_per_cell == 0 {
            return Err(GenError::InvalidResolution {
                resolution,
                columns: raster.m(),
                minimum: m + 1,
            });
        }

        let height = (resolution - 1) * n / m + 1;

        Ok(Self {
            raster,
            classification,
            elevation,
            width: resolution,
            height,
            samples_per_cell,
            pixel_width: raster.cell_size() / samples_per_cell as f32,
            pixel_height: raster.cell_height() / samples_per_cell as f32,
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn samples_per_cell(&self) -> usize {
        self.samples_per_cell
    }

    /// World position of pixel `(column, row)`.
    pub fn pixel_position(&self, column: usize, row: usize) -> Vec2 {
        self.raster.border().origin()
            + Vec2::new(
                column as f32 * self.pixel_width,
                row as f32 * self.pixel_height,
            )
    }

    /// Sample the whole heightmap, rows in parallel.
    pub fn sample(&self) -> Tilemap<f32> {
        let mut data = vec![0.0f32; self.width * self.height];

        data.par_chunks_mut(self.width)
            .enumerate()
            .for_each(|(row, pixels)| {
                for (column, value) in pixels.iter_mut().enumerate() {
                    *value = self.sample_pixel(column, row);
                }
            });

        debug!(
            target: "island_generator::sampler",
            width = self.width,
            height = self.height,
            samples_per_cell = self.samples_per_cell,
            "sampled heightmap"
        );

        Tilemap::from_vec(self.width, self.height, data)
            .unwrap_or_else(|| Tilemap::new(self.width, self.height))
    }

    /// Height of one pixel. The frame of `samples_per_cell` pixels along
    /// every edge is always 0.
    pub fn sample_pixel(&self, column: usize, row: usize) -> f32 {
        let frame = self.samples_per_cell;
        if column < frame
            || row < frame
            || column + 1 + frame >= self.width
            || row + 1 + frame >= self.height
        {
            return 0.0;
        }

        let point = self.pixel_position(column, row);
        let Some(cell) = self.containing_cell(point) else {
            return 0.0;
        };

        if !self.classification.is_land(cell) {
            return 0.0;
        }

        let [a, b, c, d] = self.raster.cell_corners(cell);
        let (x, y) = (cell.x, cell.y);
        let interpolated = interpolate_in_quad(
            (a, self.elevation.get(GridIndex::new(x, y))),
            (b, self.elevation.get(GridIndex::new(x + 1, y))),
            (c, self.elevation.get(GridIndex::new(x + 1, y + 1))),
            (d, self.elevation.get(GridIndex::new(x, y + 1))),
            point,
        );

        let max = if self.elevation.max_elevation > 0.0 {
            self.elevation.max_elevation
        } else {
            COAST_ELEVATION
        };
        ((interpolated - COAST_ELEVATION) / max).max(0.0)
    }

    /// The cell whose jittered quad contains `point`, if any.
    pub fn containing_cell(&self, point: Vec2) -> Option<GridIndex> {
        let local = point - self.raster.border().origin();
        let gx = (local.x / self.raster.cell_size()).floor();
        let gy = (local.y / self.raster.cell_height()).floor();
        if gx < 0.0 || gy < 0.0 {
            return None;
        }
        let guess = GridIndex::new(gx as u32, gy as u32);

        if self.contains(guess, point) {
            return Some(guess);
        }

        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let x = guess.x as i64 + dx;
                let y = guess.y as i64 + dy;
                if x < 0 || y < 0 {
                    continue;
                }
                let candidate = GridIndex::new(x as u32, y as u32);
                if self.contains(candidate, point) {
                    return Some(candidate);
                }
            }
        }

        None
    }

    fn contains(&self, cell: GridIndex, point: Vec2) -> bool {
        if !self.raster.contains_cell(cell) {
            return false;
        }
        let [a, b, c, d] = self.raster.cell_corners(cell);
        point_in_quad(a, b, c, d, point)
    }
}

/// Sample `raster` into a heightmap `resolution` pixels wide.
pub fn sample_heightmap(
    raster: &Raster,
    classification: &Classification,
    elevation: &ElevationField,
    resolution: usize,
) -> Result<Tilemap<f32>> {
    Ok(HeightmapSampler::new(raster, classification, elevation, resolution)?.sample())
}
