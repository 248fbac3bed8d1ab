//! Generation pipeline
//!
//! Runs raster, island shape, classification, elevation and sampling in order
//! and bundles every intermediate result into an [`IslandMap`].

use tracing::info;

use crate::coastline::{Classification, CornerClass};
use crate::config::{GeneratorConfig, IslandConfig};
use crate::elevation::{self, ElevationField};
use crate::error::Result;
use crate::geometry::Rect;
use crate::island::{CircleIsland, FieldIsland, IslandShape};
use crate::raster::Raster;
use crate::sampler;
use crate::seeds::PipelineSeeds;
use crate::tilemap::Tilemap;

/// All generated island data bundled together
#[derive(Clone, Debug)]
pub struct IslandMap {
    /// Seeds used for generation (allows recreation)
    pub seeds: PipelineSeeds,
    pub config: GeneratorConfig,
    pub raster: Raster,
    pub classification: Classification,
    pub elevation: ElevationField,
    /// Heights in [0, 1], `resolution` pixels wide
    pub heightmap: Tilemap<f32>,
}

/// Summary of a generated map.
#[derive(Clone, Debug, PartialEq)]
pub struct MapStats {
    pub columns: u32,
    pub rows: u32,
    pub land_cells: usize,
    pub coast_corners: usize,
    pub land_corners: usize,
    pub waves: u32,
    pub max_elevation: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub mean_height: f32,
    /// Share of heightmap pixels above 0
    pub land_fraction: f32,
}

impl IslandMap {
    /// Convenience accessor for master seed
    pub fn seed(&self) -> u64 {
        self.seeds.master
    }

    pub fn stats(&self) -> MapStats {
        let (min_height, max_height) = self.heightmap.value_range().unwrap_or((0.0, 0.0));
        let pixels = self.heightmap.width * self.heightmap.height;
        let raised = self.heightmap.iter().filter(|(_, _, &h)| h > 0.0).count();

        MapStats {
            columns: self.raster.m(),
            rows: self.raster.n(),
            land_cells: self.classification.land_cell_count(),
            coast_corners: self.classification.coast.len(),
            land_corners: self.classification.corner_count(CornerClass::Land),
            waves: self.elevation.waves,
            max_elevation: self.elevation.max_elevation,
            min_height,
            max_height,
            mean_height: self.heightmap.mean(),
            land_fraction: if pixels == 0 {
                0.0
            } else {
                raised as f32 / pixels as f32
            },
        }
    }
}

/// Build the island shape selected by `config` over `raster`.
pub fn build_shape(
    config: &IslandConfig,
    raster: &Raster,
    seeds: &PipelineSeeds,
) -> Result<IslandShape> {
    let mut rng = seeds.island_rng();
    let shape = match config {
        IslandConfig::Circle {
            center,
            radius,
            noise,
        } => IslandShape::Circle(CircleIsland::new(raster, *center, *radius, noise, &mut rng)?),
        IslandConfig::Field { octaves, amplitude } => {
            IslandShape::Field(FieldIsland::new(raster, *octaves, *amplitude, &mut rng)?)
        }
    };
    Ok(shape)
}

/// Generate an island, drawing a master seed when the config has none.
pub fn generate(config: &GeneratorConfig) -> Result<IslandMap> {
    let master = config.seed.unwrap_or_else(rand::random);
    generate_with_seeds(config, PipelineSeeds::from_master(master))
}

/// Generate an island with explicit per-stage seeds.
pub fn generate_with_seeds(config: &GeneratorConfig, seeds: PipelineSeeds) -> Result<IslandMap> {
    config.validate()?;
    info!(target: "island_generator", seed = seeds.master, "generating island");

    let border = Rect::from_size(config.width, config.height);
    let raster = Raster::new(border, config.columns, config.jitter, &mut seeds.raster_rng())?;
    info!(
        target: "island_generator",
        columns = raster.m(),
        rows = raster.n(),
        "raster built"
    );

    let mut shape = build_shape(&config.island, &raster, &seeds)?;
    let classification = Classification::classify(&raster, &mut shape);
    info!(
        target: "island_generator",
        shape = shape.name(),
        land_cells = classification.land_cell_count(),
        "island classified"
    );

    let elevation = elevation::propagate(&classification, config.elevation);
    let heightmap =
        sampler::sample_heightmap(&raster, &classification, &elevation, config.resolution)?;
    info!(
        target: "island_generator",
        width = heightmap.width,
        height = heightmap.height,
        "heightmap sampled"
    );

    Ok(IslandMap {
        seeds,
        config: config.clone(),
        raster,
        classification,
        elevation,
        heightmap,
    })
}
