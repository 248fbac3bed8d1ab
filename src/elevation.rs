//! Corner elevations grown inland from the coastline.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coastline::{Classification, CornerClass, COAST_ELEVATION};
use crate::raster::GridIndex;
use crate::tilemap::Tilemap;

/// Elevation added per breadth-first wave away from the coast.
pub const WAVE_STEP: f32 = 0.1;

/// Land corner elevation in [`ElevationMode::Flat`].
pub const FLAT_PLATEAU: f32 = 2.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationMode {
    /// Land rises by [`WAVE_STEP`] per corner step inland.
    #[default]
    Rise,
    /// Every land corner sits on one plateau.
    Flat,
}

impl fmt::Display for ElevationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevationMode::Rise => write!(f, "rise"),
            ElevationMode::Flat => write!(f, "flat"),
        }
    }
}

impl FromStr for ElevationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rise" => Ok(ElevationMode::Rise),
            "flat" => Ok(ElevationMode::Flat),
            other => Err(format!("unknown elevation mode '{}' (expected rise or flat)", other)),
        }
    }
}

/// Per-corner elevation after propagation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElevationField {
    /// Ocean 0, coast [`COAST_ELEVATION`], land above.
    pub values: Tilemap<f32>,
    /// Normalization divisor for the heightmap.
    pub max_elevation: f32,
    /// Number of breadth-first waves, the coast included. 0 without a coast.
    pub waves: u32,
}

impl ElevationField {
    pub fn get(&self, corner: GridIndex) -> f32 {
        *self.values.get(corner.x as usize, corner.y as usize)
    }
}

pub fn propagate(classification: &Classification, mode: ElevationMode) -> ElevationField {
    let field = match mode {
        ElevationMode::Rise => rise_from_coast(classification),
        ElevationMode::Flat => flat_plateau(classification),
    };

    debug!(
        target: "island_generator::elevation",
        %mode,
        max_elevation = field.max_elevation,
        waves = field.waves,
        "propagated elevation"
    );
    field
}

/// Breadth-first flood over land corners seeded with the whole coast.
///
/// Wave `k` gets `COAST_ELEVATION + k * WAVE_STEP`. A corner is queued at most
/// once, so land that no coast corner reaches stays at 0.
fn rise_from_coast(classification: &Classification) -> ElevationField {
    let corners = &classification.corners;
    let mut values = classification.elevations.clone();
    let mut queued = Tilemap::new_with(corners.width, corners.height, false);

    let mut queue: VecDeque<GridIndex> = VecDeque::with_capacity(classification.coast.len());
    for &corner in &classification.coast {
        queued.set(corner.x as usize, corner.y as usize, true);
        queue.push_back(corner);
    }

    if queue.is_empty() {
        return ElevationField {
            values,
            max_elevation: COAST_ELEVATION,
            waves: 0,
        };
    }

    let mut remaining = queue.len();
    let mut wave = 0u32;
    let mut elevation = COAST_ELEVATION;

    while let Some(corner) = queue.pop_front() {
        if remaining == 0 {
            // everything still queued (plus this corner) is the next wave
            remaining = queue.len() + 1;
            wave += 1;
            elevation = COAST_ELEVATION + WAVE_STEP * wave as f32;
        }
        remaining -= 1;

        let (x, y) = corner.as_usize();
        values.set(x, y, elevation);

        for (nx, ny) in corners.neighbors(x, y) {
            if *corners.get(nx, ny) == CornerClass::Land && !*queued.get(nx, ny) {
                queued.set(nx, ny, true);
                queue.push_back(GridIndex::new(nx as u32, ny as u32));
            }
        }
    }

    ElevationField {
        values,
        max_elevation: elevation,
        waves: wave + 1,
    }
}

fn flat_plateau(classification: &Classification) -> ElevationField {
    let mut values = classification.elevations.clone();
    for (x, y, &class) in classification.corners.iter() {
        if class == CornerClass::Land {
            values.set(x, y, FLAT_PLATEAU);
        }
    }

    ElevationField {
        values,
        max_elevation: COAST_ELEVATION,
        waves: 0,
    }
}
