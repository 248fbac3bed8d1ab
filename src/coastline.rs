//! Cell and corner classification.
//!
//! Every cell is asked once whether it is land. Corners then take the class of
//! the four cells around them: all land is land, all ocean is ocean, anything
//! mixed is coast. The map's outer ring of cells and corners is always ocean,
//! so every island is closed by a coastline.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::island::IslandShape;
use crate::raster::{GridIndex, Raster};
use crate::tilemap::Tilemap;

/// Elevation given to every coast corner.
pub const COAST_ELEVATION: f32 = 1.0;

// =============================================================================
// CLASSES
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellClass {
    #[default]
    Unclassified,
    Ocean,
    Land,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CornerClass {
    #[default]
    Unclassified,
    Ocean,
    Coast,
    Land,
    /// Reserved for river carving; never produced by classification.
    River,
}

impl CornerClass {
    /// Single character used by the ASCII preview.
    pub fn symbol(&self) -> char {
        match self {
            CornerClass::Unclassified => '?',
            CornerClass::Ocean => '~',
            CornerClass::Coast => '.',
            CornerClass::Land => '#',
            CornerClass::River => '=',
        }
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Result of classifying a raster against an island shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// `m x n`
    pub cells: Tilemap<CellClass>,
    /// `(m + 1) x (n + 1)`
    pub corners: Tilemap<CornerClass>,
    /// Coast corners at [`COAST_ELEVATION`], everything else 0.
    pub elevations: Tilemap<f32>,
    /// Coast corners in discovery order (column-major).
    pub coast: Vec<GridIndex>,
}

impl Classification {
    /// Classify every cell with `shape`, then derive the corners.
    pub fn classify(raster: &Raster, shape: &mut IslandShape) -> Self {
        let (m, n) = (raster.m() as usize, raster.n() as usize);
        let mut cells = Tilemap::new(m, n);

        for y in 0..n {
            for x in 0..m {
                let class = if x == 0 || y == 0 {
                    CellClass::Ocean
                } else if shape.is_land(raster, GridIndex::new(x as u32, y as u32)) {
                    CellClass::Land
                } else {
                    CellClass::Ocean
                };
                cells.set(x, y, class);
            }
        }

        let classification = Self::from_cells(cells);
        debug!(
            target: "island_generator::coastline",
            shape = shape.name(),
            land_cells = classification.land_cell_count(),
            coast_corners = classification.coast.len(),
            "classified raster"
        );
        classification
    }

    /// Derive corner classes from already classified cells.
    pub fn from_cells(cells: Tilemap<CellClass>) -> Self {
        let (m, n) = (cells.width, cells.height);
        let mut corners = Tilemap::new(m + 1, n + 1);
        let mut elevations = Tilemap::new(m + 1, n + 1);
        let mut coast = Vec::new();

        for x in 0..=m {
            for y in 0..=n {
                if x == 0 || y == 0 || x == m || y == n {
                    corners.set(x, y, CornerClass::Ocean);
                    continue;
                }

                let around = [
                    *cells.get(x - 1, y - 1),
                    *cells.get(x, y - 1),
                    *cells.get(x - 1, y),
                    *cells.get(x, y),
                ];
                let land = around.iter().filter(|&&c| c == CellClass::Land).count();

                let class = match land {
                    4 => CornerClass::Land,
                    0 => CornerClass::Ocean,
                    _ => CornerClass::Coast,
                };
                if class == CornerClass::Coast {
                    elevations.set(x, y, COAST_ELEVATION);
                    coast.push(GridIndex::new(x as u32, y as u32));
                }
                corners.set(x, y, class);
            }
        }

        Self {
            cells,
            corners,
            elevations,
            coast,
        }
    }

    pub fn is_land(&self, cell: GridIndex) -> bool {
        let class = *self.cells.get(cell.x as usize, cell.y as usize);
        assert!(
            class != CellClass::Unclassified,
            "cell {:?} queried before classification",
            cell
        );
        class == CellClass::Land
    }

    pub fn corner_class(&self, corner: GridIndex) -> CornerClass {
        *self.corners.get(corner.x as usize, corner.y as usize)
    }

    pub fn land_cell_count(&self) -> usize {
        self.cells.iter().filter(|(_, _, &c)| c == CellClass::Land).count()
    }

    pub fn corner_count(&self, class: CornerClass) -> usize {
        self.corners.iter().filter(|(_, _, &c)| c == class).count()
    }
}
