//! ASCII rendering of generated islands
//!
//! Text previews of the cell classes, the corner classes and the sampled
//! heightmap, for the terminal or a plain text file.

use std::fs;
use std::path::Path;

use crate::coastline::CellClass;
use crate::error::Result;
use crate::generator::IslandMap;
use crate::tilemap::Tilemap;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// One character per raster cell
    Cells,
    /// One character per raster corner
    Corners,
    /// Heightmap gradient, downsampled to the requested width
    Height,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Cells => "Cells",
            AsciiMode::Corners => "Corners",
            AsciiMode::Height => "Height",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Cells, AsciiMode::Corners, AsciiMode::Height]
    }
}

pub fn cell_char(class: CellClass) -> char {
    match class {
        CellClass::Ocean => '~',
        CellClass::Land => '#',
        CellClass::Unclassified => '?',
    }
}

/// Get ASCII character for a height in [0, 1]
pub fn height_char(height: f32) -> char {
    const CHARS: &[char] = &['~', '.', '-', '=', '+', '*', '#', '%', '^', 'A', 'M'];
    if height <= 0.0 {
        return CHARS[0];
    }
    let idx = 1 + (height.clamp(0.0, 1.0) * (CHARS.len() - 2) as f32) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Render `map` in `mode`. `max_width` caps the heightmap preview's columns;
/// terminal cells are about twice as tall as wide, so rows are halved.
pub fn render_ascii_map(map: &IslandMap, mode: AsciiMode, max_width: usize) -> String {
    match mode {
        AsciiMode::Cells => render_grid(&map.classification.cells, |&c| cell_char(c)),
        AsciiMode::Corners => render_grid(&map.classification.corners, |c| c.symbol()),
        AsciiMode::Height => render_heightmap(&map.heightmap, max_width),
    }
}

fn render_grid<T>(grid: &Tilemap<T>, to_char: impl Fn(&T) -> char) -> String {
    let mut result = String::with_capacity((grid.width + 1) * grid.height);
    for row in grid.rows() {
        result.extend(row.iter().map(&to_char));
        result.push('\n');
    }
    result
}

fn render_heightmap(heightmap: &Tilemap<f32>, max_width: usize) -> String {
    if heightmap.width == 0 || heightmap.height == 0 {
        return String::new();
    }

    let step = heightmap.width.div_ceil(max_width.max(1)).max(1);
    let columns = heightmap.width.div_ceil(step);
    let rows = heightmap.height.div_ceil(step * 2);
    let mut result = String::with_capacity((columns + 1) * rows);

    for row in 0..rows {
        for column in 0..columns {
            let x = column * step;
            let y = (row * step * 2).min(heightmap.height - 1);
            result.push(height_char(*heightmap.get(x, y)));
        }
        result.push('\n');
    }

    result
}

/// Generate legend for height characters
pub fn height_legend() -> String {
    "=== HEIGHT LEGEND ===\n\
     ~ Ocean   . - = Lowland   + * # Hills   % ^ A M Highland\n"
        .to_string()
}

pub fn print_ascii_map(map: &IslandMap, mode: AsciiMode, max_width: usize) {
    println!("=== {} ===", mode.name());
    print!("{}", render_ascii_map(map, mode, max_width));
    if mode == AsciiMode::Height {
        print!("{}", height_legend());
    }
}

/// Write every mode into one text file.
pub fn export_ascii(map: &IslandMap, max_width: usize, path: impl AsRef<Path>) -> Result<()> {
    let mut text = format!("seed {}\n\n", map.seed());
    for &mode in AsciiMode::all() {
        text.push_str(&format!("=== {} ===\n", mode.name()));
        text.push_str(&render_ascii_map(map, mode, max_width));
        text.push('\n');
    }
    text.push_str(&height_legend());
    fs::write(path, text)?;
    Ok(())
}
