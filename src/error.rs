//! Error types for island generation.

use thiserror::Error;

/// Errors raised while configuring or running a generation pass.
#[derive(Error, Debug)]
pub enum GenError {
    /// The raster needs at least one column.
    #[error("invalid column count: {0} (must be at least 1)")]
    InvalidColumnCount(u32),

    /// Border is too small (or not finite) to hold a single row of cells.
    #[error("degenerate border {width} x {height}: need positive size with at least one row of cells")]
    DegenerateBorder { width: f32, height: f32 },

    /// Jitter fraction outside [0, 1]. Values inside that range are clamped to [0, 0.45].
    #[error("jitter fraction {0} outside [0, 1]")]
    JitterOutOfRange(f32),

    /// Noise domain must satisfy `from < to`.
    #[error("invalid noise domain: from {from} must be less than to {to}")]
    InvalidNoiseRange { from: f32, to: f32 },

    /// A noise octave needs at least one lattice sample.
    #[error("noise sample count must be at least 1")]
    ZeroSampleCount,

    /// A multi-octave generator needs at least one octave.
    #[error("octave count must be at least 1")]
    NoOctaves,

    /// Octave count beyond what a 1D generator accepts.
    #[error("{octaves} octaves requested, at most {limit} allowed")]
    OctaveCountTooLarge { octaves: u32, limit: u32 },

    /// Persistence and lacunarity must be finite and positive.
    #[error("invalid octave scaling: persistence {persistence}, lacunarity {lacunarity}")]
    InvalidOctaveScaling { persistence: f32, lacunarity: f32 },

    /// An octave's lattice would exceed the sample cap.
    #[error("octave {octave} needs {samples} lattice samples, at most {limit} allowed")]
    TooManySamples { octave: u32, samples: f32, limit: u32 },

    /// A 2D noise lattice with no rows or no columns.
    #[error("noise grid {width} x {height} is empty")]
    EmptyNoiseGrid { width: u32, height: u32 },

    /// More octaves requested than the noise width can hold.
    #[error("{octaves} octaves do not fit a noise grid {width} wide")]
    TooManyOctaves { octaves: u32, width: u32 },

    /// Heightmap resolution too small to hold a sample per cell.
    #[error("heightmap resolution {resolution} too small for {columns} columns (need at least {minimum})")]
    InvalidResolution {
        resolution: usize,
        columns: u32,
        minimum: usize,
    },

    /// Island centre does not name a cell of the raster.
    #[error("island centre ({x}, {y}) outside raster {m} x {n}")]
    CenterOutOfBounds { x: u32, y: u32, m: u32, n: u32 },

    /// Negative or non-finite island radius.
    #[error("invalid island radius {0}")]
    InvalidRadius(f32),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, GenError>;
