//! Generator configuration, loadable from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::elevation::ElevationMode;
use crate::error::{GenError, Result};
use crate::octave::Noise1DParams;
use crate::raster::GridIndex;

/// Island shape and its parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum IslandConfig {
    Circle {
        /// Centre cell; the middle of the raster when absent
        #[serde(default)]
        center: Option<GridIndex>,
        /// World units, capped at 0.48 of the shorter border side
        radius: f32,
        /// Rim noise sampled over the angle around the centre
        #[serde(default)]
        noise: Noise1DParams,
    },
    Field {
        octaves: u32,
        /// Peak noise weight; land needs noise above the squared centre distance
        amplitude: f32,
    },
}

impl IslandConfig {
    pub fn default_circle() -> Self {
        IslandConfig::Circle {
            center: None,
            radius: 180.0,
            noise: Noise1DParams {
                amplitude: 24.0,
                frequency: 10,
                octaves: 8,
                ..Default::default()
            },
        }
    }

    pub fn default_field() -> Self {
        IslandConfig::Field {
            octaves: 4,
            amplitude: 2.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IslandConfig::Circle { .. } => "circle",
            IslandConfig::Field { .. } => "field",
        }
    }
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self::default_circle()
    }
}

/// Everything a generation pass needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Random master seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    /// Border width in world units
    pub width: f32,
    /// Border height in world units
    pub height: f32,
    /// Cells across the border; rows follow from the aspect ratio
    pub columns: u32,
    /// Corner jitter as a fraction of the cell size, in [0, 1] (applied up to 0.45)
    pub jitter: f32,
    pub island: IslandConfig,
    pub elevation: ElevationMode,
    /// Heightmap width in pixels
    pub resolution: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            width: 512.0,
            height: 512.0,
            columns: 64,
            jitter: 0.3,
            island: IslandConfig::default(),
            elevation: ElevationMode::default(),
            resolution: 513,
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject settings no stage could run with. Checks that need the built
    /// raster (row count, island centre) happen during generation.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(GenError::InvalidColumnCount(self.columns));
        }
        if !(self.width > 0.0 && self.height > 0.0)
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(GenError::DegenerateBorder {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(GenError::JitterOutOfRange(self.jitter));
        }

        let minimum = self.columns as usize + 1;
        if self.resolution < minimum {
            return Err(GenError::InvalidResolution {
                resolution: self.resolution,
                columns: self.columns,
                minimum,
            });
        }

        match &self.island {
            IslandConfig::Circle { radius, noise, .. } => {
                if !radius.is_finite() || *radius < 0.0 {
                    return Err(GenError::InvalidRadius(*radius));
                }
                noise.validate()?;
            }
            IslandConfig::Field { octaves, .. } => {
                if *octaves == 0 {
                    return Err(GenError::NoOctaves);
                }
                if *octaves > self.columns {
                    return Err(GenError::TooManyOctaves {
                        octaves: *octaves,
                        width: self.columns,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "columns": 32, "elevation": "flat" }"#).unwrap();
        assert_eq!(config.columns, 32);
        assert_eq!(config.elevation, ElevationMode::Flat);
        assert_eq!(config.width, 512.0);
        assert_eq!(config.island, IslandConfig::default_circle());
    }

    #[test]
    fn test_tagged_island_json() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{ "island": { "shape": "field", "octaves": 3, "amplitude": 1.5 } }"#,
        )
        .unwrap();
        assert_eq!(
            config.island,
            IslandConfig::Field {
                octaves: 3,
                amplitude: 1.5
            }
        );

        let json = serde_json::to_string(&GeneratorConfig::default()).unwrap();
        assert!(json.contains(r#""shape":"circle""#));
    }

    #[test]
    fn test_validation_errors() {
        let config = GeneratorConfig {
            columns: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GenError::InvalidColumnCount(0))));

        let config = GeneratorConfig {
            jitter: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GenError::JitterOutOfRange(_))));

        let config = GeneratorConfig {
            resolution: 64,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidResolution { minimum: 65, .. })
        ));

        let config = GeneratorConfig {
            columns: 2,
            resolution: 3,
            island: IslandConfig::Field {
                octaves: 4,
                amplitude: 1.0,
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GenError::TooManyOctaves { .. })));
    }

    fn circle_with(noise: Noise1DParams) -> GeneratorConfig {
        GeneratorConfig {
            island: IslandConfig::Circle {
                center: None,
                radius: 180.0,
                noise,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_rim_noise_validation() {
        let base = Noise1DParams {
            frequency: 10,
            ..Default::default()
        };

        let config = circle_with(Noise1DParams { octaves: 40, ..base });
        assert!(matches!(
            config.validate(),
            Err(GenError::OctaveCountTooLarge { octaves: 40, .. })
        ));

        for lacunarity in [0.0, -2.0, f32::NAN, f32::INFINITY] {
            let config = circle_with(Noise1DParams { lacunarity, ..base });
            assert!(matches!(
                config.validate(),
                Err(GenError::InvalidOctaveScaling { .. })
            ));
        }

        let config = circle_with(Noise1DParams { persistence: f32::NAN, ..base });
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidOctaveScaling { .. })
        ));

        // 10 * 2^20 samples in the last octave
        let config = circle_with(Noise1DParams { octaves: 21, ..base });
        assert!(matches!(config.validate(), Err(GenError::TooManySamples { .. })));

        let config = circle_with(Noise1DParams { octaves: 17, ..base });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("island_config_{}.json", std::process::id()));
        let config = GeneratorConfig {
            seed: Some(42),
            columns: 16,
            resolution: 129,
            island: IslandConfig::default_field(),
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = GeneratorConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = GeneratorConfig::load("/nonexistent/island.json");
        assert!(matches!(result, Err(GenError::Io(_))));
    }
}
