//! Multi-octave noise built from stacked coherent noise layers.
//!
//! The 1D and 2D generators deliberately use different amplitude models:
//! - 1D: classic persistence / lacunarity, each octave's amplitude scaled by
//!   `persistence` and its sample count by `lacunarity`.
//! - 2D: octave `i` is weighted `amplitude / (i + 1)` on power-of-two aligned
//!   lattices.
//!
//! Both return the mean over octaves, not the sum.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::coherent::{CoherentNoise1D, CoherentNoise2D};
use crate::error::{GenError, Result};

/// Most lattice samples a single 1D octave may hold.
pub const MAX_NOISE_SAMPLES: u32 = 1 << 20;

/// Most octaves an [`OctaveNoise1D`] may stack.
pub const MAX_OCTAVES: u32 = 32;

/// Parameters for [`OctaveNoise1D`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Noise1DParams {
    /// Start of the sampled domain
    pub from: f32,
    /// End of the sampled domain
    pub to: f32,
    /// Amplitude of the first octave
    pub amplitude: f32,
    /// Lattice samples of the first octave
    pub frequency: u32,
    /// Amplitude multiplier per octave
    pub persistence: f32,
    /// Sample-count multiplier per octave
    pub lacunarity: f32,
    pub octaves: u32,
}

impl Default for Noise1DParams {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: std::f32::consts::TAU,
            amplitude: 1.0,
            frequency: 100,
            persistence: 0.5,
            lacunarity: 2.0,
            octaves: 4,
        }
    }
}

impl Noise1DParams {
    /// Check the octave count, domain and scaling, and that every octave's
    /// sample count stays within `1..=MAX_NOISE_SAMPLES`.
    pub fn validate(&self) -> Result<()> {
        if self.octaves == 0 {
            return Err(GenError::NoOctaves);
        }
        if self.octaves > MAX_OCTAVES {
            return Err(GenError::OctaveCountTooLarge {
                octaves: self.octaves,
                limit: MAX_OCTAVES,
            });
        }
        if !(self.from.is_finite() && self.to.is_finite() && self.from < self.to) {
            return Err(GenError::InvalidNoiseRange {
                from: self.from,
                to: self.to,
            });
        }
        let scaling_ok = |v: f32| v.is_finite() && v > 0.0;
        if !(scaling_ok(self.persistence) && scaling_ok(self.lacunarity)) {
            return Err(GenError::InvalidOctaveScaling {
                persistence: self.persistence,
                lacunarity: self.lacunarity,
            });
        }
        self.sample_counts().map(|_| ())
    }

    /// Lattice sample count of each octave.
    pub fn sample_counts(&self) -> Result<Vec<u32>> {
        let mut counts = Vec::with_capacity(self.octaves as usize);
        let mut frequency = self.frequency;
        for octave in 0..self.octaves {
            if frequency == 0 {
                return Err(GenError::ZeroSampleCount);
            }
            if frequency > MAX_NOISE_SAMPLES {
                return Err(GenError::TooManySamples {
                    octave,
                    samples: frequency as f32,
                    limit: MAX_NOISE_SAMPLES,
                });
            }
            counts.push(frequency);
            if octave + 1 < self.octaves {
                let next = frequency as f32 * self.lacunarity;
                if !(next < (MAX_NOISE_SAMPLES as f32 + 1.0)) {
                    return Err(GenError::TooManySamples {
                        octave: octave + 1,
                        samples: next,
                        limit: MAX_NOISE_SAMPLES,
                    });
                }
                frequency = next as u32;
            }
        }
        Ok(counts)
    }

    /// Upper bound on `|sample|`: sum of octave amplitudes over octave count.
    pub fn amplitude_bound(&self) -> f32 {
        if self.octaves == 0 {
            return 0.0;
        }
        let mut ampl = self.amplitude.abs();
        let mut total = 0.0;
        for _ in 0..self.octaves {
            total += ampl;
            ampl *= self.persistence.abs();
        }
        total / self.octaves as f32
    }
}

/// 1D multi-octave noise.
#[derive(Clone, Debug)]
pub struct OctaveNoise1D {
    octaves: Vec<CoherentNoise1D>,
}

impl OctaveNoise1D {
    pub fn new(params: &Noise1DParams, rng: &mut ChaCha8Rng) -> Result<Self> {
        params.validate()?;

        let mut amplitude = params.amplitude;
        let mut octaves = Vec::with_capacity(params.octaves as usize);

        for frequency in params.sample_counts()? {
            octaves.push(CoherentNoise1D::new(
                params.from,
                params.to,
                amplitude,
                frequency,
                rng,
            )?);
            amplitude *= params.persistence;
        }

        Ok(Self { octaves })
    }

    pub fn octave_count(&self) -> usize {
        self.octaves.len()
    }

    pub fn octave(&self, i: usize) -> &CoherentNoise1D {
        &self.octaves[i]
    }

    pub fn sample(&self, x: f32) -> f32 {
        let total: f32 = self.octaves.iter().map(|o| o.sample(x)).sum();
        total / self.octaves.len() as f32
    }
}

impl ::noise::NoiseFn<f64, 1> for OctaveNoise1D {
    fn get(&self, point: [f64; 1]) -> f64 {
        self.sample(point[0] as f32) as f64
    }
}

/// Largest power of two not above `x`; 1 for 0.
pub fn down_to_power_of_two(x: u32) -> u32 {
    if x == 0 {
        1
    } else {
        1 << (31 - x.leading_zeros())
    }
}

/// 2D multi-octave noise over a `width x height` domain, values in
/// `[0, amplitude * H(n) / n]` where `H(n)` is the n-th harmonic number.
#[derive(Clone, Debug)]
pub struct OctaveNoise2D {
    /// Octave 0 is the lowest frequency.
    octaves: Vec<CoherentNoise2D>,
    amplitude: f32,
    scale_x: f32,
    scale_y: f32,
}

impl OctaveNoise2D {
    /// Octave `i` has `min_frequency * (i + 1)` lattice columns; the count is
    /// `width / min_frequency` after rounding both down to powers of two.
    pub fn with_min_frequency(
        width: u32,
        height: u32,
        min_frequency: u32,
        amplitude: f32,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GenError::EmptyNoiseGrid { width, height });
        }
        if min_frequency == 0 {
            return Err(GenError::ZeroSampleCount);
        }

        let min_frequency = down_to_power_of_two(min_frequency);
        let new_w = down_to_power_of_two(width);
        let new_h = down_to_power_of_two(height);

        let count = new_w / min_frequency;
        if count == 0 {
            return Err(GenError::TooManyOctaves {
                octaves: min_frequency,
                width,
            });
        }

        let freq_x = min_frequency;
        let freq_y = (min_frequency * new_h / new_w).max(1);
        Self::build(width, height, new_w, new_h, freq_x, freq_y, count, amplitude, rng)
    }

    /// Fixed octave count; octave `i` has `(width / count) * (i + 1)` lattice
    /// columns (per axis, after rounding down to a power of two).
    pub fn with_octaves(
        width: u32,
        height: u32,
        octaves: u32,
        amplitude: f32,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        if octaves == 0 {
            return Err(GenError::NoOctaves);
        }
        if width == 0 || height == 0 {
            return Err(GenError::EmptyNoiseGrid { width, height });
        }
        if width < octaves {
            return Err(GenError::TooManyOctaves { octaves, width });
        }

        let new_w = down_to_power_of_two(width);
        let new_h = down_to_power_of_two(height);
        let freq_x = (new_w / octaves).max(1);
        let freq_y = (new_h / octaves).max(1);
        Self::build(width, height, new_w, new_h, freq_x, freq_y, octaves, amplitude, rng)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        width: u32,
        height: u32,
        new_w: u32,
        new_h: u32,
        freq_x: u32,
        freq_y: u32,
        count: u32,
        amplitude: f32,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        let octaves = (1..=count)
            .map(|i| CoherentNoise2D::new(freq_x * i, freq_y * i, rng))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            octaves,
            amplitude,
            scale_x: new_w as f32 / width as f32,
            scale_y: new_h as f32 / height as f32,
        })
    }

    pub fn octave_count(&self) -> usize {
        self.octaves.len()
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Upper bound of [`sample`](Self::sample).
    pub fn max_value(&self) -> f32 {
        let n = self.octaves.len();
        let harmonic: f32 = (1..=n).map(|i| 1.0 / i as f32).sum();
        self.amplitude * harmonic / n as f32
    }

    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let x = x * self.scale_x;
        let y = y * self.scale_y;
        let n = self.octaves.len();

        let total: f32 = self
            .octaves
            .iter()
            .enumerate()
            .map(|(i, octave)| {
                let divisor = 2f32.powi((n - 1 - i) as i32);
                octave.sample(x / divisor, y / divisor) * self.amplitude / (i + 1) as f32
            })
            .sum();

        total / n as f32
    }
}

impl ::noise::NoiseFn<f64, 2> for OctaveNoise2D {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0] as f32, point[1] as f32) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    #[test]
    fn test_down_to_power_of_two() {
        assert_eq!(down_to_power_of_two(0), 1);
        assert_eq!(down_to_power_of_two(1), 1);
        assert_eq!(down_to_power_of_two(5), 4);
        assert_eq!(down_to_power_of_two(64), 64);
        assert_eq!(down_to_power_of_two(100), 64);
        assert_eq!(down_to_power_of_two(u32::MAX), 1 << 31);
    }

    #[test]
    fn test_1d_octave_frequencies_and_bound() {
        let params = Noise1DParams {
            amplitude: 8.0,
            frequency: 10,
            octaves: 4,
            ..Default::default()
        };
        let noise = OctaveNoise1D::new(&params, &mut rng()).unwrap();

        let counts: Vec<usize> = (0..4).map(|i| noise.octave(i).sample_count()).collect();
        assert_eq!(counts, vec![10, 20, 40, 80]);

        // (8 + 4 + 2 + 1) / 4
        let bound = params.amplitude_bound();
        assert!((bound - 3.75).abs() < 1e-6);
        for i in 0..2000 {
            let v = noise.sample(i as f32 * 0.0031);
            assert!(v.abs() <= bound + 1e-5);
        }
    }

    #[test]
    fn test_1d_is_mean_of_octaves() {
        let noise = OctaveNoise1D::new(&Noise1DParams::default(), &mut rng()).unwrap();
        let x = 1.2345;
        let mean: f32 = (0..noise.octave_count())
            .map(|i| noise.octave(i).sample(x))
            .sum::<f32>()
            / noise.octave_count() as f32;
        assert!((noise.sample(x) - mean).abs() < 1e-6);
    }

    #[test]
    fn test_1d_zero_amplitude_is_flat() {
        let params = Noise1DParams {
            amplitude: 0.0,
            ..Default::default()
        };
        let noise = OctaveNoise1D::new(&params, &mut rng()).unwrap();
        assert_eq!(noise.sample(0.7), 0.0);
        assert_eq!(noise.sample(5.0), 0.0);
    }

    #[test]
    fn test_1d_rejects_zero_octaves() {
        let params = Noise1DParams {
            octaves: 0,
            ..Default::default()
        };
        assert!(matches!(
            OctaveNoise1D::new(&params, &mut rng()),
            Err(GenError::NoOctaves)
        ));
    }

    #[test]
    fn test_1d_sample_counts_are_capped() {
        let params = Noise1DParams {
            frequency: 10,
            octaves: 30,
            ..Default::default()
        };
        match OctaveNoise1D::new(&params, &mut rng()) {
            Err(GenError::TooManySamples { octave, limit, .. }) => {
                // 10 * 2^17 is the first count above 2^20
                assert_eq!(octave, 17);
                assert_eq!(limit, MAX_NOISE_SAMPLES);
            }
            other => panic!("expected TooManySamples, got {:?}", other.map(|_| ())),
        }

        let params = Noise1DParams {
            frequency: 1,
            lacunarity: 1e30,
            octaves: 3,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(GenError::TooManySamples { octave: 1, .. })
        ));

        let params = Noise1DParams {
            octaves: MAX_OCTAVES + 1,
            lacunarity: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(GenError::OctaveCountTooLarge { .. })
        ));

        let params = Noise1DParams {
            frequency: 3,
            lacunarity: 0.25,
            octaves: 2,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(GenError::ZeroSampleCount)));
    }

    #[test]
    fn test_1d_rejects_bad_scaling() {
        for (persistence, lacunarity) in [(0.5, 0.0), (0.5, -2.0), (0.5, f32::NAN), (-0.5, 2.0)] {
            let params = Noise1DParams {
                persistence,
                lacunarity,
                ..Default::default()
            };
            assert!(matches!(
                OctaveNoise1D::new(&params, &mut rng()),
                Err(GenError::InvalidOctaveScaling { .. })
            ));
        }
    }

    #[test]
    fn test_2d_octave_modes() {
        let fixed = OctaveNoise2D::with_octaves(100, 50, 4, 1.0, &mut rng()).unwrap();
        assert_eq!(fixed.octave_count(), 4);

        let by_freq = OctaveNoise2D::with_min_frequency(64, 64, 16, 1.0, &mut rng()).unwrap();
        assert_eq!(by_freq.octave_count(), 4);

        assert!(matches!(
            OctaveNoise2D::with_octaves(3, 50, 4, 1.0, &mut rng()),
            Err(GenError::TooManyOctaves { .. })
        ));
        assert!(matches!(
            OctaveNoise2D::with_min_frequency(8, 8, 16, 1.0, &mut rng()),
            Err(GenError::TooManyOctaves { .. })
        ));
    }

    #[test]
    fn test_2d_bounded_by_harmonic_mean() {
        let noise = OctaveNoise2D::with_octaves(32, 32, 4, 2.0, &mut rng()).unwrap();
        let max = noise.max_value();
        // 2 * (1 + 1/2 + 1/3 + 1/4) / 4
        assert!((max - 2.0 * 25.0 / 12.0 / 4.0).abs() < 1e-5);

        for y in 0..32 {
            for x in 0..32 {
                let v = noise.sample(x as f32, y as f32);
                assert!(v >= 0.0 && v <= max + 1e-5);
            }
        }
    }
}
