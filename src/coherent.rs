//! Coherent (value) noise on a fixed random lattice.
//!
//! Each generator draws its lattice once at construction and is immutable
//! afterwards. Between lattice points the two (or four) neighbours are blended
//! with the quintic fade curve, so the field is continuous and smooth.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::{GenError, Result};
use crate::geometry::{lerp, smooth_curve};
use crate::tilemap::Tilemap;

/// 1D coherent noise over `[from, to]` with values in `[-amplitude, amplitude]`.
#[derive(Clone, Debug)]
pub struct CoherentNoise1D {
    permutation: Vec<f32>,
    from: f32,
    to: f32,
    /// Maps `[from, to]` onto lattice indices `[0, samples - 1]`.
    scale: f32,
}

impl CoherentNoise1D {
    pub fn new(
        from: f32,
        to: f32,
        amplitude: f32,
        sample_count: u32,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        if !(from < to) || !from.is_finite() || !to.is_finite() {
            return Err(GenError::InvalidNoiseRange { from, to });
        }
        if sample_count == 0 {
            return Err(GenError::ZeroSampleCount);
        }

        let permutation = (0..sample_count)
            .map(|_| rng.gen::<f32>() * 2.0 * amplitude - amplitude)
            .collect();

        Ok(Self {
            permutation,
            from,
            to,
            scale: (sample_count - 1) as f32 / (to - from),
        })
    }

    pub fn sample_count(&self) -> usize {
        self.permutation.len()
    }

    /// Stored value at lattice index `i`.
    pub fn lattice_value(&self, i: usize) -> f32 {
        self.permutation[i]
    }

    /// Domain position of lattice index `i`.
    pub fn lattice_position(&self, i: usize) -> f32 {
        if self.scale == 0.0 {
            self.from
        } else {
            self.from + i as f32 / self.scale
        }
    }

    pub fn sample(&self, x: f32) -> f32 {
        let t = (x.clamp(self.from, self.to) - self.from) * self.scale;

        if t.fract() == 0.0 {
            return self.permutation[(t as usize).min(self.permutation.len() - 1)];
        }

        let left = t.floor() as usize;
        let right = (left + 1).min(self.permutation.len() - 1);
        lerp(
            self.permutation[left],
            self.permutation[right],
            smooth_curve(t - left as f32),
        )
    }
}

impl ::noise::NoiseFn<f64, 1> for CoherentNoise1D {
    fn get(&self, point: [f64; 1]) -> f64 {
        self.sample(point[0] as f32) as f64
    }
}

/// 2D coherent noise on a `width x height` lattice with values in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct CoherentNoise2D {
    lattice: Tilemap<f32>,
}

impl CoherentNoise2D {
    pub fn new(width: u32, height: u32, rng: &mut ChaCha8Rng) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GenError::EmptyNoiseGrid { width, height });
        }

        let (w, h) = (width as usize, height as usize);
        let values = (0..w * h).map(|_| rng.gen::<f32>()).collect();
        let lattice = Tilemap::from_vec(w, h, values)
            .ok_or(GenError::EmptyNoiseGrid { width, height })?;

        Ok(Self { lattice })
    }

    pub fn width(&self) -> usize {
        self.lattice.width
    }

    pub fn height(&self) -> usize {
        self.lattice.height
    }

    pub fn lattice_value(&self, x: usize, y: usize) -> f32 {
        *self.lattice.get(x, y)
    }

    /// Sample at lattice coordinates; queries outside the lattice are clamped.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let x = x.clamp(0.0, (self.lattice.width - 1) as f32);
        let y = y.clamp(0.0, (self.lattice.height - 1) as f32);

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = x.ceil() as usize;
        let y1 = y.ceil() as usize;

        let tx = smooth_curve(x - x0 as f32);
        let ty = smooth_curve(y - y0 as f32);

        lerp(
            lerp(*self.lattice.get(x0, y0), *self.lattice.get(x1, y0), tx),
            lerp(*self.lattice.get(x0, y1), *self.lattice.get(x1, y1), tx),
            ty,
        )
    }
}

impl ::noise::NoiseFn<f64, 2> for CoherentNoise2D {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0] as f32, point[1] as f32) as f64
    }
}
