//! Island shape strategies: decide whether a raster cell is land.

use std::collections::HashMap;
use std::f32::consts::TAU;

use rand_chacha::ChaCha8Rng;

use crate::error::{GenError, Result};
use crate::geometry::Vec2;
use crate::octave::{Noise1DParams, OctaveNoise1D, OctaveNoise2D};
use crate::raster::{GridIndex, Raster};

/// Island radius is capped at this fraction of the shorter border side.
pub const MAX_RADIUS_FRACTION: f32 = 0.48;

/// Angular resolution of the circle island's noise cache (buckets per turn).
const ANGLE_BUCKETS: u32 = 1 << 14;

/// Land/ocean strategy, chosen once per generation pass.
#[derive(Clone, Debug)]
pub enum IslandShape {
    /// Circle whose rim is pushed in and out by 1D noise over the angle.
    Circle(CircleIsland),
    /// 2D noise thresholded against the squared distance from the map centre.
    Field(FieldIsland),
}

impl IslandShape {
    pub fn is_land(&mut self, raster: &Raster, cell: GridIndex) -> bool {
        match self {
            IslandShape::Circle(circle) => circle.is_land(raster, cell),
            IslandShape::Field(field) => field.is_land(cell),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IslandShape::Circle(_) => "circle",
            IslandShape::Field(_) => "field",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CircleIsland {
    center: GridIndex,
    center_point: Vec2,
    radius: f32,
    noise: OctaveNoise1D,
    /// Rim offset per quantized angle.
    rim_cache: HashMap<u32, f32>,
}

impl CircleIsland {
    /// `center` defaults to the middle cell `(m / 2, n / 2)`. `radius` is in
    /// world units and capped at `MAX_RADIUS_FRACTION` of the shorter side.
    pub fn new(
        raster: &Raster,
        center: Option<GridIndex>,
        radius: f32,
        noise: &Noise1DParams,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GenError::InvalidRadius(radius));
        }

        let center = center.unwrap_or(GridIndex::new(raster.m() / 2, raster.n() / 2));
        if !raster.contains_cell(center) {
            return Err(GenError::CenterOutOfBounds {
                x: center.x,
                y: center.y,
                m: raster.m(),
                n: raster.n(),
            });
        }

        let radius = radius.min(raster.border().min_side() * MAX_RADIUS_FRACTION);

        Ok(Self {
            center,
            center_point: raster.center(center),
            radius,
            noise: OctaveNoise1D::new(noise, rng)?,
            rim_cache: HashMap::new(),
        })
    }

    pub fn center(&self) -> GridIndex {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_land(&mut self, raster: &Raster, cell: GridIndex) -> bool {
        let dx = cell.x as f32 - self.center.x as f32;
        let dy = cell.y as f32 - self.center.y as f32;
        let offset = self.rim_offset(dy.atan2(dx));

        raster.center(cell).distance(&self.center_point) < offset + self.radius
    }

    /// Noise at `angle`, snapped to the cache's angular grid.
    fn rim_offset(&mut self, angle: f32) -> f32 {
        let turn = angle.rem_euclid(TAU) / TAU;
        let bucket = (turn * ANGLE_BUCKETS as f32).round() as u32 % ANGLE_BUCKETS;

        let noise = &self.noise;
        *self.rim_cache.entry(bucket).or_insert_with(|| {
            noise.sample(bucket as f32 / ANGLE_BUCKETS as f32 * TAU)
        })
    }
}

#[derive(Clone, Debug)]
pub struct FieldIsland {
    noise: OctaveNoise2D,
    m: u32,
    n: u32,
}

impl FieldIsland {
    /// Noise spans the raster's `m x n` cell grid.
    pub fn new(raster: &Raster, octaves: u32, amplitude: f32, rng: &mut ChaCha8Rng) -> Result<Self> {
        Ok(Self {
            noise: OctaveNoise2D::with_octaves(raster.m(), raster.n(), octaves, amplitude, rng)?,
            m: raster.m(),
            n: raster.n(),
        })
    }

    pub fn is_land(&self, cell: GridIndex) -> bool {
        let xc = cell.x as f32 * 2.0 / self.m as f32 - 1.0;
        let yc = cell.y as f32 * 2.0 / self.n as f32 - 1.0;
        let dist = xc * xc + yc * yc;

        self.noise.sample(cell.x as f32, cell.y as f32) > dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    fn flat_noise() -> Noise1DParams {
        Noise1DParams {
            amplitude: 0.0,
            frequency: 10,
            octaves: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_circle_without_noise_is_a_disc() {
        let raster = Raster::new(Rect::from_size(10.0, 10.0), 10, 0.0, &mut rng()).unwrap();
        let mut shape = IslandShape::Circle(
            CircleIsland::new(&raster, Some(GridIndex::new(5, 5)), 3.0, &flat_noise(), &mut rng())
                .unwrap(),
        );

        for y in 0..10 {
            for x in 0..10 {
                let d2 = (x as i32 - 5).pow(2) + (y as i32 - 5).pow(2);
                let land = shape.is_land(&raster, GridIndex::new(x, y));
                assert_eq!(land, d2 < 9, "cell ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_circle_defaults_and_limits() {
        let raster = Raster::new(Rect::from_size(20.0, 10.0), 20, 0.0, &mut rng()).unwrap();
        let circle = CircleIsland::new(&raster, None, 100.0, &flat_noise(), &mut rng()).unwrap();
        assert_eq!(circle.center(), GridIndex::new(10, 5));
        assert!((circle.radius() - 4.8).abs() < 1e-5);

        assert!(matches!(
            CircleIsland::new(&raster, Some(GridIndex::new(20, 0)), 2.0, &flat_noise(), &mut rng()),
            Err(GenError::CenterOutOfBounds { .. })
        ));
        assert!(matches!(
            CircleIsland::new(&raster, None, -1.0, &flat_noise(), &mut rng()),
            Err(GenError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_rim_offset_is_order_independent() {
        let raster = Raster::new(Rect::from_size(40.0, 40.0), 40, 0.2, &mut rng()).unwrap();
        let params = Noise1DParams {
            amplitude: 4.0,
            frequency: 10,
            octaves: 4,
            ..Default::default()
        };
        let mut forward = CircleIsland::new(&raster, None, 12.0, &params, &mut rng()).unwrap();
        let mut backward = forward.clone();

        let cells: Vec<GridIndex> = (0..40)
            .flat_map(|y| (0..40).map(move |x| GridIndex::new(x, y)))
            .collect();
        let a: Vec<bool> = cells.iter().map(|&c| forward.is_land(&raster, c)).collect();
        let mut b: Vec<bool> = cells.iter().rev().map(|&c| backward.is_land(&raster, c)).collect();
        b.reverse();
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_island_is_centred() {
        let raster = Raster::new(Rect::from_size(64.0, 64.0), 32, 0.0, &mut rng()).unwrap();
        let mut shape =
            IslandShape::Field(FieldIsland::new(&raster, 4, 1.0, &mut rng()).unwrap());

        // corners of the map sit at squared distance ~2, beyond the noise maximum
        assert!(!shape.is_land(&raster, GridIndex::new(0, 0)));
        assert!(!shape.is_land(&raster, GridIndex::new(31, 31)));
        assert!(!shape.is_land(&raster, GridIndex::new(0, 31)));
        assert_eq!(shape.name(), "field");
    }
}
