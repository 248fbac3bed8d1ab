//! Jittered quad grid covering the map border.
//!
//! The raster has `m x n` cells and `(m + 1) x (n + 1)` corners. Interior
//! corners are pushed a random distance (at most `0.45` of a cell) away from
//! their lattice position, which turns the regular grid into irregular
//! quads. Cell centers are the mean of their four corners.

use std::hash::{Hash, Hasher};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::geometry::{Rect, Vec2};
use crate::tilemap::Tilemap;

/// Largest corner displacement, as a fraction of the cell width.
pub const MAX_JITTER: f32 = 0.45;

/// Circle walks are capped at this fraction of the shorter border side.
const CIRCLE_RADIUS_LIMIT: f32 = 0.9;

/// Integer coordinates of a cell or a corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridIndex {
    pub x: u32,
    pub y: u32,
}

impl GridIndex {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn as_usize(&self) -> (usize, usize) {
        (self.x as usize, self.y as usize)
    }
}

/// Unique while both coordinates stay below 100000, which any raster does.
impl Hash for GridIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.x as u64 + self.y as u64 * 100_000).hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Raster {
    border: Rect,
    m: u32,
    n: u32,
    /// Cell width; also the jitter unit.
    cell_size: f32,
    /// Cell height, stretched so `n` rows fill the border exactly.
    cell_height: f32,
    corners: Tilemap<Vec2>,
    centers: Tilemap<Vec2>,
}

impl Raster {
    /// Build a raster of `columns` cells across `border`.
    ///
    /// The row count is `floor(height / cell_size)`. `jitter` must lie in
    /// `[0, 1]` and is then clamped to `[0, MAX_JITTER]`.
    pub fn new(border: Rect, columns: u32, jitter: f32, rng: &mut ChaCha8Rng) -> Result<Self> {
        if columns == 0 {
            return Err(GenError::InvalidColumnCount(columns));
        }
        let degenerate = GenError::DegenerateBorder {
            width: border.width,
            height: border.height,
        };
        if !(border.width > 0.0 && border.height > 0.0)
            || !border.width.is_finite()
            || !border.height.is_finite()
        {
            return Err(degenerate);
        }
        if !(0.0..=1.0).contains(&jitter) {
            return Err(GenError::JitterOutOfRange(jitter));
        }

        let cell_size = border.width / columns as f32;
        // height / cell_size, kept in f64 so exact ratios do not lose a row
        let rows = (border.height as f64 * columns as f64 / border.width as f64).floor();
        if rows < 1.0 {
            return Err(degenerate);
        }
        let n = rows as u32;

        let mut raster = Self {
            border,
            m: columns,
            n,
            cell_size,
            cell_height: border.height / n as f32,
            corners: Tilemap::new(columns as usize + 1, n as usize + 1),
            centers: Tilemap::new(columns as usize, n as usize),
        };

        raster.build_lattice();
        raster.jitter_corners(jitter.clamp(0.0, MAX_JITTER) * cell_size, rng);
        raster.recompute_centers();

        Ok(raster)
    }

    fn build_lattice(&mut self) {
        let origin = self.border.origin();
        let (w, h) = (self.cell_size, self.cell_height);
        for (x, y, corner) in self.corners.iter_mut() {
            *corner = origin + Vec2::new(w * x as f32, h * y as f32);
        }
    }

    /// Moves every interior corner by a random offset inside a disc of
    /// radius `max_offset`. The outer ring stays on the border.
    fn jitter_corners(&mut self, max_offset: f32, rng: &mut ChaCha8Rng) {
        for x in 1..self.m as usize {
            for y in 1..self.n as usize {
                let offset = random_in_unit_disc(rng) * max_offset;
                let corner = self.corners.get_mut(x, y);
                *corner = *corner + offset;
            }
        }
    }

    fn recompute_centers(&mut self) {
        for y in 0..self.n as usize {
            for x in 0..self.m as usize {
                let sum = *self.corners.get(x, y)
                    + *self.corners.get(x + 1, y)
                    + *self.corners.get(x, y + 1)
                    + *self.corners.get(x + 1, y + 1);
                self.centers.set(x, y, sum * 0.25);
            }
        }
    }

    /// Columns of cells.
    pub fn m(&self) -> u32 {
        self.m
    }

    /// Rows of cells.
    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn border(&self) -> Rect {
        self.border
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    pub fn corners(&self) -> &Tilemap<Vec2> {
        &self.corners
    }

    pub fn centers(&self) -> &Tilemap<Vec2> {
        &self.centers
    }

    pub fn contains_cell(&self, index: GridIndex) -> bool {
        index.x < self.m && index.y < self.n
    }

    pub fn corner(&self, index: GridIndex) -> Vec2 {
        *self.corners.get(index.x as usize, index.y as usize)
    }

    pub fn center(&self, index: GridIndex) -> Vec2 {
        *self.centers.get(index.x as usize, index.y as usize)
    }

    /// Position of a corner before jitter.
    pub fn lattice_corner(&self, index: GridIndex) -> Vec2 {
        self.border.origin()
            + Vec2::new(
                self.cell_size * index.x as f32,
                self.cell_height * index.y as f32,
            )
    }

    /// The four corners of a cell, clockwise from top-left.
    pub fn cell_corners(&self, cell: GridIndex) -> [Vec2; 4] {
        let (x, y) = cell.as_usize();
        [
            *self.corners.get(x, y),
            *self.corners.get(x + 1, y),
            *self.corners.get(x + 1, y + 1),
            *self.corners.get(x, y + 1),
        ]
    }

    /// Approximate one quadrant of a circle of `radius` (world units) around
    /// `center` with cell indices.
    ///
    /// The walk starts at the cell `radius` straight above the centre and steps
    /// right, down or down-right, whichever centre lies closest to the circle,
    /// until it would pass the centre's column plus radius or the centre's row.
    /// Mirroring into the other quadrants is left to the caller. The step that
    /// would leave that window is dropped, not appended.
    pub fn circle_indices(&self, center: GridIndex, radius: f32) -> Vec<GridIndex> {
        assert!(self.contains_cell(center), "circle centre {:?} outside raster", center);

        let radius = radius.max(0.0).min(self.border.min_side() * CIRCLE_RADIUS_LIMIT);
        let steps = (radius / self.cell_size) as u32;
        let origin = self.center(center);

        let mut index = GridIndex::new(center.x, center.y.saturating_sub(steps));
        let mut result = vec![index];

        loop {
            let candidates = [
                GridIndex::new(index.x + 1, index.y),
                GridIndex::new(index.x, index.y + 1),
                GridIndex::new(index.x + 1, index.y + 1),
            ];

            let mut best: Option<(GridIndex, f32)> = None;
            for candidate in candidates {
                if !self.contains_cell(candidate) {
                    continue;
                }
                let diff = (self.center(candidate).distance(&origin) - radius).abs();
                if best.map_or(true, |(_, min_diff)| diff < min_diff) {
                    best = Some((candidate, diff));
                }
            }

            let Some((next, _)) = best else { break };
            if next.x > center.x + steps || next.y > center.y {
                break;
            }

            result.push(next);
            index = next;
        }

        result
    }
}

/// Uniform point inside the unit disc.
fn random_in_unit_disc(rng: &mut ChaCha8Rng) -> Vec2 {
    loop {
        let p = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        if p.dot(&p) <= 1.0 {
            return p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn assert_centers_are_corner_means(raster: &Raster) {
        for y in 0..raster.n() {
            for x in 0..raster.m() {
                let cell = GridIndex::new(x, y);
                let [a, b, c, d] = raster.cell_corners(cell);
                let mean = (a + b + c + d) * 0.25;
                let center = raster.center(cell);
                assert!((mean.x - center.x).abs() < 1e-4);
                assert!((mean.y - center.y).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_regular_grid_shapes() {
        let raster = Raster::new(Rect::from_size(4.0, 4.0), 4, 0.0, &mut rng(1)).unwrap();

        assert_eq!((raster.m(), raster.n()), (4, 4));
        assert_eq!((raster.corners().width, raster.corners().height), (5, 5));
        assert_eq!((raster.centers().width, raster.centers().height), (4, 4));
        assert_centers_are_corner_means(&raster);

        assert_eq!(raster.corner(GridIndex::new(2, 3)), Vec2::new(2.0, 3.0));
        assert_eq!(raster.center(GridIndex::new(0, 0)), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_row_count_from_cell_size() {
        let raster = Raster::new(Rect::from_size(100.0, 55.0), 10, 0.0, &mut rng(1)).unwrap();
        assert_eq!(raster.n(), 5);
        assert!((raster.cell_size() - 10.0).abs() < 1e-6);
        assert!((raster.cell_height() - 11.0).abs() < 1e-6);
        let bottom_right = raster.corner(GridIndex::new(10, 5));
        assert!((bottom_right.x - 100.0).abs() < 1e-4);
        assert!((bottom_right.y - 55.0).abs() < 1e-4);
    }

    #[test]
    fn test_square_border_keeps_square_grid() {
        for columns in [7, 13, 14, 15, 28, 30, 60, 63] {
            let raster =
                Raster::new(Rect::from_size(512.0, 512.0), columns, 0.0, &mut rng(1)).unwrap();
            assert_eq!(raster.n(), columns, "columns {}", columns);
            assert!((raster.cell_height() - raster.cell_size()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_jitter_is_bounded_and_keeps_boundary() {
        let raster = Raster::new(Rect::from_size(50.0, 50.0), 10, 1.0, &mut rng(3)).unwrap();
        let limit = MAX_JITTER * raster.cell_size() + 1e-4;

        let mut moved = false;
        for (x, y, &corner) in raster.corners().iter() {
            let index = GridIndex::new(x as u32, y as u32);
            let offset = corner.distance(&raster.lattice_corner(index));
            assert!(offset <= limit);

            let boundary = x == 0 || y == 0 || x == 10 || y == 10;
            if boundary {
                assert!(offset < 1e-5);
            } else if offset > 1e-3 {
                moved = true;
            }
        }
        assert!(moved);
        assert_centers_are_corner_means(&raster);
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let border = Rect::from_size(10.0, 10.0);
        assert!(matches!(
            Raster::new(border, 0, 0.3, &mut rng(1)),
            Err(GenError::InvalidColumnCount(0))
        ));
        assert!(matches!(
            Raster::new(Rect::from_size(0.0, 10.0), 4, 0.3, &mut rng(1)),
            Err(GenError::DegenerateBorder { .. })
        ));
        assert!(matches!(
            Raster::new(Rect::from_size(100.0, 1.0), 4, 0.3, &mut rng(1)),
            Err(GenError::DegenerateBorder { .. })
        ));
        assert!(matches!(
            Raster::new(border, 4, 1.5, &mut rng(1)),
            Err(GenError::JitterOutOfRange(_))
        ));
        assert!(matches!(
            Raster::new(border, 4, -0.1, &mut rng(1)),
            Err(GenError::JitterOutOfRange(_))
        ));
    }

    #[test]
    fn test_same_seed_same_raster() {
        let border = Rect::new(-5.0, 2.0, 30.0, 20.0);
        let a = Raster::new(border, 12, 0.4, &mut rng(42)).unwrap();
        let b = Raster::new(border, 12, 0.4, &mut rng(42)).unwrap();
        assert_eq!(a, b);

        let c = Raster::new(border, 12, 0.4, &mut rng(43)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_serde_roundtrip() {
        let raster = Raster::new(Rect::from_size(30.0, 20.0), 6, 0.3, &mut rng(5)).unwrap();
        let json = serde_json::to_string(&raster).unwrap();
        let back: Raster = serde_json::from_str(&json).unwrap();

        assert_eq!((back.m(), back.n()), (raster.m(), raster.n()));
        for (x, y, &corner) in raster.corners().iter() {
            let other = *back.corners().get(x, y);
            assert!((corner.x - other.x).abs() < 1e-5);
            assert!((corner.y - other.y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_grid_index_hash_and_eq() {
        let mut set = HashSet::new();
        set.insert(GridIndex::new(1, 2));
        set.insert(GridIndex::new(2, 1));
        set.insert(GridIndex::new(1, 2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_circle_zero_radius_is_centre() {
        let raster = Raster::new(Rect::from_size(10.0, 10.0), 10, 0.0, &mut rng(1)).unwrap();
        let centre = GridIndex::new(5, 5);
        assert_eq!(raster.circle_indices(centre, 0.0), vec![centre]);
    }

    #[test]
    fn test_circle_walks_one_quadrant() {
        let raster = Raster::new(Rect::from_size(20.0, 20.0), 20, 0.0, &mut rng(1)).unwrap();
        let centre = GridIndex::new(10, 10);
        let indices = raster.circle_indices(centre, 5.0);

        assert_eq!(indices[0], GridIndex::new(10, 5));
        for pair in indices.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(b.x >= a.x && b.y >= a.y && (b.x, b.y) != (a.x, a.y));
        }
        for index in &indices {
            assert!(index.x >= 10 && index.x <= 15 && index.y <= 10);
            let dist = raster.center(*index).distance(&raster.center(centre));
            assert!((dist - 5.0).abs() <= 1.0, "{:?} at {}", index, dist);
        }
        assert!(indices.len() >= 5);
    }

    #[test]
    fn test_circle_walk_stops_at_window_edge() {
        let raster = Raster::new(Rect::from_size(40.0, 40.0), 40, 0.0, &mut rng(3)).unwrap();
        let centre = GridIndex::new(20, 20);
        for radius in [3.0, 6.5, 9.0] {
            let steps = radius as u32;
            let indices = raster.circle_indices(centre, radius);
            let last = indices[indices.len() - 1];
            // the walk ends on the window's right column or bottom row
            assert!(last.x == 20 + steps || last.y == 20, "radius {} ended at {:?}", radius, last);
            assert!(indices.iter().all(|i| i.x <= 20 + steps && i.y <= 20));
        }
    }

    #[test]
    fn test_circle_start_clamped_at_top() {
        let raster = Raster::new(Rect::from_size(10.0, 10.0), 10, 0.0, &mut rng(1)).unwrap();
        let indices = raster.circle_indices(GridIndex::new(5, 1), 4.0);
        assert_eq!(indices[0], GridIndex::new(5, 0));
    }
}
