//! Per-cell continental shaping and the tile noise filter.

use tessera_geom::Point2;
use tessera_noise::{Grid, hash_seed_u64, perlin, spatial_hash, white_noise};

use crate::voronoi::{CellPoint, Germ};

pub const CONTINENTAL_OCTAVES: u32 = 6;

const CURVE_CHOICES: i32 = 7;
const LOWLAND_CUTOFF: f32 = 0.45;
const HIGHLAND_GAIN: f32 = 1.666;
const HIGHLAND_MAX: f32 = 0.999;

/// Transform applied to a cell's white noise before smoothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapingCurve {
    /// `sqrt(v)`: pushes values up, broad landmasses.
    Convex,
    /// `v²`: pulls values down, sparse islands.
    Concave,
    Linear,
}

impl ShapingCurve {
    /// Pick a curve from the cell seed. The remainder truncates toward zero,
    /// so a negative seed falls to `Linear` unless it is a multiple of 7.
    pub fn select(cell_seed: i32) -> Self {
        match cell_seed % CURVE_CHOICES {
            0..=4 => ShapingCurve::Convex,
            5 => ShapingCurve::Concave,
            _ => ShapingCurve::Linear,
        }
    }

    #[inline]
    pub fn apply(self, v: f32) -> f32 {
        match self {
            ShapingCurve::Convex => v.sqrt(),
            ShapingCurve::Concave => v * v,
            ShapingCurve::Linear => v,
        }
    }
}

/// Blend one tile-noise value `v` against the continental `base`.
///
/// Low ground damps the noise toward zero; high ground is remapped into a
/// compressed plateau range.
#[inline]
pub fn filter(base: f32, v: f32) -> f32 {
    if base < LOWLAND_CUTOFF {
        base * v
    } else {
        (HIGHLAND_GAIN * (base - v / 4.0)).clamp(0.0, HIGHLAND_MAX)
    }
}

/// Coarse height field covering one germ's bounding region.
///
/// Points outside the germ's cell hold negative heights.
#[derive(Clone, Debug)]
pub struct ContinentalCell {
    pub germ: usize,
    /// Tile coordinate of `heights[(0, 0)]`.
    pub origin: Point2,
    pub seed: i32,
    pub curve: ShapingCurve,
    pub heights: Grid<f32>,
}

impl ContinentalCell {
    /// `None` for a germ without a bounding region (border germs).
    pub fn build(germ: &Germ, points: &[CellPoint], world_seed: i32) -> Option<Self> {
        let region = germ.region?;
        let side = region.width().max(region.height());
        let mut mask = Grid::new(side, side, -1.0f32);
        for p in points {
            let local = p.position - region.min;
            mask[(local.x as usize, local.y as usize)] = p.distance as f32;
        }

        let seed = spatial_hash(germ.position.x, germ.position.y, world_seed);
        let curve = ShapingCurve::select(seed);
        let mut noise = white_noise(side, hash_seed_u64(seed));
        noise.walk(|_, _, v| curve.apply(*v));
        let mut heights = perlin(&noise, CONTINENTAL_OCTAVES);
        heights.walk(|x, y, h| h * mask[(x, y)]);

        Some(Self {
            germ: germ.index,
            origin: region.min,
            seed,
            curve,
            heights,
        })
    }

    /// Height at a tile coordinate, `None` outside the grid.
    pub fn height_at(&self, tile: Point2) -> Option<f32> {
        let local = tile - self.origin;
        if local.x < 0 || local.y < 0 {
            return None;
        }
        self.heights.get(local.x as usize, local.y as usize).copied()
    }
}
