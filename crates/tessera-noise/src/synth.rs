//! Tile noise with 3×3 neighbour stitching.
//!
//! A tile is smoothed together with its eight neighbouring white-noise
//! blocks and only the centre is kept, so two tiles requested independently
//! agree on their shared border.

use std::sync::Arc;

use tessera_cache::{SpatialCache, SpatialCacheStats};

use crate::error::NoiseError;
use crate::grid::Grid;
use crate::hash::{hash_seed_u64, spatial_hash};
use crate::smooth::perlin;
use crate::white::white_noise;

/// Tile coordinates must satisfy `|c| < SAFE_COORD_LIMIT`.
pub const SAFE_COORD_LIMIT: i64 = 1 << 24;

const STITCH_BLOCKS: usize = 9;
const MAX_OCTAVES: u32 = 16;
/// Largest block side; the stitched canvas holds nine blocks.
pub const MAX_TILE_SIZE: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseSettings {
    /// Side of one block and of the generated tile.
    pub size: usize,
    pub octaves: u32,
    pub seed: i32,
    /// Capacity of the white-noise block cache.
    pub block_cache: usize,
}

impl NoiseSettings {
    pub fn validate(&self) -> Result<(), NoiseError> {
        if self.size == 0 || self.size > MAX_TILE_SIZE {
            return Err(NoiseError::InvalidSettings(format!(
                "size must be in 1..={MAX_TILE_SIZE}, got {}",
                self.size
            )));
        }
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(NoiseError::InvalidSettings(format!(
                "octaves must be in 1..={MAX_OCTAVES}, got {}",
                self.octaves
            )));
        }
        let period = 1usize << (self.octaves - 1);
        if self.size % period != 0 {
            return Err(NoiseError::InvalidSettings(format!(
                "size {} is not a multiple of the coarsest octave period {period}",
                self.size
            )));
        }
        if self.block_cache < STITCH_BLOCKS {
            return Err(NoiseError::InvalidSettings(format!(
                "block cache must hold at least {STITCH_BLOCKS} blocks, got {}",
                self.block_cache
            )));
        }
        Ok(())
    }
}

/// Post-processing points of the synthesizer.
///
/// `block` runs once per freshly generated white-noise block, before it is
/// cached; `tile` runs on every extracted centre. Blocks are cached with the
/// hook applied, so a synthesizer must always be driven by equivalent hooks.
pub trait NoiseHooks {
    type Error: From<NoiseError>;

    fn block(&mut self, bx: i32, by: i32, grid: &mut Grid<f32>) -> Result<(), Self::Error> {
        let _ = (bx, by, grid);
        Ok(())
    }

    fn tile(&mut self, x: i32, y: i32, grid: &mut Grid<f32>) -> Result<(), Self::Error> {
        let _ = (x, y, grid);
        Ok(())
    }
}

/// Plain smoothed noise.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl NoiseHooks for NoHooks {
    type Error = NoiseError;
}

#[derive(Debug)]
pub struct NoiseSynthesizer {
    settings: NoiseSettings,
    blocks: SpatialCache<Grid<f32>>,
}

impl NoiseSynthesizer {
    pub fn new(settings: NoiseSettings) -> Result<Self, NoiseError> {
        settings.validate()?;
        Ok(Self {
            settings,
            blocks: SpatialCache::new(settings.block_cache),
        })
    }

    #[inline]
    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Smoothed `size × size` noise for tile `(x, y)`.
    pub fn generate<H: NoiseHooks>(
        &mut self,
        x: i64,
        y: i64,
        hooks: &mut H,
    ) -> Result<Grid<f32>, H::Error> {
        let (tx, ty) = check_domain(x, y)?;
        let size = self.settings.size;
        let canvas = self.stitch(tx, ty, hooks)?;
        let mut centre = canvas.crop(size, size, size, size);
        hooks.tile(tx, ty, &mut centre)?;
        Ok(centre)
    }

    /// The whole smoothed `3·size × 3·size` canvas around tile `(x, y)`,
    /// before the tile hook.
    pub fn stitched<H: NoiseHooks>(
        &mut self,
        x: i64,
        y: i64,
        hooks: &mut H,
    ) -> Result<Grid<f32>, H::Error> {
        let (tx, ty) = check_domain(x, y)?;
        self.stitch(tx, ty, hooks)
    }

    pub fn block_cache_stats(&self) -> SpatialCacheStats {
        self.blocks.stats()
    }

    fn stitch<H: NoiseHooks>(
        &mut self,
        x: i32,
        y: i32,
        hooks: &mut H,
    ) -> Result<Grid<f32>, H::Error> {
        let size = self.settings.size;
        let mut canvas = Grid::new(size * 3, size * 3, 0.0f32);
        for row in 0..3usize {
            for col in 0..3usize {
                let bx = x + col as i32 - 1;
                let by = y + row as i32 - 1;
                let block = self.block(bx, by, hooks)?;
                canvas.blit(&block, col * size, row * size);
            }
        }
        Ok(perlin(&canvas, self.settings.octaves))
    }

    fn block<H: NoiseHooks>(
        &mut self,
        bx: i32,
        by: i32,
        hooks: &mut H,
    ) -> Result<Arc<Grid<f32>>, H::Error> {
        if let Some(block) = self.blocks.load(bx, by) {
            return Ok(block);
        }
        let seed = spatial_hash(bx, by, self.settings.seed);
        let mut grid = white_noise(self.settings.size, hash_seed_u64(seed));
        hooks.block(bx, by, &mut grid)?;
        log::trace!("noise block ({bx}, {by}) generated");
        Ok(self.blocks.store(bx, by, grid))
    }
}

fn check_domain(x: i64, y: i64) -> Result<(i32, i32), NoiseError> {
    if x.abs() >= SAFE_COORD_LIMIT || y.abs() >= SAFE_COORD_LIMIT {
        return Err(NoiseError::OutOfDomain {
            x,
            y,
            limit: SAFE_COORD_LIMIT,
        });
    }
    Ok((x as i32, y as i32))
}
