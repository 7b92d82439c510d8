use tessera_noise::Grid;

use crate::physical::SurfaceKind;

/// One finished tile. Immutable once produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    /// Pixels per side.
    pub size: usize,
    /// Pixels per side of one physical cell.
    pub physical_grid_size: usize,
    /// Secondary seed derived from the tile coordinate.
    pub seed: i32,
    /// Filtered noise heights; `[0, 1)` on land, negative below sea level.
    pub heights: Grid<f32>,
    /// Packed RGBA, see [`crate::palette::Rgb::pack`].
    pub colors: Grid<u32>,
    pub surface: Grid<SurfaceKind>,
}

impl Tile {
    /// Surface class of the physical cell containing pixel `(px, py)`.
    pub fn surface_at(&self, px: usize, py: usize) -> Option<SurfaceKind> {
        let cell = self.physical_grid_size;
        self.surface.get(px / cell, py / cell).copied()
    }

    /// Side of the physical grid in cells.
    #[inline]
    pub fn physical_side(&self) -> usize {
        self.surface.width()
    }
}
