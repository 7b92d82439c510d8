//! Conversions between the four resolution tiers.
//!
//! Coarse to fine: cluster → germ lattice → tile → pixel. Coarsening floors
//! (so `-1` tile belongs to cluster `-1`, not `0`); refining is exact.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metrics {
    /// Pixels per tile side.
    pub tile_size: u32,
    /// Tiles per germ lattice step.
    pub cell_size: u32,
    /// Germ lattice steps per cluster side.
    pub cluster_size: u32,
}

impl Metrics {
    pub fn new(tile_size: u32, cell_size: u32, cluster_size: u32) -> Self {
        Self {
            tile_size,
            cell_size,
            cluster_size,
        }
    }

    /// Tiles per cluster side.
    #[inline]
    pub fn cluster_span(&self) -> i64 {
        i64::from(self.cluster_size) * i64::from(self.cell_size)
    }

    #[inline]
    pub fn pixel_to_tile(&self, p: i64) -> i64 {
        p.div_euclid(i64::from(self.tile_size))
    }

    #[inline]
    pub fn tile_to_germ(&self, t: i64) -> i64 {
        t.div_euclid(i64::from(self.cell_size))
    }

    #[inline]
    pub fn germ_to_cluster(&self, g: i64) -> i64 {
        g.div_euclid(i64::from(self.cluster_size))
    }

    #[inline]
    pub fn tile_to_cluster(&self, t: i64) -> i64 {
        t.div_euclid(self.cluster_span())
    }

    #[inline]
    pub fn tile_to_pixel(&self, t: i64) -> i64 {
        t * i64::from(self.tile_size)
    }

    #[inline]
    pub fn germ_to_tile(&self, g: i64) -> i64 {
        g * i64::from(self.cell_size)
    }

    #[inline]
    pub fn cluster_to_germ(&self, c: i64) -> i64 {
        c * i64::from(self.cluster_size)
    }

    #[inline]
    pub fn cluster_to_tile(&self, c: i64) -> i64 {
        c * self.cluster_span()
    }
}
