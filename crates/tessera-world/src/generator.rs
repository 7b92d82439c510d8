use std::sync::Arc;

use tessera_cache::{SpatialCache, SpatialCacheStats};
use tessera_geom::Point2;
use tessera_noise::{Grid, NoiseHooks, NoiseSynthesizer, SAFE_COORD_LIMIT, spatial_hash};

use crate::cluster::{Cluster, ClusterLayout, ClusterStore};
use crate::config::{ConfigError, WorldGenParams};
use crate::continental::filter;
use crate::error::{ConstructionError, WorldError};
use crate::metrics::Metrics;
use crate::palette::{Palette, PaletteStop};
use crate::physical::surface_grid;
use crate::tile::Tile;

/// A germ as seen by decoration collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GermSite {
    pub index: usize,
    /// Tile coordinate.
    pub position: Point2,
    pub interior: bool,
    pub seed: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorCacheStats {
    pub tiles: SpatialCacheStats,
    pub clusters: SpatialCacheStats,
    pub blocks: SpatialCacheStats,
}

/// Applies the continental filter to every white-noise block.
///
/// The base height comes from the cluster owning the block itself, so a
/// block never depends on which tile asked for it.
struct ContinentalHooks<'a> {
    clusters: &'a mut ClusterStore,
}

impl NoiseHooks for ContinentalHooks<'_> {
    type Error = WorldError;

    fn block(&mut self, bx: i32, by: i32, grid: &mut Grid<f32>) -> Result<(), WorldError> {
        let cluster = self.clusters.at_tile(bx, by)?;
        let base = cluster
            .base_height(bx, by)
            .ok_or(ConstructionError::UncoveredTile {
                cluster_x: cluster.x,
                cluster_y: cluster.y,
                x: bx,
                y: by,
            })?;
        grid.walk(|_, _, v| filter(base, *v));
        Ok(())
    }
}

/// Turns tile coordinates into finished tiles for one seed and configuration.
///
/// Owns every cache it uses; one instance per worker thread.
#[derive(Debug)]
pub struct WorldGenerator {
    params: WorldGenParams,
    metrics: Metrics,
    synth: NoiseSynthesizer,
    clusters: ClusterStore,
    tiles: SpatialCache<Tile>,
}

impl WorldGenerator {
    pub fn new(params: WorldGenParams) -> Result<Self, WorldError> {
        params.validate()?;
        let metrics = params.metrics();
        let synth = NoiseSynthesizer::new(params.noise_settings())?;
        let mut clusters = ClusterStore::new(
            ClusterLayout::from_params(&params),
            metrics,
            params.cluster_cache,
        );
        // Every cluster shares the lattice shape, so the origin one stands for all.
        clusters
            .get(0, 0)
            .map_err(|e| ConfigError::Invalid {
                field: "voronoi.neighbors",
                reason: e.to_string(),
            })?;
        let tiles = SpatialCache::new(params.tile_cache);
        log::info!(
            "world generator: seed {} tile {} cell {} cluster {} k {}",
            params.seed,
            params.tile_size,
            params.cell_size,
            params.cluster_size,
            params.neighbors
        );
        Ok(Self {
            params,
            metrics,
            synth,
            clusters,
            tiles,
        })
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.params.seed
    }

    #[inline]
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn compute_tile(&mut self, x: i64, y: i64) -> Result<Arc<Tile>, WorldError> {
        let (tx, ty) = check_domain(x, y)?;
        if let Some(tile) = self.tiles.load(tx, ty) {
            return Ok(tile);
        }
        let mut hooks = ContinentalHooks {
            clusters: &mut self.clusters,
        };
        let heights = self.synth.generate(x, y, &mut hooks)?;
        let physical = self.params.physical_grid_size as usize;
        let tile = Tile {
            x: tx,
            y: ty,
            size: self.params.tile_size as usize,
            physical_grid_size: physical,
            seed: spatial_hash(tx, ty, self.params.seed),
            colors: self.params.palette.colorize(&heights),
            surface: surface_grid(&heights, physical, &self.params.thresholds),
            heights,
        };
        log::debug!("tile ({tx}, {ty}) generated");
        Ok(self.tiles.store(tx, ty, tile))
    }

    /// Replace the colour ramp. Cached tiles carry old colours, so they are dropped.
    pub fn set_palette(&mut self, stops: &[PaletteStop]) -> Result<(), WorldError> {
        self.params.palette = Palette::from_stops(stops)?;
        self.tiles.clear();
        Ok(())
    }

    pub fn set_tile_cache_capacity(&mut self, capacity: usize) {
        self.params.tile_cache = capacity;
        self.tiles.set_capacity(capacity);
    }

    pub fn cluster_at_tile(&mut self, x: i64, y: i64) -> Result<Arc<Cluster>, WorldError> {
        let (tx, ty) = check_domain(x, y)?;
        Ok(self.clusters.at_tile(tx, ty)?)
    }

    /// Every germ of cluster `(cx, cy)`, border helpers included.
    pub fn germ_sites(&mut self, cx: i32, cy: i32) -> Result<Vec<GermSite>, WorldError> {
        let span = self.metrics.cluster_span();
        check_domain(i64::from(cx) * span, i64::from(cy) * span)?;
        let cluster = self.clusters.get(cx, cy)?;
        let seed = self.params.seed;
        Ok(cluster
            .diagram()
            .germs()
            .iter()
            .map(|g| GermSite {
                index: g.index,
                position: g.position,
                interior: g.interior,
                seed: spatial_hash(g.position.x, g.position.y, seed),
            })
            .collect())
    }

    pub fn cache_stats(&self) -> GeneratorCacheStats {
        GeneratorCacheStats {
            tiles: self.tiles.stats(),
            clusters: self.clusters.stats(),
            blocks: self.synth.block_cache_stats(),
        }
    }
}

fn check_domain(x: i64, y: i64) -> Result<(i32, i32), WorldError> {
    if x.abs() >= SAFE_COORD_LIMIT || y.abs() >= SAFE_COORD_LIMIT {
        return Err(WorldError::OutOfDomain {
            x,
            y,
            limit: SAFE_COORD_LIMIT,
        });
    }
    Ok((x as i32, y as i32))
}
