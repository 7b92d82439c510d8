use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use tessera_noise::NoiseSettings;

use crate::cluster::ClusterLayout;
use crate::metrics::Metrics;
use crate::palette::{Palette, PaletteStop, default_stops};
use crate::physical::SurfaceThresholds;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse worldgen config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

const MAX_CELL_SIZE: u32 = 4096;
const MAX_CLUSTER_SIZE: u32 = 256;
const MAX_VIEW_EXTENT: u32 = 1 << 16;
/// Tiles per cluster side; a cluster keeps one record per tile of its square.
const MAX_CLUSTER_SPAN: u32 = 1024;
/// Fewer bisectors leave gaps between the cells of a jittered lattice.
const MIN_NEIGHBORS: usize = 6;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub seed: i32,
    #[serde(default)]
    pub tile: TileSection,
    #[serde(default)]
    pub voronoi: VoronoiSection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub physical: PhysicalSection,
    #[serde(default = "default_stops")]
    pub palette: Vec<PaletteStop>,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tile: TileSection::default(),
            voronoi: VoronoiSection::default(),
            cache: CacheSection::default(),
            physical: PhysicalSection::default(),
            palette: default_stops(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TileSection {
    #[serde(default = "default_tile_size")]
    pub size: u32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
}
fn default_tile_size() -> u32 {
    128
}
fn default_octaves() -> u32 {
    8
}
impl Default for TileSection {
    fn default() -> Self {
        Self {
            size: default_tile_size(),
            octaves: default_octaves(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct VoronoiSection {
    /// Tiles per germ lattice step.
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    /// Germ lattice steps per cluster side.
    #[serde(default = "default_cluster_size")]
    pub cluster_size: u32,
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    /// Pixels of look-around the cluster padding must cover.
    #[serde(default = "default_view_extent")]
    pub view_extent: u32,
}
fn default_cell_size() -> u32 {
    25
}
fn default_cluster_size() -> u32 {
    4
}
fn default_neighbors() -> usize {
    6
}
fn default_view_extent() -> u32 {
    1024
}
impl Default for VoronoiSection {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            cluster_size: default_cluster_size(),
            neighbors: default_neighbors(),
            view_extent: default_view_extent(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_tile_cache")]
    pub tiles: usize,
    #[serde(default = "default_cluster_cache")]
    pub clusters: usize,
    #[serde(default = "default_block_cache")]
    pub blocks: usize,
}
fn default_tile_cache() -> usize {
    256
}
fn default_cluster_cache() -> usize {
    4
}
fn default_block_cache() -> usize {
    64
}
impl Default for CacheSection {
    fn default() -> Self {
        Self {
            tiles: default_tile_cache(),
            clusters: default_cluster_cache(),
            blocks: default_block_cache(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PhysicalSection {
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    #[serde(default = "default_water")]
    pub water: f32,
    #[serde(default = "default_shore")]
    pub shore: f32,
    #[serde(default = "default_coast")]
    pub coast: f32,
    #[serde(default = "default_plain")]
    pub plain: f32,
    #[serde(default = "default_forest")]
    pub forest: f32,
}
fn default_grid_size() -> u32 {
    16
}
fn default_water() -> f32 {
    SurfaceThresholds::default().water
}
fn default_shore() -> f32 {
    SurfaceThresholds::default().shore
}
fn default_coast() -> f32 {
    SurfaceThresholds::default().coast
}
fn default_plain() -> f32 {
    SurfaceThresholds::default().plain
}
fn default_forest() -> f32 {
    SurfaceThresholds::default().forest
}
impl Default for PhysicalSection {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            water: default_water(),
            shore: default_shore(),
            coast: default_coast(),
            plain: default_plain(),
            forest: default_forest(),
        }
    }
}

/// Validated snapshot handed to [`crate::WorldGenerator::new`].
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub seed: i32,
    pub tile_size: u32,
    pub octaves: u32,
    pub cell_size: u32,
    pub cluster_size: u32,
    pub neighbors: usize,
    pub view_extent: u32,
    pub tile_cache: usize,
    pub cluster_cache: usize,
    pub block_cache: usize,
    pub physical_grid_size: u32,
    pub thresholds: SurfaceThresholds,
    pub palette: Palette,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        let cfg = WorldGenConfig::default();
        Self {
            seed: cfg.seed,
            tile_size: cfg.tile.size,
            octaves: cfg.tile.octaves,
            cell_size: cfg.voronoi.cell_size,
            cluster_size: cfg.voronoi.cluster_size,
            neighbors: cfg.voronoi.neighbors,
            view_extent: cfg.voronoi.view_extent,
            tile_cache: cfg.cache.tiles,
            cluster_cache: cfg.cache.clusters,
            block_cache: cfg.cache.blocks,
            physical_grid_size: cfg.physical.grid_size,
            thresholds: SurfaceThresholds::default(),
            palette: Palette::default(),
        }
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Result<Self, ConfigError> {
        let params = Self {
            seed: cfg.seed,
            tile_size: cfg.tile.size,
            octaves: cfg.tile.octaves,
            cell_size: cfg.voronoi.cell_size,
            cluster_size: cfg.voronoi.cluster_size,
            neighbors: cfg.voronoi.neighbors,
            view_extent: cfg.voronoi.view_extent,
            tile_cache: cfg.cache.tiles,
            cluster_cache: cfg.cache.clusters,
            block_cache: cfg.cache.blocks,
            physical_grid_size: cfg.physical.grid_size,
            thresholds: SurfaceThresholds {
                water: cfg.physical.water,
                shore: cfg.physical.shore,
                coast: cfg.physical.coast,
                plain: cfg.physical.plain,
                forest: cfg.physical.forest,
            },
            palette: Palette::from_stops(&cfg.palette)?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.noise_settings()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                field: "tile",
                reason: e.to_string(),
            })?;
        check_range("voronoi.cell_size", self.cell_size, 1, MAX_CELL_SIZE)?;
        check_range("voronoi.cluster_size", self.cluster_size, 1, MAX_CLUSTER_SIZE)?;
        check_range("voronoi.view_extent", self.view_extent, 0, MAX_VIEW_EXTENT)?;
        let span = self.cell_size * self.cluster_size;
        if span > MAX_CLUSTER_SPAN {
            return Err(ConfigError::Invalid {
                field: "voronoi.cluster_size",
                reason: format!(
                    "clusters would span {span} tiles per side, at most {MAX_CLUSTER_SPAN} allowed"
                ),
            });
        }
        let lattice = self.cluster_size + self.border_germs();
        if lattice > MAX_CLUSTER_SIZE {
            return Err(ConfigError::Invalid {
                field: "voronoi.view_extent",
                reason: format!(
                    "border germs widen the lattice to {lattice} steps, at most {MAX_CLUSTER_SIZE} allowed"
                ),
            });
        }
        let max_neighbors = ClusterLayout::from_params(self).min_germ_count() - 1;
        if !(MIN_NEIGHBORS..=max_neighbors).contains(&self.neighbors) {
            return Err(ConfigError::Invalid {
                field: "voronoi.neighbors",
                reason: format!(
                    "{} is outside {MIN_NEIGHBORS}..={max_neighbors} for this lattice",
                    self.neighbors
                ),
            });
        }
        if self.physical_grid_size == 0 || self.tile_size % self.physical_grid_size != 0 {
            return Err(ConfigError::Invalid {
                field: "physical.grid_size",
                reason: format!(
                    "{} must be positive and divide the tile size {}",
                    self.physical_grid_size, self.tile_size
                ),
            });
        }
        self.thresholds.validate()?;
        if self.palette.is_empty() {
            return Err(ConfigError::Missing("palette"));
        }
        Ok(())
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::new(self.tile_size, self.cell_size, self.cluster_size)
    }

    pub fn noise_settings(&self) -> NoiseSettings {
        NoiseSettings {
            size: self.tile_size as usize,
            octaves: self.octaves,
            seed: self.seed,
            block_cache: self.block_cache,
        }
    }

    /// Extra germ rows/columns past the cluster so cells near its far edge
    /// are fully resolved: `floor(floor(view_extent / tile_size) / cell_size)`.
    pub fn border_germs(&self) -> u32 {
        (self.view_extent / self.tile_size) / self.cell_size
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is outside {min}..={max}"),
        });
    }
    Ok(())
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = WorldGenConfig::from_toml_str(&s)?;
    WorldGenParams::from_config(&cfg)
}
