//! Deterministic infinite terrain: Voronoi continents, stitched tile noise
//! and the generator tying them together.
#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod continental;
mod error;
pub mod generator;
pub mod metrics;
pub mod palette;
pub mod physical;
pub mod tile;
pub mod voronoi;

pub use cluster::{Cluster, ClusterLayout, ClusterStore, TileCell};
pub use config::{ConfigError, WorldGenConfig, WorldGenParams, load_params_from_path};
pub use continental::{ContinentalCell, ShapingCurve};
pub use error::{ConstructionError, WorldError};
pub use generator::{GeneratorCacheStats, GermSite, WorldGenerator};
pub use metrics::Metrics;
pub use palette::{Palette, PaletteStop, TRANSPARENT};
pub use physical::{SurfaceKind, SurfaceThresholds};
pub use tile::Tile;
pub use voronoi::{Diagram, Germ, GermSpec, Neighbor};
