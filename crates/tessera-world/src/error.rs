use thiserror::Error;

use tessera_noise::NoiseError;

use crate::config::ConfigError;

/// Voronoi partitioning could not resolve a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("germ {germ} has {available} other germs, {required} neighbours required")]
    InsufficientNeighbors {
        germ: usize,
        available: usize,
        required: usize,
    },
    #[error("tile ({x}, {y}) of cluster ({cluster_x}, {cluster_y}) is not claimed by any germ")]
    UncoveredTile {
        cluster_x: i32,
        cluster_y: i32,
        x: i32,
        y: i32,
    },
}

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("tile ({x}, {y}) is outside the generated domain (|c| < {limit})")]
    OutOfDomain { x: i64, y: i64, limit: i64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

impl From<NoiseError> for WorldError {
    fn from(err: NoiseError) -> Self {
        match err {
            NoiseError::OutOfDomain { x, y, limit } => WorldError::OutOfDomain { x, y, limit },
            NoiseError::InvalidSettings(reason) => WorldError::Config(ConfigError::Invalid {
                field: "tile",
                reason,
            }),
        }
    }
}
