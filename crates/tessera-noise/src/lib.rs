//! Deterministic hashing, white noise and seam-free octave smoothing.
#![forbid(unsafe_code)]

mod error;
pub mod grid;
pub mod hash;
pub mod smooth;
pub mod synth;
pub mod white;

pub use error::NoiseError;
pub use grid::Grid;
pub use hash::{hash_seed_u64, jitter_unit, spatial_hash};
pub use smooth::{perlin, smooth_octave};
pub use synth::{
    MAX_TILE_SIZE, NoHooks, NoiseHooks, NoiseSettings, NoiseSynthesizer, SAFE_COORD_LIMIT,
};
pub use white::white_noise;
