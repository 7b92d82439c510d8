use rand::SeedableRng;
use rand::distributions::{Distribution, Standard};
use rand_chacha::ChaCha8Rng;

use crate::grid::Grid;

/// `size × size` uniform samples in `[0, 1)`, reproducible from `seed`.
pub fn white_noise(size: usize, seed: u64) -> Grid<f32> {
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let data: Vec<f32> = Standard.sample_iter(rng).take(size * size).collect();
    Grid::from_fn(size, size, |x, y| data[y * size + x])
}
