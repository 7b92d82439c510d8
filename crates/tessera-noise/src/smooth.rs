//! Octave smoothing of white noise ("Perlin" value noise).
//!
//! Octave `k` samples the source every `2^k` cells and bilinearly
//! interpolates between samples. Sample indices wrap at the grid edge, which
//! only matters for the outer ring of a stitched grid.

use crate::grid::Grid;

const PERSISTENCE: f32 = 0.5;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
fn sample_axis(i: usize, period: usize, extent: usize) -> (usize, usize, f32) {
    let i0 = (i / period) * period;
    let i1 = (i0 + period) % extent;
    (i0, i1, (i - i0) as f32 / period as f32)
}

/// One octave: the source resampled at period `2^octave`.
pub fn smooth_octave(base: &Grid<f32>, octave: u32) -> Grid<f32> {
    let (w, h) = (base.width(), base.height());
    let period = 1usize << octave;
    Grid::from_fn(w, h, |x, y| {
        let (x0, x1, tx) = sample_axis(x, period, w);
        let (y0, y1, ty) = sample_axis(y, period, h);
        let top = lerp(base[(x0, y0)], base[(x1, y0)], tx);
        let bottom = lerp(base[(x0, y1)], base[(x1, y1)], tx);
        lerp(top, bottom, ty)
    })
}

/// Sum of `octaves` smoothed layers, coarsest weighted heaviest, normalised
/// back into the source range.
pub fn perlin(base: &Grid<f32>, octaves: u32) -> Grid<f32> {
    if octaves == 0 {
        return base.clone();
    }
    let mut out = Grid::new(base.width(), base.height(), 0.0f32);
    let mut amplitude = 1.0f32;
    let mut total = 0.0f32;
    for octave in (0..octaves).rev() {
        amplitude *= PERSISTENCE;
        total += amplitude;
        let layer = smooth_octave(base, octave);
        out.walk(|x, y, acc| acc + layer[(x, y)] * amplitude);
    }
    out.walk(|_, _, acc| acc / total);
    out
}
