//! Seeded integer mixing; the randomness root of every generator stage.

const X_SALT: u32 = 0xCAFE_BABE;
const Y_SALT: u32 = 0xFACE_B00C;
const X_MIX: u32 = 0xDEAD_BEEF;
const Y_MIX: u32 = 0x8BAD_F00D;

/// Left shift folded with an arithmetic right shift. Not a true rotation:
/// the sign bit smears into the low bits, and the output depends on that.
#[inline]
fn fold(v: i32, bits: u32) -> i32 {
    v.wrapping_shl(bits) ^ (v >> (32 - bits))
}

/// Hash a lattice coordinate under `seed`.
///
/// Pure 32-bit wrapping arithmetic, so the value is identical on every
/// platform and in every process.
#[inline]
pub fn spatial_hash(x: i32, y: i32, seed: i32) -> i32 {
    let (mut x, mut y) = (x, y);
    for _ in 0..3 {
        x = fold((x ^ X_SALT as i32).wrapping_add(y ^ Y_SALT as i32), 23);
        y = fold((x ^ X_MIX as i32).wrapping_add(y ^ Y_MIX as i32), 5);
    }
    x ^ y ^ seed
}

/// RNG seed derived from a hash value.
#[inline]
pub fn hash_seed_u64(hash: i32) -> u64 {
    u64::from(hash as u32)
}

/// Two signed jitters in `[-1, 1)` taken from the low bytes of a hash.
#[inline]
pub fn jitter_unit(hash: i32) -> (f64, f64) {
    let hx = f64::from((hash & 255) - 128) / 128.0;
    let hy = f64::from(((hash >> 8) & 255) - 128) / 128.0;
    (hx, hy)
}
