/// Map a string seed to a stable value in `[0, 1)`.
///
/// Rolling `h * 31 + c` over UTF-16 code units, wrapped to a signed 32-bit integer, then
/// `|h| % 10000 / 10000`. This is a display-stability primitive: identical seeds give
/// bit-identical output, nothing more is promised. The empty seed hashes to 0.
pub fn seeded_random(seed: &str) -> f64 {
    let mut h: i32 = 0;
    for unit in seed.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    f64::from(h.unsigned_abs() % 10_000) / 10_000.0
}

/// Deterministic pick of an index in `0..count` for `seed`.
///
/// Returns `None` for `count == 0`.
pub fn seeded_index(seed: &str, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let idx = (seeded_random(seed) * count as f64).floor() as usize;
    Some(idx.min(count - 1))
}
