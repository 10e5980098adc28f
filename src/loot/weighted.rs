//! Weighted selection and range rolls shared by every roller

use rand::Rng;

/// Uniform sample in `[0, 1)`
pub fn next01(rng: &mut impl Rng) -> f32 {
    rng.gen::<f32>()
}

/// Pick one entry with probability proportional to its weight.
///
/// Non-positive (and NaN) weights never win. Returns `None` when nothing has
/// positive weight.
pub fn roll_weighted<'a, T>(
    entries: &'a [T],
    weight: impl Fn(&T) -> f32,
    rng: &mut impl Rng,
) -> Option<&'a T> {
    let total: f32 = entries.iter().map(|e| weight(e).max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let mut r = next01(rng) * total;
    let mut last = None;
    for entry in entries {
        let w = weight(entry).max(0.0);
        if w <= 0.0 {
            continue;
        }
        r -= w;
        if r <= 0.0 {
            return Some(entry);
        }
        last = Some(entry);
    }

    // Float drift can leave a sliver of r; the last candidate owns it
    last
}

/// Integer-weight pick: `roll in [0, total)`, first cumulative weight above it wins
pub fn roll_weighted_int<'a, T>(
    entries: &'a [T],
    weight: impl Fn(&T) -> i32,
    rng: &mut impl Rng,
) -> Option<&'a T> {
    let total: i64 = entries.iter().map(|e| weight(e).max(0) as i64).sum();
    if total <= 0 {
        return None;
    }

    let roll = rng.gen_range(0..total);
    let mut acc = 0i64;
    for entry in entries {
        let w = weight(entry).max(0) as i64;
        if w == 0 {
            continue;
        }
        acc += w;
        if roll < acc {
            return Some(entry);
        }
    }
    None
}

/// Linear interpolation between the smaller and larger bound
pub fn roll_range(a: f32, b: f32, rng: &mut impl Rng) -> f32 {
    let min = a.min(b);
    let max = a.max(b);
    min + (max - min) * next01(rng)
}

/// Inclusive integer range; returns `min` when `max <= min`
pub fn roll_int_range(min: u32, max: u32, rng: &mut impl Rng) -> u32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Random index into a collection of `count` items
pub fn pick_index(count: usize, rng: &mut impl Rng) -> usize {
    if count <= 1 {
        return 0;
    }
    rng.gen_range(0..count)
}

/// Bernoulli trial with the chance clamped to `[0, 1]`
pub fn chance(p: f32, rng: &mut impl Rng) -> bool {
    let p = p.clamp(0.0, 1.0);
    if p <= 0.0 {
        return false;
    }
    next01(rng) <= p
}
