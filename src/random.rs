//! Seeded random sampling with rounding-aware range mapping.
//!
//! One `RandomSource` lives for exactly one render pass. The same seed
//! string and the same call sequence always reproduce the same values;
//! this is the determinism contract everything downstream leans on.

use glam::{DVec2, dvec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How a sampled value gets rounded before it is returned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceil,
    Round,
}

/// Seeded PRNG scoped to one render pass
pub struct RandomSource {
    rng: StdRng,
}

/// FNV-1a over the seed string, stable across platforms
fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in s.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// SplitMix64-style mixing, cheap and stable
fn mix(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// A value of exactly zero passes through unrounded; range-mapping callers
/// depend on this, so it is preserved rather than tidied up.
fn apply_rounding(value: f64, rounding: Option<Rounding>) -> f64 {
    if value == 0.0 {
        return value;
    }
    match rounding {
        None => value,
        Some(Rounding::Floor) => value.floor(),
        Some(Rounding::Ceil) => value.ceil(),
        Some(Rounding::Round) => value.round(),
    }
}

impl RandomSource {
    pub fn new(seed: &str) -> Self {
        RandomSource {
            rng: StdRng::seed_from_u64(mix(fnv1a(seed))),
        }
    }

    fn raw(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Raw sample in `[0, 1)`, optionally rounded
    pub fn next(&mut self, rounding: Option<Rounding>) -> f64 {
        let value = self.raw();
        apply_rounding(value, rounding)
    }

    /// Sample mapped linearly into `[min, max]`.
    ///
    /// A degenerate range (`min == max`) returns that constant. Passing
    /// `min > max` is the caller's responsibility; the mapping is applied
    /// as-is without defending against it.
    pub fn between(&mut self, min: f64, max: f64, rounding: Option<Rounding>) -> f64 {
        let value = min + self.raw() * (max - min);
        apply_rounding(value, rounding)
    }

    /// Sample in `[0, max]`
    pub fn upto(&mut self, max: f64, rounding: Option<Rounding>) -> f64 {
        self.between(0.0, max, rounding)
    }

    /// Independent-axis point sample; x is drawn before y
    pub fn point_between(&mut self, min: DVec2, max: DVec2, rounding: Option<Rounding>) -> DVec2 {
        let x = self.between(min.x, max.x, rounding);
        let y = self.between(min.y, max.y, rounding);
        dvec2(x, y)
    }

    /// Independent-axis point sample in `[0, w] x [0, h]`
    pub fn point_upto(&mut self, max_width: f64, max_height: f64, rounding: Option<Rounding>) -> DVec2 {
        let x = self.upto(max_width, rounding);
        let y = self.upto(max_height, rounding);
        dvec2(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_seeds_reproduce_the_sequence() {
        let mut a = RandomSource::new("test-seed");
        let mut b = RandomSource::new("test-seed");
        let first: Vec<f64> = (0..3).map(|_| a.between(0.0, 100.0, None)).collect();
        let second: Vec<f64> = (0..3).map(|_| b.between(0.0, 100.0, None)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RandomSource::new("seed-a");
        let mut b = RandomSource::new("seed-b");
        let first: Vec<f64> = (0..8).map(|_| a.next(None)).collect();
        let second: Vec<f64> = (0..8).map(|_| b.next(None)).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn next_stays_in_unit_interval() {
        let mut r = RandomSource::new("unit");
        for _ in 0..1000 {
            let v = r.next(None);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn between_respects_bounds() {
        let mut r = RandomSource::new("bounds");
        for _ in 0..1000 {
            let v = r.between(5.0, 9.0, None);
            assert!((5.0..=9.0).contains(&v));
        }
    }

    #[test]
    fn degenerate_range_returns_constant() {
        let mut r = RandomSource::new("constant");
        for _ in 0..10 {
            assert_eq!(r.between(7.0, 7.0, None), 7.0);
        }
    }

    #[test]
    fn rounding_modes() {
        let mut r = RandomSource::new("rounding");
        for _ in 0..100 {
            let v = r.between(0.5, 9.5, Some(Rounding::Floor));
            assert_eq!(v, v.floor());
        }
        let mut r = RandomSource::new("rounding");
        for _ in 0..100 {
            let v = r.between(0.5, 9.5, Some(Rounding::Ceil));
            assert_eq!(v, v.ceil());
        }
    }

    #[test]
    fn zero_bypasses_rounding() {
        // an exact zero is returned untouched whatever the rounding mode
        assert_eq!(apply_rounding(0.0, Some(Rounding::Ceil)), 0.0);
        assert_eq!(apply_rounding(0.4, Some(Rounding::Ceil)), 1.0);
    }

    #[test]
    fn point_samples_draw_x_then_y() {
        let mut a = RandomSource::new("points");
        let p = a.point_upto(10.0, 20.0, None);

        let mut b = RandomSource::new("points");
        let x = b.upto(10.0, None);
        let y = b.upto(20.0, None);
        assert_eq!(p, dvec2(x, y));
    }
}
