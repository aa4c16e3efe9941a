use rand::{rngs::SmallRng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use std::mem;

pub fn small_rng(seed: [u32; 4]) -> SmallRng {
    SmallRng::from_seed(unsafe { mem::transmute(seed) })
}

/// Uniform sample from the half-open range `[lo, hi)`. Empty or inverted
/// ranges degrade to `lo` instead of panicking, so a cell smaller than the
/// minimum room size still carves something.
pub fn sample_int_range(rng: &mut impl rand::Rng, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        return lo;
    }

    Uniform::from(lo..hi).sample(rng)
}

/// A uniform random orientation bit for axis selection.
pub fn sample_bool(rng: &mut impl rand::Rng) -> bool {
    sample_int_range(rng, 0, 2) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_same_stream() {
        let mut a = small_rng([1, 2, 3, 4]);
        let mut b = small_rng([1, 2, 3, 4]);
        for _ in 0..32 {
            assert_eq!(
                sample_int_range(&mut a, 0, 1000),
                sample_int_range(&mut b, 0, 1000)
            );
        }
    }

    #[test]
    fn samples_stay_in_half_open_range() {
        let mut rng = small_rng([5, 6, 7, 8]);
        for _ in 0..256 {
            let v = sample_int_range(&mut rng, 3, 17);
            assert!(v >= 3 && v < 17);
        }
    }

    #[test]
    fn empty_range_degrades_to_lower_bound() {
        let mut rng = small_rng([9, 9, 9, 9]);
        assert_eq!(sample_int_range(&mut rng, 5, 5), 5);
        assert_eq!(sample_int_range(&mut rng, 5, 2), 5);
    }
}
