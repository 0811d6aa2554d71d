//! Random generator helpers.
//!
//! Every stochastic component owns its own `StdRng`. Passing a seed makes the
//! component reproducible; passing `None` seeds it from OS entropy.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Create a generator from an explicit seed, or from entropy when `None`.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Random permutation of `0..n`.
pub fn permutation(n: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = seeded_rng(Some(42));
        let mut rng2 = seeded_rng(Some(42));

        for _ in 0..100 {
            assert_eq!(rng1.gen::<u32>(), rng2.gen::<u32>());
        }
    }

    #[test]
    fn test_permutation_contains_all_indices() {
        let mut rng = seeded_rng(Some(33333));
        let perm = permutation(10, &mut rng);

        let mut sorted = perm.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());

        // Very unlikely to be in same order
        assert_ne!(perm, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_permutation_empty_and_single() {
        let mut rng = seeded_rng(Some(44444));
        assert!(permutation(0, &mut rng).is_empty());
        assert_eq!(permutation(1, &mut rng), vec![0]);
    }
}
