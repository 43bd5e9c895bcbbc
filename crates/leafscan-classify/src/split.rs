//! Seeded train/test partitioning

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Indices of the two partitions of a split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Size of the held-out partition: `ceil(test_ratio * n)`.
pub fn test_count(n: usize, test_ratio: f64) -> usize {
    (test_ratio * n as f64).ceil() as usize
}

/// Shuffle `0..n` with a seeded generator and cut it into test and train.
///
/// The first [`test_count`] indices of the permutation form the test
/// partition, the rest the training partition. The same `(n, ratio, seed)`
/// always yields the same split.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Split {
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let n_test = test_count(n, test_ratio).min(n);
    let train = order.split_off(n_test);
    Split { train, test: order }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        assert_eq!(test_count(100, 0.2), 20);
        assert_eq!(test_count(9, 0.2), 2);
        assert_eq!(test_count(1, 0.2), 1);
        assert_eq!(test_count(0, 0.2), 0);
    }

    #[test]
    fn test_partition_covers_all_indices() {
        let split = train_test_split(37, 0.2, 42);
        assert_eq!(split.test.len(), 8);
        assert_eq!(split.train.len(), 29);
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_reproducible() {
        assert_eq!(train_test_split(50, 0.2, 42), train_test_split(50, 0.2, 42));
        assert_ne!(train_test_split(50, 0.2, 42), train_test_split(50, 0.2, 7));
    }
}
