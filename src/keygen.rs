//! Random key generation for the insert, lookup and mixed workloads.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Operation picked by a coin flip in the mixed workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixedOp {
    Read,
    Write,
}

/// One generator per process, shared by every workload of a run.
pub struct KeyGenerator {
    rng: StdRng,
    seed: u64,
}

impl KeyGenerator {
    /// Seed from OS entropy. Runs are not repeatable.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::rngs::OsRng.next_u64())
    }

    /// Seed explicitly for repeatable runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Insert key, uniform over `[0, 10n)`. The range is deliberately wider
    /// than `n` so random fills leave gaps and collide on some keys.
    ///
    /// `n` must be non-zero.
    pub fn fill_key(&mut self, n: usize) -> i64 {
        self.rng.gen_range(0..(n as i64) * 10)
    }

    /// Lookup key, uniform over `[0, n)`. `n` must be non-zero.
    pub fn lookup_key(&mut self, n: usize) -> i64 {
        self.rng.gen_range(0..n as i64)
    }

    /// Unbiased read/write choice.
    pub fn mixed_op(&mut self) -> MixedOp {
        if self.rng.gen_bool(0.5) {
            MixedOp::Write
        } else {
            MixedOp::Read
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_stay_in_range() {
        let mut keys = KeyGenerator::seeded(7);
        for _ in 0..10_000 {
            let k = keys.fill_key(50);
            assert!((0..500).contains(&k));
            let k = keys.lookup_key(50);
            assert!((0..50).contains(&k));
        }
    }

    #[test]
    fn fill_keys_reach_beyond_n() {
        let mut keys = KeyGenerator::seeded(11);
        let beyond = (0..1_000).filter(|_| keys.fill_key(100) >= 100).count();
        assert!(beyond > 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = KeyGenerator::seeded(42);
        let mut b = KeyGenerator::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.fill_key(1_000), b.fill_key(1_000));
            assert_eq!(a.mixed_op(), b.mixed_op());
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn coin_produces_both_sides() {
        let mut keys = KeyGenerator::seeded(3);
        let writes = (0..1_000)
            .filter(|_| keys.mixed_op() == MixedOp::Write)
            .count();
        assert!(writes > 300 && writes < 700, "writes = {writes}");
    }

    #[test]
    fn single_key_range() {
        let mut keys = KeyGenerator::from_entropy();
        assert_eq!(keys.lookup_key(1), 0);
        assert!(keys.fill_key(1) < 10);
    }
}
