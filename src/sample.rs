//! The sampler (§4.6): draw uniformly from `list(key, labels)` without
//! materialising it, by drawing a uniform rank and delegating to `unrank`.

use log::debug;
use num_bigint::{BigUint, RandBigInt};
use rand::Rng;

use crate::cancel::CancellationToken;
use crate::error::GrammarError;
use crate::grammar::Grammar;

impl<L: Clone + Ord, O: Clone> Grammar<L, O> {
    /// `sample(key, labels, rng)`: one object of class `key`, drawn
    /// uniformly at random, using caller-supplied randomness.
    ///
    /// Mirrors the reference crate's generic `Random` entry point: the RNG
    /// is threaded through as a type parameter rather than hard-coded, so a
    /// caller can supply a seeded RNG for reproducible sampling.
    pub fn sample<R: Rng>(&self, key: &str, labels: &[L], rng: &mut R) -> Result<O, GrammarError> {
        self.sample_cancellable(key, labels, rng, &CancellationToken::new())
    }

    /// `sample`, but cooperatively cancellable via `token` (§5).
    pub fn sample_cancellable<R: Rng>(
        &self,
        key: &str,
        labels: &[L],
        rng: &mut R,
        token: &CancellationToken,
    ) -> Result<O, GrammarError> {
        let id = self.rule_id(key)?;
        if !crate::grammar::distinct(labels) {
            return Err(GrammarError::DuplicateLabel);
        }
        let n = labels.len();
        let count = self.count_id(id, n, token)?;
        if count == BigUint::from(0u32) {
            return Err(GrammarError::EmptyClass);
        }
        let i = rng.gen_biguint_range(&BigUint::from(0u32), &count);
        debug!("sample({key:?}, n={n}) drew rank {i} of {count}");
        self.unrank_cancellable(key, labels, i, token)
    }

    /// Convenience over [`Grammar::sample`] for callers who don't care to
    /// supply their own RNG, seeding `rand`'s thread-local generator — the
    /// same convenience the reference crate offers beside its generic
    /// random-generation entry point.
    pub fn sample_with_thread_rng(&self, key: &str, labels: &[L]) -> Result<O, GrammarError> {
        self.sample(key, labels, &mut rand::thread_rng())
    }
}
