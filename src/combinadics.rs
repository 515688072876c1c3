//! Exact binomial coefficients and direct-by-index subset selection.
//!
//! The product variants' enumerators and unrankers both need, for a fixed
//! `k`, the `s`-th way to split `n` index positions into a size-`k` left
//! group and its complement, in the lexicographic order §4.4 defines. The
//! unranker must get there without materialising the other `C(n,k) - 1`
//! splittings, so this module exposes that selection directly rather than
//! filtering a generated list (which is what this engine's oldest Python
//! ancestor did, by generating every permutation of indices and discarding
//! the unsorted ones).

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// `n! / (k! (n-k)!)`, computed exactly.
///
/// Mirrors the multiplicative form `∏_{i=1}^{n-k} (k+i) / (n-k)!` that this
/// engine's source history used, rather than two independent factorials —
/// one ancestor revision of that form had a bug (`return n // k`, dropping
/// the product entirely); this is the corrected version.
pub fn binomial(n: u64, k: u64) -> BigUint {
    if k == 0 || k == n {
        BigUint::one()
    } else if k < n {
        let mut num = BigUint::one();
        let mut den = BigUint::one();
        for i in 1..=(n - k) {
            num *= BigUint::from(k + i);
            den *= BigUint::from(i);
        }
        num / den
    } else {
        BigUint::zero()
    }
}

/// Selects the `rank`-th (0-indexed) size-`k` subset of `pool`, in
/// lexicographic order of the chosen elements, without generating the
/// subsets that precede it.
///
/// `pool` must be sorted; the result is returned in the same relative
/// order. `rank` must be `< binomial(pool.len(), k)`.
pub fn nth_k_subset(pool: &[usize], k: usize, mut rank: BigUint) -> Vec<usize> {
    let m = pool.len();
    let mut chosen = Vec::with_capacity(k);
    let mut start = 0usize;
    for remaining_k in (1..=k).rev() {
        let mut c = start;
        loop {
            let after = (m - c - 1) as u64;
            let count = binomial(after, (remaining_k - 1) as u64);
            if rank < count {
                chosen.push(pool[c]);
                start = c + 1;
                break;
            }
            rank -= count;
            c += 1;
        }
    }
    chosen
}

/// The complement of `chosen` within `pool`, preserving `pool`'s order.
pub fn complement(pool: &[usize], chosen: &[usize]) -> Vec<usize> {
    pool.iter()
        .copied()
        .filter(|idx| !chosen.contains(idx))
        .collect()
}

/// Every size-`k` subset of `pool`, in the same lexicographic order
/// [`nth_k_subset`] walks. Used by the enumerator, which (unlike the
/// unranker) needs all of them, not just the `s`-th.
pub fn combinations(pool: &[usize], k: usize) -> Vec<Vec<usize>> {
    let total = binomial(pool.len() as u64, k as u64);
    let mut out = Vec::new();
    let mut rank = BigUint::zero();
    while rank < total {
        out.push(nth_k_subset(pool, k, rank.clone()));
        rank += BigUint::one();
    }
    out
}
