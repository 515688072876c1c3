//! The counting engine (§4.3): `count(key, n)`, memoized, exact.
//!
//! Without memoization a recursive grammar like `P = 1 + Z ★ P` blows up
//! exponentially, since every product sum revisits the same `(key, k)`
//! pairs. The memo table lives on [`crate::Grammar`] behind a `RefCell`,
//! the same single-writer interior-mutability pattern the reference crate
//! uses for its own per-grammar scratch state.

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::cancel::CancellationToken;
use crate::combinadics::binomial;
use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::key::RuleId;
use crate::rule::Rule;

/// The (inclusive) range of split points `k` a product variant sums over,
/// or `None` if no split point is admissible at this `n` (§4.3: "if the
/// upper bound is less than the lower bound, the sum is 0").
fn split_range(n: usize, lower: u64, val_right: u64) -> Option<(u64, u64)> {
    let n = n as u64;
    if n < val_right {
        return None;
    }
    let upper = n - val_right;
    if lower > upper {
        return None;
    }
    Some((lower, upper))
}

impl<L, O> Grammar<L, O> {
    /// `count(key, n)`: the number of objects of class `key` at size `n`.
    pub fn count(&self, key: &str, n: usize) -> Result<BigUint, GrammarError> {
        self.count_cancellable(key, n, &CancellationToken::new())
    }

    /// `count`, but cooperatively cancellable via `token` (§5).
    pub fn count_cancellable(
        &self,
        key: &str,
        n: usize,
        token: &CancellationToken,
    ) -> Result<BigUint, GrammarError> {
        let id = self.rule_id(key)?;
        self.count_id(id, n, token)
    }

    pub(crate) fn count_id(
        &self,
        id: RuleId,
        n: usize,
        token: &CancellationToken,
    ) -> Result<BigUint, GrammarError> {
        if token.is_cancelled() {
            return Err(GrammarError::Cancelled);
        }
        if (n as u64) < self.val(id) {
            return Ok(BigUint::zero());
        }
        if let Some(cached) = self.memo.borrow().get(&(id, n)) {
            return Ok(cached.clone());
        }

        let rule = self.rule(id);
        let result = match rule {
            Rule::Atom(_) => {
                if n == 1 {
                    BigUint::from(1u32)
                } else {
                    BigUint::zero()
                }
            }
            Rule::Epsilon(_) => {
                if n == 0 {
                    BigUint::from(1u32)
                } else {
                    BigUint::zero()
                }
            }
            Rule::Union { left, right } => {
                let (left, right) = (*left, *right);
                self.count_id(left, n, token)? + self.count_id(right, n, token)?
            }
            Rule::OrdProduct { left, right, .. } => {
                let (left, right) = (*left, *right);
                self.sum_product(left, right, n, token, |_n, _k| BigUint::from(1u32))?
            }
            Rule::Product { left, right, .. } => {
                let (left, right) = (*left, *right);
                self.sum_product(left, right, n, token, |n, k| binomial(n as u64, k as u64))?
            }
            Rule::BoxProduct { left, right, .. } => {
                let (left, right) = (*left, *right);
                let val_left = self.val(left).max(1);
                self.sum_with_lower(left, right, n, val_left, token, |n, k| {
                    binomial(n as u64 - 1, k as u64 - 1)
                })?
            }
        };

        debug!("count({:?}, {n}) = {result}", self.key_of(id));
        self.memo.borrow_mut().insert((id, n), result.clone());
        Ok(result)
    }

    /// `Σ_{k=v(left)}^{n-v(right)} weight(n, k) · count(left, k) · count(right, n-k)`,
    /// used by `Product` and `OrdProduct`.
    fn sum_product(
        &self,
        left: RuleId,
        right: RuleId,
        n: usize,
        token: &CancellationToken,
        weight: impl Fn(usize, usize) -> BigUint,
    ) -> Result<BigUint, GrammarError> {
        let val_left = self.val(left);
        self.sum_with_lower(left, right, n, val_left, token, weight)
    }

    fn sum_with_lower(
        &self,
        left: RuleId,
        right: RuleId,
        n: usize,
        lower: u64,
        token: &CancellationToken,
        weight: impl Fn(usize, usize) -> BigUint,
    ) -> Result<BigUint, GrammarError> {
        let val_right = self.val(right);
        let Some((lo, hi)) = split_range(n, lower, val_right) else {
            return Ok(BigUint::zero());
        };
        let mut total = BigUint::zero();
        for k in lo..=hi {
            let k = k as usize;
            let left_count = self.count_id(left, k, token)?;
            if left_count.is_zero() {
                continue;
            }
            let right_count = self.count_id(right, n - k, token)?;
            if right_count.is_zero() {
                continue;
            }
            total += weight(n, k) * left_count * right_count;
        }
        Ok(total)
    }
}
