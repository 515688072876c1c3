//! The unranker (§4.5): `unrank(key, labels, i)`, the inverse of
//! `list`'s canonical order, computed directly via prefix sums and
//! combinadics rather than by walking and discarding predecessors.

use log::debug;
use num_bigint::BigUint;
use num_traits::One;

use crate::cancel::CancellationToken;
use crate::combinadics::{binomial, complement, nth_k_subset};
use crate::error::GrammarError;
use crate::grammar::{distinct, Grammar};
use crate::key::RuleId;
use crate::rule::{Combine, Rule};

/// Distinguishes the three product variants' split weight and splitter,
/// since everything else about prefix-sum unranking is shared between them.
enum ProductKind {
    Ord,
    Plain,
    Boxed,
}

impl ProductKind {
    fn weight(&self, n: usize, k: usize) -> BigUint {
        match self {
            ProductKind::Ord => BigUint::one(),
            ProductKind::Plain => binomial(n as u64, k as u64),
            ProductKind::Boxed => binomial(n as u64 - 1, (k - 1) as u64),
        }
    }
}

impl<L: Clone + Ord, O: Clone> Grammar<L, O> {
    /// `unrank(key, labels, i)`: the `i`-th object in canonical order,
    /// without enumerating its predecessors.
    pub fn unrank(&self, key: &str, labels: &[L], i: BigUint) -> Result<O, GrammarError> {
        self.unrank_cancellable(key, labels, i, &CancellationToken::new())
    }

    /// `unrank`, but cooperatively cancellable via `token` (§5).
    pub fn unrank_cancellable(
        &self,
        key: &str,
        labels: &[L],
        i: BigUint,
        token: &CancellationToken,
    ) -> Result<O, GrammarError> {
        let id = self.rule_id(key)?;
        if !distinct(labels) {
            return Err(GrammarError::DuplicateLabel);
        }
        let n = labels.len();
        let count = self.count_id(id, n, token)?;
        if i >= count {
            return Err(GrammarError::RankOutOfRange {
                key: key.to_string(),
                n,
                i,
                count,
            });
        }
        self.unrank_id(id, labels, i, token)
    }

    fn unrank_id(
        &self,
        id: RuleId,
        labels: &[L],
        i: BigUint,
        token: &CancellationToken,
    ) -> Result<O, GrammarError> {
        if token.is_cancelled() {
            return Err(GrammarError::Cancelled);
        }
        let n = labels.len();
        debug!("unrank({:?}, n={n}, i={i})", self.key_of(id));

        match self.rule(id) {
            Rule::Atom(build) => Ok(build(labels[0].clone())),
            Rule::Epsilon(obj) => Ok(obj.clone()),
            Rule::Union { left, right } => {
                let (left, right) = (*left, *right);
                let n_a = self.count_id(left, n, token)?;
                if i < n_a {
                    self.unrank_id(left, labels, i, token)
                } else {
                    self.unrank_id(right, labels, i - n_a, token)
                }
            }
            Rule::OrdProduct { left, right, combine } => {
                let (left, right, combine) = (*left, *right, combine.clone());
                self.unrank_product(left, right, combine, labels, i, token, ProductKind::Ord)
            }
            Rule::Product { left, right, combine } => {
                let (left, right, combine) = (*left, *right, combine.clone());
                self.unrank_product(left, right, combine, labels, i, token, ProductKind::Plain)
            }
            Rule::BoxProduct { left, right, combine } => {
                let (left, right, combine) = (*left, *right, combine.clone());
                self.unrank_product(left, right, combine, labels, i, token, ProductKind::Boxed)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn unrank_product(
        &self,
        left: RuleId,
        right: RuleId,
        combine: Combine<O>,
        labels: &[L],
        i: BigUint,
        token: &CancellationToken,
        kind: ProductKind,
    ) -> Result<O, GrammarError> {
        let n = labels.len();
        let val_right = self.val(right);
        let lower = match kind {
            ProductKind::Boxed => self.val(left).max(1),
            _ => self.val(left),
        };
        let upper = (n as u64)
            .checked_sub(val_right)
            .expect("caller verified i < count, so some split point exists");

        let mut remainder = i;
        for k in lower..=upper {
            let k = k as usize;
            let count_left = self.count_id(left, k, token)?;
            let count_right = self.count_id(right, n - k, token)?;
            let per_split = &count_left * &count_right;
            let s_k = kind.weight(n, k) * &per_split;
            if remainder < s_k {
                return self.unrank_split(
                    left, right, combine, labels, k, remainder, &count_left, &count_right, &kind,
                    token,
                );
            }
            remainder -= s_k;
        }
        unreachable!("caller verified i < count(left ⋄ right, n)");
    }

    #[allow(clippy::too_many_arguments)]
    fn unrank_split(
        &self,
        left: RuleId,
        right: RuleId,
        combine: Combine<O>,
        labels: &[L],
        k: usize,
        remainder: BigUint,
        count_left: &BigUint,
        count_right: &BigUint,
        kind: &ProductKind,
        token: &CancellationToken,
    ) -> Result<O, GrammarError> {
        let n = labels.len();
        // `remainder < weight * count_left * count_right` selected this k, so
        // `count_left` and `count_right` are both nonzero here.
        let per_split = count_left * count_right;
        let s = &remainder / &per_split;
        let t = &remainder % &per_split;
        let p = &t / count_right;
        let q = &t % count_right;

        let (l_labels, r_labels) = match kind {
            ProductKind::Ord => (labels[0..k].to_vec(), labels[k..n].to_vec()),
            ProductKind::Plain => {
                let pool: Vec<usize> = (0..n).collect();
                let chosen = nth_k_subset(&pool, k, s);
                let rest = complement(&pool, &chosen);
                (
                    chosen.iter().map(|&idx| labels[idx].clone()).collect(),
                    rest.iter().map(|&idx| labels[idx].clone()).collect(),
                )
            }
            ProductKind::Boxed => {
                let min_pos = (0..n)
                    .min_by(|&a, &b| labels[a].cmp(&labels[b]))
                    .expect("n > 0 since v(boxed product) >= 1");
                let remaining: Vec<usize> = (0..n).filter(|&idx| idx != min_pos).collect();
                let chosen = nth_k_subset(&remaining, k - 1, s);
                let rest = complement(&remaining, &chosen);
                let mut l: Vec<L> = Vec::with_capacity(k);
                l.push(labels[min_pos].clone());
                l.extend(chosen.iter().map(|&idx| labels[idx].clone()));
                (l, rest.iter().map(|&idx| labels[idx].clone()).collect())
            }
        };

        let left_obj = self.unrank_id(left, &l_labels, p, token)?;
        let right_obj = self.unrank_id(right, &r_labels, q, token)?;
        Ok(combine(left_obj, right_obj))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{atom, box_product, epsilon, ord_product, product, union};
    use std::collections::HashMap;

    fn permutations_grammar() -> Grammar<u32, Vec<u32>> {
        let mut rules = HashMap::new();
        rules.insert("one".to_string(), epsilon(Vec::<u32>::new()));
        rules.insert("z".to_string(), atom(|label: u32| vec![label]));
        rules.insert(
            "zp".to_string(),
            product("z", "p", |mut h: Vec<u32>, t: Vec<u32>| {
                h.extend(t);
                h
            }),
        );
        rules.insert("p".to_string(), union("one", "zp"));
        Grammar::new(rules)
    }

    #[test]
    fn unrank_matches_list_for_every_index() {
        let mut g = permutations_grammar();
        g.init().unwrap();
        let labels = [1u32, 2, 3, 4];
        let listed = g.list("p", &labels).unwrap();
        for (i, want) in listed.iter().enumerate() {
            let got = g.unrank("p", &labels, BigUint::from(i)).unwrap();
            assert_eq!(&got, want);
        }
    }

    #[test]
    fn unrank_out_of_range_is_rejected() {
        let mut g = permutations_grammar();
        g.init().unwrap();
        let labels = [1u32, 2, 3];
        let count = g.count("p", 3).unwrap();
        assert!(g.unrank("p", &labels, count).is_err());
    }

    #[test]
    fn unrank_matches_list_for_boxed_product() {
        let mut rules = HashMap::new();
        rules.insert("one".to_string(), epsilon(Vec::<u32>::new()));
        rules.insert("z".to_string(), atom(|label: u32| vec![label]));
        rules.insert(
            "zs".to_string(),
            ord_product("z", "s", |mut h: Vec<u32>, t: Vec<u32>| {
                h.extend(t);
                h
            }),
        );
        rules.insert("s".to_string(), union("one", "zs"));
        rules.insert(
            "b".to_string(),
            box_product("s", "s", |l: Vec<u32>, r: Vec<u32>| (l, r)),
        );
        let mut g = Grammar::new(rules);
        g.init().unwrap();
        let labels = [1u32, 2, 3, 4];
        let listed = g.list("b", &labels).unwrap();
        for (i, want) in listed.iter().enumerate() {
            let got = g.unrank("b", &labels, BigUint::from(i)).unwrap();
            assert_eq!(&got, want);
        }
    }
}
