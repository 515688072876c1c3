//! The enumerator (§4.4): `list(key, labels)`, in canonical order.
//!
//! Canonical order is what the unranker (`unrank.rs`) is the inverse of, so
//! every splitter here has to agree exactly with the prefix sums computed
//! there. Keeping both in this crate, driven by the same `combinadics`
//! primitives, is what keeps them in lockstep.

use log::debug;

use crate::cancel::CancellationToken;
use crate::combinadics::combinations;
use crate::error::GrammarError;
use crate::grammar::{distinct, Grammar};
use crate::key::RuleId;
use crate::rule::Rule;

impl<L: Clone + Ord, O: Clone> Grammar<L, O> {
    /// `list(key, labels)`: every object of class `key` built on exactly
    /// this label set, in canonical order.
    pub fn list(&self, key: &str, labels: &[L]) -> Result<Vec<O>, GrammarError> {
        self.list_cancellable(key, labels, &CancellationToken::new())
    }

    /// `list`, but cooperatively cancellable via `token` (§5).
    pub fn list_cancellable(
        &self,
        key: &str,
        labels: &[L],
        token: &CancellationToken,
    ) -> Result<Vec<O>, GrammarError> {
        let id = self.rule_id(key)?;
        if !distinct(labels) {
            return Err(GrammarError::DuplicateLabel);
        }
        self.list_id(id, labels, token)
    }

    pub(crate) fn list_id(
        &self,
        id: RuleId,
        labels: &[L],
        token: &CancellationToken,
    ) -> Result<Vec<O>, GrammarError> {
        if token.is_cancelled() {
            return Err(GrammarError::Cancelled);
        }
        let n = labels.len();
        if (n as u64) < self.val(id) {
            return Ok(Vec::new());
        }

        let result = match self.rule(id) {
            Rule::Atom(build) => {
                if n == 1 {
                    vec![build(labels[0].clone())]
                } else {
                    Vec::new()
                }
            }
            Rule::Epsilon(obj) => {
                if n == 0 {
                    vec![obj.clone()]
                } else {
                    Vec::new()
                }
            }
            Rule::Union { left, right } => {
                let (left, right) = (*left, *right);
                let mut out = self.list_id(left, labels, token)?;
                out.extend(self.list_id(right, labels, token)?);
                out
            }
            Rule::OrdProduct { left, right, combine } => {
                let (left, right, combine) = (*left, *right, combine.clone());
                let mut out = Vec::new();
                for k in self.split_bounds(left, right, n, self.val(left)) {
                    let l_labels = &labels[0..k];
                    let r_labels = &labels[k..n];
                    let l_objs = self.list_id(left, l_labels, token)?;
                    let r_objs = self.list_id(right, r_labels, token)?;
                    for l_obj in &l_objs {
                        for r_obj in &r_objs {
                            out.push(combine(l_obj.clone(), r_obj.clone()));
                        }
                    }
                }
                out
            }
            Rule::Product { left, right, combine } => {
                let (left, right, combine) = (*left, *right, combine.clone());
                let pool: Vec<usize> = (0..n).collect();
                let mut out = Vec::new();
                for k in self.split_bounds(left, right, n, self.val(left)) {
                    for chosen in combinations(&pool, k) {
                        if token.is_cancelled() {
                            return Err(GrammarError::Cancelled);
                        }
                        let complement = crate::combinadics::complement(&pool, &chosen);
                        let l_labels: Vec<L> =
                            chosen.iter().map(|&i| labels[i].clone()).collect();
                        let r_labels: Vec<L> =
                            complement.iter().map(|&i| labels[i].clone()).collect();
                        let l_objs = self.list_id(left, &l_labels, token)?;
                        let r_objs = self.list_id(right, &r_labels, token)?;
                        for l_obj in &l_objs {
                            for r_obj in &r_objs {
                                out.push(combine(l_obj.clone(), r_obj.clone()));
                            }
                        }
                    }
                }
                out
            }
            Rule::BoxProduct { left, right, combine } => {
                let (left, right, combine) = (*left, *right, combine.clone());
                let mut out = Vec::new();
                if n == 0 {
                    return Ok(out);
                }
                let min_pos = (0..n)
                    .min_by(|&a, &b| labels[a].cmp(&labels[b]))
                    .expect("n > 0");
                let remainder: Vec<usize> = (0..n).filter(|&i| i != min_pos).collect();
                let lower = self.val(left).max(1);
                for k in self.split_bounds(left, right, n, lower) {
                    if token.is_cancelled() {
                        return Err(GrammarError::Cancelled);
                    }
                    for chosen in combinations(&remainder, k - 1) {
                        let complement = crate::combinadics::complement(&remainder, &chosen);
                        let mut l_labels: Vec<L> = Vec::with_capacity(k);
                        l_labels.push(labels[min_pos].clone());
                        l_labels.extend(chosen.iter().map(|&i| labels[i].clone()));
                        let r_labels: Vec<L> =
                            complement.iter().map(|&i| labels[i].clone()).collect();
                        let l_objs = self.list_id(left, &l_labels, token)?;
                        let r_objs = self.list_id(right, &r_labels, token)?;
                        for l_obj in &l_objs {
                            for r_obj in &r_objs {
                                out.push(combine(l_obj.clone(), r_obj.clone()));
                            }
                        }
                    }
                }
                out
            }
        };

        debug!("list({:?}, n={}) -> {} object(s)", self.key_of(id), n, result.len());
        Ok(result)
    }

    /// The admissible split points `v(left)..=n - v(right)` (or `lower..=n -
    /// v(right)` when the caller supplies an adjusted lower bound, as
    /// `BoxProduct` does with `max(1, v(left))`), empty if none exist.
    pub(crate) fn split_bounds(
        &self,
        _left: RuleId,
        right: RuleId,
        n: usize,
        lower: u64,
    ) -> std::ops::RangeInclusive<usize> {
        let val_right = self.val(right);
        if (n as u64) < val_right {
            return 1..=0; // empty range
        }
        let upper = n as u64 - val_right;
        if lower > upper {
            return 1..=0;
        }
        (lower as usize)..=(upper as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{atom, box_product, epsilon, ord_product, product, union};
    use std::collections::HashMap;

    #[test]
    fn empty_word() {
        let mut rules = HashMap::new();
        rules.insert("e".to_string(), epsilon::<u32, &'static str>(""));
        let mut g = Grammar::new(rules);
        g.init().unwrap();
        assert_eq!(g.list("e", &[]).unwrap(), vec![""]);
        assert_eq!(g.list("e", &[1]).unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn permutations_in_canonical_order() {
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
        let mut g = Grammar::new(rules);
        g.init().unwrap();
        let got = g.list("p", &[1u32, 2, 3]).unwrap();
        let want: Vec<Vec<u32>> = vec![
            vec![1, 2, 3],
            vec![1, 3, 2],
            vec![2, 1, 3],
            vec![2, 3, 1],
            vec![3, 1, 2],
            vec![3, 2, 1],
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn sorted_sequences_preserve_label_order() {
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
        let mut g = Grammar::new(rules);
        g.init().unwrap();
        assert_eq!(g.list("s", &[3u32, 1, 2]).unwrap(), vec![vec![3, 1, 2]]);
    }

    #[test]
    fn boxed_product_forces_minimum_label_left() {
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
        let got = g.list("b", &[1u32, 2, 3]).unwrap();
        let want = vec![
            (vec![1], vec![2, 3]),
            (vec![1, 2], vec![3]),
            (vec![1, 3], vec![2]),
            (vec![1, 2, 3], vec![]),
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let mut rules = HashMap::new();
        rules.insert("z".to_string(), atom(|label: u32| label));
        let mut g = Grammar::new(rules);
        g.init().unwrap();
        assert_eq!(g.list("z", &[1u32, 1]), Err(GrammarError::DuplicateLabel));
    }
}
