//! The valuation fixpoint (§4.2): `v(R)`, the minimum size of any object
//! in class `R`, computed by Kleene iteration over `ℕ ∪ {∞}` ordered
//! downward.

use log::trace;

use crate::key::RuleId;
use crate::rule::Rule;

/// Sentinel standing in for `∞`. Valuations are bounded by grammar depth in
/// any productive grammar, so `u64` with a max-value sentinel is exact and
/// never at risk of colliding with a real valuation in practice.
pub const INFINITE: u64 = u64::MAX;

fn recompute<L, O>(rule: &Rule<L, O>, valuations: &[u64]) -> u64 {
    match rule {
        Rule::Atom(_) => 1,
        Rule::Epsilon(_) => 0,
        Rule::Union { left, right } => {
            valuations[left.index()].min(valuations[right.index()])
        }
        Rule::Product { left, right, .. } | Rule::OrdProduct { left, right, .. } => {
            valuations[left.index()].saturating_add(valuations[right.index()])
        }
        Rule::BoxProduct { left, right, .. } => {
            valuations[left.index()].max(1).saturating_add(valuations[right.index()])
        }
    }
}

/// Runs the fixpoint to completion, returning the resolved valuations.
///
/// Any rule whose valuation is still [`INFINITE`] when the fixpoint settles
/// is non-productive; the caller decides how to report that (see
/// [`crate::Grammar::init`]).
pub fn solve<L, O>(rules: &[Rule<L, O>]) -> Vec<u64> {
    let mut valuations: Vec<u64> = rules
        .iter()
        .map(|rule| match rule {
            Rule::Atom(_) => 1,
            Rule::Epsilon(_) => 0,
            _ => INFINITE,
        })
        .collect();

    let mut pass = 0u32;
    loop {
        let mut changed = 0u32;
        for (id, rule) in rules.iter().enumerate() {
            let new_val = recompute(rule, &valuations);
            if new_val < valuations[id] {
                valuations[id] = new_val;
                changed += 1;
            }
        }
        pass += 1;
        trace!("valuation fixpoint pass {pass}: {changed} rule(s) changed");
        if changed == 0 {
            break;
        }
    }
    valuations
}

/// Keys (by [`RuleId`]) still at [`INFINITE`] after the fixpoint settled.
pub fn non_productive(valuations: &[u64]) -> Vec<RuleId> {
    valuations
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == INFINITE)
        .map(|(i, _)| RuleId::from_index(i))
        .collect()
}
