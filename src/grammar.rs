//! The grammar store: owns the key→rule mapping, drives the
//! `Unbound → Bound → Validated → Ready | Failed` lifecycle (§4.7), and
//! exposes the lookup every other module needs.

use std::cell::RefCell;
use std::collections::HashMap;

use log::info;
use num_bigint::BigUint;

use crate::error::GrammarError;
use crate::key::RuleId;
use crate::rule::{Rule, UnresolvedRule};
use crate::valuation::{self, INFINITE};

/// Where a [`Grammar`] sits in its `Unbound → Bound → Validated → Ready |
/// Failed` lifecycle (§4.7).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GrammarState {
    /// Constructed, not yet `init`-ed.
    Unbound,
    /// Keys have been interned; closure has not yet been checked.
    Bound,
    /// Closure (§I1) checked and holds.
    Validated,
    /// Valuation fixpoint settled with every rule finite. Queryable.
    Ready,
    /// `init` failed; the grammar cannot serve queries.
    Failed,
}

/// A labelled-species grammar: a key→rule mapping, plus everything the
/// engine derives from it once [`Grammar::init`] succeeds.
///
/// `L` is the label type (`Clone + Ord`, since `BoxProduct` needs a total
/// order and every operation needs equality/distinctness). `O` is the
/// opaque object type the host's combinators build; the engine only ever
/// moves `O` values around.
pub struct Grammar<L, O> {
    pending: Option<HashMap<String, UnresolvedRule<L, O>>>,
    names: Vec<String>,
    key_table: HashMap<String, RuleId>,
    rules: Vec<Rule<L, O>>,
    valuations: Vec<u64>,
    state: GrammarState,
    pub(crate) memo: RefCell<HashMap<(RuleId, usize), BigUint>>,
}

impl<L, O> Grammar<L, O> {
    /// Constructs a grammar from a map of key to rule. No validation runs
    /// until [`Grammar::init`] is called.
    pub fn new(rules: HashMap<String, UnresolvedRule<L, O>>) -> Self {
        Grammar {
            pending: Some(rules),
            names: Vec::new(),
            key_table: HashMap::new(),
            rules: Vec::new(),
            valuations: Vec::new(),
            state: GrammarState::Unbound,
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// The grammar's current lifecycle state.
    pub fn state(&self) -> GrammarState {
        self.state
    }

    /// Runs `save` (intern keys), `check` (closure, §I1), and the valuation
    /// fixpoint (§4.2), in that order. Only a `Ready` grammar may serve
    /// `count`/`list`/`unrank`/`sample`/`valuation`.
    pub fn init(&mut self) -> Result<(), GrammarError> {
        if self.state == GrammarState::Ready {
            return Ok(());
        }
        let pending = self
            .pending
            .take()
            .ok_or(GrammarError::GrammarNotInitialised)?;

        // save: assign every key a dense RuleId, in a stable (sorted) order
        // so repeated `init` calls on equivalent grammars produce identical
        // ids -- useful for reproducing a failure.
        let mut names: Vec<String> = pending.keys().cloned().collect();
        names.sort();
        let key_table: HashMap<String, RuleId> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), RuleId::from_index(i)))
            .collect();
        self.names = names;
        self.key_table = key_table;
        self.state = GrammarState::Bound;

        // check: closure (§I1).
        for (key, rule) in &pending {
            if let Some((left, right)) = rule.operand_keys() {
                for missing in [left, right] {
                    if !self.key_table.contains_key(missing) {
                        self.state = GrammarState::Failed;
                        return Err(GrammarError::MalformedGrammar {
                            key: key.clone(),
                            missing: missing.to_string(),
                        });
                    }
                }
            }
        }
        self.state = GrammarState::Validated;

        // Resolve each UnresolvedRule into a dense Rule, placed at its
        // interned RuleId's index.
        let mut pending = pending;
        let mut resolved: Vec<Option<Rule<L, O>>> = (0..self.names.len()).map(|_| None).collect();
        for name in self.names.clone() {
            let id = self.key_table[&name];
            let unresolved = pending.remove(&name).expect("every name came from pending");
            let rule = match unresolved {
                UnresolvedRule::Atom(build) => Rule::Atom(build),
                UnresolvedRule::Epsilon(obj) => Rule::Epsilon(obj),
                UnresolvedRule::Union { left, right } => Rule::Union {
                    left: self.key_table[&left],
                    right: self.key_table[&right],
                },
                UnresolvedRule::Product {
                    left,
                    right,
                    combine,
                } => Rule::Product {
                    left: self.key_table[&left],
                    right: self.key_table[&right],
                    combine,
                },
                UnresolvedRule::OrdProduct {
                    left,
                    right,
                    combine,
                } => Rule::OrdProduct {
                    left: self.key_table[&left],
                    right: self.key_table[&right],
                    combine,
                },
                UnresolvedRule::BoxProduct {
                    left,
                    right,
                    combine,
                } => Rule::BoxProduct {
                    left: self.key_table[&left],
                    right: self.key_table[&right],
                    combine,
                },
            };
            resolved[id.index()] = Some(rule);
        }
        self.rules = resolved
            .into_iter()
            .map(|slot| slot.expect("every id was assigned a rule above"))
            .collect();

        // valuation fixpoint (§4.2).
        let valuations = valuation::solve(&self.rules);
        let non_productive = valuation::non_productive(&valuations);
        if let Some(id) = non_productive.into_iter().next() {
            self.state = GrammarState::Failed;
            return Err(GrammarError::NonProductiveRule {
                key: self.names[id.index()].clone(),
            });
        }
        self.valuations = valuations;
        self.state = GrammarState::Ready;
        info!(
            "grammar initialised: {} rule(s), ready for queries",
            self.rules.len()
        );
        Ok(())
    }

    /// The valuation `v(key)`: the minimum size of any object of this
    /// class. Post-`init` only.
    pub fn valuation(&self, key: &str) -> Result<u64, GrammarError> {
        let id = self.rule_id(key)?;
        Ok(self.valuations[id.index()])
    }

    pub(crate) fn require_ready(&self) -> Result<(), GrammarError> {
        if self.state == GrammarState::Ready {
            Ok(())
        } else {
            Err(GrammarError::GrammarNotInitialised)
        }
    }

    pub(crate) fn rule_id(&self, key: &str) -> Result<RuleId, GrammarError> {
        self.require_ready()?;
        self.key_table
            .get(key)
            .copied()
            .ok_or_else(|| GrammarError::UnknownKey { key: key.to_string() })
    }

    pub(crate) fn rule(&self, id: RuleId) -> &Rule<L, O> {
        &self.rules[id.index()]
    }

    pub(crate) fn val(&self, id: RuleId) -> u64 {
        self.valuations[id.index()]
    }

    pub(crate) fn key_of(&self, id: RuleId) -> &str {
        &self.names[id.index()]
    }
}

/// Labels only need a total order (`BoxProduct` picks the minimum), so
/// distinctness is checked by sorting references rather than requiring
/// `Hash` on top of `Ord`.
pub(crate) fn distinct<L: Ord>(labels: &[L]) -> bool {
    let mut sorted: Vec<&L> = labels.iter().collect();
    sorted.sort();
    sorted.windows(2).all(|w| w[0] != w[1])
}
