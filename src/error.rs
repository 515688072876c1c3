//! The engine's error taxonomy.
//!
//! Every failure mode in the system surfaces as a variant of [`GrammarError`].
//! There is no panic-based error path in non-test code; the reference crate
//! this engine is modeled on hand-rolls `Display` for its own `LoadError`
//! rather than pulling in a derive-macro error crate, and this engine does
//! the same.

use std::fmt;

use num_bigint::BigUint;

/// Everything that can go wrong while building, validating, or querying a
/// [`crate::Grammar`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrammarError {
    /// A rule's `Union`/`Product`/`OrdProduct`/`BoxProduct` referenced a key
    /// that is not in the grammar.
    MalformedGrammar {
        /// The referencing rule.
        key: String,
        /// The key it referenced that does not exist.
        missing: String,
    },
    /// The valuation fixpoint could not bring this rule's valuation below
    /// infinity: the class it names contains no finite-size object.
    NonProductiveRule {
        /// The non-productive rule.
        key: String,
    },
    /// `count`/`list`/`unrank`/`sample`/`valuation` was called before
    /// [`crate::Grammar::init`] succeeded.
    GrammarNotInitialised,
    /// A query named a key that does not exist in the grammar.
    UnknownKey {
        /// The key that was looked up.
        key: String,
    },
    /// `list`/`unrank`/`sample` was called with a label list containing a
    /// duplicate.
    DuplicateLabel,
    /// `unrank` was called with an index outside `[0, count)`.
    RankOutOfRange {
        /// The rule that was unranked.
        key: String,
        /// The size of the label list.
        n: usize,
        /// The out-of-range index.
        i: BigUint,
        /// `count(key, n)`, the exclusive upper bound `i` should have respected.
        count: BigUint,
    },
    /// `sample` was called on a class with `count(key, n) == 0`.
    EmptyClass,
    /// A cooperative [`crate::cancel::CancellationToken`] was observed set
    /// mid-recursion.
    Cancelled,
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::MalformedGrammar { key, missing } => {
                write!(f, "rule {key:?} references undefined key {missing:?}")
            }
            GrammarError::NonProductiveRule { key } => {
                write!(f, "rule {key:?} is non-productive: its class has no finite-size object")
            }
            GrammarError::GrammarNotInitialised => {
                write!(f, "grammar has not been successfully initialised")
            }
            GrammarError::UnknownKey { key } => {
                write!(f, "no rule named {key:?} in this grammar")
            }
            GrammarError::DuplicateLabel => {
                write!(f, "label list contains a duplicate label")
            }
            GrammarError::RankOutOfRange { key, n, i, count } => {
                write!(
                    f,
                    "rank {i} out of range for rule {key:?} at size {n}: count is {count}"
                )
            }
            GrammarError::EmptyClass => {
                write!(f, "cannot sample: class is empty at this size")
            }
            GrammarError::Cancelled => {
                write!(f, "operation was cancelled")
            }
        }
    }
}

impl std::error::Error for GrammarError {}
