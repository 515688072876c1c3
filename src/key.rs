//! Dense rule identifiers.
//!
//! The public API speaks in string keys, as the grammar itself does. Internally
//! every key is interned once, during [`crate::Grammar::init`], into a small
//! `Copy` index so that rules can refer to their siblings without cloning
//! strings or re-hashing on every lookup.

use std::num::NonZeroU32;

/// Arena index of a rule inside a [`crate::Grammar`].
///
/// `RuleId` never appears in the public API except as an implementation
/// detail of [`crate::rule::Rule`]'s `Union`/`Product`/`OrdProduct`/`BoxProduct`
/// variants, which hold the `RuleId` of their operands instead of owning
/// the grammar (breaking the reference cycle a naive back-pointer design
/// would create).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RuleId(NonZeroU32);

impl RuleId {
    pub(crate) fn from_index(index: usize) -> Self {
        let n = u32::try_from(index + 1).expect("grammar has more rules than fit in a u32");
        RuleId(NonZeroU32::new(n).expect("index + 1 is never zero"))
    }

    pub(crate) fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
