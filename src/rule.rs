//! Grammar rule variants.
//!
//! A rule is one of the six constructors from the symbolic method: the
//! atom, the neutral element, disjoint union, and the three flavors of
//! product. Combinators (`build`, `combine`) are opaque callables supplied
//! by the host; the engine never inspects `O`, only threads it through.
//!
//! The host builds a grammar out of [`UnresolvedRule`]s, which name their
//! operands by string key. [`crate::Grammar::init`] resolves each one into
//! a [`Rule`], whose operands are dense [`RuleId`]s — this is the "arena +
//! key lookup" split the reference crate uses between `Symbol` (a dense,
//! `Copy` id) and the name strings a `SymbolSource` maps them to.

use std::rc::Rc;

use crate::key::RuleId;

/// A combinator lifting one label into an object of an atomic class.
pub type Build<L, O> = Rc<dyn Fn(L) -> O>;

/// A combinator lifting a pair of sub-objects into an object of the
/// combined class.
pub type Combine<O> = Rc<dyn Fn(O, O) -> O>;

/// A rule as the host writes it: operands named by string key, not yet
/// resolved to a [`RuleId`].
pub enum UnresolvedRule<L, O> {
    /// Singleton class of size 1: one labelled element.
    Atom(Build<L, O>),
    /// Singleton class of size 0: one unlabelled, fixed object.
    Epsilon(O),
    /// Disjoint union of two classes.
    Union {
        /// Key of the left operand.
        left: String,
        /// Key of the right operand.
        right: String,
    },
    /// Labelled product: every way of splitting the label set between operands.
    Product {
        /// Key of the left operand.
        left: String,
        /// Key of the right operand.
        right: String,
        /// Combinator building the product's object from a left and right sub-object.
        combine: Combine<O>,
    },
    /// Ordered product: the label set splits as a fixed prefix/suffix, no shuffling.
    OrdProduct {
        /// Key of the left operand.
        left: String,
        /// Key of the right operand.
        right: String,
        /// Combinator building the product's object from a left and right sub-object.
        combine: Combine<O>,
    },
    /// Boxed product: like `Product`, but the smallest label always falls
    /// in the left operand.
    BoxProduct {
        /// Key of the left operand.
        left: String,
        /// Key of the right operand.
        right: String,
        /// Combinator building the product's object from a left and right sub-object.
        combine: Combine<O>,
    },
}

impl<L, O> UnresolvedRule<L, O> {
    pub(crate) fn operand_keys(&self) -> Option<(&str, &str)> {
        match self {
            UnresolvedRule::Atom(_) | UnresolvedRule::Epsilon(_) => None,
            UnresolvedRule::Union { left, right }
            | UnresolvedRule::Product { left, right, .. }
            | UnresolvedRule::OrdProduct { left, right, .. }
            | UnresolvedRule::BoxProduct { left, right, .. } => Some((left, right)),
        }
    }
}

/// Builds an atom: a singleton class of size 1.
///
/// `build` is invoked once per requested object, turning the single label
/// into the class's unique object of that size.
pub fn atom<L, O>(build: impl Fn(L) -> O + 'static) -> UnresolvedRule<L, O> {
    UnresolvedRule::Atom(Rc::new(build))
}

/// Builds an epsilon: a singleton class of size 0.
pub fn epsilon<L, O>(obj: O) -> UnresolvedRule<L, O> {
    UnresolvedRule::Epsilon(obj)
}

/// Builds the disjoint union of `left` and `right`.
pub fn union<L, O>(left: &str, right: &str) -> UnresolvedRule<L, O> {
    UnresolvedRule::Union {
        left: left.to_string(),
        right: right.to_string(),
    }
}

/// Builds the labelled product of `left` and `right`.
pub fn product<L, O>(
    left: &str,
    right: &str,
    combine: impl Fn(O, O) -> O + 'static,
) -> UnresolvedRule<L, O> {
    UnresolvedRule::Product {
        left: left.to_string(),
        right: right.to_string(),
        combine: Rc::new(combine),
    }
}

/// Builds the ordered product of `left` and `right`.
pub fn ord_product<L, O>(
    left: &str,
    right: &str,
    combine: impl Fn(O, O) -> O + 'static,
) -> UnresolvedRule<L, O> {
    UnresolvedRule::OrdProduct {
        left: left.to_string(),
        right: right.to_string(),
        combine: Rc::new(combine),
    }
}

/// Builds the boxed product of `left` and `right`.
pub fn box_product<L, O>(
    left: &str,
    right: &str,
    combine: impl Fn(O, O) -> O + 'static,
) -> UnresolvedRule<L, O> {
    UnresolvedRule::BoxProduct {
        left: left.to_string(),
        right: right.to_string(),
        combine: Rc::new(combine),
    }
}

/// A rule after key resolution: operands are dense [`RuleId`]s, not strings.
pub enum Rule<L, O> {
    /// See [`UnresolvedRule::Atom`].
    Atom(Build<L, O>),
    /// See [`UnresolvedRule::Epsilon`].
    Epsilon(O),
    /// See [`UnresolvedRule::Union`].
    Union {
        /// The left operand.
        left: RuleId,
        /// The right operand.
        right: RuleId,
    },
    /// See [`UnresolvedRule::Product`].
    Product {
        /// The left operand.
        left: RuleId,
        /// The right operand.
        right: RuleId,
        /// Combinator building the product's object from a left and right sub-object.
        combine: Combine<O>,
    },
    /// See [`UnresolvedRule::OrdProduct`].
    OrdProduct {
        /// The left operand.
        left: RuleId,
        /// The right operand.
        right: RuleId,
        /// Combinator building the product's object from a left and right sub-object.
        combine: Combine<O>,
    },
    /// See [`UnresolvedRule::BoxProduct`].
    BoxProduct {
        /// The left operand.
        left: RuleId,
        /// The right operand.
        right: RuleId,
        /// Combinator building the product's object from a left and right sub-object.
        combine: Combine<O>,
    },
}
