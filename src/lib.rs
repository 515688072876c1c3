//! Labelled combinatorial species: grammar resolution, exact counting,
//! label-list enumeration, direct unranking, and uniform sampling over
//! Joyal's six constructors — atom, epsilon, union, product, ordered
//! product, and boxed product.
//!
//! A grammar is a map from string keys to [`rule::UnresolvedRule`]s, built
//! with the constructors in [`rule`] and installed into a [`Grammar`].
//! [`Grammar::init`] resolves the grammar, checks closure, and runs the
//! valuation fixpoint; once it returns `Ok`, the grammar serves
//! [`Grammar::count`], [`Grammar::list`], [`Grammar::unrank`], and
//! [`Grammar::sample`].
//!
//! ```
//! use species_engine::rule::{atom, epsilon, product, union};
//! use species_engine::Grammar;
//! use std::collections::HashMap;
//!
//! // P = 1 + Z * P: labelled permutations.
//! let mut rules = HashMap::new();
//! rules.insert("one".to_string(), epsilon(Vec::<u32>::new()));
//! rules.insert("z".to_string(), atom(|label: u32| vec![label]));
//! rules.insert(
//!     "zp".to_string(),
//!     product("z", "p", |mut head: Vec<u32>, tail: Vec<u32>| {
//!         head.extend(tail);
//!         head
//!     }),
//! );
//! rules.insert("p".to_string(), union("one", "zp"));
//!
//! let mut grammar = Grammar::new(rules);
//! grammar.init().unwrap();
//! assert_eq!(grammar.count("p", 3).unwrap(), 6u32.into());
//! ```

mod cancel;
mod combinadics;
mod count;
mod enumerate;
mod error;
mod grammar;
mod key;
mod sample;
mod unrank;
mod valuation;

pub mod rule;

pub use cancel::CancellationToken;
pub use error::GrammarError;
pub use grammar::{Grammar, GrammarState};
pub use rule::{atom, box_product, epsilon, ord_product, product, union, UnresolvedRule};
