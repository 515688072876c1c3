//! End-to-end grammars exercised against their known exact answers: the
//! concrete species from Joyal's symbolic method that this engine is built
//! to evaluate.

use std::collections::HashMap;

use num_bigint::BigUint;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use species_engine::rule::{atom, box_product, epsilon, ord_product, product, union};
use species_engine::Grammar;

/// A generic species object: enough shapes to build every grammar below
/// with a single concrete `O`, since a grammar's combinators must all
/// agree on one object type.
#[derive(Clone, Debug, PartialEq)]
enum Obj {
    Label(u32),
    Seq(Vec<Obj>),
    Pair(Box<Obj>, Box<Obj>),
    Unit,
}

fn counts(g: &Grammar<u32, Obj>, key: &str, upto: usize) -> Vec<BigUint> {
    (0..upto).map(|n| g.count(key, n).unwrap()).collect()
}

/// Installs the logger once per test; `try_init` errors on repeat calls
/// across the suite, which is fine to ignore here.
fn init_logging() {
    let _ = env_logger::try_init();
}

fn biguints(values: &[u32]) -> Vec<BigUint> {
    values.iter().map(|&v| BigUint::from(v)).collect()
}

#[test]
fn empty_word() {
    init_logging();
    let mut rules = HashMap::new();
    rules.insert("e".to_string(), epsilon::<u32, &'static str>(""));
    let mut g = Grammar::new(rules);
    g.init().unwrap();

    assert_eq!(g.count("e", 0).unwrap(), BigUint::from(1u32));
    for k in 1..4 {
        assert_eq!(g.count("e", k).unwrap(), BigUint::from(0u32));
    }
    assert_eq!(g.list("e", &[]).unwrap(), vec![""]);
    assert_eq!(g.list("e", &["a"]).unwrap(), Vec::<&str>::new());
}

/// `P = 1 + Z ★ P`: labelled permutations.
fn permutations_grammar() -> Grammar<u32, Obj> {
    let mut rules: HashMap<String, _> = HashMap::new();
    rules.insert("one".to_string(), epsilon(Obj::Seq(Vec::new())));
    rules.insert("z".to_string(), atom(|l: u32| Obj::Seq(vec![Obj::Label(l)])));
    rules.insert(
        "zp".to_string(),
        product("z", "p", |h: Obj, t: Obj| match (h, t) {
            (Obj::Seq(mut head), Obj::Seq(tail)) => {
                head.extend(tail);
                Obj::Seq(head)
            }
            _ => unreachable!("z and p always build Obj::Seq"),
        }),
    );
    rules.insert("p".to_string(), union("one", "zp"));
    Grammar::new(rules)
}

#[test]
fn permutations() {
    init_logging();
    let mut g = permutations_grammar();
    g.init().unwrap();

    assert_eq!(counts(&g, "p", 5), biguints(&[1, 1, 2, 6, 24]));

    let seq = |labels: &[u32]| Obj::Seq(labels.iter().map(|&l| Obj::Label(l)).collect());
    let got = g.list("p", &[1, 2, 3]).unwrap();
    let want = vec![
        seq(&[1, 2, 3]),
        seq(&[1, 3, 2]),
        seq(&[2, 1, 3]),
        seq(&[2, 3, 1]),
        seq(&[3, 1, 2]),
        seq(&[3, 2, 1]),
    ];
    assert_eq!(got, want);
}

/// `S = 1 + Z · S`: sequences in the label's original order.
fn sorted_sequences_grammar() -> Grammar<u32, Obj> {
    let mut rules: HashMap<String, _> = HashMap::new();
    rules.insert("one".to_string(), epsilon(Obj::Seq(Vec::new())));
    rules.insert("z".to_string(), atom(|l: u32| Obj::Seq(vec![Obj::Label(l)])));
    rules.insert(
        "zs".to_string(),
        ord_product("z", "s", |h: Obj, t: Obj| match (h, t) {
            (Obj::Seq(mut head), Obj::Seq(tail)) => {
                head.extend(tail);
                Obj::Seq(head)
            }
            _ => unreachable!("z and s always build Obj::Seq"),
        }),
    );
    rules.insert("s".to_string(), union("one", "zs"));
    Grammar::new(rules)
}

#[test]
fn sorted_sequences() {
    init_logging();
    let mut g = sorted_sequences_grammar();
    g.init().unwrap();

    for n in 0..6 {
        assert_eq!(g.count("s", n).unwrap(), BigUint::from(1u32));
    }
    let seq = |labels: &[u32]| Obj::Seq(labels.iter().map(|&l| Obj::Label(l)).collect());
    assert_eq!(g.list("s", &[3, 1, 2]).unwrap(), vec![seq(&[3, 1, 2])]);
}

/// `B = S □ S`, boxed product of two sorted sequences.
#[test]
fn boxed_product_of_sorted_sequences() {
    init_logging();
    let mut rules: HashMap<String, _> = HashMap::new();
    rules.insert("one".to_string(), epsilon(Obj::Seq(Vec::new())));
    rules.insert("z".to_string(), atom(|l: u32| Obj::Seq(vec![Obj::Label(l)])));
    rules.insert(
        "zs".to_string(),
        ord_product("z", "s", |h: Obj, t: Obj| match (h, t) {
            (Obj::Seq(mut head), Obj::Seq(tail)) => {
                head.extend(tail);
                Obj::Seq(head)
            }
            _ => unreachable!("z and s always build Obj::Seq"),
        }),
    );
    rules.insert("s".to_string(), union("one", "zs"));
    rules.insert(
        "b".to_string(),
        box_product("s", "s", |l: Obj, r: Obj| Obj::Pair(Box::new(l), Box::new(r))),
    );
    let mut g = Grammar::new(rules);
    g.init().unwrap();

    assert_eq!(counts(&g, "b", 4), biguints(&[0, 1, 2, 4]));

    let seq = |labels: &[u32]| Obj::Seq(labels.iter().map(|&l| Obj::Label(l)).collect());
    let pair = |l: &[u32], r: &[u32]| Obj::Pair(Box::new(seq(l)), Box::new(seq(r)));
    let got = g.list("b", &[1, 2, 3]).unwrap();
    let want = vec![
        pair(&[1], &[2, 3]),
        pair(&[1, 2], &[3]),
        pair(&[1, 3], &[2]),
        pair(&[1, 2, 3], &[]),
    ];
    assert_eq!(got, want);
}

/// `T = T ★ T + Z`: labelled binary trees, labels on leaves.
#[test]
fn labelled_binary_trees() {
    init_logging();
    let mut rules: HashMap<String, _> = HashMap::new();
    rules.insert("z".to_string(), atom(Obj::Label));
    rules.insert(
        "tt".to_string(),
        product("t", "t", |l: Obj, r: Obj| Obj::Pair(Box::new(l), Box::new(r))),
    );
    rules.insert("t".to_string(), union("tt", "z"));
    let mut g = Grammar::new(rules);
    g.init().unwrap();

    assert_eq!(counts(&g, "t", 5), biguints(&[0, 1, 2, 12, 120]));
}

/// `T = Z · (T ★ T) + 1`: increasing binary trees.
#[test]
fn increasing_binary_trees() {
    init_logging();
    let mut rules: HashMap<String, _> = HashMap::new();
    rules.insert("one".to_string(), epsilon(Obj::Unit));
    rules.insert("z".to_string(), atom(Obj::Label));
    rules.insert(
        "tt".to_string(),
        product("t", "t", |l: Obj, r: Obj| Obj::Pair(Box::new(l), Box::new(r))),
    );
    rules.insert(
        "ztt".to_string(),
        ord_product("z", "tt", |l: Obj, r: Obj| Obj::Pair(Box::new(l), Box::new(r))),
    );
    rules.insert("t".to_string(), union("one", "ztt"));
    let mut g = Grammar::new(rules);
    g.init().unwrap();

    assert_eq!(counts(&g, "t", 6), biguints(&[1, 1, 2, 6, 24, 120]));
}

/// Set partitions, built the way the host's own test corpus builds them:
/// a non-empty "block" of arbitrary labels nested through `BoxProduct` so
/// the overall minimum label always anchors the first block. This
/// recurrence is exactly the Bell-number recurrence.
#[test]
fn set_partitions_via_nested_box_products() {
    init_logging();
    let mut rules: HashMap<String, _> = HashMap::new();
    rules.insert("z".to_string(), atom(|_: u32| ()));
    rules.insert("z_block".to_string(), ord_product("z", "block", |_, _| ()));
    rules.insert("block".to_string(), union("z", "z_block"));
    rules.insert("one".to_string(), epsilon(()));
    rules.insert(
        "partition".to_string(),
        box_product("block", "partition", |_, _| ()),
    );
    rules.insert("all".to_string(), union("one", "partition"));
    let mut g: Grammar<u32, ()> = Grammar::new(rules);
    g.init().unwrap();

    let bell = (0..6)
        .map(|n| g.count("all", n).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(bell, biguints(&[1, 1, 2, 5, 15, 52]));
}

#[test]
fn unrank_matches_list_across_every_scenario() {
    init_logging();
    let mut g = permutations_grammar();
    g.init().unwrap();
    let labels = [1u32, 2, 3, 4];
    let listed = g.list("p", &labels).unwrap();
    for (i, want) in listed.iter().enumerate() {
        assert_eq!(&g.unrank("p", &labels, BigUint::from(i)).unwrap(), want);
    }
}

#[test]
fn sampling_is_reproducible_given_a_seeded_rng_and_stays_within_the_canonical_list() {
    init_logging();
    let mut g = sorted_sequences_grammar();
    g.init().unwrap();
    let labels = [5u32, 1, 9, 2];
    let listed = g.list("s", &labels).unwrap();

    let mut rng_a = SmallRng::seed_from_u64(42);
    let mut rng_b = SmallRng::seed_from_u64(42);
    for _ in 0..10 {
        let a = g.sample("s", &labels, &mut rng_a).unwrap();
        let b = g.sample("s", &labels, &mut rng_b).unwrap();
        assert_eq!(a, b);
        assert!(listed.contains(&a));
    }
}
