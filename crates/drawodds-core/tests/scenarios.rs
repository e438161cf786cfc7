use drawodds_core::aggregate::{TagCount, aggregate};
use drawodds_core::math::{ExactDistribution, Requirement, at_least_k, at_least_two, exactly_k};
use drawodds_core::model::card::CatalogEntry;
use drawodds_core::model::catalog::Catalog;
use drawodds_core::model::category::{Category, CategorySet};
use drawodds_core::model::deck::Deck;
use drawodds_core::sampling::Sampler;
use statrs::distribution::{Discrete, Hypergeometric};

fn two_tag_catalog(hits: u32, misses: u32) -> Catalog {
    Catalog::new()
        .with("Island", CatalogEntry::new(hits, CategorySet::single(Category::Land), 0))
        .and_then(|c| {
            c.with(
                "Counterspell",
                CatalogEntry::new(misses, CategorySet::single(Category::Instant), 2),
            )
        })
        .expect("valid catalog")
}

#[test]
fn pmf_agrees_with_statrs() {
    let cases = [(60u64, 24u64, 7u64), (40, 17, 10), (99, 1, 30), (100, 50, 4)];
    for (population, successes, draws) in cases {
        let reference =
            Hypergeometric::new(population, successes, draws).expect("valid parameters");
        let ours = ExactDistribution::hypergeometric(
            population as usize,
            successes as usize,
            draws as usize,
        );
        for k in 0..=draws {
            let expected = reference.pmf(k);
            let actual = ours.probability(k as usize);
            assert!(
                (expected - actual).abs() < 1e-9,
                "N={population} K={successes} n={draws} k={k}: {actual} vs {expected}"
            );
        }
    }
}

#[test]
fn scenario_a_expected_matches_is_exact() {
    let dist = ExactDistribution::hypergeometric(100, 50, 4);
    assert_eq!(dist.expected_value, 2.0);
}

#[test]
fn scenario_b_and_c_opening_hand() {
    assert!((exactly_k(60, 24, 7, 2) - 0.2694).abs() < 1e-4);
    assert!((at_least_k(60, 24, 7, 1) - 0.9784).abs() < 1e-4);
}

#[test]
fn scenario_d_monte_carlo_converges() {
    let deck = Deck::build(&two_tag_catalog(50, 50));
    let mut sampler = Sampler::with_seed(2_000);
    let batch = sampler.build(&deck, 2_500);
    let dist = aggregate(
        &deck,
        batch.samples(),
        &TagCount {
            category: Category::Land,
            depth: 4,
        },
    );
    assert_eq!(dist.samples, 2_500);
    assert!((dist.average() - 2.0).abs() <= 0.1, "mean {}", dist.average());
}

#[test]
fn overlapping_tags_diverge_from_disjoint_math() {
    // 20 land creatures and 40 instants. The exact engine sees 20 lands and
    // 20 creatures as separate cards, while in the deck one copy satisfies
    // both requirements at once.
    let land_creature = CategorySet::single(Category::Land).with(Category::Creature);
    let catalog = Catalog::new()
        .with("Dryad Arbor", CatalogEntry::new(20, land_creature, 0))
        .and_then(|c| {
            c.with(
                "Opt",
                CatalogEntry::new(40, CategorySet::single(Category::Instant), 1),
            )
        })
        .expect("valid catalog");
    let deck = Deck::build(&catalog);
    assert_eq!(deck.overlap(Category::Land, Category::Creature), 20);

    // Disjoint reading: about 0.904. True probability of one Arbor: about 0.952.
    let exact = at_least_two(
        deck.len() as i64,
        Requirement::new(deck.count(Category::Land) as i64, 1),
        Requirement::new(deck.count(Category::Creature) as i64, 1),
        7,
    );
    assert!((exact - 0.9037).abs() < 1e-3, "exact {exact}");

    let mut calc = drawodds_core::Calculator::new(
        catalog,
        drawodds_core::CalculatorOptions {
            seed: Some(3),
            ..Default::default()
        },
    );
    let simulated = calc
        .simulate_at_least(&[(Category::Land, 1), (Category::Creature, 1)], 7, 4_000)
        .expect("non-empty deck");
    assert!(simulated - exact > 0.03, "exact {exact} simulated {simulated}");
}
