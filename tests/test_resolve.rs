//! Duplicate resolution: exact and fuzzy links, order independence,
//! collapse strategies.

mod common;

use common::{days_ago, make_deal};
use dealintel::application::resolve::{resolve_batch, MergeStrategy};
use dealintel::domain::entities::deal::{CanonicalDeal, Deal};
use dealintel::domain::values::source::CandidateSource;

fn batch() -> Vec<Deal> {
    vec![
        // a and b: same Amazon ASIN behind different tracking params.
        make_deal(
            "a",
            "Apple iPhone 15 Pro 256GB",
            119_900.0,
            Some("https://www.amazon.in/dp/B0CHX1W1XY"),
            82.0,
            0.02,
            days_ago(3),
            CandidateSource::Chat,
        ),
        make_deal(
            "b",
            "Apple iPhone 15 Pro (256GB) - Blue Titanium",
            118_900.0,
            Some("https://amazon.in/dp/B0CHX1W1XY?ref=deals&tag=x"),
            85.0,
            0.10,
            days_ago(1),
            CandidateSource::OfficialPage,
        ),
        // c and d: no catalog ids, near-identical titles, prices 2% apart.
        make_deal(
            "c",
            "Sony WH-1000XM5 Wireless Headphones",
            4_999.0,
            Some("https://shop.example.com/audio/sony-wh1000xm5"),
            78.0,
            0.02,
            days_ago(2),
            CandidateSource::Chat,
        ),
        make_deal(
            "d",
            "Sony WH-1000XM5 Wireless Headphones (Black)",
            5_099.0,
            Some("https://store.other.example/p/sony-headphones"),
            74.0,
            0.06,
            days_ago(4),
            CandidateSource::Chat,
        ),
        // e: unrelated product.
        make_deal(
            "e",
            "OnePlus 12 5G",
            54_999.0,
            Some("https://www.amazon.in/dp/ABCDEFGHIJ"),
            70.0,
            0.10,
            days_ago(2),
            CandidateSource::OfficialPage,
        ),
    ]
}

fn group_fingerprint(canonical: &[CanonicalDeal]) -> Vec<(String, usize, String)> {
    let mut fp: Vec<(String, usize, String)> = canonical
        .iter()
        .map(|c| {
            (
                c.deal.sort_key().to_string(),
                c.absorbed,
                format!("{:.2}", c.deal.verified_price),
            )
        })
        .collect();
    fp.sort();
    fp
}

#[test]
fn test_exact_key_collapses_tracking_variants() {
    let canonical = resolve_batch(batch(), MergeStrategy::Best);
    assert_eq!(canonical.len(), 3);

    let iphone = canonical
        .iter()
        .find(|c| c.deal.sort_key() == "amazon:B0CHX1W1XY")
        .expect("iphone group survives");
    assert_eq!(iphone.absorbed, 1);
    assert_eq!(iphone.sources.len(), 2);
}

#[test]
fn test_fuzzy_link_joins_similar_title_and_price() {
    let canonical = resolve_batch(batch(), MergeStrategy::Best);
    let sony = canonical
        .iter()
        .find(|c| c.deal.title.as_deref().unwrap_or("").contains("Sony"))
        .expect("sony group survives");
    assert_eq!(sony.absorbed, 1);
    // Best strategy keeps the cheaper listing.
    assert_eq!(sony.deal.verified_price, 4_999.0);
}

#[test]
fn test_price_gap_blocks_fuzzy_link() {
    let mut deals = batch();
    // Push d's price 10% away from c's.
    deals[3].verified_price = 5_600.0;
    let canonical = resolve_batch(deals, MergeStrategy::Best);
    assert_eq!(canonical.len(), 4, "similar titles alone must not merge");
}

#[test]
fn test_distinct_catalog_keys_never_fuzzy_link() {
    let deals = vec![
        make_deal(
            "a",
            "Apple iPhone 15 Pro 256GB",
            119_900.0,
            Some("https://www.amazon.in/dp/B0CHX1W1XY"),
            82.0,
            0.10,
            days_ago(1),
            CandidateSource::Chat,
        ),
        make_deal(
            "b",
            "Apple iPhone 15 Pro 256GB",
            119_900.0,
            Some("https://www.amazon.in/dp/B0DIFFERNT"),
            82.0,
            0.10,
            days_ago(1),
            CandidateSource::Chat,
        ),
    ];
    let canonical = resolve_batch(deals, MergeStrategy::Best);
    assert_eq!(canonical.len(), 2, "two catalog ids are two products");
}

#[test]
fn test_resolution_is_order_independent() {
    let baseline = group_fingerprint(&resolve_batch(batch(), MergeStrategy::Best));

    let mut reversed = batch();
    reversed.reverse();
    assert_eq!(baseline, group_fingerprint(&resolve_batch(reversed, MergeStrategy::Best)));

    let mut rotated = batch();
    rotated.rotate_left(2);
    assert_eq!(baseline, group_fingerprint(&resolve_batch(rotated, MergeStrategy::Best)));
}

#[test]
fn test_transitive_grouping_via_shared_member() {
    // x links to y on the exact key; y links to z fuzzily. All three must
    // land in one group even though x and z share nothing directly.
    let deals = vec![
        make_deal(
            "x",
            "Dyson V11 Vacuum Cleaner",
            32_000.0,
            Some("https://www.amazon.in/dp/B0DYSON111"),
            80.0,
            0.02,
            days_ago(3),
            CandidateSource::Chat,
        ),
        make_deal(
            "y",
            "Dyson V11 Absolute Pro Vacuum",
            31_500.0,
            Some("https://amazon.in/dp/B0DYSON111?tag=z"),
            81.0,
            0.10,
            days_ago(2),
            CandidateSource::OfficialPage,
        ),
        make_deal(
            "z",
            "Dyson V11 Absolute Pro Vacuum (2024)",
            31_000.0,
            Some("https://shop.example.com/dyson-v11"),
            79.0,
            0.06,
            days_ago(1),
            CandidateSource::Chat,
        ),
    ];
    let canonical = resolve_batch(deals, MergeStrategy::Best);
    assert_eq!(canonical.len(), 1);
    assert_eq!(canonical[0].absorbed, 2);
    assert_eq!(canonical[0].sources.len(), 3);
    assert_eq!(canonical[0].deal.verified_price, 31_000.0);
}

#[test]
fn test_best_strategy_ties_break_on_quality() {
    let deals = vec![
        make_deal(
            "a",
            "Kindle Paperwhite 11th Gen",
            13_999.0,
            Some("https://www.amazon.in/dp/B0KINDLE11"),
            70.0,
            0.02,
            days_ago(2),
            CandidateSource::Chat,
        ),
        make_deal(
            "b",
            "Kindle Paperwhite 11th Gen",
            13_999.0,
            Some("https://amazon.in/dp/B0KINDLE11?ref=x"),
            88.0,
            0.10,
            days_ago(1),
            CandidateSource::OfficialPage,
        ),
    ];
    let canonical = resolve_batch(deals, MergeStrategy::Best);
    assert_eq!(canonical.len(), 1);
    assert_eq!(canonical[0].deal.id, "b", "equal prices fall back to quality");
}

#[test]
fn test_first_strategy_keeps_earliest_sighting() {
    let canonical = resolve_batch(batch(), MergeStrategy::First);
    let iphone = canonical
        .iter()
        .find(|c| c.deal.sort_key() == "amazon:B0CHX1W1XY")
        .unwrap();
    assert_eq!(iphone.deal.id, "a", "a was detected before b");
}

#[test]
fn test_merge_strategy_fills_fields_and_keeps_best_scalars() {
    let mut deals = batch();
    // The cheap chat-sourced sighting is missing seller info; the
    // official-page sighting carries it.
    deals[0].seller_info = None;
    deals[1].seller_info = Some("Apple Official Store".to_string());
    deals[1].verified_mrp = Some(134_900.0);

    let canonical = resolve_batch(deals, MergeStrategy::Merge);
    let iphone = canonical
        .iter()
        .find(|c| c.deal.sort_key() == "amazon:B0CHX1W1XY")
        .unwrap();

    // Scalars from the best (cheapest) member.
    assert_eq!(iphone.deal.verified_price, 118_900.0);
    // Descriptive fields prefer the more reliable member.
    assert_eq!(iphone.deal.seller_info.as_deref(), Some("Apple Official Store"));
    assert_eq!(
        iphone.deal.title.as_deref(),
        Some("Apple iPhone 15 Pro (256GB) - Blue Titanium"),
        "official-page title outranks the chat title"
    );
    // First sighting timestamp is preserved.
    let earliest = iphone.sources.iter().map(|s| s.detected_at).min().unwrap();
    assert_eq!(iphone.deal.detected_at, earliest);
    assert_eq!(iphone.absorbed, 1);
}

#[test]
fn test_output_is_ranked_by_quality() {
    let canonical = resolve_batch(batch(), MergeStrategy::Best);
    let values: Vec<f64> = canonical.iter().map(|c| c.deal.quality.value).collect();
    let mut sorted = values.clone();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(values, sorted);
}

#[test]
fn test_deals_without_urls_can_still_fuzzy_link() {
    let deals = vec![
        make_deal(
            "a",
            "Philips Air Fryer HD9252",
            7_999.0,
            None,
            72.0,
            0.02,
            days_ago(1),
            CandidateSource::Chat,
        ),
        make_deal(
            "b",
            "Philips Air Fryer HD9252 Digital",
            8_099.0,
            None,
            75.0,
            0.02,
            days_ago(2),
            CandidateSource::Chat,
        ),
    ];
    let canonical = resolve_batch(deals, MergeStrategy::Best);
    assert_eq!(canonical.len(), 1);
    assert_eq!(canonical[0].absorbed, 1);
}
