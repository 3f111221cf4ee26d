//! End-to-end evaluation: gate decisions, deal assembly, determinism.

mod common;

use common::{make_candidate, make_verification, setup};
use dealintel::domain::values::confidence::GateConfig;
use dealintel::domain::values::source::CandidateSource;
use dealintel::infrastructure::verifiers::noop::NoopVerifier;
use dealintel::DealIntel;
use std::sync::Arc;

#[test]
fn test_verified_candidate_is_accepted_with_full_record() {
    let di = setup();
    let candidate = make_candidate(
        "Samsung Galaxy S23 5G",
        49_999.0,
        Some(74_999.0),
        Some("https://www.amazon.in/dp/B0ABCD1234"),
    );
    let verification = make_verification(
        "Samsung Galaxy S23 5G Smartphone (Phantom Black, 128GB)",
        49_990.0,
        Some(74_999.0),
    );

    let outcome = di.evaluate(candidate, Some(verification)).unwrap();
    assert!(outcome.accepted);
    assert!(outcome.confidence.value >= 0.9, "got {}", outcome.confidence.value);
    assert_eq!(outcome.confidence.label, "Very High");

    let deal = outcome.deal.expect("accepted outcome carries a deal");
    assert_eq!(deal.verified_price, 49_990.0);
    assert_eq!(deal.verified_mrp, Some(74_999.0));
    let discount = deal.verified_discount.expect("mrp above price yields a discount");
    assert!((discount - 33.35).abs() < 0.1, "got {discount}");
    assert_eq!(deal.category.to_string(), "electronics");
    assert_eq!(deal.product_key.as_ref().unwrap().value(), "amazon:B0ABCD1234");
    assert!(deal.quality.value > 0.0 && deal.quality.value <= 100.0);
    assert!(!deal.insights.has_history, "first sighting has no history");
    assert!(!deal.id.is_empty());
    assert_eq!(deal.stock_status.as_deref(), Some("in_stock"));
    assert_eq!(deal.seller_info.as_deref(), Some("Fulfilled by Amazon"));
}

#[test]
fn test_unverified_candidate_is_rejected_with_breakdown() {
    let di = setup();
    let candidate = make_candidate(
        "Boat Airdopes 441",
        999.0,
        Some(1_499.0),
        Some("https://amazon.in/dp/B08CXYZ123"),
    );

    let outcome = di.evaluate(candidate, None).unwrap();
    assert!(!outcome.accepted);
    assert!(outcome.deal.is_none(), "rejections are not persisted");
    assert_eq!(outcome.confidence.breakdown.source_reliability, 0.02);
    assert_eq!(outcome.confidence.breakdown.price_match, 0.0);
    assert!(outcome.confidence.value < 0.6);
}

#[tokio::test]
async fn test_ingest_without_collaborator_falls_back_to_text_only() {
    let di = setup();
    let candidate = make_candidate(
        "Boat Airdopes 441",
        999.0,
        Some(1_499.0),
        Some("https://amazon.in/dp/B08CXYZ123"),
    );

    let outcome = di.ingest(candidate).await.unwrap();
    assert!(!outcome.accepted);
    assert_eq!(outcome.confidence.breakdown.source_reliability, 0.02);
}

#[test]
fn test_price_mismatch_drags_confidence_down() {
    let di = setup();
    // Claimed price 60% below the official page, no MRP anywhere.
    let candidate = make_candidate(
        "Samsung Galaxy S23 5G",
        20_000.0,
        None,
        Some("https://www.amazon.in/dp/B0ABCD1234"),
    );
    let verification = make_verification("Samsung Galaxy S23 5G", 49_990.0, None);

    let outcome = di.evaluate(candidate, Some(verification)).unwrap();
    assert_eq!(outcome.confidence.breakdown.price_match, 0.0);
    assert!(outcome.confidence.value < 0.6, "got {}", outcome.confidence.value);
    assert!(!outcome.accepted);
}

#[test]
fn test_verifier_issues_reduce_confidence() {
    let di = setup();
    let candidate = make_candidate(
        "Samsung Galaxy S23 5G",
        49_999.0,
        Some(74_999.0),
        Some("https://www.amazon.in/dp/B0ABCD1234"),
    );
    let mut verification = make_verification("Samsung Galaxy S23 5G", 49_990.0, Some(74_999.0));
    verification.verdict.as_mut().unwrap().issues =
        vec!["out-of-stock".to_string(), "title-mismatch".to_string()];

    let clean = di
        .evaluate(
            make_candidate(
                "Samsung Galaxy S23 5G",
                49_999.0,
                Some(74_999.0),
                Some("https://www.amazon.in/dp/B0ABCD1234"),
            ),
            Some(make_verification("Samsung Galaxy S23 5G", 49_990.0, Some(74_999.0))),
        )
        .unwrap();
    let flagged = di.evaluate(candidate, Some(verification)).unwrap();
    assert!(flagged.confidence.value < clean.confidence.value);
}

#[test]
fn test_missing_fields_degrade_but_never_fail() {
    let di = setup();
    let candidate = make_candidate("Mystery Deal", 500.0, None, None);
    let outcome = di.evaluate(candidate, None).unwrap();
    assert!(!outcome.accepted);
    assert!(outcome.confidence.value > 0.0);
    assert!(outcome.confidence.breakdown.completeness < 0.25);
}

#[test]
fn test_configurable_threshold_admits_text_only_claims() {
    let di = DealIntel::with_providers(
        ":memory:",
        Arc::new(NoopVerifier),
        GateConfig {
            accept_threshold: 0.3,
        },
    )
    .unwrap();
    let candidate = make_candidate(
        "Boat Airdopes 441",
        999.0,
        Some(1_499.0),
        Some("https://amazon.in/dp/B08CXYZ123"),
    );

    let outcome = di.evaluate(candidate, None).unwrap();
    assert!(outcome.accepted, "0.37 text-only score clears a 0.3 threshold");
    let deal = outcome.deal.expect("accepted claims build a record");
    assert_eq!(deal.verified_price, 999.0, "claimed price is the fallback");
    assert!(deal.verified_discount.is_some());
}

#[test]
fn test_evaluation_is_deterministic_across_fresh_stores() {
    // Same candidate, verification and (empty) history in two independent
    // instances must score identically.
    let detected_at = common::days_ago(1);
    let build = || {
        let mut c = make_candidate(
            "Samsung Galaxy S23 5G",
            49_999.0,
            Some(74_999.0),
            Some("https://www.amazon.in/dp/B0ABCD1234"),
        );
        c.detected_at = detected_at;
        c
    };
    let a = setup()
        .evaluate(build(), Some(make_verification("Samsung Galaxy S23 5G", 49_990.0, None)))
        .unwrap();
    let b = setup()
        .evaluate(build(), Some(make_verification("Samsung Galaxy S23 5G", 49_990.0, None)))
        .unwrap();

    assert_eq!(a.accepted, b.accepted);
    assert_eq!(a.confidence, b.confidence);
    let (da, db) = (a.deal.unwrap(), b.deal.unwrap());
    assert_eq!(da.quality, db.quality);
    assert_eq!(da.insights, db.insights);
    assert_eq!(da.verified_discount, db.verified_discount);
}

#[test]
fn test_accepted_deal_feeds_the_price_history() {
    let di = setup();
    let url = "https://www.amazon.in/dp/B0ABCD1234";
    let outcome = di
        .evaluate(
            make_candidate("Samsung Galaxy S23 5G", 49_999.0, Some(74_999.0), Some(url)),
            Some(make_verification("Samsung Galaxy S23 5G", 49_990.0, Some(74_999.0))),
        )
        .unwrap();
    assert!(outcome.accepted);

    let history = di.history(url, 90).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].price, 49_990.0);
    assert_eq!(history[0].source, CandidateSource::Chat);

    let stats = di.stats().unwrap();
    assert_eq!(stats.products_tracked, 1);
    assert_eq!(stats.observations, 1);
}

#[test]
fn test_rejected_deal_leaves_no_trace() {
    let di = setup();
    let url = "https://amazon.in/dp/B08CXYZ123";
    let outcome = di
        .evaluate(make_candidate("Boat Airdopes 441", 999.0, None, Some(url)), None)
        .unwrap();
    assert!(!outcome.accepted);
    assert!(di.history(url, 90).unwrap().is_empty());
    assert_eq!(di.stats().unwrap().observations, 0);
}
