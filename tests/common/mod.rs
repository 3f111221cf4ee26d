//! Shared test helpers.

use chrono::{DateTime, Duration, Utc};
use dealintel::domain::entities::candidate::{LlmVerdict, RawCandidate, VerificationInfo};
use dealintel::domain::entities::deal::Deal;
use dealintel::domain::values::category::Category;
use dealintel::domain::values::confidence::{ConfidenceBreakdown, ConfidenceScore};
use dealintel::domain::values::insights::PriceInsights;
use dealintel::domain::values::product_key::ProductKey;
use dealintel::domain::values::quality::{QualityBreakdown, QualityScore};
use dealintel::domain::values::source::{CandidateSource, VerificationSource};
use dealintel::DealIntel;

pub fn setup() -> DealIntel {
    DealIntel::new(":memory:").unwrap()
}

pub fn make_candidate(
    title: &str,
    claimed_price: f64,
    claimed_mrp: Option<f64>,
    url: Option<&str>,
) -> RawCandidate {
    RawCandidate {
        title: Some(title.to_string()),
        store: Some("Amazon".to_string()),
        claimed_price: Some(claimed_price),
        claimed_mrp,
        url: url.map(|u| u.to_string()),
        rating: Some(4.3),
        review_count: Some(3500),
        stock_status: Some("in_stock".to_string()),
        seller_info: Some("Fulfilled by Amazon".to_string()),
        offers: Some("10% instant discount on cards".to_string()),
        deal_type: Some("Lightning Deal".to_string()),
        source: CandidateSource::Chat,
        detected_at: Utc::now(),
        metadata: None,
    }
}

pub fn make_verification(title: &str, price: f64, mrp: Option<f64>) -> VerificationInfo {
    VerificationInfo {
        verified_title: Some(title.to_string()),
        verified_price: Some(price),
        verified_mrp: mrp,
        availability: Some("In Stock".to_string()),
        source: VerificationSource::OfficialPage,
        verdict: Some(LlmVerdict {
            verified: true,
            price_match: true,
            issues: vec![],
        }),
    }
}

/// A fully assembled accepted deal for resolver tests. `reliability` feeds
/// the merge strategy's precedence.
#[allow(clippy::too_many_arguments)]
pub fn make_deal(
    id: &str,
    title: &str,
    price: f64,
    url: Option<&str>,
    quality_value: f64,
    reliability: f64,
    detected_at: DateTime<Utc>,
    source: CandidateSource,
) -> Deal {
    Deal {
        id: id.to_string(),
        product_key: url.map(|u| ProductKey::from_url(u).unwrap()),
        title: Some(title.to_string()),
        store: Some("Amazon".to_string()),
        link: url.map(|u| u.to_string()),
        verified_price: price,
        verified_mrp: None,
        verified_discount: None,
        rating: Some(4.0),
        review_count: Some(1000),
        category: Category::from_title(title),
        stock_status: Some("in_stock".to_string()),
        seller_info: None,
        offers: None,
        deal_type: None,
        source,
        detected_at,
        confidence: ConfidenceScore {
            value: 0.9,
            label: "Very High".to_string(),
            breakdown: ConfidenceBreakdown {
                price_match: 0.4,
                completeness: 0.25,
                title_match: 0.15,
                source_reliability: reliability,
                no_issues: 0.1,
            },
        },
        quality: QualityScore {
            value: quality_value,
            grade: "B".to_string(),
            recommendation: "Great deal! Worth buying".to_string(),
            breakdown: QualityBreakdown {
                discount_authenticity: 15.0,
                discount_percentage: 10.0,
                product_popularity: 10.0,
                deal_urgency: 5.0,
                price_competitiveness: 7.5,
                seller_trust: 3.0,
            },
        },
        insights: PriceInsights::no_history(),
    }
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}
