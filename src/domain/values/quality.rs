//! Deal quality scoring (0-100) for ranking accepted deals.
//!
//! Six weighted components: discount authenticity against price history,
//! discount size, product popularity, deal urgency, price competitiveness
//! and seller trust. Pure function of the deal's fields and its
//! [`PriceInsights`]; recomputable whenever inputs change.

use crate::domain::values::insights::{PriceInsights, Trend};
use serde::{Deserialize, Serialize};

/// Component weights. They sum to 100.
pub const WEIGHT_AUTHENTICITY: f64 = 25.0;
pub const WEIGHT_DISCOUNT: f64 = 20.0;
pub const WEIGHT_POPULARITY: f64 = 15.0;
pub const WEIGHT_URGENCY: f64 = 15.0;
pub const WEIGHT_COMPETITIVENESS: f64 = 15.0;
pub const WEIGHT_SELLER_TRUST: f64 = 10.0;

/// Discount percentage at which the discount component saturates.
const DISCOUNT_SATURATION_PCT: f64 = 80.0;
/// Review count treated as full popularity credit on the log scale.
const REVIEW_SATURATION: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub discount_authenticity: f64,
    pub discount_percentage: f64,
    pub product_popularity: f64,
    pub deal_urgency: f64,
    pub price_competitiveness: f64,
    pub seller_trust: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub value: f64,
    pub grade: String,
    pub recommendation: String,
    pub breakdown: QualityBreakdown,
}

/// Borrowed view of the deal fields the scorer reads.
#[derive(Debug, Clone, Default)]
pub struct QualityInputs<'a> {
    pub price: f64,
    pub mrp: Option<f64>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub deal_type: Option<&'a str>,
    pub stock_status: Option<&'a str>,
    pub seller_info: Option<&'a str>,
}

/// Discount percent implied by price and MRP; None when the MRP is
/// missing or does not exceed the price.
pub fn discount_percent(price: f64, mrp: Option<f64>) -> Option<f64> {
    match mrp {
        Some(m) if m > 0.0 && m > price && price >= 0.0 => Some((m - price) / m * 100.0),
        _ => None,
    }
}

pub fn score_deal(inputs: &QualityInputs, insights: &PriceInsights) -> QualityScore {
    let discount_pct = discount_percent(inputs.price, inputs.mrp);
    let breakdown = QualityBreakdown {
        discount_authenticity: score_authenticity(insights),
        discount_percentage: score_discount(discount_pct),
        product_popularity: score_popularity(inputs.rating, inputs.review_count),
        deal_urgency: score_urgency(inputs.deal_type, inputs.stock_status),
        price_competitiveness: score_competitiveness(insights),
        seller_trust: score_seller_trust(inputs.seller_info),
    };
    let value = round1(
        (breakdown.discount_authenticity
            + breakdown.discount_percentage
            + breakdown.product_popularity
            + breakdown.deal_urgency
            + breakdown.price_competitiveness
            + breakdown.seller_trust)
            .clamp(0.0, 100.0),
    );
    QualityScore {
        value,
        grade: grade(value).to_string(),
        recommendation: recommendation(value).to_string(),
        breakdown,
    }
}

/// History-backed authenticity. Without history the component is a flat
/// partial credit so an unseen product is neither rewarded nor punished.
fn score_authenticity(insights: &PriceInsights) -> f64 {
    if !insights.has_history {
        return 15.0;
    }
    let mut score = WEIGHT_AUTHENTICITY;
    if insights.is_fake_discount {
        // An inflated reference price forfeits the historical-low bonus.
        score -= 15.0;
    } else if insights.is_historical_low {
        score = (score + 5.0).min(WEIGHT_AUTHENTICITY);
    }
    match insights.trend_30d {
        Trend::Falling => score = (score + 2.0).min(WEIGHT_AUTHENTICITY),
        Trend::Rising => score -= 2.0,
        _ => {}
    }
    score.clamp(0.0, WEIGHT_AUTHENTICITY)
}

/// Linear in the discount, saturating at 80% off.
fn score_discount(discount_pct: Option<f64>) -> f64 {
    match discount_pct {
        Some(d) if d > 0.0 => d.min(DISCOUNT_SATURATION_PCT) / DISCOUNT_SATURATION_PCT * WEIGHT_DISCOUNT,
        _ => 0.0,
    }
}

/// Half-weighted linear rating plus half-weighted log-scaled reviews.
fn score_popularity(rating: Option<f64>, review_count: Option<u64>) -> f64 {
    let half = WEIGHT_POPULARITY / 2.0;
    let rating_part = rating.map_or(0.0, |r| r.clamp(0.0, 5.0) / 5.0 * half);
    let review_part = review_count.map_or(0.0, |n| {
        let scaled = ((1.0 + n as f64).ln() / (1.0 + REVIEW_SATURATION).ln()).min(1.0);
        scaled * half
    });
    rating_part + review_part
}

/// Fixed tiers by deal type; an out-of-stock listing has no urgency.
fn score_urgency(deal_type: Option<&str>, stock_status: Option<&str>) -> f64 {
    let stock = stock_status.unwrap_or("").to_lowercase();
    if stock.contains("out") {
        return 0.0;
    }
    let kind = deal_type.unwrap_or("").to_lowercase();
    if contains_any(&kind, &["lightning", "flash"]) {
        15.0
    } else if kind.contains("limited") {
        12.0
    } else if contains_any(&kind, &["festival", "sale", "special"]) {
        9.0
    } else if contains_any(&kind, &["daily", "today"]) {
        7.0
    } else {
        5.0
    }
}

/// Base 7.5 (neutral without history), boosted by recent drops and a
/// historical-low bonus.
fn score_competitiveness(insights: &PriceInsights) -> f64 {
    if !insights.has_history {
        return 7.5;
    }
    let mut score: f64 = 7.5;
    if insights.is_historical_low {
        score += 5.0;
    }
    match insights.price_drop_7d {
        Some(d) if d > 20.0 => score += 2.5,
        Some(d) if d > 10.0 => score += 1.5,
        Some(d) if d > 5.0 => score += 0.5,
        _ => {}
    }
    match insights.price_drop_30d {
        Some(d) if d > 30.0 => score += 2.5,
        Some(d) if d > 20.0 => score += 1.5,
        Some(d) if d > 10.0 => score += 0.5,
        _ => {}
    }
    score.min(WEIGHT_COMPETITIVENESS)
}

fn score_seller_trust(seller_info: Option<&str>) -> f64 {
    let seller = seller_info.unwrap_or("").to_lowercase();
    if contains_any(&seller, &["official", "brand", "manufacturer", "fulfilled"]) {
        10.0
    } else if contains_any(&seller, &["verified", "authorized", "plus", "assured"]) {
        7.0
    } else {
        3.0
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

pub fn grade(score: f64) -> &'static str {
    if score >= 90.0 {
        "A+"
    } else if score >= 85.0 {
        "A"
    } else if score >= 75.0 {
        "B"
    } else if score >= 65.0 {
        "C"
    } else if score >= 40.0 {
        "D"
    } else {
        "F"
    }
}

fn recommendation(score: f64) -> &'static str {
    if score >= 85.0 {
        "Excellent deal! Highly recommended"
    } else if score >= 75.0 {
        "Great deal! Worth buying"
    } else if score >= 65.0 {
        "Good deal! Consider it"
    } else if score >= 55.0 {
        "Average deal. Check alternatives"
    } else if score >= 40.0 {
        "Below average. Not recommended"
    } else {
        "Poor deal. Avoid"
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
