//! Confidence gate: per-candidate admission scoring.
//!
//! A weighted sum over five capped components decides whether a raw deal
//! claim is trustworthy enough to keep. Pure function of the claim and its
//! (optional) verification; rejection is a normal outcome carrying the
//! full breakdown, never an error.

use crate::domain::values::similarity::token_set_similarity;
use crate::domain::values::source::VerificationSource;
use serde::{Deserialize, Serialize};

/// Component caps. They sum to 1.0.
pub const WEIGHT_PRICE_MATCH: f64 = 0.40;
pub const WEIGHT_COMPLETENESS: f64 = 0.25;
pub const WEIGHT_TITLE_MATCH: f64 = 0.15;
pub const WEIGHT_SOURCE_RELIABILITY: f64 = 0.10;
pub const WEIGHT_NO_ISSUES: f64 = 0.10;

/// Relative price difference granted full credit.
const PRICE_FULL_CREDIT_DIFF: f64 = 0.05;
/// Relative price difference at which credit reaches zero.
const PRICE_ZERO_CREDIT_DIFF: f64 = 0.50;
/// Distinct issue kinds a verifier reports (out-of-stock, link-dead,
/// title-mismatch); each reported issue deducts a proportional share.
const ISSUE_KINDS: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Candidates at or above this confidence are accepted.
    pub accept_threshold: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub price_match: f64,
    pub completeness: f64,
    pub title_match: f64,
    pub source_reliability: f64,
    pub no_issues: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub value: f64,
    pub label: String,
    pub breakdown: ConfidenceBreakdown,
}

impl ConfidenceScore {
    pub fn is_accepted(&self, config: &GateConfig) -> bool {
        self.value >= config.accept_threshold
    }
}

/// Scalar inputs to the gate, assembled by the candidate entity.
#[derive(Debug, Clone, Default)]
pub struct GateInputs<'a> {
    pub claimed_price: Option<f64>,
    pub verified_price: Option<f64>,
    pub claimed_title: Option<&'a str>,
    pub verified_title: Option<&'a str>,
    pub has_mrp: bool,
    pub has_link: bool,
    pub source: VerificationSource,
    pub issue_count: usize,
}

pub fn confidence_label(value: f64) -> &'static str {
    if value >= 0.9 {
        "Very High"
    } else if value >= 0.75 {
        "High"
    } else if value >= 0.6 {
        "Medium"
    } else if value >= 0.4 {
        "Low"
    } else {
        "Very Low"
    }
}

/// Run the gate. Every component is floored at 0 and capped at its weight,
/// so the total always lands in [0, 1].
pub fn score_gate(inputs: &GateInputs) -> ConfidenceScore {
    let breakdown = ConfidenceBreakdown {
        price_match: price_match_component(inputs.claimed_price, inputs.verified_price),
        completeness: completeness_component(inputs),
        title_match: title_match_component(inputs.claimed_title, inputs.verified_title),
        source_reliability: inputs.source.reliability(),
        no_issues: no_issues_component(inputs.issue_count),
    };
    let value = round2(
        (breakdown.price_match
            + breakdown.completeness
            + breakdown.title_match
            + breakdown.source_reliability
            + breakdown.no_issues)
            .clamp(0.0, 1.0),
    );
    ConfidenceScore {
        value,
        label: confidence_label(value).to_string(),
        breakdown,
    }
}

/// Full credit at <=5% relative difference against the verified price,
/// linear decay to zero at >=50%. No credit without both prices.
fn price_match_component(claimed: Option<f64>, verified: Option<f64>) -> f64 {
    let (claimed, verified) = match (claimed, verified) {
        (Some(c), Some(v)) if v > 0.0 && c >= 0.0 => (c, v),
        _ => return 0.0,
    };
    let diff = ((claimed - verified) / verified).abs();
    if diff <= PRICE_FULL_CREDIT_DIFF {
        WEIGHT_PRICE_MATCH
    } else if diff >= PRICE_ZERO_CREDIT_DIFF {
        0.0
    } else {
        WEIGHT_PRICE_MATCH * (PRICE_ZERO_CREDIT_DIFF - diff)
            / (PRICE_ZERO_CREDIT_DIFF - PRICE_FULL_CREDIT_DIFF)
    }
}

/// Share of {title, price, mrp, link} present across claim and
/// verification.
fn completeness_component(inputs: &GateInputs) -> f64 {
    let has_title = inputs
        .claimed_title
        .or(inputs.verified_title)
        .is_some_and(|t| !t.trim().is_empty());
    let has_price = inputs.claimed_price.or(inputs.verified_price).is_some();
    let present = [has_title, has_price, inputs.has_mrp, inputs.has_link]
        .iter()
        .filter(|p| **p)
        .count();
    present as f64 / 4.0 * WEIGHT_COMPLETENESS
}

fn title_match_component(claimed: Option<&str>, verified: Option<&str>) -> f64 {
    match (claimed, verified) {
        (Some(c), Some(v)) => token_set_similarity(c, v) * WEIGHT_TITLE_MATCH,
        _ => 0.0,
    }
}

fn no_issues_component(issue_count: usize) -> f64 {
    (WEIGHT_NO_ISSUES * (1.0 - issue_count as f64 / ISSUE_KINDS)).max(0.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
