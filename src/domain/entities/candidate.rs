use crate::domain::values::confidence::{score_gate, ConfidenceScore, GateInputs};
use crate::domain::values::source::{CandidateSource, VerificationSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw "discounted product" claim as handed over by a message parser or
/// page scraper. Every claim field is optional: missing data degrades the
/// candidate's scores, it never fails ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub claimed_price: Option<f64>,
    #[serde(default)]
    pub claimed_mrp: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u64>,
    #[serde(default)]
    pub stock_status: Option<String>,
    #[serde(default)]
    pub seller_info: Option<String>,
    #[serde(default)]
    pub offers: Option<String>,
    #[serde(default)]
    pub deal_type: Option<String>,
    #[serde(default)]
    pub source: CandidateSource,
    #[serde(default = "Utc::now")]
    pub detected_at: DateTime<Utc>,
    /// Source-specific extras (channel name, message id, ...).
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl RawCandidate {
    /// Run the confidence gate against this claim and its (optional)
    /// verification.
    pub fn confidence(&self, verification: Option<&VerificationInfo>) -> ConfidenceScore {
        let inputs = GateInputs {
            claimed_price: self.claimed_price,
            verified_price: verification.and_then(|v| v.verified_price),
            claimed_title: self.title.as_deref(),
            verified_title: verification.and_then(|v| v.verified_title.as_deref()),
            has_mrp: self
                .claimed_mrp
                .or(verification.and_then(|v| v.verified_mrp))
                .is_some(),
            has_link: self.url.as_deref().is_some_and(|u| !u.trim().is_empty()),
            source: verification.map_or(VerificationSource::TextOnly, |v| v.source),
            issue_count: verification
                .and_then(|v| v.verdict.as_ref())
                .map_or(0, |verdict| verdict.issues.len()),
        };
        score_gate(&inputs)
    }
}

/// What the external scrape + language-model collaborator found on the
/// official listing. Produced by a [`DealVerifier`] port implementation;
/// absent entirely when the collaborator is unavailable.
///
/// [`DealVerifier`]: crate::domain::ports::verifier::DealVerifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationInfo {
    #[serde(default)]
    pub verified_title: Option<String>,
    #[serde(default)]
    pub verified_price: Option<f64>,
    #[serde(default)]
    pub verified_mrp: Option<f64>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub source: VerificationSource,
    #[serde(default)]
    pub verdict: Option<LlmVerdict>,
}

/// The language model's verdict, consumed as an opaque fixed-shape record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmVerdict {
    pub verified: bool,
    pub price_match: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}
