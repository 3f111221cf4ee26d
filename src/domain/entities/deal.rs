use crate::domain::values::category::Category;
use crate::domain::values::confidence::ConfidenceScore;
use crate::domain::values::insights::PriceInsights;
use crate::domain::values::product_key::ProductKey;
use crate::domain::values::quality::QualityScore;
use crate::domain::values::source::CandidateSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An accepted, fully scored deal: the record shape handed to persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub product_key: Option<ProductKey>,
    pub title: Option<String>,
    pub store: Option<String>,
    pub link: Option<String>,
    /// Effective selling price: verified when available, else as claimed.
    pub verified_price: f64,
    pub verified_mrp: Option<f64>,
    pub verified_discount: Option<f64>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub category: Category,
    pub stock_status: Option<String>,
    pub seller_info: Option<String>,
    pub offers: Option<String>,
    pub deal_type: Option<String>,
    pub source: CandidateSource,
    pub detected_at: DateTime<Utc>,
    pub confidence: ConfidenceScore,
    pub quality: QualityScore,
    pub insights: PriceInsights,
}

impl Deal {
    pub fn effective_price(&self) -> f64 {
        self.verified_price
    }

    pub fn discount_percent(&self) -> f64 {
        self.verified_discount.unwrap_or(0.0)
    }

    /// Stable identity for deterministic tie-breaks: the product key when
    /// present, else the record id.
    pub fn sort_key(&self) -> &str {
        self.product_key
            .as_ref()
            .map(|k| k.value())
            .unwrap_or(&self.id)
    }
}

/// Ranking order for accepted deals: quality desc, then discount desc,
/// then rating desc, with a stable input-derived final tie-break.
pub fn rank_cmp(a: &Deal, b: &Deal) -> Ordering {
    b.quality
        .value
        .partial_cmp(&a.quality.value)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.discount_percent()
                .partial_cmp(&a.discount_percent())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| {
            b.rating
                .unwrap_or(0.0)
                .partial_cmp(&a.rating.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.sort_key().cmp(b.sort_key()))
}

pub fn rank_deals(deals: &mut [Deal]) {
    deals.sort_by(rank_cmp);
}

/// Audit-trail entry for one absorbed source of a canonical deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source: CandidateSource,
    pub store: Option<String>,
    pub url: Option<String>,
    pub price: f64,
    pub detected_at: DateTime<Utc>,
}

impl From<&Deal> for SourceRecord {
    fn from(deal: &Deal) -> Self {
        Self {
            source: deal.source,
            store: deal.store.clone(),
            url: deal.link.clone(),
            price: deal.verified_price,
            detected_at: deal.detected_at,
        }
    }
}

/// The single representative record for a duplicate group, with the
/// group's members retained as an audit list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalDeal {
    pub deal: Deal,
    pub sources: Vec<SourceRecord>,
    /// How many same-product records were collapsed into this one.
    pub absorbed: usize,
}
