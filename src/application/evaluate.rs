//! Evaluate use case: gate a raw claim, record its price observation,
//! analyze history, score quality and assemble the persisted deal record.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::candidate::{RawCandidate, VerificationInfo};
use crate::domain::entities::deal::Deal;
use crate::domain::entities::observation::PriceObservation;
use crate::domain::error::DomainError;
use crate::domain::ports::price_history::{PriceHistoryStore, RETENTION_DAYS};
use crate::domain::ports::verifier::DealVerifier;
use crate::domain::values::category::Category;
use crate::domain::values::confidence::{ConfidenceScore, GateConfig};
use crate::domain::values::insights::{compute_insights, PriceInsights};
use crate::domain::values::product_key::ProductKey;
use crate::domain::values::quality::{discount_percent, score_deal, QualityInputs};

/// Result of evaluating one candidate. A rejection carries the breakdown
/// for observability and nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutcome {
    pub accepted: bool,
    pub confidence: ConfidenceScore,
    pub deal: Option<Deal>,
}

pub struct EvaluateUseCase {
    history: Arc<dyn PriceHistoryStore>,
    verifier: Arc<dyn DealVerifier>,
    gate: GateConfig,
}

impl EvaluateUseCase {
    pub fn new(
        history: Arc<dyn PriceHistoryStore>,
        verifier: Arc<dyn DealVerifier>,
        gate: GateConfig,
    ) -> Self {
        Self {
            history,
            verifier,
            gate,
        }
    }

    /// Full ingest path: ask the verifier collaborator first, then
    /// evaluate. A failing verifier degrades to text-only scoring, it
    /// never fails the ingest.
    pub async fn ingest(&self, candidate: RawCandidate) -> Result<EvaluationOutcome, DomainError> {
        let verification = match self.verifier.verify(&candidate).await {
            Ok(v) => v,
            Err(e) => {
                eprintln!("WARNING: verifier unavailable, scoring text-only: {e}");
                None
            }
        };
        self.evaluate(candidate, verification)
    }

    pub fn evaluate(
        &self,
        candidate: RawCandidate,
        verification: Option<VerificationInfo>,
    ) -> Result<EvaluationOutcome, DomainError> {
        let confidence = candidate.confidence(verification.as_ref());
        if !confidence.is_accepted(&self.gate) {
            return Ok(EvaluationOutcome {
                accepted: false,
                confidence,
                deal: None,
            });
        }

        let verification = verification.as_ref();
        let price = verification
            .and_then(|v| v.verified_price)
            .or(candidate.claimed_price);
        let Some(price) = price else {
            // Only reachable with a lowered threshold: accepted, but there
            // is no price to build a record around.
            eprintln!("WARNING: accepted candidate has no usable price, skipping record");
            return Ok(EvaluationOutcome {
                accepted: true,
                confidence,
                deal: None,
            });
        };
        let mrp = verification
            .and_then(|v| v.verified_mrp)
            .or(candidate.claimed_mrp);

        let url = candidate
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let (product_key, insights) = match url {
            Some(url) => {
                let key = ProductKey::from_url(url).map_err(DomainError::InvalidInput)?;
                let now = Utc::now();
                // Insights come from history recorded before this claim so
                // the claim never vouches for itself.
                let window = self
                    .history
                    .query(&key, now - Duration::days(RETENTION_DAYS))?;
                let insights = compute_insights(&window, price, mrp, now);
                self.history.append(&PriceObservation::new(
                    key.clone(),
                    price,
                    mrp,
                    now,
                    candidate.source,
                ))?;
                (Some(key), insights)
            }
            None => (None, PriceInsights::no_history()),
        };

        let quality = score_deal(
            &QualityInputs {
                price,
                mrp,
                rating: candidate.rating,
                review_count: candidate.review_count,
                deal_type: candidate.deal_type.as_deref(),
                stock_status: candidate.stock_status.as_deref(),
                seller_info: candidate.seller_info.as_deref(),
            },
            &insights,
        );

        let title = verification
            .and_then(|v| v.verified_title.clone())
            .or_else(|| candidate.title.clone());
        let category = title
            .as_deref()
            .map_or(Category::Other, Category::from_title);

        let deal = Deal {
            id: Uuid::new_v4().to_string(),
            product_key,
            title,
            store: candidate.store,
            link: url.map(str::to_string),
            verified_price: price,
            verified_mrp: mrp,
            verified_discount: discount_percent(price, mrp),
            rating: candidate.rating,
            review_count: candidate.review_count,
            category,
            stock_status: candidate.stock_status,
            seller_info: candidate.seller_info,
            offers: candidate.offers,
            deal_type: candidate.deal_type,
            source: candidate.source,
            detected_at: candidate.detected_at,
            confidence: confidence.clone(),
            quality,
            insights,
        };

        Ok(EvaluationOutcome {
            accepted: true,
            confidence,
            deal: Some(deal),
        })
    }
}
