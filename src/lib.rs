pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::evaluate::{EvaluateUseCase, EvaluationOutcome};
use crate::application::insights::InsightsUseCase;
use crate::application::resolve::{resolve_batch, MergeStrategy};
use crate::domain::entities::candidate::{RawCandidate, VerificationInfo};
use crate::domain::entities::deal::{rank_deals, CanonicalDeal, Deal};
use crate::domain::entities::observation::PriceObservation;
use crate::domain::error::DomainError;
use crate::domain::ports::price_history::{HistoryStats, PriceHistoryStore};
use crate::domain::ports::verifier::DealVerifier;
use crate::domain::values::confidence::GateConfig;
use crate::domain::values::insights::PriceInsights;
use crate::domain::values::source::CandidateSource;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::price_history_repo::SqlitePriceHistory;
use crate::infrastructure::verifiers::noop::NoopVerifier;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::sync::Arc;

pub struct DealIntel {
    evaluate_uc: EvaluateUseCase,
    insights_uc: InsightsUseCase,
}

impl DealIntel {
    /// Open with no verifier collaborator: every candidate scores
    /// text-only until one is wired via [`DealIntel::with_providers`].
    pub fn new(db_path: &str) -> Result<Self, DomainError> {
        Self::with_providers(db_path, Arc::new(NoopVerifier), GateConfig::default())
    }

    pub fn with_providers(
        db_path: &str,
        verifier: Arc<dyn DealVerifier>,
        gate: GateConfig,
    ) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::Storage(format!("DB error: {e}")))?;
        // WAL keeps concurrent ingestion workers (chat listener, page
        // monitor) from blocking each other on appends.
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Storage(format!("WAL error: {e}")))?;
        run_migrations(&conn)?;

        let history: Arc<dyn PriceHistoryStore> = Arc::new(SqlitePriceHistory::new(conn));

        Ok(Self {
            evaluate_uc: EvaluateUseCase::new(history.clone(), verifier, gate),
            insights_uc: InsightsUseCase::new(history),
        })
    }

    // Delegating methods

    /// Verify through the wired collaborator, then evaluate.
    pub async fn ingest(&self, candidate: RawCandidate) -> Result<EvaluationOutcome, DomainError> {
        self.evaluate_uc.ingest(candidate).await
    }

    /// Gate, analyze and score a candidate against pre-supplied
    /// verification data.
    pub fn evaluate(
        &self,
        candidate: RawCandidate,
        verification: Option<VerificationInfo>,
    ) -> Result<EvaluationOutcome, DomainError> {
        self.evaluate_uc.evaluate(candidate, verification)
    }

    pub fn price_insights(
        &self,
        url: &str,
        claimed_price: f64,
        claimed_mrp: Option<f64>,
    ) -> Result<PriceInsights, DomainError> {
        self.insights_uc.price_insights(url, claimed_price, claimed_mrp)
    }

    pub fn record_observation(
        &self,
        url: &str,
        price: f64,
        mrp: Option<f64>,
        observed_at: Option<DateTime<Utc>>,
        source: CandidateSource,
    ) -> Result<PriceObservation, DomainError> {
        self.insights_uc.record(url, price, mrp, observed_at, source)
    }

    pub fn history(&self, url: &str, days: i64) -> Result<Vec<PriceObservation>, DomainError> {
        self.insights_uc.history(url, days)
    }

    pub fn resolve_batch(&self, deals: Vec<Deal>, strategy: MergeStrategy) -> Vec<CanonicalDeal> {
        resolve_batch(deals, strategy)
    }

    pub fn rank(&self, mut deals: Vec<Deal>) -> Vec<Deal> {
        rank_deals(&mut deals);
        deals
    }

    pub fn stats(&self) -> Result<HistoryStats, DomainError> {
        self.insights_uc.stats()
    }
}
