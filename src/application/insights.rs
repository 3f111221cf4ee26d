//! Read-side entry points over the price history store: insights on
//! demand, observation recording for ingestion workers, history dumps and
//! store statistics.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::observation::PriceObservation;
use crate::domain::error::DomainError;
use crate::domain::ports::price_history::{HistoryStats, PriceHistoryStore, RETENTION_DAYS};
use crate::domain::values::insights::{compute_insights, PriceInsights};
use crate::domain::values::product_key::ProductKey;
use crate::domain::values::source::CandidateSource;

pub struct InsightsUseCase {
    history: Arc<dyn PriceHistoryStore>,
}

impl InsightsUseCase {
    pub fn new(history: Arc<dyn PriceHistoryStore>) -> Self {
        Self { history }
    }

    pub fn price_insights(
        &self,
        url: &str,
        claimed_price: f64,
        claimed_mrp: Option<f64>,
    ) -> Result<PriceInsights, DomainError> {
        let key = ProductKey::from_url(url).map_err(DomainError::InvalidInput)?;
        let now = Utc::now();
        let window = self
            .history
            .query(&key, now - Duration::days(RETENTION_DAYS))?;
        Ok(compute_insights(&window, claimed_price, claimed_mrp, now))
    }

    pub fn record(
        &self,
        url: &str,
        price: f64,
        mrp: Option<f64>,
        observed_at: Option<DateTime<Utc>>,
        source: CandidateSource,
    ) -> Result<PriceObservation, DomainError> {
        let key = ProductKey::from_url(url).map_err(DomainError::InvalidInput)?;
        let observation = PriceObservation::new(
            key,
            price,
            mrp,
            observed_at.unwrap_or_else(Utc::now),
            source,
        );
        self.history.append(&observation)?;
        Ok(observation)
    }

    pub fn history(
        &self,
        url: &str,
        days: i64,
    ) -> Result<Vec<PriceObservation>, DomainError> {
        let key = ProductKey::from_url(url).map_err(DomainError::InvalidInput)?;
        let days = days.clamp(1, RETENTION_DAYS);
        self.history.query(&key, Utc::now() - Duration::days(days))
    }

    pub fn stats(&self) -> Result<HistoryStats, DomainError> {
        self.history.stats()
    }
}
