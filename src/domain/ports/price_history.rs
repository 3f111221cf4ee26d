use crate::domain::entities::observation::PriceObservation;
use crate::domain::error::DomainError;
use crate::domain::values::product_key::ProductKey;
use chrono::{DateTime, Utc};

/// Rolling retention window for price observations.
pub const RETENTION_DAYS: i64 = 90;

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct HistoryStats {
    pub products_tracked: usize,
    pub observations: usize,
    pub anomalous: usize,
}

/// Append-only per-product price series. Implementations must tolerate
/// concurrent appends from independent ingestion workers: re-appending an
/// identical (key, observed_at, price) tuple is a no-op, and retention is
/// enforced lazily on append/read rather than by a cleanup job.
pub trait PriceHistoryStore: Send + Sync {
    fn append(&self, observation: &PriceObservation) -> Result<(), DomainError>;

    /// Observations for `key` since `since` (clamped to the retention
    /// window), sorted by `observed_at` regardless of insertion order.
    fn query(
        &self,
        key: &ProductKey,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceObservation>, DomainError>;

    fn stats(&self) -> Result<HistoryStats, DomainError>;
}
