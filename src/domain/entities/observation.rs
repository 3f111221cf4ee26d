use crate::domain::values::product_key::ProductKey;
use crate::domain::values::source::CandidateSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed price point for a product. Append-only; the store keeps a
/// 90-day rolling window per key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub product_key: ProductKey,
    pub price: f64,
    pub mrp: Option<f64>,
    /// Set when the row violates price sanity (mrp below price, negative
    /// values). Anomalous MRPs never feed the fake-discount ceiling.
    pub anomalous: bool,
    pub observed_at: DateTime<Utc>,
    pub source: CandidateSource,
}

impl PriceObservation {
    pub fn new(
        product_key: ProductKey,
        price: f64,
        mrp: Option<f64>,
        observed_at: DateTime<Utc>,
        source: CandidateSource,
    ) -> Self {
        let anomalous = price < 0.0 || mrp.is_some_and(|m| m < 0.0 || m < price);
        Self {
            product_key,
            price,
            mrp,
            anomalous,
            observed_at,
            source,
        }
    }
}
