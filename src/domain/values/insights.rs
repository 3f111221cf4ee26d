//! Price authenticity analysis over an observed history window.
//!
//! Turns a claimed price/MRP plus the product's recorded observations into
//! derived signals: historical low, fake-discount flag, recent price drops
//! and a 30-day trend. Pure and deterministic given the window and `now`;
//! with no history every flag is neutral so downstream scorers never
//! penalize an unseen product.

use crate::domain::entities::observation::PriceObservation;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Claimed MRPs above `max observed MRP × tolerance` are flagged as
/// inflated reference prices.
pub const FAKE_MRP_TOLERANCE: f64 = 1.20;

/// Half-over-half mean shift (percent) required before a trend is called.
pub const TREND_THRESHOLD_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
    Unknown,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Stable => write!(f, "stable"),
            Trend::Unknown => write!(f, "unknown"),
        }
    }
}

/// Derived price signals. Never stored; recomputed on demand from the
/// observation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceInsights {
    pub has_history: bool,
    pub is_historical_low: bool,
    pub is_fake_discount: bool,
    pub price_drop_7d: Option<f64>,
    pub price_drop_30d: Option<f64>,
    pub trend_30d: Trend,
    pub lowest_30d: Option<f64>,
    pub highest_30d: Option<f64>,
    pub average_30d: Option<f64>,
}

impl PriceInsights {
    /// Neutral insights for a product with no recorded history.
    pub fn no_history() -> Self {
        Self {
            has_history: false,
            is_historical_low: false,
            is_fake_discount: false,
            price_drop_7d: None,
            price_drop_30d: None,
            trend_30d: Trend::Unknown,
            lowest_30d: None,
            highest_30d: None,
            average_30d: None,
        }
    }
}

/// Analyze a claimed price/MRP against the product's observation window.
///
/// `history` is the retention-bounded series for one product key; order
/// does not matter (the analyzer sorts). Negative prices never
/// participate; anomalous rows contribute their price but not their MRP.
pub fn compute_insights(
    history: &[PriceObservation],
    claimed_price: f64,
    claimed_mrp: Option<f64>,
    now: DateTime<Utc>,
) -> PriceInsights {
    let mut valid: Vec<&PriceObservation> =
        history.iter().filter(|o| o.price >= 0.0).collect();
    if valid.is_empty() {
        return PriceInsights::no_history();
    }
    valid.sort_by_key(|o| o.observed_at);

    let min_price = valid.iter().map(|o| o.price).fold(f64::INFINITY, f64::min);
    let is_historical_low = claimed_price <= min_price;

    // The ceiling comes only from MRPs we have legitimately observed;
    // anomalous rows and the unverified claim itself are excluded.
    let max_observed_mrp = valid
        .iter()
        .filter(|o| !o.anomalous)
        .filter_map(|o| o.mrp)
        .fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))));
    let is_fake_discount = match (claimed_mrp, max_observed_mrp) {
        (Some(claimed), Some(ceiling)) => claimed > ceiling * FAKE_MRP_TOLERANCE,
        _ => false,
    };

    let window_30d: Vec<&PriceObservation> = valid
        .iter()
        .filter(|o| o.observed_at >= now - Duration::days(30))
        .copied()
        .collect();
    let prices_30d: Vec<f64> = window_30d.iter().map(|o| o.price).collect();

    PriceInsights {
        has_history: true,
        is_historical_low,
        is_fake_discount,
        price_drop_7d: price_drop(&valid, claimed_price, now - Duration::days(7)),
        price_drop_30d: price_drop(&valid, claimed_price, now - Duration::days(30)),
        trend_30d: trend(&prices_30d),
        lowest_30d: prices_30d.iter().copied().reduce(f64::min),
        highest_30d: prices_30d.iter().copied().reduce(f64::max),
        average_30d: mean(&prices_30d).map(round2),
    }
}

/// Percent drop from the reference price at `cutoff`: the nearest
/// observation at or before it. None when nothing that old exists;
/// negative when the price has risen since.
fn price_drop(
    sorted: &[&PriceObservation],
    claimed_price: f64,
    cutoff: DateTime<Utc>,
) -> Option<f64> {
    let reference = sorted
        .iter()
        .rev()
        .find(|o| o.observed_at <= cutoff)
        .map(|o| o.price)?;
    if reference <= 0.0 {
        return None;
    }
    Some(round2((reference - claimed_price) / reference * 100.0))
}

/// Compare the mean of the first half of the series against the second
/// half. Below 2 observations the trend is unknowable.
fn trend(prices: &[f64]) -> Trend {
    if prices.len() < 2 {
        return Trend::Unknown;
    }
    let mid = prices.len() / 2;
    let (first, second) = (mean(&prices[..mid]), mean(&prices[mid..]));
    match (first, second) {
        (Some(f), Some(s)) if f > 0.0 => {
            let shift_pct = (s - f) / f * 100.0;
            if shift_pct > TREND_THRESHOLD_PCT {
                Trend::Rising
            } else if shift_pct < -TREND_THRESHOLD_PCT {
                Trend::Falling
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Unknown,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
