//! Cross-source duplicate resolution for a batch of accepted deals.
//!
//! Identity links are symmetric: exact links between identical catalog
//! keys, fuzzy links between similarly titled, similarly priced candidates
//! when at least one side lacks a catalog key. Union-find over all links
//! makes the grouping independent of input order; each group then
//! collapses to one canonical record per the configured strategy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::entities::deal::{rank_cmp, CanonicalDeal, Deal, SourceRecord};
use crate::domain::values::category::Category;
use crate::domain::values::similarity::token_set_similarity;

/// Minimum token-set title similarity for a fuzzy link.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.85;
/// Maximum relative price gap for a fuzzy link.
pub const PRICE_TOLERANCE: f64 = 0.05;

/// How a duplicate group collapses to its canonical record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Lowest effective price; ties by higher quality score.
    #[default]
    Best,
    /// Earliest detected_at.
    First,
    /// Field-by-field merge preferring the most complete values; scalars
    /// come from the `Best` member.
    Merge,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Best => write!(f, "best"),
            Self::First => write!(f, "first"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "first" => Ok(Self::First),
            "merge" => Ok(Self::Merge),
            _ => Err(format!(
                "Unknown merge strategy: '{}'. Use 'best', 'first' or 'merge'",
                s
            )),
        }
    }
}

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

/// Resolve a batch into canonical deals, ranked for output. The result is
/// identical for any permutation of the input batch.
pub fn resolve_batch(deals: Vec<Deal>, strategy: MergeStrategy) -> Vec<CanonicalDeal> {
    let n = deals.len();
    let mut ds = DisjointSet::new(n);

    // Exact links: identical catalog keys are definite identity.
    let mut by_key: HashMap<&str, usize> = HashMap::new();
    for (i, deal) in deals.iter().enumerate() {
        if let Some(key) = deal.product_key.as_ref().filter(|k| k.is_catalog()) {
            match by_key.get(key.value()) {
                Some(&first) => ds.union(first, i),
                None => {
                    by_key.insert(key.value(), i);
                }
            }
        }
    }

    // Fuzzy links. Two distinct catalog keys are different products and
    // never link; everything else may link on title + price proximity.
    for i in 0..n {
        for j in (i + 1)..n {
            let both_catalog = deals[i]
                .product_key
                .as_ref()
                .is_some_and(|k| k.is_catalog())
                && deals[j]
                    .product_key
                    .as_ref()
                    .is_some_and(|k| k.is_catalog());
            if both_catalog {
                continue;
            }
            if fuzzy_match(&deals[i], &deals[j]) {
                ds.union(i, j);
            }
        }
    }

    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..n {
        let root = ds.find(i);
        groups.entry(root).or_default().push(i);
    }

    let mut canonical: Vec<CanonicalDeal> = groups
        .into_values()
        .map(|members| collapse(&deals, members, strategy))
        .collect();
    canonical.sort_by(|a, b| rank_cmp(&a.deal, &b.deal));
    canonical
}

fn fuzzy_match(a: &Deal, b: &Deal) -> bool {
    let (Some(ta), Some(tb)) = (a.title.as_deref(), b.title.as_deref()) else {
        return false;
    };
    if token_set_similarity(ta, tb) < TITLE_SIMILARITY_THRESHOLD {
        return false;
    }
    let (pa, pb) = (a.effective_price(), b.effective_price());
    let max = pa.max(pb);
    if max <= 0.0 {
        return false;
    }
    (pa - pb).abs() / max <= PRICE_TOLERANCE
}

/// Collapse one group to its canonical record plus audit trail.
fn collapse(deals: &[Deal], mut members: Vec<usize>, strategy: MergeStrategy) -> CanonicalDeal {
    // Canonical member order is input-derived, never insertion-derived.
    members.sort_by(|&a, &b| {
        deals[a]
            .detected_at
            .cmp(&deals[b].detected_at)
            .then_with(|| deals[a].sort_key().cmp(deals[b].sort_key()))
    });

    let best = *members
        .iter()
        .min_by(|&&a, &&b| {
            deals[a]
                .effective_price()
                .partial_cmp(&deals[b].effective_price())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    deals[b]
                        .quality
                        .value
                        .partial_cmp(&deals[a].quality.value)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| deals[a].sort_key().cmp(deals[b].sort_key()))
        })
        .expect("group is never empty");

    let kept = match strategy {
        MergeStrategy::Best => deals[best].clone(),
        MergeStrategy::First => deals[members[0]].clone(),
        MergeStrategy::Merge => merge_fields(deals, &members, best),
    };

    let sources: Vec<SourceRecord> = members.iter().map(|&i| SourceRecord::from(&deals[i])).collect();
    let absorbed = members.len() - 1;
    CanonicalDeal {
        deal: kept,
        sources,
        absorbed,
    }
}

/// Field-by-field merge. Scalars (price, MRP, scores, insights) stay with
/// the best member; descriptive fields prefer the non-null value from the
/// most reliably sourced member, the best member breaking ties.
fn merge_fields(deals: &[Deal], members: &[usize], best: usize) -> Deal {
    // Descriptive-field precedence: higher verification reliability wins,
    // the best member breaks ties, then the stable sort key.
    let preferred: Vec<usize> = {
        let mut p = members.to_vec();
        p.sort_by(|&a, &b| {
            deals[b]
                .confidence
                .breakdown
                .source_reliability
                .partial_cmp(&deals[a].confidence.breakdown.source_reliability)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| ((a != best) as u8).cmp(&((b != best) as u8)))
                .then_with(|| deals[a].sort_key().cmp(deals[b].sort_key()))
        });
        p
    };

    let pick_text = |get: &dyn Fn(&Deal) -> Option<String>| -> Option<String> {
        preferred.iter().find_map(|&i| get(&deals[i]))
    };

    let mut merged = deals[best].clone();
    merged.title = pick_text(&|d| d.title.clone());
    merged.store = pick_text(&|d| d.store.clone());
    merged.link = pick_text(&|d| d.link.clone());
    merged.stock_status = pick_text(&|d| d.stock_status.clone());
    merged.seller_info = pick_text(&|d| d.seller_info.clone());
    merged.offers = pick_text(&|d| d.offers.clone());
    merged.deal_type = pick_text(&|d| d.deal_type.clone());
    merged.rating = merged
        .rating
        .or_else(|| preferred.iter().find_map(|&i| deals[i].rating));
    merged.review_count = merged
        .review_count
        .or_else(|| preferred.iter().find_map(|&i| deals[i].review_count));
    // Prefer a catalog key from any member over a fallback key.
    if !merged.product_key.as_ref().is_some_and(|k| k.is_catalog()) {
        if let Some(catalog) = preferred.iter().find_map(|&i| {
            deals[i]
                .product_key
                .clone()
                .filter(|k| k.is_catalog())
        }) {
            merged.product_key = Some(catalog);
        }
    }
    if merged.category == Category::Other {
        if let Some(better) = preferred
            .iter()
            .map(|&i| deals[i].category)
            .find(|c| *c != Category::Other)
        {
            merged.category = better;
        }
    }
    // First sighting across the group.
    merged.detected_at = members
        .iter()
        .map(|&i| deals[i].detected_at)
        .min()
        .unwrap_or(merged.detected_at);
    merged
}
