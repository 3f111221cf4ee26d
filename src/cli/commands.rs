use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dealintel",
    about = "Deal intelligence core: gate, analyze, score and deduplicate discount claims"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a raw deal claim (gate, analyze, score)
    Evaluate {
        /// Candidate JSON: title, store, claimed_price, claimed_mrp, url,
        /// rating, review_count, stock_status, seller_info, offers,
        /// deal_type, source, metadata
        json: String,
        /// Verification JSON: verified_title, verified_price, verified_mrp,
        /// availability, source, verdict. Without it the wired verifier is
        /// consulted.
        #[arg(long)]
        verification: Option<String>,
        /// Acceptance threshold override (default 0.6)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Collapse cross-source duplicates in a batch of accepted deals
    Resolve {
        /// JSON array of deal records as emitted by evaluate
        json: String,
        /// Collapse strategy (best, first, merge)
        #[arg(long, default_value = "best")]
        strategy: String,
    },
    /// Rank deals by quality score
    Rank {
        /// JSON array of deal records
        json: String,
    },
    /// Price insights for a product URL against recorded history
    Insights {
        url: String,
        claimed_price: f64,
        #[arg(long)]
        claimed_mrp: Option<f64>,
    },
    /// Record a price observation
    Record {
        url: String,
        price: f64,
        #[arg(long)]
        mrp: Option<f64>,
        /// Observation timestamp (RFC3339 or YYYY-MM-DD; default now)
        #[arg(long)]
        observed_at: Option<String>,
        /// Observation source (chat, official_page)
        #[arg(long, default_value = "official_page")]
        source: String,
    },
    /// Show recorded observations for a product URL
    History {
        url: String,
        #[arg(long, default_value = "90")]
        days: i64,
    },
    /// Price history store statistics
    Stats,
}
