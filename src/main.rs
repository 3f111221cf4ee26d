use clap::Parser;
use dealintel::cli::commands::{Cli, Commands};
use dealintel::domain::entities::candidate::{RawCandidate, VerificationInfo};
use dealintel::domain::entities::deal::Deal;
use dealintel::domain::values::confidence::GateConfig;
use dealintel::infrastructure::verifiers::noop::NoopVerifier;
use dealintel::DealIntel;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let db_path = std::env::var("DEALINTEL_DB").unwrap_or_else(|_| "./dealintel.db".into());

    let gate = match &cli.command {
        Commands::Evaluate {
            threshold: Some(t), ..
        } => GateConfig {
            accept_threshold: *t,
        },
        _ => GateConfig::default(),
    };

    let di = match DealIntel::with_providers(&db_path, Arc::new(NoopVerifier), gate) {
        Ok(di) => di,
        Err(e) => {
            eprintln!("Error initializing dealintel: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(di, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(di: DealIntel, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Evaluate {
            json, verification, ..
        } => {
            let candidate: RawCandidate = serde_json::from_str(&json)?;
            let outcome = match verification {
                Some(v) => {
                    let verification: VerificationInfo = serde_json::from_str(&v)?;
                    di.evaluate(candidate, Some(verification))?
                }
                // No verification supplied: run the full ingest path
                // through the wired verifier collaborator.
                None => di.ingest(candidate).await?,
            };
            println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
        }
        Commands::Resolve { json, strategy } => {
            let deals: Vec<Deal> = serde_json::from_str(&json)?;
            let strategy = strategy.parse().map_err(|e: String| e)?;
            let canonical = di.resolve_batch(deals, strategy);
            println!("{}", serde_json::to_string_pretty(&canonical).unwrap());
        }
        Commands::Rank { json } => {
            let deals: Vec<Deal> = serde_json::from_str(&json)?;
            let ranked = di.rank(deals);
            println!("{}", serde_json::to_string_pretty(&ranked).unwrap());
        }
        Commands::Insights {
            url,
            claimed_price,
            claimed_mrp,
        } => {
            let insights = di.price_insights(&url, claimed_price, claimed_mrp)?;
            println!("{}", serde_json::to_string_pretty(&insights).unwrap());
        }
        Commands::Record {
            url,
            price,
            mrp,
            observed_at,
            source,
        } => {
            let observed_at = parse_date(&observed_at)?;
            let source = source.parse().map_err(|e: String| e)?;
            let observation = di.record_observation(&url, price, mrp, observed_at, source)?;
            println!("{}", serde_json::to_string_pretty(&observation).unwrap());
        }
        Commands::History { url, days } => {
            let observations = di.history(&url, days)?;
            println!("{}", serde_json::to_string_pretty(&observations).unwrap());
        }
        Commands::Stats => {
            let stats = di.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats).unwrap());
        }
    }
    Ok(())
}

fn parse_date(s: &Option<String>) -> Result<Option<chrono::DateTime<chrono::Utc>>, String> {
    match s {
        None => Ok(None),
        Some(s) => {
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
                return Ok(Some(dt.with_timezone(&chrono::Utc)));
            }
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                let dt = date.and_hms_opt(0, 0, 0).unwrap();
                return Ok(Some(chrono::DateTime::from_naive_utc_and_offset(
                    dt,
                    chrono::Utc,
                )));
            }
            Err(format!(
                "Invalid date format: {s}. Use YYYY-MM-DD or RFC3339"
            ))
        }
    }
}
