use crate::domain::entities::observation::PriceObservation;
use crate::domain::error::DomainError;
use crate::domain::ports::price_history::{HistoryStats, PriceHistoryStore, RETENTION_DAYS};
use crate::domain::values::product_key::ProductKey;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};
use std::sync::Mutex;

const SELECT_COLS: &str = "product_key, is_catalog, price, mrp, anomalous, observed_at, source";

pub struct SqlitePriceHistory {
    conn: Mutex<Connection>,
}

impl SqlitePriceHistory {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_observation(row: &rusqlite::Row) -> Result<PriceObservation, rusqlite::Error> {
        let key_value: String = row.get(0)?;
        let is_catalog: i32 = row.get(1)?;
        let source_str: String = row.get(6)?;
        let observed_str: String = row.get(5)?;

        Ok(PriceObservation {
            product_key: ProductKey::from_parts(key_value, is_catalog != 0),
            price: row.get(2)?,
            mrp: row.get(3)?,
            anomalous: row.get::<_, i32>(4)? != 0,
            observed_at: DateTime::parse_from_rfc3339(&observed_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| {
                    eprintln!("Warning: invalid observed_at '{observed_str}' in price_history row");
                    Utc::now()
                }),
            source: source_str.parse().unwrap_or_else(|_| {
                eprintln!("Warning: invalid source '{source_str}' in price_history row");
                Default::default()
            }),
        })
    }

    fn retention_cutoff() -> DateTime<Utc> {
        Utc::now() - Duration::days(RETENTION_DAYS)
    }
}

impl PriceHistoryStore for SqlitePriceHistory {
    fn append(&self, observation: &PriceObservation) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        // Lazy retention: expired rows for this key go before the insert.
        conn.execute(
            "DELETE FROM price_history WHERE product_key = ?1 AND observed_at < ?2",
            params![
                observation.product_key.value(),
                Self::retention_cutoff().to_rfc3339()
            ],
        )
        .map_err(|e| DomainError::Storage(e.to_string()))?;
        // INSERT OR IGNORE with the unique tuple makes re-appending an
        // identical observation a no-op, which keeps concurrent ingestion
        // workers safe without a global lock.
        conn.execute(
            "INSERT OR IGNORE INTO price_history (product_key, is_catalog, price, mrp, anomalous, observed_at, source)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                observation.product_key.value(),
                observation.product_key.is_catalog() as i32,
                observation.price,
                observation.mrp,
                observation.anomalous as i32,
                observation.observed_at.to_rfc3339(),
                observation.source.to_string(),
            ],
        )
        .map_err(|e| DomainError::Storage(format!("Failed to append observation: {e}")))?;
        Ok(())
    }

    fn query(
        &self,
        key: &ProductKey,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceObservation>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let since = since.max(Self::retention_cutoff());
        let sql = format!(
            "SELECT {SELECT_COLS} FROM price_history
             WHERE product_key = ?1 AND observed_at >= ?2
             ORDER BY observed_at ASC"
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let observations = stmt
            .query_map(
                params![key.value(), since.to_rfc3339()],
                Self::row_to_observation,
            )
            .map_err(|e| DomainError::Storage(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(observations)
    }

    fn stats(&self) -> Result<HistoryStats, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let cutoff = Self::retention_cutoff().to_rfc3339();
        let (observations, products_tracked, anomalous): (usize, usize, usize) = conn
            .query_row(
                "SELECT COUNT(*), COUNT(DISTINCT product_key), COALESCE(SUM(anomalous), 0)
                 FROM price_history WHERE observed_at >= ?1",
                params![cutoff],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        Ok(HistoryStats {
            products_tracked,
            observations,
            anomalous,
        })
    }
}
