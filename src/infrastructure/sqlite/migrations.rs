use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS price_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_key TEXT NOT NULL,
            is_catalog INTEGER NOT NULL DEFAULT 0,
            price REAL NOT NULL,
            mrp REAL,
            anomalous INTEGER NOT NULL DEFAULT 0,
            observed_at TEXT NOT NULL,
            source TEXT NOT NULL,
            UNIQUE(product_key, observed_at, price)
        );

        CREATE INDEX IF NOT EXISTS idx_price_history_key ON price_history(product_key);
        CREATE INDEX IF NOT EXISTS idx_price_history_observed ON price_history(observed_at);
        CREATE INDEX IF NOT EXISTS idx_price_history_key_observed ON price_history(product_key, observed_at);
        ",
    )
    .map_err(|e| format!("Migration failed: {e}"))
}
