use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_vitals_table(conn)?;
    create_vitals_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the vitals table
fn create_vitals_table(conn: &Connection) -> Result<(), String> {
    info!("Creating vitals table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS vitals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_name TEXT NOT NULL,
            heart_rate INTEGER NOT NULL,
            blood_pressure TEXT NOT NULL,
            -- SQLite stores a bound NaN as NULL
            temperature REAL,
            status TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create index on timestamp for newest-first reads
fn create_vitals_index(conn: &Connection) -> Result<(), String> {
    info!("Creating index on timestamp");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_vitals_timestamp
        ON vitals (timestamp DESC)",
        [],
    ).map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'vitals'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
