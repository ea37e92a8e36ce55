use tokio_postgres::Client;
use tracing::info;

/// Run PostgreSQL database migrations
pub async fn run_migrations(client: &Client) -> Result<(), String> {
    info!("Running PostgreSQL migrations");

    create_vitals_table(client).await?;
    create_vitals_index(client).await?;

    info!("PostgreSQL migrations completed successfully");
    Ok(())
}

/// Create the vitals table
async fn create_vitals_table(client: &Client) -> Result<(), String> {
    info!("Creating vitals table if not exists");

    client.execute(
        "CREATE TABLE IF NOT EXISTS vitals (
            id SERIAL PRIMARY KEY,
            patient_name TEXT NOT NULL,
            heart_rate INTEGER NOT NULL,
            blood_pressure TEXT NOT NULL,
            temperature DOUBLE PRECISION NOT NULL,
            status VARCHAR(20) NOT NULL,
            timestamp TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        &[],
    ).await.map_err(|e| e.to_string())?;

    Ok(())
}

/// Create index on timestamp for newest-first reads
async fn create_vitals_index(client: &Client) -> Result<(), String> {
    info!("Creating index on timestamp");

    client.execute(
        "CREATE INDEX IF NOT EXISTS idx_vitals_timestamp
        ON vitals (timestamp DESC)",
        &[],
    ).await.map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}
