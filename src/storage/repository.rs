use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{ServiceId, ServiceRecord};

use super::MIGRATION_001_INITIAL;

const SERVICE_COLUMNS: &str =
    "id, client_name, client_phone, service_type, price_cents, notes, created_at";

/// Repository for persisting and querying the service log.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run more than once.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        debug!("migrations applied");
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Store a new service record.
    pub async fn insert_service(&self, record: &ServiceRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO services (id, client_name, client_phone, service_type, price_cents, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.client_name)
        .bind(&record.client_phone)
        .bind(&record.service_type)
        .bind(record.price_cents)
        .bind(&record.notes)
        .bind(encode_timestamp(record.created_at))
        .execute(&self.pool)
        .await
        .context("Failed to save service")?;

        debug!(id = %record.id, "service inserted");
        Ok(())
    }

    /// Get a service record by ID.
    pub async fn get_service(&self, id: ServiceId) -> Result<Option<ServiceRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM services WHERE id = ?",
            SERVICE_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch service")?;

        row.as_ref().map(Self::row_to_service).transpose()
    }

    /// All service records, newest first.
    pub async fn list_services(&self) -> Result<Vec<ServiceRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM services ORDER BY created_at DESC, id",
            SERVICE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list services")?;

        rows.iter().map(Self::row_to_service).collect()
    }

    /// Delete a service record. Returns false if no row had that ID.
    pub async fn delete_service(&self, id: ServiceId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete service")?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all service records.
    pub async fn count_services(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM services")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count services")?;

        Ok(row.get("count"))
    }

    fn row_to_service(row: &sqlx::sqlite::SqliteRow) -> Result<ServiceRecord> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(ServiceRecord {
            id: Uuid::parse_str(&id_str).context("Invalid service ID")?,
            client_name: row.get("client_name"),
            client_phone: row.get("client_phone"),
            service_type: row.get("service_type"),
            price_cents: row.get("price_cents"),
            notes: row.get("notes"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

/// Fixed-width UTC form, so `ORDER BY created_at` sorts chronologically.
fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_timestamp_is_fixed_width() {
        let whole = DateTime::parse_from_rfc3339("2024-10-17T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let fractional = DateTime::parse_from_rfc3339("2024-10-17T09:00:00.5+02:00")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(encode_timestamp(whole), "2024-10-17T09:00:00.000000Z");
        assert_eq!(encode_timestamp(fractional), "2024-10-17T07:00:00.500000Z");
    }
}
