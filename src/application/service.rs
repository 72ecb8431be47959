use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use tracing::{debug, info};

use crate::domain::{
    format_cents, summarize, Cents, DashboardStats, Locale, Period, ServiceId, ServiceRecord,
    MAX_PRICE_CENTS,
};
use crate::storage::Repository;

use super::{AppError, RevenueChart};

/// Application service for the barbershop log.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct ShopService {
    repo: Repository,
}

/// Input for recording a service, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewService {
    pub client_name: String,
    pub client_phone: Option<String>,
    pub service_type: String,
    pub price_cents: Cents,
    pub notes: Option<String>,
}

/// Filter for listing services
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Matched against client name, service type and phone
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl ShopService {
    /// Create a new shop service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a database at the given path, creating it if needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        info!(database = database_path, "database ready");
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Record store
    // ========================

    /// Validate and store a new service performed at `created_at`.
    pub async fn record_service(
        &self,
        input: NewService,
        created_at: DateTime<Utc>,
    ) -> Result<ServiceRecord, AppError> {
        let client_name = required(input.client_name, "client name")?;
        let service_type = required(input.service_type, "service type")?;
        if input.price_cents < 0 {
            return Err(AppError::InvalidInput(
                "Price cannot be negative".to_string(),
            ));
        }
        if input.price_cents > MAX_PRICE_CENTS {
            return Err(AppError::InvalidInput(format!(
                "Price cannot exceed {}",
                format_cents(MAX_PRICE_CENTS)
            )));
        }

        // Stored timestamps keep microseconds only
        let mut record = ServiceRecord::new(
            client_name,
            service_type,
            input.price_cents,
            created_at.trunc_subsecs(6),
        );
        if let Some(phone) = optional(input.client_phone) {
            record = record.with_phone(phone);
        }
        if let Some(notes) = optional(input.notes) {
            record = record.with_notes(notes);
        }

        self.repo.insert_service(&record).await?;
        info!(id = %record.id, price_cents = record.price_cents, "service recorded");
        Ok(record)
    }

    /// Get a service by ID.
    pub async fn get_service(&self, id: ServiceId) -> Result<ServiceRecord, AppError> {
        self.repo
            .get_service(id)
            .await?
            .ok_or_else(|| AppError::ServiceNotFound(id.to_string()))
    }

    /// List services newest first, optionally filtered.
    pub async fn list_services(
        &self,
        filter: ServiceFilter,
    ) -> Result<Vec<ServiceRecord>, AppError> {
        let records = self.repo.list_services().await?;
        let term = filter.search.unwrap_or_default();

        Ok(records
            .into_iter()
            .filter(|r| r.matches(&term))
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect())
    }

    /// Full log, oldest first (used for export).
    pub async fn list_all_services(&self) -> Result<Vec<ServiceRecord>, AppError> {
        let mut records = self.repo.list_services().await?;
        records.reverse();
        Ok(records)
    }

    /// Delete a service, returning the removed record.
    pub async fn delete_service(&self, id: ServiceId) -> Result<ServiceRecord, AppError> {
        let record = self.get_service(id).await?;
        if !self.repo.delete_service(id).await? {
            return Err(AppError::ServiceNotFound(id.to_string()));
        }
        info!(id = %id, "service deleted");
        Ok(record)
    }

    pub async fn count_services(&self) -> Result<i64, AppError> {
        Ok(self.repo.count_services().await?)
    }

    // ========================
    // Reporting
    // ========================

    /// Revenue chart for `period`, as seen at `now` in its time zone.
    pub async fn revenue_chart<Tz: TimeZone>(
        &self,
        period: Period,
        now: &DateTime<Tz>,
        locale: Locale,
    ) -> Result<RevenueChart, AppError> {
        let records = self.repo.list_services().await?;
        debug!(records = records.len(), %period, "aggregating revenue");
        Ok(RevenueChart::build(&records, period, now, locale))
    }

    /// Dashboard stats as seen at `now` in its time zone.
    pub async fn dashboard_stats<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<DashboardStats, AppError> {
        let records = self.repo.list_services().await?;
        debug!(records = records.len(), "summarizing stats");
        Ok(summarize(&records, now))
    }
}

fn required(value: String, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
