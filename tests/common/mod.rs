// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use barberlog::application::{NewService, ShopService};
use barberlog::domain::{Cents, ServiceRecord};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(ShopService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = ShopService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// The shop's time zone in tests: UTC+01:00
pub fn shop_tz() -> FixedOffset {
    FixedOffset::east_opt(3600).unwrap()
}

/// A local wall-clock time in the shop's zone
pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    shop_tz().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// "Now" for dashboard tests: Thursday 2024-10-17, 16:00 local
pub fn now() -> DateTime<FixedOffset> {
    local(2024, 10, 17, 16, 0)
}

pub fn new_service(client: &str, service_type: &str, price_cents: Cents) -> NewService {
    NewService {
        client_name: client.to_string(),
        service_type: service_type.to_string(),
        price_cents,
        ..Default::default()
    }
}

/// Record a service at a given local time
pub async fn record_at(
    service: &ShopService,
    client: &str,
    price_cents: Cents,
    at: DateTime<FixedOffset>,
) -> Result<ServiceRecord> {
    Ok(service
        .record_service(new_service(client, "Cut", price_cents), at.with_timezone(&Utc))
        .await?)
}
