use anyhow::Result;
use std::io::Write;

use crate::application::ShopService;
use crate::domain::format_cents;

/// Exporter for writing the service log to various formats
pub struct Exporter<'a> {
    service: &'a ShopService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a ShopService) -> Self {
        Self { service }
    }

    /// Export services to CSV format, oldest first
    pub async fn export_services_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let services = self.service.list_all_services().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "created_at",
            "client_name",
            "client_phone",
            "service_type",
            "price",
            "notes",
        ])?;

        for record in &services {
            csv_writer.write_record([
                record.id.to_string(),
                record.created_at.to_rfc3339(),
                record.client_name.clone(),
                record.client_phone.clone().unwrap_or_default(),
                record.service_type.clone(),
                format_cents(record.price_cents),
                record.notes.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(services.len())
    }

    /// Export services as a pretty-printed JSON array, oldest first
    pub async fn export_services_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let services = self.service.list_all_services().await?;

        let json = serde_json::to_string_pretty(&services)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(services.len())
    }
}
