use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::application::{NewService, ServiceFilter, ShopService};
use crate::domain::calendar::start_of_day;
use crate::domain::{format_price, parse_price, Locale, Period, ServiceRecord};

mod chart;

pub use chart::{ChartStyle, render_chart_csv, render_chart_table};

/// How a report is printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// Parse `value`, accepting only the formats in `valid`.
    fn parse_among(value: &str, valid: &[OutputFormat]) -> Result<Self> {
        let names = valid.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ");
        match value.parse::<OutputFormat>() {
            Ok(format) if valid.contains(&format) => Ok(format),
            _ => anyhow::bail!("Unknown output format '{}'. Valid: {}", value, names),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Barberlog - Barbershop service log and revenue dashboard
#[derive(Parser)]
#[command(name = "barberlog")]
#[command(about = "A local-first service log and revenue dashboard for barbershops")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "barberlog.db")]
    pub database: String,

    /// Language for chart labels and dates: es, en
    #[arg(long, default_value = "es", global = true)]
    pub locale: String,

    /// Currency symbol shown in front of amounts
    #[arg(long, default_value = "$", global = true)]
    pub currency: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a service performed for a client
    Record {
        /// Client name
        client: String,

        /// Service type (e.g., "Fade", "Classic cut", "Beard trim")
        #[arg(short, long)]
        service: String,

        /// Price (e.g., "15.00" or "15")
        #[arg(short, long)]
        price: String,

        /// Client phone number
        #[arg(long)]
        phone: Option<String>,

        /// Additional notes (preferences, observations)
        #[arg(short, long)]
        notes: Option<String>,

        /// When the service happened (YYYY-MM-DD or RFC 3339, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List recorded services, newest first
    List {
        /// Search by client, service type or phone
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of services to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show detailed service information
    Show {
        /// Service ID
        id: String,
    },

    /// Delete a service record
    Delete {
        /// Service ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show dashboard stats: totals, today, this month, average per service
    Stats {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Revenue chart over a recent period
    Chart {
        /// Period: week (7 days), month (30 days), year (12 months)
        #[arg(short, long, default_value = "week")]
        period: String,

        /// Chart style: bar, pie
        #[arg(long, default_value = "bar")]
        style: String,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export the service log to CSV or JSON
    Export {
        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "barberlog=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let locale: Locale = self.locale.parse().map_err(|e| {
            anyhow::anyhow!(
                "Invalid locale '{}'. Valid: es, en. Error: {}",
                self.locale,
                e
            )
        })?;
        let currency = self.currency.as_str();

        match self.command {
            Commands::Init => {
                let service = ShopService::init(&self.database).await?;
                let count = service.count_services().await?;
                println!(
                    "Database initialized: {} ({} services)",
                    self.database, count
                );
            }

            Commands::Record {
                client,
                service: service_type,
                price,
                phone,
                notes,
                date,
            } => {
                let service = ShopService::connect(&self.database).await?;
                let price_cents =
                    parse_price(&price).context("Invalid price. Use '15.00' or '15'")?;

                let created_at = match date {
                    Some(date_str) => parse_date(&date_str, &Local).with_context(|| {
                        format!(
                            "Invalid date '{}'. Use YYYY-MM-DD or RFC 3339",
                            date_str
                        )
                    })?,
                    None => Utc::now(),
                };

                let record = service
                    .record_service(
                        NewService {
                            client_name: client,
                            client_phone: phone,
                            service_type,
                            price_cents,
                            notes,
                        },
                        created_at,
                    )
                    .await?;

                println!(
                    "Recorded service: {} for {} ({})",
                    format_price(record.price_cents, currency),
                    record.client_name,
                    record.id
                );
            }

            Commands::List { search, limit } => {
                let service = ShopService::connect(&self.database).await?;
                run_list_command(&service, search, limit, locale, currency).await?;
            }

            Commands::Show { id } => {
                let service = ShopService::connect(&self.database).await?;
                let service_id = parse_id(&id)?;
                let record = service.get_service(service_id).await?;
                print_service(&record, locale, currency);
            }

            Commands::Delete { id, yes } => {
                let service = ShopService::connect(&self.database).await?;
                let service_id = parse_id(&id)?;
                let record = service.get_service(service_id).await?;

                if !yes && !confirm_delete(&record, currency)? {
                    println!("Cancelled.");
                    return Ok(());
                }

                let removed = service.delete_service(service_id).await?;
                println!(
                    "Deleted service: {} for {} ({})",
                    format_price(removed.price_cents, currency),
                    removed.client_name,
                    removed.id
                );
            }

            Commands::Stats { format } => {
                let format =
                    OutputFormat::parse_among(&format, &[OutputFormat::Table, OutputFormat::Json])?;
                let service = ShopService::connect(&self.database).await?;
                run_stats_command(&service, format, locale, currency).await?;
            }

            Commands::Chart {
                period,
                style,
                format,
            } => {
                let format = OutputFormat::parse_among(
                    &format,
                    &[OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv],
                )?;
                let service = ShopService::connect(&self.database).await?;
                let period: Period = period.parse().map_err(|e| {
                    anyhow::anyhow!(
                        "Invalid period '{}'. Valid: week, month, year. Error: {}",
                        period,
                        e
                    )
                })?;
                let style: ChartStyle = style.parse().map_err(|e| {
                    anyhow::anyhow!("Invalid style '{}'. Valid: bar, pie. Error: {}", style, e)
                })?;

                let chart = service.revenue_chart(period, &Local::now(), locale).await?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&chart)?),
                    OutputFormat::Csv => print!("{}", render_chart_csv(&chart)?),
                    OutputFormat::Table => print!("{}", render_chart_table(&chart, style, currency)?),
                }
            }

            Commands::Export { format, output } => {
                let service = ShopService::connect(&self.database).await?;
                run_export_command(&service, &format, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_list_command(
    service: &ShopService,
    search: Option<String>,
    limit: Option<usize>,
    locale: Locale,
    currency: &str,
) -> Result<()> {
    let services = service
        .list_services(ServiceFilter { search, limit })
        .await?;

    if services.is_empty() {
        println!("No services found.");
        return Ok(());
    }

    println!(
        "{:<19} {:<20} {:<18} {:>10}  ID",
        "DATE", "CLIENT", "SERVICE", "PRICE"
    );
    println!("{}", "-".repeat(108));

    for record in &services {
        let date = locale.format_timestamp(&record.created_at.with_timezone(&Local));
        println!(
            "{:<19} {:<20} {:<18} {:>10}  {}",
            date,
            truncate(&record.client_name, 20),
            truncate(&record.service_type, 18),
            format_price(record.price_cents, currency),
            record.id
        );
    }

    Ok(())
}

fn print_service(record: &ServiceRecord, locale: Locale, currency: &str) {
    println!("Service: {}", record.id);
    println!("  Client:   {}", record.client_name);
    if let Some(phone) = &record.client_phone {
        println!("  Phone:    {}", phone);
    }
    println!("  Service:  {}", record.service_type);
    println!("  Price:    {}", format_price(record.price_cents, currency));
    println!(
        "  Date:     {}",
        locale.format_timestamp(&record.created_at.with_timezone(&Local))
    );
    if let Some(notes) = &record.notes {
        println!("  Notes:    {}", notes);
    }
}

fn confirm_delete(record: &ServiceRecord, currency: &str) -> Result<bool> {
    print!(
        "Delete service for {} ({}, {})? This cannot be undone. [y/N] ",
        record.client_name,
        record.service_type,
        format_price(record.price_cents, currency)
    );
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn run_stats_command(
    service: &ShopService,
    format: OutputFormat,
    locale: Locale,
    currency: &str,
) -> Result<()> {
    let now = Local::now();
    let stats = service.dashboard_stats(&now).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Table | OutputFormat::Csv => {
            println!("Dashboard ({})", locale.format_timestamp(&now));
            println!();
            println!(
                "{:<22} {:>12}  {}",
                "Total services", stats.total_services, "all-time records"
            );
            println!(
                "{:<22} {:>12}  {} services",
                "Revenue today",
                format_price(stats.today.revenue, currency),
                stats.today.count
            );
            println!(
                "{:<22} {:>12}  {} services",
                "Revenue this month",
                format_price(stats.month.revenue, currency),
                stats.month.count
            );
            println!(
                "{:<22} {:>12}  {}",
                "Average per service",
                format_price(stats.average_per_service, currency),
                "this month"
            );
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &ShopService,
    format: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::stdout;

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        "csv" => exporter.export_services_csv(writer).await?,
        "json" => exporter.export_services_json(writer).await?,
        other => anyhow::bail!("Unknown export format '{}'. Valid: csv, json", other),
    };

    if let Some(path) = output {
        eprintln!("Exported {} services to {}", count, path);
    }

    Ok(())
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).context("Invalid service ID format (expected UUID)")
}

/// Truncate to `max_len` characters, marking the cut with "...".
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a user-supplied date. A bare `YYYY-MM-DD` means local midnight in `tz`.
fn parse_date<Tz: TimeZone>(date_str: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(at.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .context("Date must be in YYYY-MM-DD or RFC 3339 format")?;

    Ok(start_of_day(tz, date).with_timezone(&Utc))
}
