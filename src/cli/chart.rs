//! Text rendering of revenue charts.

use anyhow::Result;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::application::RevenueChart;
use crate::domain::{format_cents, format_price, Cents, Period};

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    /// Bar length proportional to the busiest bucket
    Bar,
    /// Share of the period's total revenue
    Pie,
}

impl FromStr for ChartStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(ChartStyle::Bar),
            "pie" => Ok(ChartStyle::Pie),
            other => Err(format!("unknown chart style '{}'", other)),
        }
    }
}

fn title(period: Period) -> &'static str {
    match period {
        Period::Week => "Revenue, last 7 days",
        Period::Month => "Revenue, last 30 days",
        Period::Year => "Revenue, last 12 months",
    }
}

/// Number of bar cells for `value` out of `max`. Non-zero values get at least one.
fn bar_len(value: Cents, max: Cents) -> usize {
    if value <= 0 || max <= 0 {
        return 0;
    }
    let len = (value as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
    len.clamp(1, BAR_WIDTH)
}

pub fn render_chart_table(
    chart: &RevenueChart,
    style: ChartStyle,
    currency: &str,
) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{}", title(chart.period))?;
    writeln!(
        out,
        "From {} to {}",
        chart.from_date.format("%Y-%m-%d"),
        chart.generated_at.format("%Y-%m-%d %H:%M")
    )?;
    writeln!(out)?;

    let last_header = match style {
        ChartStyle::Bar => "",
        ChartStyle::Pie => "SHARE",
    };
    writeln!(
        out,
        "{:<8} {:>12} {:>9}  {}",
        "PERIOD", "REVENUE", "SERVICES", last_header
    )?;
    writeln!(out, "{}", "-".repeat(32 + BAR_WIDTH + 8))?;

    let max = chart.max_revenue();
    for bucket in &chart.buckets {
        let graphic = match style {
            ChartStyle::Bar => "#".repeat(bar_len(bucket.revenue, max)),
            ChartStyle::Pie => {
                let share = chart.share_of_total(bucket);
                let cells = (share / 100.0 * BAR_WIDTH as f64).round() as usize;
                format!("{:>5.1}% {}", share, "#".repeat(cells.min(BAR_WIDTH)))
            }
        };
        writeln!(
            out,
            "{:<8} {:>12} {:>9}  {}",
            bucket.label,
            format_price(bucket.revenue, currency),
            bucket.count,
            graphic
        )?;
    }

    writeln!(out, "{}", "-".repeat(32 + BAR_WIDTH + 8))?;
    writeln!(
        out,
        "{:<8} {:>12} {:>9}",
        "TOTAL",
        format_price(chart.total_revenue, currency),
        chart.total_count
    )?;

    Ok(out)
}

pub fn render_chart_csv(chart: &RevenueChart) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["label", "start", "end", "revenue", "count"])?;

    for bucket in &chart.buckets {
        writer.write_record([
            bucket.label.clone(),
            bucket.start.to_rfc3339(),
            bucket.end.to_rfc3339(),
            format_cents(bucket.revenue),
            bucket.count.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}
