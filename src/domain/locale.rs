use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Period;

const ES_WEEKDAYS: [&str; 7] = ["lun", "mar", "mié", "jue", "vie", "sáb", "dom"];
const EN_WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const ES_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];
const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Display language for chart labels and dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    pub fn weekday_abbrev(&self, date: NaiveDate) -> &'static str {
        let idx = date.weekday().num_days_from_monday() as usize;
        match self {
            Locale::Es => ES_WEEKDAYS[idx],
            Locale::En => EN_WEEKDAYS[idx],
        }
    }

    pub fn month_abbrev(&self, date: NaiveDate) -> &'static str {
        let idx = date.month0() as usize;
        match self {
            Locale::Es => ES_MONTHS[idx],
            Locale::En => EN_MONTHS[idx],
        }
    }

    /// Short label for a chart bucket starting on `start`.
    pub fn bucket_label(&self, period: Period, start: NaiveDate) -> String {
        match period {
            Period::Week => format!("{} {}", self.weekday_abbrev(start), start.day()),
            Period::Month => format!("{} {}", start.day(), self.month_abbrev(start)),
            Period::Year => self.month_abbrev(start).to_string(),
        }
    }

    /// Date and time in the viewer's zone, e.g. "13 oct 2024, 09:05".
    pub fn format_timestamp<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String {
        let date = at.date_naive();
        format!(
            "{:02} {} {}, {:02}:{:02}",
            date.day(),
            self.month_abbrev(date),
            date.year(),
            at.hour(),
            at.minute()
        )
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "es-es" => Ok(Locale::Es),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
