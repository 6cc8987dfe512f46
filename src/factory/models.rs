use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

// ── Observations ──────────────────────────────────────────────────────

/// One production observation, one CSV line.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Row {
    #[serde(rename = "Factory ID", default)]
    pub factory_id: Option<String>,
    #[serde(rename = "Date", deserialize_with = "deserialize_timestamp")]
    pub date: NaiveDateTime,
    #[serde(rename = "Location", default)]
    pub location: Option<String>,
    #[serde(rename = "Machine Type")]
    pub machine_type: String,
    #[serde(rename = "Machine Utilization (%)", deserialize_with = "deserialize_measure")]
    pub machine_utilization: f64,
    #[serde(rename = "Machine Downtime (hours)", deserialize_with = "deserialize_measure")]
    pub machine_downtime: f64,
    #[serde(rename = "Machine Age (years)", deserialize_with = "deserialize_measure")]
    pub machine_age: f64,
    #[serde(rename = "Batch")]
    pub batch: String,
    #[serde(rename = "Batch Quality (Pass %)", deserialize_with = "deserialize_measure")]
    pub batch_quality: f64,
    #[serde(rename = "Production Volume (units)", deserialize_with = "deserialize_measure")]
    pub production_volume: f64,
    #[serde(rename = "Profit Margin (%)", deserialize_with = "deserialize_measure")]
    pub profit_margin: f64,
    #[serde(rename = "Energy Consumption (kWh)", deserialize_with = "deserialize_measure")]
    pub energy_consumption: f64,
    #[serde(rename = "Energy Efficiency Rating", deserialize_with = "deserialize_measure")]
    pub energy_efficiency: f64,
    #[serde(rename = "CO2 Emissions (kg)", deserialize_with = "deserialize_measure")]
    pub co2_emissions: f64,
}

impl Row {
    /// Calendar date of the observation, time of day dropped.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

/// Cell values spreadsheet and dataframe exports use for a missing value.
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// Empty cells and missing markers become NaN; anything else must parse.
pub(crate) fn deserialize_measure<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(f64::NAN);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| serde::de::Error::custom(format!("invalid number '{}'", trimmed)))
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a date column value, with or without a time of day.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised date '{}'", raw.trim())))
}

/// Ordered rows of the dataset. Empty when nothing could be loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

// ── Provenance ────────────────────────────────────────────────────────

/// Whether a value was computed from the dataset or generated as a placeholder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Observed,
    Synthetic,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Observed => "observed",
            Self::Synthetic => "synthetic",
        }
    }
}

/// A value tagged with its [`Origin`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub origin: Origin,
    pub value: T,
}

impl<T> Sourced<T> {
    pub fn observed(value: T) -> Self {
        Self {
            origin: Origin::Observed,
            value,
        }
    }

    pub fn synthetic(value: T) -> Self {
        Self {
            origin: Origin::Synthetic,
            value,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == Origin::Synthetic
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            origin: self.origin,
            value: f(self.value),
        }
    }
}

// ── API view types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesPoint {
    pub name: String,
    pub production: f64,
    pub efficiency: f64,
    pub downtime: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub production: f64,
    pub efficiency: f64,
    pub downtime: f64,
    pub profit_margin: f64,
    pub time_series_data: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Operational,
    Warning,
    Down,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Warning => "warning",
            Self::Down => "down",
        }
    }
}

impl FromStr for LineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operational" => Ok(Self::Operational),
            "warning" => Ok(Self::Warning),
            "down" => Ok(Self::Down),
            _ => Err(format!("Invalid line status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub id: String,
    pub name: String,
    pub status: LineStatus,
    pub efficiency: String,
    pub last_maintenance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineTypes {
    pub machine_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchQuality {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyMetrics {
    pub consumption: f64,
    pub efficiency: f64,
    pub emissions: f64,
}

// ── Bot payloads ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotMessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotResponse {
    pub message: String,
}
