//! Column aggregations over a [`Table`].
//!
//! Means skip missing (NaN) values; a column with no present values averages
//! to NaN. Empty tables are handed to [`fallback`](super::fallback).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::Rng;

use super::fallback::{self, round2};
use super::models::{
    BatchQuality, EnergyMetrics, MachineTypes, MetricsSummary, Row, Sourced, Table,
    TimeSeriesPoint,
};

/// Arithmetic mean of the present values.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

fn min_max<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((f64::NAN, f64::NAN), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn column(rows: &[&Row], field: fn(&Row) -> f64) -> f64 {
    mean(rows.iter().map(|r| field(r)))
}

/// Rows grouped by calendar date, ascending.
pub fn group_by_day(table: &Table) -> BTreeMap<NaiveDate, Vec<&Row>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&Row>> = BTreeMap::new();
    for row in table.rows() {
        groups.entry(row.day()).or_default().push(row);
    }
    groups
}

/// Global means plus one time-series point per calendar date.
pub fn summarize<R: Rng>(table: &Table, rng: &mut R) -> Sourced<MetricsSummary> {
    if table.is_empty() {
        return Sourced::synthetic(fallback::metrics(rng));
    }

    let rows: Vec<&Row> = table.rows().iter().collect();

    let mut time_series_data: Vec<TimeSeriesPoint> = group_by_day(table)
        .into_iter()
        .map(|(day, group)| TimeSeriesPoint {
            name: day.format("%Y-%m-%d").to_string(),
            production: column(&group, |r| r.production_volume),
            efficiency: column(&group, |r| r.machine_utilization),
            downtime: column(&group, |r| r.machine_downtime),
        })
        .collect();
    time_series_data.sort_by(|a, b| a.name.cmp(&b.name));

    Sourced::observed(MetricsSummary {
        production: round2(column(&rows, |r| r.production_volume)),
        efficiency: column(&rows, |r| r.machine_utilization),
        downtime: column(&rows, |r| r.machine_downtime),
        profit_margin: column(&rows, |r| r.profit_margin),
        time_series_data,
    })
}

/// Distinct machine types in order of first appearance.
pub fn machine_types(table: &Table) -> Sourced<MachineTypes> {
    if table.is_empty() {
        return Sourced::synthetic(fallback::machine_types());
    }

    let mut machine_types: Vec<String> = Vec::new();
    for row in table.rows() {
        if !machine_types.contains(&row.machine_type) {
            machine_types.push(row.machine_type.clone());
        }
    }
    Sourced::observed(MachineTypes { machine_types })
}

pub fn batch_quality(table: &Table) -> Sourced<BatchQuality> {
    if table.is_empty() {
        return Sourced::synthetic(fallback::batch_quality());
    }

    let values = || table.rows().iter().map(|r| r.batch_quality);
    let (min, max) = min_max(values());
    Sourced::observed(BatchQuality {
        average: mean(values()),
        min,
        max,
    })
}

pub fn energy_metrics(table: &Table) -> Sourced<EnergyMetrics> {
    if table.is_empty() {
        return Sourced::synthetic(fallback::energy_metrics());
    }

    let rows = table.rows();
    Sourced::observed(EnergyMetrics {
        consumption: mean(rows.iter().map(|r| r.energy_consumption)),
        efficiency: mean(rows.iter().map(|r| r.energy_efficiency)),
        emissions: mean(rows.iter().map(|r| r.co2_emissions)),
    })
}
