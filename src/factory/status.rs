//! Line status for the most recent observations.

use rand::Rng;

use super::fallback;
use super::models::{LineStatus, Row, Sourced, StatusEntry, Table};

/// Utilization at or above this is operational.
pub const OPERATIONAL_THRESHOLD: f64 = 55.0;
/// Utilization at or above this (and below operational) is a warning.
pub const WARNING_THRESHOLD: f64 = 50.0;

impl LineStatus {
    /// Step function over machine utilization. NaN is down.
    pub fn from_utilization(utilization: f64) -> Self {
        if utilization >= OPERATIONAL_THRESHOLD {
            Self::Operational
        } else if utilization >= WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Down
        }
    }
}

/// Render a float the way the dashboard has always shown it: shortest
/// round-trip digits, integral values keep one decimal (`59.0`), and very
/// small or large magnitudes switch to exponent form (`1e-05`, `1e+16`).
///
/// Utilization is always parsed as a float column, so a whole-number export
/// still renders as `59.0`, never `59`.
pub fn display_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        return format!("{}inf", sign);
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return exponent_form(value);
    }
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// `1.5e-7` becomes `1.5e-07`: signed exponent, at least two digits.
fn exponent_form(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

fn entry(index: usize, row: &Row) -> StatusEntry {
    StatusEntry {
        id: format!("line-{}", index),
        name: format!("{} - {}", row.machine_type, row.batch),
        status: LineStatus::from_utilization(row.machine_utilization),
        efficiency: format!("{}%", display_float(row.machine_utilization)),
        last_maintenance: if row.machine_age.is_nan() {
            "nan years".to_string()
        } else {
            format!("{:.1} years", row.machine_age)
        },
    }
}

/// Classify every row stamped with the table's latest date.
///
/// Ids are the row's position in the full table, so they shift if the
/// dataset is reordered between loads.
pub fn classify<R: Rng>(table: &Table, rng: &mut R) -> Sourced<Vec<StatusEntry>> {
    let Some(latest) = table.rows().iter().map(|r| r.date).max() else {
        return Sourced::synthetic(fallback::status(rng));
    };

    let entries = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.date == latest)
        .map(|(index, row)| entry(index, row))
        .collect();

    Sourced::observed(entries)
}
