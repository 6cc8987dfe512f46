//! Placeholder values served when no dataset is loaded.
//!
//! Every generator takes the random source as a parameter so callers can use
//! `thread_rng()` in production and a seeded `StdRng` in tests.

use rand::Rng;
use rand::seq::SliceRandom;

use super::models::{
    BatchQuality, EnergyMetrics, LineStatus, MachineTypes, MetricsSummary, StatusEntry,
    TimeSeriesPoint,
};

pub const PRODUCTION_RANGE: (f64, f64) = (1000.0, 1500.0);
pub const EFFICIENCY_RANGE: (f64, f64) = (85.0, 95.0);
pub const DOWNTIME_RANGE: (f64, f64) = (2.0, 4.0);
pub const PROFIT_MARGIN_RANGE: (f64, f64) = (20.0, 30.0);

pub const POINT_PRODUCTION_RANGE: (f64, f64) = (1500.0, 4500.0);
pub const POINT_EFFICIENCY_RANGE: (f64, f64) = (65.0, 95.0);
pub const POINT_DOWNTIME_RANGE: (f64, f64) = (0.5, 5.0);

/// Day labels 1, 6, 11, 16, 21, 26.
const POINT_DAYS: std::ops::Range<u32> = 1..31;
const POINT_DAY_STEP: usize = 5;

const LINE_COUNT: u32 = 5;
/// This line always reports zero efficiency.
const IDLE_LINE: u32 = 4;
const LINE_STATUSES: [(LineStatus, f64); 3] = [
    (LineStatus::Operational, 0.7),
    (LineStatus::Warning, 0.2),
    (LineStatus::Down, 0.1),
];

/// Round to 2 decimals from the exact binary value, ties to even.
pub(crate) fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

fn draw<R: Rng>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    round2(rng.gen_range(low..=high))
}

pub fn metrics<R: Rng>(rng: &mut R) -> MetricsSummary {
    let time_series_data = POINT_DAYS
        .step_by(POINT_DAY_STEP)
        .map(|day| TimeSeriesPoint {
            name: format!("Day {}", day),
            production: draw(rng, POINT_PRODUCTION_RANGE),
            efficiency: draw(rng, POINT_EFFICIENCY_RANGE),
            downtime: draw(rng, POINT_DOWNTIME_RANGE),
        })
        .collect();

    MetricsSummary {
        production: draw(rng, PRODUCTION_RANGE),
        efficiency: draw(rng, EFFICIENCY_RANGE),
        downtime: draw(rng, DOWNTIME_RANGE),
        profit_margin: draw(rng, PROFIT_MARGIN_RANGE),
        time_series_data,
    }
}

pub fn status<R: Rng>(rng: &mut R) -> Vec<StatusEntry> {
    (1..=LINE_COUNT)
        .map(|line| {
            let status = LINE_STATUSES
                .choose_weighted(rng, |(_, weight)| *weight)
                .map(|(status, _)| *status)
                .unwrap_or(LineStatus::Operational);
            let efficiency = if line == IDLE_LINE {
                "0%".to_string()
            } else {
                format!("{}%", rng.gen_range(60..=98))
            };
            StatusEntry {
                id: format!("line-{}", line),
                name: format!("Production Line {}", line),
                status,
                efficiency,
                last_maintenance: format!("{} days ago", rng.gen_range(1..=14)),
            }
        })
        .collect()
}

pub fn machine_types() -> MachineTypes {
    MachineTypes {
        machine_types: vec![
            "Type 1".to_string(),
            "Type 2".to_string(),
            "Type 3".to_string(),
        ],
    }
}

pub fn batch_quality() -> BatchQuality {
    BatchQuality {
        average: 85.0,
        min: 80.0,
        max: 95.0,
    }
}

pub fn energy_metrics() -> EnergyMetrics {
    EnergyMetrics {
        consumption: 800.0,
        efficiency: 1.5,
        emissions: 800.0,
    }
}
