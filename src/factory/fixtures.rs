//! Row builders shared by unit tests.

use chrono::NaiveDate;

use super::models::{Row, Table};

/// A row dated `date` (`YYYY-MM-DD`) with neutral values everywhere else.
pub fn row(date: &str) -> Row {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    Row {
        factory_id: Some("F1".to_string()),
        date,
        location: Some("Plant A".to_string()),
        machine_type: "Extruder".to_string(),
        machine_utilization: 60.0,
        machine_downtime: 1.0,
        machine_age: 3.0,
        batch: "B1".to_string(),
        batch_quality: 90.0,
        production_volume: 100.0,
        profit_margin: 20.0,
        energy_consumption: 700.0,
        energy_efficiency: 1.5,
        co2_emissions: 600.0,
    }
}

pub fn with_utilization(mut row: Row, utilization: f64) -> Row {
    row.machine_utilization = utilization;
    row
}

pub fn with_production(mut row: Row, production: f64) -> Row {
    row.production_volume = production;
    row
}

pub fn with_machine(mut row: Row, machine_type: &str, batch: &str) -> Row {
    row.machine_type = machine_type.to_string();
    row.batch = batch.to_string();
    row
}

pub fn table(rows: Vec<Row>) -> Table {
    Table::new(rows)
}
