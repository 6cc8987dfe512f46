//! Print computed views as JSON (`floorwatch report`).

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use floorwatch::config::FloorConfig;
use floorwatch::factory::loader;
use floorwatch::factory::models::Sourced;
use floorwatch::factory::store::DataStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportSection {
    Metrics,
    Status,
    MachineTypes,
    BatchQuality,
    Energy,
    All,
}

fn to_value<T: Serialize>(sourced: Sourced<T>) -> Result<Value> {
    serde_json::to_value(sourced.value).context("Failed to serialize report")
}

/// Build the JSON document for `section`. Single sections match the HTTP
/// response bodies; `All` nests them under their endpoint names.
pub fn render_report(store: &DataStore, section: ReportSection) -> Result<Value> {
    let value = match section {
        ReportSection::Metrics => to_value(store.metrics())?,
        ReportSection::Status => to_value(store.status())?,
        ReportSection::MachineTypes => to_value(store.machine_types())?,
        ReportSection::BatchQuality => to_value(store.batch_quality())?,
        ReportSection::Energy => to_value(store.energy_metrics())?,
        ReportSection::All => serde_json::json!({
            "origin": if store.has_data() { "observed" } else { "synthetic" },
            "metrics": to_value(store.metrics())?,
            "status": to_value(store.status())?,
            "machine_types": to_value(store.machine_types())?,
            "batch_quality": to_value(store.batch_quality())?,
            "energy_metrics": to_value(store.energy_metrics())?,
        }),
    };
    Ok(value)
}

pub fn cmd_report(config: &FloorConfig, section: ReportSection, strict: bool) -> Result<()> {
    let path = config.data_path();
    let store = if strict {
        let table = loader::try_load(&path)
            .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
        DataStore::new(table)
    } else {
        DataStore::from_path(&path)
    };
    info!(rows = store.table().len(), ?section, "Rendering report");

    let report = render_report(&store, section)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
