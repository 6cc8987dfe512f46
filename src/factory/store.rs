use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::models::{
    BatchQuality, EnergyMetrics, MachineTypes, MetricsSummary, Sourced, StatusEntry, Table,
};
use super::{aggregate, loader, status};

/// Read-only view over the loaded dataset.
///
/// Built once by the entry point and shared by handle; every accessor
/// recomputes from the table, nothing is cached.
#[derive(Debug, Clone)]
pub struct DataStore {
    table: Arc<Table>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl DataStore {
    pub fn new(table: Table) -> Self {
        Self {
            table: Arc::new(table),
            source: None,
            loaded_at: Utc::now(),
        }
    }

    /// Load from `path`, falling back to an empty table on any error.
    pub fn from_path(path: &Path) -> Self {
        Self {
            table: Arc::new(loader::load(path)),
            source: Some(path.to_path_buf()),
            loaded_at: Utc::now(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn has_data(&self) -> bool {
        !self.table.is_empty()
    }

    pub fn metrics(&self) -> Sourced<MetricsSummary> {
        let metrics = aggregate::summarize(&self.table, &mut rand::thread_rng());
        if metrics.is_synthetic() {
            debug!("No factory data loaded, serving synthetic metrics");
        }
        metrics
    }

    pub fn status(&self) -> Sourced<Vec<StatusEntry>> {
        let entries = status::classify(&self.table, &mut rand::thread_rng());
        if entries.is_synthetic() {
            debug!("No factory data loaded, serving synthetic line status");
        }
        entries
    }

    pub fn machine_types(&self) -> Sourced<MachineTypes> {
        aggregate::machine_types(&self.table)
    }

    pub fn batch_quality(&self) -> Sourced<BatchQuality> {
        aggregate::batch_quality(&self.table)
    }

    pub fn energy_metrics(&self) -> Sourced<EnergyMetrics> {
        aggregate::energy_metrics(&self.table)
    }
}
