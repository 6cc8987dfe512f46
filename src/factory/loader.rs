//! Reads the factory dataset into a [`Table`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{info, warn};

use super::models::{Row, Table};
use crate::errors::DataError;

/// Load the dataset at `path`. Any failure is logged and yields an empty table.
pub fn load(path: &Path) -> Table {
    match try_load(path) {
        Ok(table) => {
            info!(path = %path.display(), rows = table.len(), "Loaded factory data");
            table
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Error loading factory data, serving fallback values");
            Table::empty()
        }
    }
}

/// Load the dataset at `path`, surfacing the first failure.
pub fn try_load(path: &Path) -> Result<Table, DataError> {
    if path.as_os_str().is_empty() {
        return Err(DataError::NoPath);
    }
    let file = File::open(path).map_err(|e| DataError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_table(file, path)
}

/// Parse CSV content from any reader. `origin` only labels errors.
pub fn read_table<R: Read>(reader: R, origin: &Path) -> Result<Table, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    reader.headers().map_err(|e| DataError::Header {
        path: origin.to_path_buf(),
        source: e,
    })?;

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<Row>().enumerate() {
        let row = record.map_err(|e| DataError::Row {
            path: origin.to_path_buf(),
            row: index as u64 + 1,
            source: e,
        })?;
        rows.push(row);
    }

    Ok(Table::new(rows))
}
