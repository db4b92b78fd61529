//! Machine-readable catalog export.
//!
//! - table model + CSV load (`table`)
//! - per-table preparation: renames, value cleanup, metadata (`prep`)
//! - fixed-width MRT writer (`mrt`)
//! - bibliographic metadata (`meta`) and the `ReadMe` (`readme`)

pub mod meta;
pub mod mrt;
pub mod prep;
pub mod readme;
pub mod table;

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::AppError;

pub use meta::CatalogMeta;
pub use mrt::MrtFile;
pub use table::{Column, ColumnKind, Table};

const TABLE_EXPLANATION: &str = "machine-readable table";

/// Inputs and destination of a catalog export.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub table1: Option<PathBuf>,
    pub table3: Option<PathBuf>,
    pub table5: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub meta: Option<PathBuf>,
}

/// Prepare and write every configured table, then the ReadMe.
pub fn export_catalog(config: &CatalogConfig) -> Result<Vec<MrtFile>, AppError> {
    if config.table1.is_none() && config.table3.is_none() && config.table5.is_none() {
        return Err(AppError::input(
            "Nothing to export: pass at least one of --table1, --table3, --table5.",
        ));
    }

    let meta = match &config.meta {
        Some(path) => CatalogMeta::from_json_file(path)?,
        None => CatalogMeta::default(),
    };

    // Read and prepare everything before writing, so schema errors leave no
    // partial export behind.
    let mut tables = Vec::new();
    if let Some(path) = &config.table1 {
        tables.push(prep::prepare_table1(Table::from_csv_path(path, "table1")?));
    }
    if let Some(path) = &config.table3 {
        tables.push(prep::prepare_table3(Table::from_csv_path(path, "table3")?)?);
    }
    if let Some(path) = &config.table5 {
        tables.push(prep::prepare_table5(Table::from_csv_path(path, "table5")?)?);
    }

    fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::output(format!(
            "Failed to create output directory '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let files = tables
        .iter()
        .map(|t| mrt::write_mrt(&config.out_dir, t, &meta, TABLE_EXPLANATION))
        .collect::<Result<Vec<_>, _>>()?;
    readme::write_readme(&config.out_dir, &meta, &files)?;

    info!(dir = %config.out_dir.display(), tables = files.len(), "catalog export complete");
    Ok(files)
}
