//! Survey CSV ingest.
//!
//! The survey table is a CSV export of the catalog with a header row. Only two
//! columns matter here: the tier label and the dust production rate. Any other
//! column is ignored.
//!
//! The schema is strict: a missing column or a DPR cell that is not a finite,
//! non-negative number stops the run (exit code 2) before anything is written.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{ObjectRecord, SurveyTable};
use crate::error::AppError;

/// Load the survey table from a CSV file.
pub fn load_survey(path: &Path, tier_column: &str, dpr_column: &str) -> Result<SurveyTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open survey CSV '{}': {e}", path.display())))?;
    let table = read_survey(file, path, tier_column, dpr_column)?;
    info!(path = %path.display(), rows = table.len(), "loaded survey table");
    Ok(table)
}

/// Parse a survey table from any reader. `source` is only used for messages.
pub fn read_survey<R: Read>(
    reader: R,
    source: &Path,
    tier_column: &str,
    dpr_column: &str,
) -> Result<SurveyTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers of '{}': {e}", source.display())))?
        .clone();
    let header_map = build_header_map(&headers);

    let tier_idx = require_column(&header_map, &headers, tier_column, source)?;
    let dpr_idx = require_column(&header_map, &headers, dpr_column, source)?;
    debug!(tier_idx, dpr_idx, "resolved survey columns");

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV line numbers are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::input(format!("{}:{line}: CSV parse error: {e}", source.display()))
        })?;

        let label = record.get(tier_idx).unwrap_or("").to_string();
        let dpr_text = record.get(dpr_idx).unwrap_or("");
        let dpr = parse_dpr(dpr_text).map_err(|msg| {
            AppError::input(format!("{}:{line}: column '{dpr_column}': {msg}", source.display()))
        })?;

        records.push(ObjectRecord { line, label, dpr });
    }

    Ok(SurveyTable {
        source: source.to_path_buf(),
        tier_column: tier_column.to_string(),
        dpr_column: dpr_column.to_string(),
        records,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect()
}

fn require_column(
    header_map: &HashMap<String, usize>,
    headers: &StringRecord,
    name: &str,
    source: &Path,
) -> Result<usize, AppError> {
    let occurrences = headers.iter().filter(|h| *h == name).count();
    if occurrences > 1 {
        return Err(AppError::input(format!(
            "Survey CSV '{}' has {occurrences} columns named '{name}'.",
            source.display()
        )));
    }
    header_map.get(name).copied().ok_or_else(|| {
        let available: Vec<&str> = headers.iter().collect();
        AppError::input(format!(
            "Survey CSV '{}' has no column '{name}'. Available: {}",
            source.display(),
            available.join(", ")
        ))
    })
}

fn parse_dpr(s: &str) -> Result<f64, String> {
    if s.is_empty() {
        return Err("missing value".to_string());
    }
    let v: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !v.is_finite() {
        return Err(format!("'{s}' is not finite"));
    }
    if v < 0.0 {
        return Err(format!("negative DPR {v}"));
    }
    Ok(v)
}
