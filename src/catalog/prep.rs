//! Preparation of the survey's published tables for archive export.
//!
//! - table 1: the main survey table, passed through as-is
//! - table 3: JCMT/SCUBA-2 450/850 um continuum fluxes and spectral indices
//! - table 5: HARP CO(3-2) radial-profile extents

use tracing::debug;

use crate::catalog::table::{Column, ColumnKind, NO_UNIT, Table};
use crate::error::AppError;

const TABLE3_META: [(&str, &str); 11] = [
    ("IRAS PSC identifier", NO_UNIT),
    ("JCMT/SCUBA2 450 um continuum flux", "Jy"),
    ("uncertainty in JCMT/SCUBA2 450 um continuum flux", "Jy"),
    ("JCMT/SCUBA2 450 um continuum flux quality flag (-1 if flux is 3sigma upper limit)", NO_UNIT),
    ("JCMT/SCUBA2 850 um continuum flux", "Jy"),
    ("uncertainty in JCMT/SCUBA2 850 um continuum flux", "Jy"),
    ("JCMT/SCUBA2 850 um continuum flux quality flag (-1 if flux is 3sigma upper limit)", NO_UNIT),
    ("spectral index (see Section 4.4 in paper)", NO_UNIT),
    ("lower bound of 68% confidence interval for spectral index", NO_UNIT),
    ("upper bound of 68% confidence interval for spectral index", NO_UNIT),
    ("quality flag for confidence interval (-99, 0, 1)", NO_UNIT),
];

const TABLE5_META: [(&str, &str); 5] = [
    ("IRAS PSC identifier", NO_UNIT),
    ("FWHM of Gaussian fit to radial profile of velocity-integrated intensity", "arcsec"),
    ("Full extent of Gaussian fit to radial profile of velocity-integrated intensity", "arcsec"),
    ("-1: extended emission is marginal, -2: extended emission not detected", NO_UNIT),
    ("Notes", NO_UNIT),
];

pub const TABLE5_ORDER: [&str; 5] = [
    "IRASPSC",
    "HARP_CO32_FWHM",
    "HARP_CO32_Extent",
    "HARP_CO32_Extent_flag",
    "HARP_CO32_Extent_Notes",
];

/// Table 1 keeps every column; descriptions default to the column names.
pub fn prepare_table1(table: Table) -> Table {
    debug!(columns = table.columns.len(), rows = table.n_rows(), "table 1 passed through");
    table
}

/// Table 3: drop the index column, prefix flux-like columns with `SCUBA2_`,
/// strip the `IRAS` prefix from source names, attach metadata.
pub fn prepare_table3(mut table: Table) -> Result<Table, AppError> {
    if table.has_column("col0") {
        table.remove_column("col0")?;
    }

    for col in table.columns.iter_mut().filter(|c| c.name.contains('F')) {
        col.name = format!("SCUBA2_{}", col.name);
    }
    table.column_mut("IRASPSC")?.map_values(|v| v.replace("IRAS", "").trim().to_string());
    table.describe(&TABLE3_META)?;

    debug!(columns = ?table.column_names(), rows = table.n_rows(), "prepared table 3");
    Ok(table)
}

/// Map a raw extent cell to its numeric text and flag.
///
/// `N` (marginal) becomes `-1`, `?` (not detected) becomes `-2`; both are
/// flagged and the extent itself is null. Anything else is a measured extent
/// with flag 0.
fn classify_extent(raw: Option<&str>) -> Result<(Option<String>, i64), String> {
    let Some(raw) = raw else {
        return Ok((None, 0));
    };
    let mapped = match raw.trim() {
        "N" => "-1",
        "?" => "-2",
        other => other,
    };
    if mapped.contains('-') {
        let flag: i64 = mapped
            .parse()
            .map_err(|_| format!("extent '{raw}' is neither a value nor a known code"))?;
        return Ok((None, flag));
    }
    mapped
        .parse::<f64>()
        .map_err(|_| format!("extent '{raw}' is not a number"))?;
    Ok((Some(mapped.to_string()), 0))
}

/// Table 5: rename HARP columns, split the extent codes into a flag column,
/// reorder, attach metadata.
pub fn prepare_table5(mut table: Table) -> Result<Table, AppError> {
    table.remove_column("SIMBAD ID")?;
    table.rename_column("FWHM (arcseconds)", "HARP_CO32_FWHM")?;
    table.rename_column("Extent (arcseconds)", "HARP_CO32_Extent")?;
    table.rename_column("Notes", "HARP_CO32_Extent_Notes")?;
    table.column_mut("IRASPSC")?.map_values(|v| v.replace("IRAS ", ""));

    let name = table.name.clone();
    let extent = table.column_mut("HARP_CO32_Extent")?;
    let mut flags = Vec::with_capacity(extent.values.len());
    for (row, cell) in extent.values.iter_mut().enumerate() {
        let (value, flag) = classify_extent(cell.as_deref())
            .map_err(|msg| AppError::input(format!("{name}: row {}: {msg}", row + 1)))?;
        *cell = value;
        flags.push(Some(flag.to_string()));
    }
    extent.kind = Some(ColumnKind::Float);
    table.push_column(Column::new("HARP_CO32_Extent_flag", flags).with_kind(ColumnKind::Integer));

    table.select(&TABLE5_ORDER)?;
    table.describe(&TABLE5_META)?;

    debug!(rows = table.n_rows(), "prepared table 5");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE3_CSV: &str = "\
col0,IRASPSC,F450,F450_err,F450_flag,F850,F850_err,F850_flag,alpha,alpha_lo,alpha_hi,alpha_flag
0,IRAS 00042+4248,0.512,0.061,0,0.081,0.007,0,1.9,1.7,2.1,0
1,IRAS 00084-1851,0.090,0.030,-1,0.012,0.004,0,2.3,1.8,2.9,1
";

    const TABLE5_CSV: &str = "\
IRASPSC,SIMBAD ID,FWHM (arcseconds),Extent (arcseconds),Notes
IRAS 00042+4248,KU And,17.2,31.5,
IRAS 01037+1219,WX Psc,15.0,N,marginal
IRAS 02168-0312,omi Cet,14.1,?,
";

    #[test]
    fn table3_renames_flux_columns_and_strips_prefix() {
        let t = Table::from_csv_reader(TABLE3_CSV.as_bytes(), "table3").unwrap();
        let t = prepare_table3(t).unwrap();

        assert_eq!(t.columns.len(), 11);
        assert_eq!(t.columns[1].name, "SCUBA2_F450");
        assert_eq!(t.columns[6].name, "SCUBA2_F850_flag");
        assert_eq!(t.columns[7].name, "alpha");
        assert_eq!(t.columns[1].unit, "Jy");
        assert_eq!(t.column("IRASPSC").unwrap().values[0].as_deref(), Some("00042+4248"));
    }

    #[test]
    fn table3_with_wrong_shape_is_rejected() {
        let csv = "IRASPSC,F450\nIRAS 1,0.1\n";
        let t = Table::from_csv_reader(csv.as_bytes(), "table3").unwrap();
        let err = prepare_table3(t).unwrap_err();
        assert_eq!(err.exit_code(), AppError::INPUT);
    }

    #[test]
    fn table5_flags_extent_codes() {
        let t = Table::from_csv_reader(TABLE5_CSV.as_bytes(), "table5").unwrap();
        let t = prepare_table5(t).unwrap();

        assert_eq!(t.column_names(), TABLE5_ORDER.to_vec());
        let extent = &t.column("HARP_CO32_Extent").unwrap().values;
        assert_eq!(extent, &vec![Some("31.5".to_string()), None, None]);
        let flags = &t.column("HARP_CO32_Extent_flag").unwrap().values;
        assert_eq!(flags, &vec![Some("0".into()), Some("-1".into()), Some("-2".into())]);
        assert_eq!(t.column("IRASPSC").unwrap().values[1].as_deref(), Some("01037+1219"));
        assert_eq!(t.column("HARP_CO32_FWHM").unwrap().unit, "arcsec");
    }

    #[test]
    fn table5_extent_is_exported_as_float() {
        let csv = "IRASPSC,SIMBAD ID,FWHM (arcseconds),Extent (arcseconds),Notes\n\
                   IRAS 00042+4248,KU And,17.2,30,\n\
                   IRAS 01037+1219,WX Psc,15.0,N,\n";
        let t = prepare_table5(Table::from_csv_reader(csv.as_bytes(), "table5").unwrap()).unwrap();
        let layout = crate::catalog::mrt::layout(&t);

        assert_eq!(layout[2].label, "HARP_CO32_Extent");
        assert_eq!(layout[2].format.code(), "F4.1");
        assert_eq!(layout[3].format.code(), "I2");
    }

    #[test]
    fn table5_rejects_unknown_extent_code() {
        let csv = "IRASPSC,SIMBAD ID,FWHM (arcseconds),Extent (arcseconds),Notes\nIRAS 1,X,1.0,maybe,\n";
        let t = Table::from_csv_reader(csv.as_bytes(), "table5").unwrap();
        assert!(prepare_table5(t).is_err());
    }
}
