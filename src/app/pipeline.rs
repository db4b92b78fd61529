//! The density workflow:
//! load -> partition -> aggregate/volume/density -> figure
//!
//! The LaTeX table is left to the caller so that nothing reaches stdout until
//! every stage has succeeded.

use std::path::PathBuf;

use tracing::info;

use crate::density::{TierPartition, bin_values, compute_density_report, partition_by_tier};
use crate::domain::{DensityReport, SurveyGeometry, SurveyTable, Tier};
use crate::error::AppError;
use crate::io::load_survey;
use crate::plot::{FigureConfig, RenderLabel, render_dpr_boxplot};

/// Everything `ness density` needs.
#[derive(Debug, Clone)]
pub struct DensityConfig {
    pub input: PathBuf,
    pub tier_column: String,
    pub dpr_column: String,
    pub geometry: SurveyGeometry,
    pub decimals: usize,
    /// `None` skips the figure.
    pub figure: Option<FigureConfig>,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("NESS_Table1_scaled.csv"),
            tier_column: "sample".to_string(),
            dpr_column: "GRAMS_DPR".to_string(),
            geometry: SurveyGeometry::default(),
            decimals: 1,
            figure: Some(FigureConfig::default()),
        }
    }
}

/// All computed outputs of a single density run.
#[derive(Debug, Clone)]
pub struct DensityRun {
    pub table: SurveyTable,
    pub partition: TierPartition,
    pub report: DensityReport,
    /// Axis label actually drawn, if a figure was written.
    pub figure_label: Option<RenderLabel>,
}

/// Load the survey and run the full pipeline.
///
/// The geometry is checked before the survey is read.
pub fn run_density(config: &DensityConfig) -> Result<DensityRun, AppError> {
    config.geometry.validate()?;
    let table = load_survey(&config.input, &config.tier_column, &config.dpr_column)?;
    run_stages(config, table)
}

/// Run the pipeline on an already loaded table.
pub fn run_density_on_table(config: &DensityConfig, table: SurveyTable) -> Result<DensityRun, AppError> {
    config.geometry.validate()?;
    run_stages(config, table)
}

/// Everything after loading. `config.geometry` is already validated.
fn run_stages(config: &DensityConfig, table: SurveyTable) -> Result<DensityRun, AppError> {
    if table.is_empty() {
        return Err(AppError::new(
            AppError::EMPTY,
            format!("Survey table '{}' has no data rows.", table.source.display()),
        ));
    }

    let partition = partition_by_tier(&table.records);
    let report = compute_density_report(&table.records, &partition, &config.geometry);
    info!(
        rows = table.len(),
        binned = report.totals.count,
        excluded = report.excluded_rows,
        "computed tier densities"
    );

    let figure_label = match &config.figure {
        Some(figure) => {
            let per_tier = Tier::ALL.map(|tier| bin_values(&table.records, partition.bin(tier)));
            Some(render_dpr_boxplot(&per_tier, figure)?)
        }
        None => None,
    };

    Ok(DensityRun {
        table,
        partition,
        report,
        figure_label,
    })
}
