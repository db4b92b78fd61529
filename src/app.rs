//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - turns arguments into config values (geometry, figure, catalog)
//! - runs the requested workflow
//! - prints the LaTeX table / summaries

use std::io::Write;

use clap::Parser;
use tracing::info;

use crate::catalog::{CatalogConfig, export_catalog};
use crate::cli::{CatalogArgs, Command, DensityArgs, SynthArgs};
use crate::data::{SynthConfig, write_synthetic_survey};
use crate::domain::SurveyGeometry;
use crate::error::AppError;
use crate::plot::FigureConfig;

pub mod pipeline;

pub use pipeline::{DensityConfig, DensityRun};

/// Entry point for the `ness` binary.
pub fn run() -> Result<(), AppError> {
    // `ness` alone, or `ness -i file.csv`, means `ness density ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    crate::logging::init_logging(cli.verbose);

    match cli.command {
        Command::Density(args) => handle_density(args),
        Command::Catalog(args) => handle_catalog(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn handle_density(args: DensityArgs) -> Result<(), AppError> {
    let config = density_config_from_args(&args)?;
    let run = pipeline::run_density(&config)?;

    let table = crate::report::format_density_table(&run.report, config.decimals);
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(table.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| AppError::output(format!("Failed to write table to stdout: {e}")))?;

    if !args.quiet {
        let figure = config.figure.as_ref().map(|f| f.path.as_path());
        eprint!("{}", crate::report::format_run_summary(&run.table, &run.report, figure));
    }
    Ok(())
}

fn handle_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let config = CatalogConfig {
        table1: args.table1,
        table3: args.table3,
        table5: args.table5,
        out_dir: args.out_dir,
        meta: args.meta,
    };
    let files = export_catalog(&config)?;
    for f in &files {
        info!(file = %f.file_name, records = f.records, lrecl = f.lrecl, "exported");
    }
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = SynthConfig {
        out: args.out,
        per_tier: args.per_tier,
        seed: args.seed,
        sigma_dex: args.sigma_dex,
    };
    let rows = write_synthetic_survey(&config)?;
    eprintln!("Wrote {rows} synthetic rows to {}", config.out.display());
    Ok(())
}

pub fn density_config_from_args(args: &DensityArgs) -> Result<DensityConfig, AppError> {
    let geometry = match &args.geometry {
        Some(path) => SurveyGeometry::from_json_file(path)?,
        None => SurveyGeometry::default(),
    };

    let figure = (!args.no_figure).then(|| FigureConfig {
        path: args.figure.clone(),
        width: args.width,
        height: args.height,
        rich_labels: !args.plain_labels,
        ..FigureConfig::default()
    });

    Ok(DensityConfig {
        input: args.input.clone(),
        tier_column: args.tier_column.clone(),
        dpr_column: args.dpr_column.clone(),
        geometry,
        decimals: args.decimals,
        figure,
    })
}

fn is_verbosity_flag(arg: &str) -> bool {
    arg == "--verbose" || (arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c == 'v'))
}

/// Rewrite argv so `ness` defaults to `ness density`.
///
/// Rules (leading `-v`/`--verbose` flags are skipped over):
/// - `ness`                       -> `ness density`
/// - `ness -i survey.csv ...`     -> `ness density -i survey.csv ...`
/// - `ness --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let pos = argv
        .iter()
        .skip(1)
        .position(|a| !is_verbosity_flag(a))
        .map(|p| p + 1);

    let Some(pos) = pos else {
        argv.push("density".to_string());
        return argv;
    };

    let arg = argv[pos].as_str();
    let is_top_level_help_or_version = matches!(arg, "-h" | "--help" | "-V" | "--version" | "help");
    let is_subcommand = matches!(arg, "density" | "catalog" | "synth");
    if is_top_level_help_or_version || is_subcommand {
        return argv;
    }

    // A flag here belongs to `density`.
    if arg.starts_with('-') {
        argv.insert(pos, "density".to_string());
    }
    argv
}
