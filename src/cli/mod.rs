//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! density/catalog code: args are converted into plain config structs in
//! `app` before anything runs.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ness",
    version,
    about = "NESS dust-production-rate densities, DPR figure, and catalog export"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Per-tier DPR densities: print the LaTeX table and write the box-plot figure.
    Density(DensityArgs),
    /// Write machine-readable tables (MRT) and a ReadMe for archive submission.
    Catalog(CatalogArgs),
    /// Write a synthetic survey CSV with the same layout as the real one.
    Synth(SynthArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct DensityArgs {
    /// Survey table (CSV with a header row).
    #[arg(short, long, value_name = "CSV", default_value = "NESS_Table1_scaled.csv")]
    pub input: PathBuf,

    /// Column holding the tier label.
    #[arg(long, default_value = "sample")]
    pub tier_column: String,

    /// Column holding the dust production rate (M☉/yr).
    #[arg(long, default_value = "GRAMS_DPR")]
    pub dpr_column: String,

    /// JSON file replacing the built-in survey geometry.
    #[arg(long, value_name = "JSON")]
    pub geometry: Option<PathBuf>,

    /// Mantissa decimals in the LaTeX table.
    #[arg(long, default_value_t = 1)]
    pub decimals: usize,

    /// Output path of the SVG figure.
    #[arg(long, value_name = "SVG", default_value = "NESS_DPR_density.svg")]
    pub figure: PathBuf,

    /// Skip the figure.
    #[arg(long)]
    pub no_figure: bool,

    /// Use the plain ASCII axis label instead of the Unicode one.
    #[arg(long)]
    pub plain_labels: bool,

    /// Figure width (px).
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Figure height (px).
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Do not print the run summary on stderr.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct CatalogArgs {
    /// Main survey table CSV (all columns exported).
    #[arg(long, value_name = "CSV")]
    pub table1: Option<PathBuf>,

    /// SCUBA-2 continuum flux table CSV.
    #[arg(long, value_name = "CSV")]
    pub table3: Option<PathBuf>,

    /// HARP CO(3-2) extent table CSV.
    #[arg(long, value_name = "CSV")]
    pub table5: Option<PathBuf>,

    /// Directory for the .mrt files and the ReadMe.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// JSON file overriding the catalog title/authors/abstract.
    #[arg(long, value_name = "JSON")]
    pub meta: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct SynthArgs {
    /// Output CSV.
    #[arg(short, long, value_name = "CSV", default_value = "synthetic_survey.csv")]
    pub out: PathBuf,

    /// Rows generated per tier.
    #[arg(long, default_value_t = 40)]
    pub per_tier: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Log-normal width of the DPR distribution (dex).
    #[arg(long, default_value_t = 0.8)]
    pub sigma_dex: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_defaults() {
        let cli = Cli::parse_from(["ness", "density"]);
        let Command::Density(args) = cli.command else { panic!("expected density") };
        assert_eq!(args.input, PathBuf::from("NESS_Table1_scaled.csv"));
        assert_eq!(args.dpr_column, "GRAMS_DPR");
        assert_eq!(args.decimals, 1);
        assert!(!args.no_figure);
    }

    #[test]
    fn global_verbosity_counts() {
        let cli = Cli::parse_from(["ness", "-vv", "synth", "--seed", "3"]);
        assert_eq!(cli.verbose, 2);
        let Command::Synth(args) = cli.command else { panic!("expected synth") };
        assert_eq!(args.seed, 3);
    }
}
