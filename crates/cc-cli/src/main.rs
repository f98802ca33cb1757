//! CohortComp CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cc_data::{classify_columns, read_csv, DataFrame, GroupingConfig};
use cc_stats::GroupSummaries;

#[derive(Parser)]
#[command(name = "cohortcomp")]
#[command(about = "CohortComp - two-group comparison for clinical tabular data")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dataset shape and per-column summary statistics
    Describe {
        /// Input dataset (.csv or .tsv)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve the grouping column and classify target candidates
    Columns {
        /// Input dataset (.csv or .tsv)
        #[arg(short, long)]
        input: PathBuf,

        /// Grouping-column alias config (JSON). Defaults to the built-in
        /// Instability alias list.
        #[arg(long)]
        grouping_config: Option<PathBuf>,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare one target column between the two grouping-column groups
    Compare {
        /// Input dataset (.csv or .tsv)
        #[arg(short, long)]
        input: PathBuf,

        /// Target column (canonical name)
        #[arg(short, long)]
        target: String,

        /// Grouping-column alias config (JSON).
        #[arg(long)]
        grouping_config: Option<PathBuf>,

        /// Also write a plot artifact (box-and-strip for numeric targets,
        /// stacked bars for categorical targets).
        #[arg(long)]
        plot_output: Option<PathBuf>,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare every eligible column against the grouping column
    CompareAll {
        /// Input dataset (.csv or .tsv)
        #[arg(short, long)]
        input: PathBuf,

        /// Grouping-column alias config (JSON).
        #[arg(long)]
        grouping_config: Option<PathBuf>,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Describe { input, output } => cmd_describe(&input, output.as_ref()),
        Commands::Columns { input, grouping_config, output } => {
            cmd_columns(&input, grouping_config.as_ref(), output.as_ref())
        }
        Commands::Compare { input, target, grouping_config, plot_output, output } => cmd_compare(
            &input,
            &target,
            grouping_config.as_ref(),
            plot_output.as_ref(),
            output.as_ref(),
        ),
        Commands::CompareAll { input, grouping_config, output } => {
            cmd_compare_all(&input, grouping_config.as_ref(), output.as_ref())
        }
        Commands::Version => {
            println!("cohortcomp {}", cc_core::VERSION);
            Ok(())
        }
    }
}

fn load_frame(input: &PathBuf) -> Result<DataFrame> {
    tracing::info!(path = %input.display(), "loading dataset");
    let frame = read_csv(input)
        .with_context(|| format!("failed to load dataset {}", input.display()))?;
    tracing::info!(rows = frame.n_rows(), cols = frame.n_cols(), "dataset loaded");
    Ok(frame)
}

fn load_grouping_config(path: Option<&PathBuf>) -> Result<GroupingConfig> {
    match path {
        Some(p) => GroupingConfig::from_json_file(p)
            .with_context(|| format!("failed to load grouping config {}", p.display())),
        None => Ok(GroupingConfig::default()),
    }
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}

fn cmd_describe(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let frame = load_frame(input)?;
    let output_json = serde_json::json!({
        "n_rows": frame.n_rows(),
        "n_cols": frame.n_cols(),
        "columns": frame.summaries(),
    });
    write_json(output, output_json)
}

fn cmd_columns(
    input: &PathBuf,
    grouping_config: Option<&PathBuf>,
    output: Option<&PathBuf>,
) -> Result<()> {
    let frame = load_frame(input)?;
    let config = load_grouping_config(grouping_config)?;
    let grouping = config.resolve(&frame).context("grouping column not found")?;
    let classification = classify_columns(&frame, &grouping)?;
    write_json(output, serde_json::to_value(&classification)?)
}

fn cmd_compare(
    input: &PathBuf,
    target: &str,
    grouping_config: Option<&PathBuf>,
    plot_output: Option<&PathBuf>,
    output: Option<&PathBuf>,
) -> Result<()> {
    let frame = load_frame(input)?;
    let config = load_grouping_config(grouping_config)?;
    let grouping = config.resolve(&frame).context("grouping column not found")?;

    let result = cc_stats::compare(&frame, &grouping, target)
        .with_context(|| format!("comparison failed for '{}'", target))?;
    tracing::info!(
        column = %target,
        p_value = result.p_value,
        significant = result.significant,
        "comparison complete"
    );

    if let Some(plot_path) = plot_output {
        let artifact = match &result.summaries {
            GroupSummaries::Numeric { .. } => {
                let (g0, g1, _) = cc_stats::compare::numeric_groups(&frame, &grouping, target)?;
                serde_json::to_value(cc_viz::box_strip_artifact(target, &grouping, &g0, &g1)?)?
            }
            GroupSummaries::Categorical { table } => {
                serde_json::to_value(cc_viz::stacked_bar_artifact(target, &grouping, table))?
            }
        };
        std::fs::write(plot_path, serde_json::to_string_pretty(&artifact)?)?;
        tracing::info!(path = %plot_path.display(), "plot artifact written");
    }

    write_json(output, serde_json::to_value(&result)?)
}

fn cmd_compare_all(
    input: &PathBuf,
    grouping_config: Option<&PathBuf>,
    output: Option<&PathBuf>,
) -> Result<()> {
    let frame = load_frame(input)?;
    let config = load_grouping_config(grouping_config)?;
    let grouping = config.resolve(&frame).context("grouping column not found")?;

    let batch = cc_stats::compare_all(&frame, &grouping)?;
    tracing::info!(
        compared = batch.results.len(),
        failed = batch.failures.len(),
        "batch comparison complete"
    );
    write_json(output, serde_json::to_value(&batch)?)
}
