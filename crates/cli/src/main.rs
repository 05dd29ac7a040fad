use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cohort_chart::{render_markdown, CorrelationChart};
use cohort_ingest::{load_entities, load_tree, SubjectTable};
use config::CohortConfig;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod evaluate;

#[derive(Parser)]
#[command(name = "cohort")]
#[command(about = "Factor analysis and score prediction over tabular study data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML file describing populations, table layout and factor orders
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare score distributions of every population across one factor's outcomes
    Correlate(CorrelateArgs),

    /// Predict scores from factor overlap and report the average absolute error
    Predict(PredictArgs),

    /// Average score of a subject over the whole table
    Average(SubjectArgs),

    /// Shape of the factor tree built for a subject
    Stats(SubjectArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChartFormat {
    Markdown,
    Json,
}

#[derive(Args)]
struct CorrelateArgs {
    /// Study table (CSV)
    data: PathBuf,

    /// Factor whose outcomes group the scores
    #[arg(long)]
    factor: String,

    /// Chart title (defaults to "Score vs <factor>")
    #[arg(long)]
    title: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    format: ChartFormat,

    /// Write the chart to a file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct PredictArgs {
    /// Entities to predict (CSV); their recorded scores measure the error
    data: PathBuf,

    /// Table the factor tree is built from (defaults to DATA)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Subject column to predict
    #[arg(long)]
    subject: String,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SubjectArgs {
    /// Study table (CSV)
    data: PathBuf,

    /// Subject column used as the score
    #[arg(long)]
    subject: String,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = CohortConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Correlate(args) => run_correlate(args, &config),
        Commands::Predict(args) => run_predict(args, &config),
        Commands::Average(args) => run_average(args, &config),
        Commands::Stats(args) => run_stats(args, &config),
    }
}

fn run_correlate(args: CorrelateArgs, config: &CohortConfig) -> Result<()> {
    let table = SubjectTable::open(&args.data, &config.ingest)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| format!("Score vs {}", args.factor));

    let mut chart =
        CorrelationChart::new(title, args.factor.as_str()).with_order(config.order_for(&args.factor));
    for (population, subject) in &config.populations {
        let tree = table.build_tree(subject)?;
        let samples = tree
            .slice_by_factor(&args.factor)
            .with_context(|| format!("Cannot slice population '{population}'"))?;
        chart.add_population(population.as_str(), &samples)?;
    }

    let rendered = match args.format {
        ChartFormat::Markdown => render_markdown(&chart),
        ChartFormat::Json => chart.to_json_pretty()?,
    };
    emit(&rendered, args.out.as_deref())
}

fn run_predict(args: PredictArgs, config: &CohortConfig) -> Result<()> {
    let history = args.history.as_deref().unwrap_or(args.data.as_path());
    let tree = load_tree(history, &args.subject, &config.ingest)
        .with_context(|| format!("Failed to build tree from {}", history.display()))?;
    let entities = load_entities(&args.data, &args.subject, &config.ingest)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;

    let report = evaluate::evaluate(&tree, &args.subject, &entities)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", evaluate::render_text(&report));
    }
    Ok(())
}

#[derive(Serialize)]
struct AverageOutput<'a> {
    subject: &'a str,
    entities: usize,
    average: f64,
}

fn run_average(args: SubjectArgs, config: &CohortConfig) -> Result<()> {
    let tree = load_tree(&args.data, &args.subject, &config.ingest)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    let (_, entities) = tree.sum_and_count()?;
    let output = AverageOutput {
        subject: &args.subject,
        entities,
        average: tree.average()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{}: {:.2} ({} entities)",
            output.subject, output.average, output.entities
        );
    }
    Ok(())
}

fn run_stats(args: SubjectArgs, config: &CohortConfig) -> Result<()> {
    let tree = load_tree(&args.data, &args.subject, &config.ingest)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    let stats = tree.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Entities: {}", stats.entities);
        println!("Leaves: {}", stats.leaves);
        println!("Branches: {}", stats.branches);
        println!("Depth: {}", stats.depth);
        println!("Mean leaf size: {:.2}", stats.mean_leaf_size());
        println!("Branching order: {}", stats.labels.join(" > "));
    }
    Ok(())
}

fn emit(rendered: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote chart to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
