use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ml_trainer::{generate_dataset, load_data, train_model};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a labelled dataset of synthetic fills.
    GenerateDataset(GenerateDatasetArgs),
    /// Train a model from a dataset with a `target` column and report its accuracy.
    TrainModel(TrainModelArgs),
}

#[derive(Parser)]
struct GenerateDatasetArgs {
    /// The output CSV path. Defaults to `training.sample_path` from the configuration.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the configured number of rows.
    #[arg(long)]
    rows: Option<usize>,
}

#[derive(Parser)]
struct TrainModelArgs {
    /// Path to the CSV dataset. Defaults to `training.sample_path` from the configuration.
    #[arg(long, short)]
    dataset: Option<PathBuf>,
    /// Print the full report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenvy::dotenv().ok();
    let config = configuration::load_config().context("Failed to load configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateDataset(args) => {
            let mut params = config.datasets.winning_trades.clone();
            if let Some(seed) = args.seed {
                params.seed = seed;
            }
            if let Some(rows) = args.rows {
                params.rows = rows;
            }
            let output = args.output.unwrap_or(config.training.sample_path);
            let df = generate_dataset(&params, &output)
                .with_context(|| format!("Failed to generate dataset at {}", output.display()))?;
            println!("Wrote {} rows x {} columns to {}", df.height(), df.width(), output.display());
        }
        Commands::TrainModel(args) => {
            let path = args.dataset.unwrap_or(config.training.sample_path.clone());
            let df = load_data(&path)
                .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
            let report = train_model(&df, &config.training)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Model trained with accuracy: {:.2}", report.accuracy);
                println!("Train rows: {}, test rows: {}", report.train_rows, report.test_rows);
                println!("Features: {}", report.features.join(", "));
            }
        }
    }

    Ok(())
}
