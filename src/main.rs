//! SentiTune CLI: Thin front end over the analyzer and the tuning pipeline.
//!
//! - `analyze <TEXT>`: score one text with the current lexicon/thresholds
//! - `tune`: regenerate the corpus and re-tune lexicon + thresholds
//! - `info`: show the currently persisted model

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use sentitune_lib::config::{default_data_dir, TuneConfig};
use sentitune_lib::{ArtifactStore, KeywordPrimitive, SentimentAnalyzer, SentimentPrimitive, TuningManager};

#[derive(Parser)]
#[command(name = "sentitune")]
#[command(version)]
#[command(about = "Chinese sentiment scoring with a self-tuning lexicon and thresholds")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding config and tuned artifacts
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the sentiment of a text
    Analyze {
        /// Text to analyze
        text: String,
    },
    /// Generate a synthetic corpus and re-tune lexicon and thresholds
    Tune {
        /// Samples per sentiment class (defaults to the configured value)
        #[arg(long)]
        count: Option<usize>,

        /// RNG seed for a reproducible corpus
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show dictionary size, thresholds and latest evaluation metrics
    Info,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let store = ArtifactStore::new(&data_dir);
    let primitive: Arc<dyn SentimentPrimitive> = Arc::new(KeywordPrimitive::new());

    match cli.command {
        Commands::Analyze { text } => {
            let analyzer = SentimentAnalyzer::from_store(primitive, &store)
                .context("failed to load tuned model")?;
            let result = analyzer.analyze(&text);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Tune { count, seed } => {
            let mut config = TuneConfig::load(&data_dir);
            if seed.is_some() {
                config.seed = seed;
            }
            let count = count.unwrap_or(config.count_per_class);

            let manager = TuningManager::new(store, primitive, config);
            let outcome = manager.run(count).context("tuning pipeline failed")?;
            println!("{}", serde_json::to_string_pretty(&outcome.metrics)?);
        }
        Commands::Info => {
            let info = store.model_info().context("failed to read model info")?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
