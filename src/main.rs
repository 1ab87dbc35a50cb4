//! Evaluation CLI for comparing a base summarization strategy against a
//! fine-tuned summarization model with an LLM judge.
//!
//! Usage:
//!   density-eval sample              # Run on built-in sample dataset
//!   density-eval records <path>      # Run on raw chain-of-density records (JSONL)
//!   density-eval dataset <path>      # Run on a pre-built JSON dataset
//!
//! Options:
//!   --max-samples <N>        # Evaluate only the first N samples (default: 100)
//!   --max-concurrent <N>     # Concurrency cap (default: 10)
//!   --verbose                # Per-sample diagnostics on stderr
//!   --output <path>          # Save the full report to a JSON file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use density_eval::config::Config;
use density_eval::dataset::{Dataset, create_sample_dataset, load_records};
use density_eval::driver::EvalDriver;
use density_eval::events::TracingObserver;
use density_eval::judge::LlmJudge;
use density_eval::llm::{LlmClient, Prompts};
use density_eval::summarize::LlmSummarizer;
use density_eval::usage::UsageMeter;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "density-eval")]
#[command(about = "Pairwise LLM-judge evaluation of summarization fine-tunes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Evaluate only the first N samples
    #[arg(long, global = true)]
    max_samples: Option<usize>,

    /// Maximum number of evaluation tasks in flight
    #[arg(long, global = true)]
    max_concurrent: Option<usize>,

    /// Per-sample diagnostics (generated summaries, judge verdicts, running cost)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Save the full report to a JSON file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run on the built-in sample dataset (for quick testing)
    Sample,

    /// Run on raw chain-of-density records (JSONL, one record per line)
    Records {
        /// Path to the records file
        path: PathBuf,
    },

    /// Run on a pre-built JSON dataset
    Dataset {
        /// Path to the dataset JSON file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "density_eval=debug"
    } else {
        "density_eval=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load LLM config
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(max_samples) = cli.max_samples {
        config.eval.max_samples = max_samples;
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.eval.max_concurrent = max_concurrent;
    }
    config.validate().context("Invalid configuration")?;

    println!("LLM API Base: {}", config.llm.api_base);
    println!("Base model: {}", config.llm.model);
    println!("Fine-tuned model: {}", config.tuned_model);

    // Load dataset
    let dataset = match &cli.command {
        Commands::Sample => {
            println!("Using sample dataset...");
            create_sample_dataset()
        }
        Commands::Records { path } => {
            println!("Loading records from {:?}...", path);
            load_records(path)?
        }
        Commands::Dataset { path } => {
            println!("Loading dataset from {:?}...", path);
            Dataset::load_json(path)?
        }
    };

    println!("Dataset: {} ({} samples)", dataset.name, dataset.len());

    let subset = dataset.take(config.eval.max_samples);
    if subset.len() < dataset.len() {
        println!("Evaluating first {} samples", subset.len());
    }

    // Build the driver: base + fine-tuned summarizers and the judge share
    // one usage meter, and the judge runs on the base model.
    let meter = Arc::new(UsageMeter::new(config.pricing));

    let base = LlmSummarizer::new(
        LlmClient::new(config.llm.clone()),
        Prompts::base_summary(),
        Arc::clone(&meter),
    );
    let tuned = LlmSummarizer::new(
        LlmClient::new(config.tuned_llm()),
        Prompts::tuned_summary(),
        Arc::clone(&meter),
    );
    let judge = LlmJudge::new(LlmClient::new(config.llm.clone()), Arc::clone(&meter));

    let driver = EvalDriver::new(base, tuned, judge, meter)
        .with_max_concurrent(config.eval.max_concurrent)
        .with_observer(Arc::new(TracingObserver));

    let report = driver.run(&subset).await;

    // Print summary (the win rate is the final line)
    report.print_summary();

    // Save results if requested
    if let Some(output_path) = cli.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Failed to write report to {:?}", output_path))?;
        println!("Report saved to {:?}", output_path);
    }

    if report.tally.win_rate().is_err() {
        // All ties or all failures: the rate is undefined, flag it to callers.
        std::process::exit(1);
    }

    Ok(())
}
