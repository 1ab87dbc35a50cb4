//! Density Eval - a bounded-concurrency LLM-as-judge evaluation harness.
//!
//! Compares a base summarization strategy (a verbose chain-of-density style
//! prompt on a strong model) against a fine-tuned summarization model, by
//! asking an LLM judge for a pairwise preference verdict on each sample of a
//! dataset and aggregating a win rate over the decisive verdicts.
//!
//! # Overview
//!
//! For every sample the driver:
//! 1. Generates a summary with the base strategy and one with the fine-tuned
//!    strategy
//! 2. Hands the sample's two reference summaries to a pairwise judge, with
//!    their order swapped on a deterministic parity of the generated
//!    summaries' combined length (and the verdict reversed back afterwards)
//! 3. Collects the verdict into a position-stable outcome list
//!
//! At most ten evaluation tasks are in flight at once, gated by a counting
//! semaphore. Per-sample failures are recorded, not fatal; the final win
//! rate is wins / (wins + losses), ties excluded.
//!
//! # Quick Start
//!
//! ```no_run
//! use density_eval::{
//!     config::Config,
//!     dataset::create_sample_dataset,
//!     driver::EvalDriver,
//!     judge::LlmJudge,
//!     llm::{LlmClient, Prompts},
//!     summarize::LlmSummarizer,
//!     usage::UsageMeter,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     // One meter shared by every LLM-backed component
//!     let meter = Arc::new(UsageMeter::new(config.pricing));
//!
//!     let base = LlmSummarizer::new(
//!         LlmClient::new(config.llm.clone()),
//!         Prompts::base_summary(),
//!         Arc::clone(&meter),
//!     );
//!     let tuned = LlmSummarizer::new(
//!         LlmClient::new(config.tuned_llm()),
//!         Prompts::tuned_summary(),
//!         Arc::clone(&meter),
//!     );
//!     let judge = LlmJudge::new(LlmClient::new(config.llm.clone()), Arc::clone(&meter));
//!
//!     let driver = EvalDriver::new(base, tuned, judge, meter)
//!         .with_max_concurrent(config.eval.max_concurrent);
//!
//!     let dataset = create_sample_dataset();
//!     let report = driver.run(&dataset).await;
//!     report.print_summary();
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Sample / Dataset**: article with its starting and final reference summaries
//! - **LlmClient**: OpenAI-compatible API client for LLM calls
//! - **Summarizer**: strategy seam; `LlmSummarizer` renders a prompt template
//! - **PairwiseJudge**: verdict seam; `LlmJudge` parses a JSON verdict
//! - **EvalDriver**: semaphore-gated fan-out, tally aggregation
//! - **EvalObserver**: closed set of lifecycle events for telemetry
//! - **UsageMeter**: accumulated token counts and estimated cost

pub mod config;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod events;
pub mod judge;
pub mod llm;
pub mod summarize;
pub mod usage;

// Re-export commonly used types
pub use config::Config;
pub use dataset::{Dataset, Sample};
pub use driver::{EvalDriver, EvalReport, SampleOutcome, Tally};
pub use error::{EvalError, Result};
pub use events::{EvalEvent, EvalObserver, NoopObserver, TracingObserver};
pub use judge::{Judgement, LlmJudge, PairwiseJudge, Verdict};
pub use llm::LlmClient;
pub use summarize::{LlmSummarizer, Summarizer};
pub use usage::{UsageMeter, UsageSnapshot};
