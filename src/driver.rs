//! Bounded-concurrency evaluation driver.
//!
//! Runs the pairwise quality evaluation between two summarization
//! strategies across a sample set, limiting in-flight tasks with a
//! counting gate, and aggregates a win/loss/tie tally.

use crate::dataset::{Dataset, Sample};
use crate::error::{EvalError, Result};
use crate::events::{EvalEvent, EvalObserver, NoopObserver, Strategy};
use crate::judge::{PairwiseJudge, Verdict};
use crate::llm::Prompts;
use crate::summarize::Summarizer;
use crate::usage::{UsageMeter, UsageSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::warn;

/// Result for a single sample: a verdict, or the error that aborted this
/// sample's task. `index` matches the sample's position in the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleOutcome {
    pub index: usize,
    pub verdict: Option<Verdict>,
    pub error: Option<String>,
}

/// Aggregate win/loss/tie tally over a run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Tally {
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub failures: usize,
}

impl Tally {
    /// Fold per-sample outcomes into a tally.
    pub fn from_outcomes(outcomes: &[SampleOutcome]) -> Self {
        let mut tally = Tally::default();
        for outcome in outcomes {
            match outcome.verdict {
                Some(Verdict::Win) => tally.wins += 1,
                Some(Verdict::Loss) => tally.losses += 1,
                Some(Verdict::Tie) => tally.ties += 1,
                None => tally.failures += 1,
            }
        }
        tally
    }

    /// Win rate over decisive verdicts: wins / (wins + losses). Ties and
    /// failures are excluded from the denominator; when nothing decisive
    /// remains the rate is undefined and this returns `NoDecisiveVerdicts`.
    pub fn win_rate(&self) -> Result<f64> {
        let decisive = self.wins + self.losses;
        if decisive == 0 {
            return Err(EvalError::NoDecisiveVerdicts);
        }
        Ok(self.wins as f64 / decisive as f64)
    }
}

/// Full report for an evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Dataset name.
    pub dataset_name: String,
    /// Per-sample outcomes, in input order.
    pub outcomes: Vec<SampleOutcome>,
    /// Aggregate tally.
    pub tally: Tally,
    /// Token usage and estimated cost across all LLM calls.
    pub usage: UsageSnapshot,
    /// Total run time (seconds).
    pub total_time_secs: f64,
}

impl EvalReport {
    /// Print summary to stdout. The win rate is the final line.
    pub fn print_summary(&self) {
        println!("\n========= Evaluation Results =========");
        println!("Dataset: {}", self.dataset_name);
        println!("Samples: {}", self.outcomes.len());
        println!("--------------------------------------");
        println!("Wins:     {}", self.tally.wins);
        println!("Losses:   {}", self.tally.losses);
        println!("Ties:     {}", self.tally.ties);
        println!("Failures: {}", self.tally.failures);
        println!("--------------------------------------");
        println!(
            "LLM calls: {} ({} prompt / {} completion tokens)",
            self.usage.calls, self.usage.prompt_tokens, self.usage.completion_tokens
        );
        if self.usage.cost_usd > 0.0 {
            println!("Estimated cost: ${:.4}", self.usage.cost_usd);
        }
        println!("Total time: {:.1}s", self.total_time_secs);
        println!("======================================\n");
        match self.tally.win_rate() {
            Ok(rate) => println!("Win rate: {}", rate),
            Err(_) => println!("Win rate: undefined (no decisive verdicts)"),
        }
    }
}

/// Bounded evaluation driver.
///
/// Generic over the summarization and judging seams so tests can inject
/// deterministic fakes. All components are shared, so the driver is cheap
/// to clone into spawned tasks.
pub struct EvalDriver<S, J> {
    base: Arc<S>,
    tuned: Arc<S>,
    judge: Arc<J>,
    observer: Arc<dyn EvalObserver>,
    meter: Arc<UsageMeter>,
    max_concurrent: usize,
}

impl<S, J> Clone for EvalDriver<S, J> {
    fn clone(&self) -> Self {
        Self {
            base: Arc::clone(&self.base),
            tuned: Arc::clone(&self.tuned),
            judge: Arc::clone(&self.judge),
            observer: Arc::clone(&self.observer),
            meter: Arc::clone(&self.meter),
            max_concurrent: self.max_concurrent,
        }
    }
}

impl<S, J> EvalDriver<S, J>
where
    S: Summarizer + 'static,
    J: PairwiseJudge + 'static,
{
    pub fn new(base: S, tuned: S, judge: J, meter: Arc<UsageMeter>) -> Self {
        Self {
            base: Arc::new(base),
            tuned: Arc::new(tuned),
            judge: Arc::new(judge),
            observer: Arc::new(NoopObserver),
            meter,
            max_concurrent: 10,
        }
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn EvalObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Deliver an event. Observer failures are logged, never propagated.
    async fn emit(&self, event: EvalEvent) {
        if let Err(e) = self.observer.on_event(event).await {
            warn!(error = %e, "Event observer failed");
        }
    }

    /// Generate one summary, bracketing the call with lifecycle events.
    async fn generate(&self, index: usize, strategy: Strategy, article: &str) -> Result<String> {
        let summarizer = match strategy {
            Strategy::Base => &self.base,
            Strategy::Tuned => &self.tuned,
        };

        self.emit(EvalEvent::GenerationStarted {
            sample_index: index,
            strategy,
        })
        .await;

        match summarizer.summarize(article).await {
            Ok(summary) => {
                self.emit(EvalEvent::GenerationEnded {
                    sample_index: index,
                    strategy,
                    summary: summary.clone(),
                })
                .await;
                Ok(summary)
            }
            Err(e) => {
                self.emit(EvalEvent::GenerationFailed {
                    sample_index: index,
                    strategy,
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    /// Evaluate a single sample: generate with both strategies, then ask the
    /// judge to compare the sample's two reference summaries.
    ///
    /// The judge sees the final (dense) summary as the first candidate and
    /// the starting (sparse) summary as the second, except that the order is
    /// swapped when the combined character count of the two freshly generated
    /// summaries is even. A swapped verdict is polarity-reversed before being
    /// returned.
    pub async fn evaluate(&self, index: usize, sample: &Sample) -> Result<Verdict> {
        let base_summary = self.generate(index, Strategy::Base, &sample.article).await?;
        let tuned_summary = self.generate(index, Strategy::Tuned, &sample.article).await?;

        let swap = (base_summary.chars().count() + tuned_summary.chars().count()) % 2 == 0;

        let input = Prompts::judge_input(&sample.article);
        let (prediction, prediction_b) = if swap {
            (&sample.starting_summary, &sample.final_summary)
        } else {
            (&sample.final_summary, &sample.starting_summary)
        };

        let judgement = match self.judge.judge(&input, prediction, prediction_b).await {
            Ok(judgement) => {
                self.emit(EvalEvent::JudgeEnded {
                    sample_index: index,
                    judgement: judgement.clone(),
                })
                .await;
                judgement
            }
            Err(e) => {
                self.emit(EvalEvent::JudgeFailed {
                    sample_index: index,
                    error: e.to_string(),
                })
                .await;
                return Err(e);
            }
        };

        if swap {
            Ok(judgement.verdict.reversed())
        } else {
            Ok(judgement.verdict)
        }
    }

    /// Run the evaluation over all samples in the dataset.
    ///
    /// One task is spawned per sample; a counting gate admits at most
    /// `max_concurrent` of them at a time, first-come-first-served. Per-task
    /// failures (including panics) are folded into that sample's outcome so
    /// the aggregate step is total. Outcome order matches sample order.
    pub async fn run(&self, dataset: &Dataset) -> EvalReport {
        let start_time = Instant::now();
        let total = dataset.len();

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let completed = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::with_capacity(total);

        for (index, sample) in dataset.samples.iter().enumerate() {
            let driver = self.clone();
            let sample = sample.clone();
            let semaphore = Arc::clone(&semaphore);
            let completed = Arc::clone(&completed);

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|_| EvalError::Task("Concurrency gate closed".to_string()))?;

                let result = driver.evaluate(index, &sample).await;

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                driver
                    .emit(EvalEvent::SampleCompleted {
                        sample_index: index,
                        completed: done,
                        total,
                        usage: driver.meter.snapshot(),
                    })
                    .await;

                result
            }));
        }

        let mut outcomes = Vec::with_capacity(total);
        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = match handle.await {
                Ok(Ok(verdict)) => SampleOutcome {
                    index,
                    verdict: Some(verdict),
                    error: None,
                },
                Ok(Err(e)) => SampleOutcome {
                    index,
                    verdict: None,
                    error: Some(e.to_string()),
                },
                Err(e) => SampleOutcome {
                    index,
                    verdict: None,
                    error: Some(format!("Task panicked: {}", e)),
                },
            };
            outcomes.push(outcome);
        }

        let tally = Tally::from_outcomes(&outcomes);

        EvalReport {
            dataset_name: dataset.name.clone(),
            outcomes,
            tally,
            usage: self.meter.snapshot(),
            total_time_secs: start_time.elapsed().as_secs_f64(),
        }
    }
}
