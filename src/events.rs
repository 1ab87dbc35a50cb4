//! Evaluation lifecycle events.
//!
//! The driver stays storage- and telemetry-agnostic. Callers that want to
//! forward invocation data to an external system implement `EvalObserver`
//! over the closed set of event variants below; each variant's payload is
//! statically known. Delivery is fire-and-forget: observer failures are
//! logged by the driver and never abort an evaluation.

use crate::judge::Judgement;
use crate::usage::UsageSnapshot;

/// Which summarization strategy an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Base,
    Tuned,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Base => "base",
            Strategy::Tuned => "tuned",
        }
    }
}

/// A single evaluation lifecycle event.
#[derive(Debug, Clone)]
pub enum EvalEvent {
    GenerationStarted {
        sample_index: usize,
        strategy: Strategy,
    },
    GenerationEnded {
        sample_index: usize,
        strategy: Strategy,
        summary: String,
    },
    GenerationFailed {
        sample_index: usize,
        strategy: Strategy,
        error: String,
    },
    JudgeEnded {
        sample_index: usize,
        judgement: Judgement,
    },
    JudgeFailed {
        sample_index: usize,
        error: String,
    },
    /// Emitted once per sample after its task finishes, whatever the outcome.
    SampleCompleted {
        sample_index: usize,
        completed: usize,
        total: usize,
        usage: UsageSnapshot,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    #[error("{0}")]
    Message(String),
}

/// Receives evaluation lifecycle events.
#[async_trait::async_trait]
pub trait EvalObserver: Send + Sync {
    async fn on_event(&self, event: EvalEvent) -> Result<(), ObserverError>;
}

/// Observer that discards all events. Default for library callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

#[async_trait::async_trait]
impl EvalObserver for NoopObserver {
    async fn on_event(&self, _event: EvalEvent) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Observer that logs events through `tracing`. Used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

#[async_trait::async_trait]
impl EvalObserver for TracingObserver {
    async fn on_event(&self, event: EvalEvent) -> Result<(), ObserverError> {
        match event {
            EvalEvent::GenerationStarted {
                sample_index,
                strategy,
            } => {
                tracing::debug!(sample = sample_index, strategy = strategy.as_str(), "generating summary");
            }
            EvalEvent::GenerationEnded {
                sample_index,
                strategy,
                summary,
            } => {
                tracing::debug!(
                    sample = sample_index,
                    strategy = strategy.as_str(),
                    summary = %summary,
                    "summary generated"
                );
            }
            EvalEvent::GenerationFailed {
                sample_index,
                strategy,
                error,
            } => {
                tracing::warn!(
                    sample = sample_index,
                    strategy = strategy.as_str(),
                    error = %error,
                    "generation failed"
                );
            }
            EvalEvent::JudgeEnded {
                sample_index,
                judgement,
            } => {
                tracing::debug!(
                    sample = sample_index,
                    verdict = judgement.verdict.as_str(),
                    explanation = %judgement.explanation,
                    "judge returned"
                );
            }
            EvalEvent::JudgeFailed {
                sample_index,
                error,
            } => {
                tracing::warn!(sample = sample_index, error = %error, "judge failed");
            }
            EvalEvent::SampleCompleted {
                sample_index,
                completed,
                total,
                usage,
            } => {
                tracing::info!(
                    sample = sample_index,
                    completed,
                    total,
                    cost_usd = usage.cost_usd,
                    "sample completed"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Observer that records event tags, for asserting delivery order/count.
    #[derive(Default)]
    pub(crate) struct RecordingObserver {
        pub tags: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl EvalObserver for RecordingObserver {
        async fn on_event(&self, event: EvalEvent) -> Result<(), ObserverError> {
            let tag = match event {
                EvalEvent::GenerationStarted { .. } => "generation_started",
                EvalEvent::GenerationEnded { .. } => "generation_ended",
                EvalEvent::GenerationFailed { .. } => "generation_failed",
                EvalEvent::JudgeEnded { .. } => "judge_ended",
                EvalEvent::JudgeFailed { .. } => "judge_failed",
                EvalEvent::SampleCompleted { .. } => "sample_completed",
            };
            self.tags.lock().unwrap().push(tag.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_noop_observer_accepts_events() {
        let observer = NoopObserver;
        let result = observer
            .on_event(EvalEvent::GenerationStarted {
                sample_index: 0,
                strategy: Strategy::Base,
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_recording_observer_sees_tags() {
        let observer = RecordingObserver::default();
        observer
            .on_event(EvalEvent::JudgeFailed {
                sample_index: 3,
                error: "boom".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(observer.tags.lock().unwrap().as_slice(), ["judge_failed"]);
    }

    #[test]
    fn test_strategy_labels() {
        assert_eq!(Strategy::Base.as_str(), "base");
        assert_eq!(Strategy::Tuned.as_str(), "tuned");
    }
}
