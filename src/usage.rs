//! Accumulated token usage and cost estimation.
//!
//! One `UsageMeter` is shared by every summarizer and judge in a run, so
//! the counters use atomics. Cost is estimated from configured
//! per-million-token prices; with the default zero prices the estimate
//! stays at zero and only token counts are meaningful.

use crate::config::PricingConfig;
use crate::llm::TokenUsage;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrency-safe accumulator for token usage across a run.
#[derive(Debug, Default)]
pub struct UsageMeter {
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
    calls: AtomicU64,
    pricing: PricingConfig,
}

/// Point-in-time view of the meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub calls: u64,
    /// Estimated spend in USD.
    pub cost_usd: f64,
}

impl UsageMeter {
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            pricing,
            ..Default::default()
        }
    }

    /// Record the usage of a single LLM call.
    pub fn record(&self, usage: TokenUsage) {
        self.prompt_tokens
            .fetch_add(usage.prompt_tokens as u64, Ordering::Relaxed);
        self.completion_tokens
            .fetch_add(usage.completion_tokens as u64, Ordering::Relaxed);
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Current totals.
    pub fn snapshot(&self) -> UsageSnapshot {
        let prompt_tokens = self.prompt_tokens.load(Ordering::Relaxed);
        let completion_tokens = self.completion_tokens.load(Ordering::Relaxed);
        let cost_usd = (prompt_tokens as f64 * self.pricing.prompt_per_mtok
            + completion_tokens as f64 * self.pricing.completion_per_mtok)
            / 1_000_000.0;

        UsageSnapshot {
            prompt_tokens,
            completion_tokens,
            calls: self.calls.load(Ordering::Relaxed),
            cost_usd,
        }
    }
}
