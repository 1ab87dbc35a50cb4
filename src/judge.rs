//! LLM-as-judge pairwise evaluation.

use crate::error::{EvalError, Result};
use crate::llm::{LlmClient, Prompts};
use crate::usage::UsageMeter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Preference verdict from the perspective of the first candidate
/// (`prediction` relative to `prediction_b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Win,
    Loss,
    Tie,
}

impl Verdict {
    /// Polarity reversal: Win and Loss swap, Tie is a fixed point.
    pub fn reversed(self) -> Self {
        match self {
            Verdict::Win => Verdict::Loss,
            Verdict::Loss => Verdict::Win,
            Verdict::Tie => Verdict::Tie,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Win => "Win",
            Verdict::Loss => "Loss",
            Verdict::Tie => "Tie",
        }
    }
}

/// Full judgement for a single comparison. Only the verdict feeds the
/// tally; the explanation is kept for the diagnostic trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judgement {
    pub verdict: Verdict,
    pub explanation: String,
}

/// A collaborator that, given two candidate outputs for the same input,
/// returns a preference verdict.
#[async_trait::async_trait]
pub trait PairwiseJudge: Send + Sync {
    async fn judge(
        &self,
        input: &str,
        prediction: &str,
        prediction_b: &str,
    ) -> Result<Judgement>;
}

/// LLM-backed pairwise judge.
pub struct LlmJudge {
    client: LlmClient,
    meter: Arc<UsageMeter>,
}

impl LlmJudge {
    pub fn new(client: LlmClient, meter: Arc<UsageMeter>) -> Self {
        Self { client, meter }
    }

    /// Parse judge response JSON.
    fn parse_judgement(response: &str) -> Result<Judgement> {
        let json_str = extract_json(response);

        #[derive(Deserialize)]
        struct RawJudgement {
            verdict: String,
            #[serde(default)]
            explanation: String,
        }

        let raw: RawJudgement = serde_json::from_str(&json_str).map_err(|e| {
            EvalError::LlmParse(format!(
                "Failed to parse judge response: {}. Response: {}",
                e, response
            ))
        })?;

        let verdict = match raw.verdict.to_lowercase().as_str() {
            "win" => Verdict::Win,
            "loss" => Verdict::Loss,
            "tie" => Verdict::Tie,
            other => {
                return Err(EvalError::LlmParse(format!(
                    "Unknown verdict '{}' in judge response",
                    other
                )));
            }
        };

        Ok(Judgement {
            verdict,
            explanation: raw.explanation,
        })
    }
}

#[async_trait::async_trait]
impl PairwiseJudge for LlmJudge {
    async fn judge(
        &self,
        input: &str,
        prediction: &str,
        prediction_b: &str,
    ) -> Result<Judgement> {
        let prompt = Prompts::pairwise_judge()
            .replace("{input}", input)
            .replace("{prediction}", prediction)
            .replace("{prediction_b}", prediction_b);

        let response = self.client.complete(None, &prompt).await?;
        if let Some(usage) = response.usage {
            self.meter.record(usage);
        }

        Self::parse_judgement(&response.content)
    }
}

/// Extract JSON from a response that may wrap it in code fences or prose.
fn extract_json(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```json") {
        if let Some(end) = response.rfind("```") {
            let start = "```json".len();
            if end > start {
                return response[start..end].trim().to_string();
            }
        }
    }

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|n| n + 1).unwrap_or(3);
            if end > start {
                return response[start..end].trim().to_string();
            }
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_is_an_involution() {
        for verdict in [Verdict::Win, Verdict::Loss, Verdict::Tie] {
            assert_eq!(verdict.reversed().reversed(), verdict);
        }
        assert_eq!(Verdict::Win.reversed(), Verdict::Loss);
        assert_eq!(Verdict::Loss.reversed(), Verdict::Win);
        assert_eq!(Verdict::Tie.reversed(), Verdict::Tie);
    }

    #[test]
    fn test_parse_judgement() {
        let response = r#"{"verdict": "Win", "explanation": "Denser and accurate"}"#;
        let judgement = LlmJudge::parse_judgement(response).unwrap();

        assert_eq!(judgement.verdict, Verdict::Win);
        assert_eq!(judgement.explanation, "Denser and accurate");
    }

    #[test]
    fn test_parse_judgement_case_insensitive() {
        let response = r#"{"verdict": "TIE"}"#;
        let judgement = LlmJudge::parse_judgement(response).unwrap();
        assert_eq!(judgement.verdict, Verdict::Tie);
    }

    #[test]
    fn test_parse_judgement_fenced() {
        let response = "```json\n{\"verdict\": \"Loss\", \"explanation\": \"Too vague\"}\n```";
        let judgement = LlmJudge::parse_judgement(response).unwrap();
        assert_eq!(judgement.verdict, Verdict::Loss);
    }

    #[test]
    fn test_parse_judgement_with_surrounding_text() {
        let response = r#"Here is my assessment:
{"verdict": "Win", "explanation": "First is better"}
Hope that helps."#;
        let judgement = LlmJudge::parse_judgement(response).unwrap();
        assert_eq!(judgement.verdict, Verdict::Win);
    }

    #[test]
    fn test_parse_judgement_rejects_unknown_verdict() {
        let response = r#"{"verdict": "Draw"}"#;
        let result = LlmJudge::parse_judgement(response);
        assert!(matches!(result, Err(EvalError::LlmParse(_))));
    }

    #[test]
    fn test_parse_judgement_rejects_non_json() {
        let result = LlmJudge::parse_judgement("The first one wins.");
        assert!(result.is_err());
    }
}
