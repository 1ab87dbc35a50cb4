//! Prompt templates for summary generation and pairwise judging.

/// Collection of prompts used for summarization and judging.
pub struct Prompts;

impl Prompts {
    /// Verbose chain-of-density style summary prompt for the base model.
    pub fn base_summary() -> &'static str {
        r#"Article: {article}

Write a summary of the above article. Guidelines:

- The summary should be long (4-5 sentences, ~80 words) yet highly non-specific, containing little information beyond the entities marked as missing. Use overly verbose language and fillers (e.g., "this article discusses") to reach ~80 words.
- Make space with fusion, compression, and removal of uninformative phrases like "the article discusses".
- The summaries should become highly dense and concise yet self-contained, i.e., easily understood without the article.

Just give your summary and NOTHING else."#
    }

    /// Plain summary prompt matching the fine-tune's training format.
    pub fn tuned_summary() -> &'static str {
        "Give a summary of the following article:\n\n{article}"
    }

    /// The task description handed to the judge alongside the two candidates.
    /// This is the tuned prompt rendered over the article, so the judge sees
    /// the same instruction the fine-tune was trained on.
    pub fn judge_input(article: &str) -> String {
        Self::tuned_summary().replace("{article}", article)
    }

    /// Pairwise judge prompt. The verdict is from the perspective of the
    /// first candidate: Win means the first candidate is the better response.
    pub fn pairwise_judge() -> &'static str {
        r#"You are an impartial judge comparing two candidate responses to the same task.

Task given to both assistants:
{input}

Candidate response:
{prediction}

---

Second candidate response:
{prediction_b}

Decide which candidate answers the task better, considering accuracy, density of information, and conciseness. Judge the responses as given; do not penalize order of presentation.

Respond in JSON format:
{
    "verdict": "<Win, Loss, or Tie>",
    "explanation": "<brief explanation>"
}

"Win" means the first candidate is better, "Loss" means the second candidate is better, "Tie" means they are of comparable quality.
Respond with only the JSON, no other text."#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_not_empty() {
        assert!(!Prompts::base_summary().is_empty());
        assert!(!Prompts::tuned_summary().is_empty());
        assert!(!Prompts::pairwise_judge().is_empty());
    }

    #[test]
    fn test_templates_carry_placeholders() {
        assert!(Prompts::base_summary().contains("{article}"));
        assert!(Prompts::tuned_summary().contains("{article}"));
        for placeholder in ["{input}", "{prediction}", "{prediction_b}"] {
            assert!(Prompts::pairwise_judge().contains(placeholder));
        }
    }

    #[test]
    fn test_judge_input_renders_article() {
        let input = Prompts::judge_input("Some article text.");
        assert!(input.starts_with("Give a summary of the following article:"));
        assert!(input.ends_with("Some article text."));
    }
}
