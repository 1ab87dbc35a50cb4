//! Configuration for the evaluation harness.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.
//!
//! All configuration is resolved once at startup and passed into the
//! driver at construction time; nothing reads the environment afterwards.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// LLM configuration for a single chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the LLM API (e.g., "https://api.openai.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Model name (e.g., "gpt-4", "claude-3-opus")
    pub model: String,

    /// Maximum tokens for response (optional)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for generation (optional)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.0
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
            model: "gpt-4".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Token pricing used for the accumulated cost estimate, in USD per
/// million tokens. Defaults to zero, which disables cost reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct PricingConfig {
    #[serde(default)]
    pub prompt_per_mtok: f64,
    #[serde(default)]
    pub completion_per_mtok: f64,
}

/// Settings for the evaluation run itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// How many samples from the head of the dataset to evaluate.
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    /// Maximum number of evaluation tasks in flight at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_max_samples() -> usize {
    100
}

fn default_max_concurrent() -> usize {
    10
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Endpoint and model for the base summarizer (also used by the judge).
    pub llm: LlmConfig,

    /// Model id of the fine-tuned summarizer. Shares the endpoint and key
    /// of `llm`.
    #[serde(default)]
    pub tuned_model: String,

    /// Token pricing for cost estimates.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Evaluation run settings.
    #[serde(default)]
    pub eval: EvalConfig,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    llm: Option<LlmFileSection>,
    tuned_model: Option<String>,
    pricing: Option<PricingConfig>,
    eval: Option<EvalFileSection>,
}

#[derive(Debug, Deserialize)]
struct LlmFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct EvalFileSection {
    max_samples: Option<usize>,
    max_concurrent: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (LLM_API_BASE, LLM_API_KEY, LLM_MODEL, LLM_TUNED_MODEL)
    /// 2. Config file (~/.config/density-eval/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file first
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        // Override with environment variables
        if let Ok(api_base) = env::var("LLM_API_BASE") {
            config.llm.api_base = api_base;
        }

        if let Ok(api_key) = env::var("LLM_API_KEY") {
            config.llm.api_key = api_key;
        }

        if let Ok(model) = env::var("LLM_MODEL") {
            config.llm.model = model;
        }

        if let Ok(tuned_model) = env::var("LLM_TUNED_MODEL") {
            config.tuned_model = tuned_model;
        }

        if let Ok(max_tokens) = env::var("LLM_MAX_TOKENS") {
            if let Ok(tokens) = max_tokens.parse() {
                config.llm.max_tokens = tokens;
            }
        }

        if let Ok(temperature) = env::var("LLM_TEMPERATURE") {
            if let Ok(temp) = temperature.parse() {
                config.llm.temperature = temp;
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;

        let file_config: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| EvalError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(llm) = file_config.llm {
            if let Some(api_base) = llm.api_base {
                config.llm.api_base = api_base;
            }
            if let Some(api_key) = llm.api_key {
                config.llm.api_key = api_key;
            }
            if let Some(model) = llm.model {
                config.llm.model = model;
            }
            if let Some(max_tokens) = llm.max_tokens {
                config.llm.max_tokens = max_tokens;
            }
            if let Some(temperature) = llm.temperature {
                config.llm.temperature = temperature;
            }
        }

        if let Some(tuned_model) = file_config.tuned_model {
            config.tuned_model = tuned_model;
        }

        if let Some(pricing) = file_config.pricing {
            config.pricing = pricing;
        }

        if let Some(eval) = file_config.eval {
            if let Some(max_samples) = eval.max_samples {
                config.eval.max_samples = max_samples;
            }
            if let Some(max_concurrent) = eval.max_concurrent {
                config.eval.max_concurrent = max_concurrent;
            }
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "density-eval")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// LLM configuration for the fine-tuned summarizer: same endpoint and
    /// key as the base model, different model id.
    pub fn tuned_llm(&self) -> LlmConfig {
        LlmConfig {
            model: self.tuned_model.clone(),
            ..self.llm.clone()
        }
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_base.is_empty() {
            return Err(EvalError::Config(
                "LLM API base URL is required. Set LLM_API_BASE environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.api_key.is_empty() {
            return Err(EvalError::Config(
                "LLM API key is required. Set LLM_API_KEY environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.model.is_empty() {
            return Err(EvalError::Config(
                "LLM model is required. Set LLM_MODEL environment variable or add to config file."
                    .to_string(),
            ));
        }

        if self.tuned_model.is_empty() {
            return Err(EvalError::Config(
                "Fine-tuned model id is required. Set LLM_TUNED_MODEL environment variable or add to config file.".to_string()
            ));
        }

        if self.eval.max_concurrent == 0 {
            return Err(EvalError::Config(
                "eval.max_concurrent must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a config from explicit values (useful for testing).
    pub fn with_models(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        tuned_model: impl Into<String>,
    ) -> Self {
        Self {
            llm: LlmConfig {
                api_base: api_base.into(),
                api_key: api_key.into(),
                model: model.into(),
                ..Default::default()
            },
            tuned_model: tuned_model.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.llm.api_base.is_empty());
        assert!(config.llm.api_key.is_empty());
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.eval.max_samples, 100);
        assert_eq!(config.eval.max_concurrent, 10);
        assert_eq!(config.pricing.prompt_per_mtok, 0.0);
    }

    #[test]
    fn test_validate_fails_without_required_fields() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_tuned_model() {
        let mut config = Config::with_models("https://api.example.com", "key", "gpt-4", "");
        assert!(config.validate().is_err());

        config.tuned_model = "ft:gpt-3.5-turbo:acme:cod:abc123".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::with_models("https://api.example.com", "key", "gpt-4", "ft:x");
        config.eval.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tuned_llm_shares_endpoint() {
        let config = Config::with_models("https://api.example.com", "test-key", "gpt-4", "ft:x");
        let tuned = config.tuned_llm();
        assert_eq!(tuned.api_base, "https://api.example.com");
        assert_eq!(tuned.api_key, "test-key");
        assert_eq!(tuned.model, "ft:x");
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
llm:
  api_base: "https://api.example.com"
  api_key: "file-key"
  model: "gpt-4"
  temperature: 0.5
tuned_model: "ft:gpt-3.5-turbo:acme:cod:abc123"
pricing:
  prompt_per_mtok: 30.0
  completion_per_mtok: 60.0
eval:
  max_samples: 25
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, yaml).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.llm.api_key, "file-key");
        assert_eq!(config.llm.temperature, 0.5);
        assert_eq!(config.tuned_model, "ft:gpt-3.5-turbo:acme:cod:abc123");
        assert_eq!(config.pricing.completion_per_mtok, 60.0);
        assert_eq!(config.eval.max_samples, 25);
        // Unspecified fields keep their defaults
        assert_eq!(config.eval.max_concurrent, 10);
    }
}
