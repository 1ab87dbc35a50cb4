//! Dataset loading for the summarization evaluation.
//!
//! Supports:
//! - Raw chain-of-density records in JSONL (one record per line, each with
//!   an `article` and an ordered `prediction` list)
//! - A pre-built JSON format for saved datasets

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A single evaluation sample. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// The article text.
    pub article: String,
    /// The first (sparsest) reference summary of the article.
    pub starting_summary: String,
    /// The last (densest) reference summary of the article.
    pub final_summary: String,
}

/// An ordered collection of evaluation samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name.
    pub name: String,
    /// Samples in source order.
    pub samples: Vec<Sample>,
}

impl Dataset {
    /// Create a new empty dataset.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            samples: Vec::new(),
        }
    }

    /// Add a sample to the dataset.
    pub fn add_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Number of samples in the dataset.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the first `n` samples (the evaluation runs on a head slice).
    pub fn take(&self, n: usize) -> Self {
        Self {
            name: self.name.clone(),
            samples: self.samples.iter().take(n).cloned().collect(),
        }
    }

    /// Load from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {:?}", path))?;
        let dataset: Dataset =
            serde_json::from_str(&content).with_context(|| "Failed to parse dataset JSON")?;
        Ok(dataset)
    }

    /// Save to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Raw chain-of-density record as exported from the source dataset.
#[derive(Debug, Deserialize)]
struct RawRecord {
    /// Article text.
    article: String,
    /// Summaries in increasing density order.
    prediction: Vec<String>,
}

/// Load raw chain-of-density records from a JSONL file.
///
/// Each line is one record. The first prediction becomes the starting
/// summary, the last the final summary. Records with an empty prediction
/// list are rejected rather than skipped, since a silent gap would shift
/// sample indices.
pub fn load_records(path: &Path) -> Result<Dataset> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {:?}", path))?;

    let mut dataset = Dataset::new("chain_of_density");

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let raw: RawRecord = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse record at line {}", line_num + 1))?;

        let starting_summary = raw
            .prediction
            .first()
            .cloned()
            .with_context(|| format!("Record at line {} has no predictions", line_num + 1))?;
        let final_summary = raw
            .prediction
            .last()
            .cloned()
            .with_context(|| format!("Record at line {} has no predictions", line_num + 1))?;

        dataset.add_sample(Sample {
            article: raw.article,
            starting_summary,
            final_summary,
        });
    }

    Ok(dataset)
}

/// Create a small built-in dataset for smoke testing.
pub fn create_sample_dataset() -> Dataset {
    let mut dataset = Dataset::new("sample");

    dataset.add_sample(Sample {
        article: r#"
Rust is a systems programming language focused on safety, speed, and concurrency.
It achieves memory safety without garbage collection through its ownership system.
The borrow checker ensures references are valid and prevents data races at compile time.
Rust was originally designed by Graydon Hoare at Mozilla Research.
The first stable release, Rust 1.0, was announced in May 2015.
"#
        .to_string(),
        starting_summary:
            "This article discusses a programming language and some of its notable properties."
                .to_string(),
        final_summary:
            "Rust, designed by Graydon Hoare at Mozilla and stable since May 2015, achieves memory safety without garbage collection via ownership and the borrow checker."
                .to_string(),
    });

    dataset.add_sample(Sample {
        article: r#"
Python is a high-level, interpreted programming language known for its clear syntax.
Created by Guido van Rossum, Python was first released in 1991.
Python supports multiple programming paradigms including procedural, object-oriented, and functional programming.
The Python Package Index (PyPI) hosts thousands of third-party packages.
Python is widely used in data science, machine learning, and web development.
"#
        .to_string(),
        starting_summary:
            "This article talks about a popular programming language and where it is used."
                .to_string(),
        final_summary:
            "Python, created by Guido van Rossum and released in 1991, is a multi-paradigm language with a vast PyPI ecosystem, dominant in data science, ML, and the web."
                .to_string(),
    });

    dataset.add_sample(Sample {
        article: r#"
Machine learning is a subset of artificial intelligence that enables systems to learn from data.
Supervised learning uses labeled data to train models, while unsupervised learning finds patterns in unlabeled data.
Neural networks are computing systems inspired by biological neural networks in animal brains.
Deep learning uses neural networks with many layers to model complex patterns.
Common applications include image recognition, natural language processing, and recommendation systems.
"#
        .to_string(),
        starting_summary:
            "This article gives an overview of a field of artificial intelligence and its uses."
                .to_string(),
        final_summary:
            "Machine learning, an AI subset, spans supervised and unsupervised learning; deep multi-layer neural networks power image recognition, NLP, and recommendations."
                .to_string(),
    });

    dataset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_operations() {
        let mut dataset = Dataset::new("test");
        assert!(dataset.is_empty());

        dataset.add_sample(Sample {
            article: "Test article".to_string(),
            starting_summary: "sparse".to_string(),
            final_summary: "dense".to_string(),
        });

        assert_eq!(dataset.len(), 1);
        assert!(!dataset.is_empty());
    }

    #[test]
    fn test_dataset_take() {
        let dataset = create_sample_dataset();
        assert_eq!(dataset.len(), 3);

        let subset = dataset.take(2);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.samples[0].article, dataset.samples[0].article);
    }

    #[test]
    fn test_sample_dataset() {
        let dataset = create_sample_dataset();
        assert!(!dataset.is_empty());
        assert_eq!(dataset.name, "sample");

        for sample in &dataset.samples {
            assert!(!sample.article.is_empty());
            assert!(!sample.starting_summary.is_empty());
            assert!(!sample.final_summary.is_empty());
        }
    }

    #[test]
    fn test_load_records_picks_first_and_last_prediction() {
        let jsonl = concat!(
            r#"{"article": "A1", "prediction": ["sparse one", "middle", "dense one"]}"#,
            "\n",
            r#"{"article": "A2", "prediction": ["only one"]}"#,
            "\n",
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        fs::write(&path, jsonl).unwrap();

        let dataset = load_records(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.samples[0].starting_summary, "sparse one");
        assert_eq!(dataset.samples[0].final_summary, "dense one");
        // A single prediction serves as both summaries
        assert_eq!(dataset.samples[1].starting_summary, "only one");
        assert_eq!(dataset.samples[1].final_summary, "only one");
    }

    #[test]
    fn test_load_records_rejects_empty_prediction_list() {
        let jsonl = r#"{"article": "A1", "prediction": []}"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        fs::write(&path, jsonl).unwrap();

        assert!(load_records(&path).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let dataset = create_sample_dataset();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");

        dataset.save_json(&path).unwrap();
        let loaded = Dataset::load_json(&path).unwrap();

        assert_eq!(loaded.name, dataset.name);
        assert_eq!(loaded.len(), dataset.len());
    }
}
