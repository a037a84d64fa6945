//! Ordered class labels.
//!
//! Position `i` in a [`LabelSet`] names output `i` of the classifier, so the
//! order of a labels file is significant and is never sorted or deduplicated
//! silently.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Labels the bundled potato-leaf model was trained with, in output order.
pub const DEFAULT_LABELS: [&str; 3] = ["Early Blight", "Late Blight", "Healthy"];

/// File looked up next to the model when no labels path is configured.
pub const SIBLING_LABELS_FILE: &str = "labels.txt";

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("failed to read labels from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("label set is empty")]
    Empty,

    #[error("label {0:?} appears more than once")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Result<Self, LabelError> {
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }

        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(LabelError::Duplicate(label.clone()));
            }
        }

        Ok(Self { labels })
    }

    /// One label per line; surrounding whitespace and blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let labels = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self::new(labels)
    }

    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LabelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text)
    }

    /// Picks the label set for a model: an explicit file wins, then a
    /// `labels.txt` stored beside the model, then [`DEFAULT_LABELS`].
    pub fn resolve(explicit: Option<&Path>, model_path: &Path) -> Result<Self, LabelError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let sibling = model_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(SIBLING_LABELS_FILE);
        if sibling.is_file() {
            return Self::load(&sibling);
        }

        Ok(Self::default())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for LabelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.labels.join(", "))
    }
}
