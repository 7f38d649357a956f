//! Execution results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Measurement outcome histogram, keyed by bitstring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, u64>);

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.0.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Observations of `bitstring` (zero if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Total observations.
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, count)| count).sum()
    }

    /// Most frequent outcome; ties resolve to the lexicographically smallest.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
    }

    /// Iterate in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        let mut counts = Counts::new();
        for (bits, n) in iter {
            counts.insert(bits, n);
        }
        counts
    }
}

/// Result of one experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Experiment name.
    pub name: String,
    /// Shots executed.
    pub shots: u32,
    /// Outcome histogram.
    pub counts: Counts,
}

/// Result of one backend run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Backend that produced the result.
    pub backend_name: String,
    /// Backend version.
    pub backend_version: String,
    /// Per-experiment results, in submission order.
    pub results: Vec<ExperimentResult>,
}

impl RunResult {
    /// Look up an experiment result by name.
    pub fn get(&self, name: &str) -> Option<&ExperimentResult> {
        self.results.iter().find(|r| r.name == name)
    }
}
