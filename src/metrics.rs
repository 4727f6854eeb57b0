//! Metrics describing the evolution of the training process.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Rank;

/// Reason a training run terminated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of merges was learned.
    MergeLimitReached,
    /// Every word collapsed to a single symbol, or the corpus had no words at all.
    NoPairsRemaining,
}

/// Metrics captured for each merge iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IterationMetrics {
    /// Rank assigned to the merge (0-indexed iteration).
    pub rank: Rank,
    /// Left symbol of the merged pair.
    pub left: String,
    /// Right symbol of the merged pair.
    pub right: String,
    /// Frequency of the pair when it was selected.
    pub frequency: usize,
    /// Occurrences fused across the corpus, weighted by word frequency.
    pub merges_applied: usize,
    /// Count of distinct pairs observed before the merge.
    pub distinct_pairs: usize,
    /// Execution time for the iteration.
    pub elapsed_iteration: Duration,
    /// Total time elapsed since training started.
    pub elapsed_total: Duration,
}

/// Aggregate metrics produced by a training session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingMetrics {
    /// Per-iteration snapshots accrued during training.
    pub iterations: Vec<IterationMetrics>,
    /// Total duration of the training session.
    pub total_duration: Duration,
    /// Reason training terminated.
    pub stop_reason: StopReason,
}

impl TrainingMetrics {
    /// Creates an empty metrics container with pre-allocated capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            iterations: Vec::with_capacity(capacity),
            total_duration: Duration::ZERO,
            stop_reason: StopReason::MergeLimitReached,
        }
    }

    /// Renders the metrics as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn json_contains_stop_reason_and_iterations() {
        let mut metrics = TrainingMetrics::new(1);
        metrics.iterations.push(IterationMetrics {
            rank: 0,
            left: "a".into(),
            right: "</w>".into(),
            frequency: 3,
            merges_applied: 3,
            distinct_pairs: 5,
            elapsed_iteration: Duration::from_millis(1),
            elapsed_total: Duration::from_millis(1),
        });
        metrics.stop_reason = StopReason::NoPairsRemaining;

        let value: Value =
            serde_json::from_str(&metrics.to_json(false).expect("serialize")).expect("valid json");
        assert_eq!(value["stop_reason"], "NoPairsRemaining");
        assert_eq!(value["iterations"][0]["right"], "</w>");
        assert_eq!(value["iterations"][0]["frequency"], 3);
    }
}
