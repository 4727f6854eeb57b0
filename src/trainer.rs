//! Merge learning: adjacent-pair statistics and the training loop.

pub(crate) mod word;

use std::convert::TryFrom;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use log::info;

use crate::config::{IngestConfig, TrainerBuilder, TrainerConfig};
use crate::corpus::load_corpus_lines;
use crate::error::{BpeError, Result};
use crate::metrics::{IterationMetrics, StopReason, TrainingMetrics};
use crate::model::{BpeTokenizer, MergeTable, Rank, SymbolPair};
use crate::pairs::PairIndex;
use crate::vocab::Vocabulary;

/// High-level façade configuring and executing BPE training runs.
#[derive(Debug, Clone)]
pub struct Trainer {
    cfg: TrainerConfig,
}

/// Artifacts returned after a training session completes.
#[must_use]
#[derive(Debug, Clone)]
pub struct TrainerArtifacts {
    /// Trained tokenizer, ready to encode.
    pub tokenizer: BpeTokenizer,
    /// Detailed metrics captured during training.
    pub metrics: TrainingMetrics,
}

impl Trainer {
    /// Creates a new trainer for the supplied configuration.
    #[must_use]
    pub fn new(cfg: TrainerConfig) -> Self {
        Self { cfg }
    }

    /// Returns a [`TrainerBuilder`] with default settings.
    #[must_use]
    pub fn builder() -> TrainerBuilder {
        TrainerConfig::builder()
    }

    /// Returns an immutable reference to the underlying configuration.
    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.cfg
    }

    /// Trains on text files discovered according to [`IngestConfig`].
    pub fn train_from_paths<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        ingest: &IngestConfig,
    ) -> Result<TrainerArtifacts> {
        let lines = load_corpus_lines(inputs, ingest)?;
        self.train_from_lines(&lines)
    }

    /// Trains on in-memory corpus lines.  An empty corpus yields an empty tokenizer.
    pub fn train_from_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<TrainerArtifacts> {
        self.cfg.validate()?;
        let limit = Rank::try_from(self.cfg.num_merges).map_err(|_| {
            BpeError::InvalidConfig(format!(
                "num_merges ({}) does not fit a merge rank",
                self.cfg.num_merges
            ))
        })?;

        let mut vocab = Vocabulary::from_lines(lines);
        if self.cfg.show_progress {
            info!(
                "vocabulary has {} distinct words and {} symbols",
                vocab.len(),
                vocab.total_symbols()
            );
        }

        let (merges, metrics) = learn_merges(&mut vocab, limit, self.cfg.show_progress);
        let tokenizer = BpeTokenizer::from_parts(vocab, merges);
        Ok(TrainerArtifacts { tokenizer, metrics })
    }
}

/// Adjacent symbol pair frequencies over a vocabulary.
///
/// Pairs are kept in the order they were first encountered while scanning the vocabulary
/// (entry order, then left to right within a word).
#[derive(Debug, Clone, Default)]
pub struct PairStats {
    pairs: Vec<(SymbolPair, usize)>,
    index: PairIndex<usize>,
}

impl PairStats {
    fn add(&mut self, left: &str, right: &str, count: usize) {
        let idx = self.index.get_or_insert(left, right, self.pairs.len());
        if idx == self.pairs.len() {
            self.pairs.push(((left.to_owned(), right.to_owned()), 0));
        }
        self.pairs[idx].1 += count;
    }

    /// Number of distinct pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true when no adjacent pair exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Frequency of `left right`, if observed.
    #[must_use]
    pub fn get(&self, left: &str, right: &str) -> Option<usize> {
        self.index.get(left, right).map(|idx| self.pairs[idx].1)
    }

    /// Iterates `(left, right, frequency)` in first-encountered order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, usize)> + '_ {
        self.pairs
            .iter()
            .map(|((left, right), count)| (left.as_str(), right.as_str(), *count))
    }

    /// Most frequent pair; among equal frequencies the first encountered wins.
    #[must_use]
    pub fn best(&self) -> Option<(&str, &str, usize)> {
        let mut best: Option<(&str, &str, usize)> = None;
        for candidate in self.iter() {
            if best.map_or(true, |(_, _, count)| candidate.2 > count) {
                best = Some(candidate);
            }
        }
        best
    }
}

/// Counts every adjacent symbol pair in `vocab`, weighted by word frequency.
#[must_use]
pub fn compute_pair_stats(vocab: &Vocabulary) -> PairStats {
    let mut stats = PairStats::default();
    for (word, count) in vocab.words() {
        word.for_each_pair(|left, right| stats.add(left, right, count));
    }
    stats
}

/// Learns up to `limit` merges, rewriting `vocab` after each one.
pub(crate) fn learn_merges(
    vocab: &mut Vocabulary,
    limit: Rank,
    show_progress: bool,
) -> (MergeTable, TrainingMetrics) {
    let mut merges = MergeTable::new();
    let mut metrics = TrainingMetrics::new((limit as usize).min(16_384));
    let training_start = Instant::now();

    for rank in 0..limit {
        let iteration_start = Instant::now();
        let stats = compute_pair_stats(vocab);
        let Some((left, right, frequency)) = stats.best() else {
            metrics.stop_reason = StopReason::NoPairsRemaining;
            break;
        };

        merges.push(left, right, rank);
        let merges_applied = vocab.merge_pair(left, right);

        if show_progress {
            info!(
                "rank {:>6} freq {:>8} merged {:>8} distinct_pairs {:>8} pair {:?} + {:?}",
                rank,
                frequency,
                merges_applied,
                stats.len(),
                left,
                right
            );
        }

        metrics.iterations.push(IterationMetrics {
            rank,
            left: left.to_owned(),
            right: right.to_owned(),
            frequency,
            merges_applied,
            distinct_pairs: stats.len(),
            elapsed_iteration: iteration_start.elapsed(),
            elapsed_total: training_start.elapsed(),
        });
    }

    metrics.total_duration = training_start.elapsed();
    if show_progress {
        info!(
            "completed {} merges in {:.2?} ({:?})",
            merges.len(),
            metrics.total_duration,
            metrics.stop_reason
        );
    }
    (merges, metrics)
}

impl fmt::Display for TrainerArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BPE tokenizer with {} merges over {} vocabulary entries",
            self.tokenizer.num_merges(),
            self.tokenizer.vocab().len()
        )?;
        writeln!(f, "Stop reason: {:?}", self.metrics.stop_reason)?;
        writeln!(f, "Total duration: {:?}", self.metrics.total_duration)?;
        Ok(())
    }
}
