//! Per-epoch metric bookkeeping
//!
//! Loss and correct-prediction sums are reset every epoch and turned into
//! per-sample aggregates once a split has been fully visited.

use serde::{Deserialize, Serialize};

/// Running sums for one pass over a split
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpochAccumulator {
    loss_sum: f64,
    correct: usize,
    seen: usize,
    batches: usize,
}

impl EpochAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one batch: its mean loss, its correct predictions and its size
    pub fn record_batch(&mut self, batch_loss: f64, correct: usize, batch_len: usize) {
        debug_assert!(correct <= batch_len);
        self.loss_sum += batch_loss;
        self.correct += correct.min(batch_len);
        self.seen += batch_len;
        self.batches += 1;
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Aggregate over a split of `dataset_len` samples.
    ///
    /// Loss is the sum of batch-mean losses divided by the split size, and
    /// accuracy the fraction of correct predictions.
    pub fn finish(&self, dataset_len: usize) -> SplitMetrics {
        if dataset_len == 0 {
            return SplitMetrics::default();
        }
        let len = dataset_len as f64;
        SplitMetrics {
            loss: self.loss_sum / len,
            accuracy: (self.correct as f64 / len).clamp(0.0, 1.0),
        }
    }
}

/// Aggregated loss and accuracy of one split
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitMetrics {
    pub loss: f64,
    /// Fraction in `[0, 1]`
    pub accuracy: f64,
}

/// Metrics of one epoch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 1-based epoch number
    pub epoch: usize,
    pub train: SplitMetrics,
    pub test: SplitMetrics,
}

/// Per-epoch sequences of a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, metrics: EpochMetrics) {
        self.epochs.push(metrics);
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn epochs(&self) -> &[EpochMetrics] {
        &self.epochs
    }

    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    pub fn train_losses(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.train.loss).collect()
    }

    pub fn train_accuracies(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.train.accuracy).collect()
    }

    pub fn test_losses(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.test.loss).collect()
    }

    pub fn test_accuracies(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.test.accuracy).collect()
    }

    /// Train accuracy of the last epoch
    pub fn final_train_accuracy(&self) -> Option<f64> {
        self.last().map(|m| m.train.accuracy)
    }

    /// Test accuracy of the last epoch
    pub fn final_test_accuracy(&self) -> Option<f64> {
        self.last().map(|m| m.test.accuracy)
    }

    /// Epoch with the highest test accuracy
    pub fn best_test_epoch(&self) -> Option<&EpochMetrics> {
        self.epochs
            .iter()
            .max_by(|a, b| a.test.accuracy.total_cmp(&b.test.accuracy))
    }
}
