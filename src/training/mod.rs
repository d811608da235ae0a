//! Training module
//!
//! - `supervised`: the epoch loop (train pass with Adam, then test pass)
//! - `metrics`: per-epoch accumulators and the run history
//! - `report`: console lines and learning-curve charts

pub mod metrics;
pub mod report;
pub mod supervised;

// Re-export main types for convenience
pub use metrics::{EpochAccumulator, EpochMetrics, SplitMetrics, TrainingHistory};
pub use report::{render_charts, ChartPaths};
pub use supervised::{evaluate, run_training, train_epoch, TrainingOutcome};

// Re-export TrainingConfig from model::config where it's defined
pub use crate::model::config::TrainingConfig;
