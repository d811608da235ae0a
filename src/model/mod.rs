//! Model module: the CNN and the run configuration
//!
//! - `cnn`: the two-convolution, two-linear-layer classifier built with Burn
//! - `config`: training hyperparameters and their JSON form

pub mod cnn;
pub mod config;

// Re-export main types for convenience
pub use cnn::{count_correct, AslNet, AslNetConfig};
pub use config::TrainingConfig;
