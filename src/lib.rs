//! # ASL Signs
//!
//! Trains a small convolutional network to recognize American Sign Language
//! hand signs (26 letters plus `del`, `nothing` and `space`) with the Burn
//! framework, and plots the learning curves.
//!
//! ## Modules
//!
//! - `dataset`: Container loading, normalization and mini-batch plans
//! - `model`: CNN architecture and training configuration
//! - `training`: Epoch loop, metric bookkeeping and reporting
//! - `utils`: Logging, errors and SVG charts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use asl_signs::backend::{default_device, TrainingBackend};
//! use asl_signs::dataset::load_container;
//! use asl_signs::training::{run_training, TrainingConfig};
//!
//! let arrays = load_container("data/asl.safetensors")?;
//! let outcome = run_training::<TrainingBackend>(&TrainingConfig::default(), arrays, &default_device())?;
//! println!("{:?}", outcome.history.final_test_accuracy());
//! ```

pub mod backend;
pub mod dataset;
pub mod model;
pub mod training;
pub mod utils;

// Re-export commonly used items for convenience
pub use dataset::{load_container, AslArrays, AslBatch, AslBatcher, AslDataset, AslItem, CLASS_NAMES, NUM_CLASSES};
pub use model::{AslNet, AslNetConfig, TrainingConfig};
pub use training::{run_training, TrainingHistory, TrainingOutcome};
pub use utils::error::{AslError, Result};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
