//! Dataset module for the ASL hand-sign data
//!
//! This module provides functionality for:
//! - Reading the pre-packaged train/test arrays from a container file
//! - Normalizing pixels and exposing the splits through Burn's `Dataset`
//! - Partitioning a split into shuffled or sequential mini-batches

pub mod burn_dataset;
pub mod container;
pub mod sampler;

// Re-export main types for convenience
pub use burn_dataset::{normalize_pixel, AslBatch, AslBatcher, AslDataset, AslItem};
pub use container::{
    load_container, save_safetensors, AslArrays, ContainerFormat, ContainerSummary, ImageArray, PixelBuffer,
    Split,
};
pub use sampler::{num_batches, BatchPlan, EpochSampler, SamplingOrder};

/// Number of output classes (26 letters + 3 control signs)
pub const NUM_CLASSES: usize = 29;

/// Class names, indexed by label
pub const CLASS_NAMES: [&str; NUM_CLASSES] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "del", "nothing", "space",
];

/// Get the class name for a given label index
pub fn class_name(label: usize) -> Option<&'static str> {
    CLASS_NAMES.get(label).copied()
}
