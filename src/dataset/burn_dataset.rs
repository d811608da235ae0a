//! Burn Dataset Integration for the ASL arrays
//!
//! Implements Burn's `Dataset` and `Batcher` traits over an in-memory split.
//! Pixels stay in their container representation and are normalized to
//! `[0, 1]` as items are read.

use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;
use burn::prelude::*;

use super::container::Split;
use super::NUM_CLASSES;

/// Largest raw intensity; raw pixels are divided by this
pub const PIXEL_MAX: f32 = 255.0;

/// Rescale one raw intensity to `[0, 1]`; NaN maps to 0
pub fn normalize_pixel(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, PIXEL_MAX) / PIXEL_MAX
}

/// A single sample ready for Burn
#[derive(Clone, Debug, PartialEq)]
pub struct AslItem {
    /// Normalized CHW pixels
    pub image: Vec<f32>,
    /// Class label (0-28)
    pub label: usize,
}

/// One split exposed through Burn's `Dataset` trait
#[derive(Debug, Clone)]
pub struct AslDataset {
    split: Split,
}

impl AslDataset {
    pub fn new(split: Split) -> Self {
        Self { split }
    }

    /// `(channels, height, width)` of each item
    pub fn sample_dims(&self) -> [usize; 3] {
        self.split.images.sample_dims()
    }

    /// Items for the given indices, in the given order
    pub fn items(&self, indices: &[usize]) -> Vec<AslItem> {
        indices.iter().filter_map(|&i| self.get(i)).collect()
    }

    /// Get samples per class count
    pub fn class_distribution(&self) -> Vec<usize> {
        self.split.class_distribution()
    }
}

impl Dataset<AslItem> for AslDataset {
    fn get(&self, index: usize) -> Option<AslItem> {
        let image = self.split.images.normalized_sample(index)?;
        let label = *self.split.labels.get(index)?;
        Some(AslItem { image, label })
    }

    fn len(&self) -> usize {
        self.split.len()
    }
}

/// A batch of images for training
#[derive(Clone, Debug)]
pub struct AslBatch<B: Backend> {
    /// Batch of images with shape [batch_size, channels, height, width]
    pub images: Tensor<B, 4>,
    /// Batch of labels with shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Batcher stacking `AslItem`s into tensors
#[derive(Clone, Debug)]
pub struct AslBatcher<B: Backend> {
    device: B::Device,
    sample_dims: [usize; 3],
}

impl<B: Backend> AslBatcher<B> {
    pub fn new(device: B::Device, sample_dims: [usize; 3]) -> Self {
        Self { device, sample_dims }
    }
}

impl<B: Backend> Batcher<AslItem, AslBatch<B>> for AslBatcher<B> {
    fn batch(&self, items: Vec<AslItem>) -> AslBatch<B> {
        let batch_size = items.len();
        let [channels, height, width] = self.sample_dims;

        let images_data: Vec<f32> = items.iter().flat_map(|item| item.image.iter().copied()).collect();
        let images = Tensor::<B, 4>::from_floats(
            TensorData::new(images_data, [batch_size, channels, height, width]),
            &self.device,
        );

        let targets_data: Vec<i64> = items
            .iter()
            .map(|item| {
                debug_assert!(item.label < NUM_CLASSES);
                item.label as i64
            })
            .collect();
        let targets = Tensor::<B, 1, Int>::from_data(TensorData::new(targets_data, [batch_size]), &self.device);

        AslBatch { images, targets }
    }
}
