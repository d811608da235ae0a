//! CNN Model Architecture for hand-sign classification
//!
//! Two valid-padding 3x3 convolutions, each followed by GELU and a 2x2 max
//! pool, then a wide fully connected layer with dropout and the class layer.

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::CrossEntropyLossConfig,
        pool::{MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig, Gelu, Linear, LinearConfig,
    },
    tensor::{backend::Backend, Int, Tensor},
};

use crate::dataset::{AslBatch, NUM_CLASSES};
use crate::utils::error::{self, AslError};

/// Configuration for the AslNet CNN model
#[derive(Config, Debug)]
pub struct AslNetConfig {
    /// Number of output classes
    #[config(default = "29")]
    pub num_classes: usize,

    /// Number of input channels (3 for RGB)
    #[config(default = "3")]
    pub in_channels: usize,

    /// Input image height
    #[config(default = "124")]
    pub image_height: usize,

    /// Input image width
    #[config(default = "124")]
    pub image_width: usize,

    #[config(default = "8")]
    pub conv1_filters: usize,

    #[config(default = "16")]
    pub conv2_filters: usize,

    /// Square kernel size of both convolutions
    #[config(default = "3")]
    pub kernel_size: usize,

    /// Width of the hidden fully connected layer
    #[config(default = "6000")]
    pub hidden_size: usize,

    /// Dropout rate between the two fully connected layers
    #[config(default = "0.3")]
    pub dropout: f64,
}

impl AslNetConfig {
    /// Spatial size after one valid convolution and a 2x2 pool
    fn stage_output(&self, size: usize) -> Option<usize> {
        let conv = size.checked_sub(self.kernel_size.saturating_sub(1))?;
        Some(conv / 2)
    }

    /// Feature-map `(height, width)` entering the flatten step
    pub fn feature_map_size(&self) -> Option<(usize, usize)> {
        let h = self.stage_output(self.image_height).and_then(|h| self.stage_output(h))?;
        let w = self.stage_output(self.image_width).and_then(|w| self.stage_output(w))?;
        if h == 0 || w == 0 {
            return None;
        }
        Some((h, w))
    }

    /// Input width of `fc1` (13456 for 124x124 images)
    pub fn flattened_size(&self) -> Option<usize> {
        self.feature_map_size().map(|(h, w)| self.conv2_filters * h * w)
    }

    /// Validate the configuration
    pub fn validate(&self) -> error::Result<()> {
        if self.num_classes == 0 {
            return Err(AslError::Config("num_classes must be greater than 0".to_string()));
        }
        if self.kernel_size == 0 {
            return Err(AslError::Config("kernel_size must be positive".to_string()));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(AslError::Config("dropout must be in range [0.0, 1.0)".to_string()));
        }
        if self.flattened_size().is_none() {
            return Err(AslError::Config(format!(
                "images of {}x{} are too small for two conv/pool stages",
                self.image_height, self.image_width
            )));
        }
        Ok(())
    }

    /// Initialize a model, validating the configuration first
    pub fn init<B: Backend>(&self, device: &B::Device) -> error::Result<AslNet<B>> {
        self.validate()?;
        Ok(AslNet::new(self, device))
    }
}

/// Hand-sign classifier CNN
#[derive(Module, Debug)]
pub struct AslNet<B: Backend> {
    pub conv1: Conv2d<B>,
    pub conv2: Conv2d<B>,
    pub pool: MaxPool2d,
    pub fc1: Linear<B>,
    pub fc2: Linear<B>,
    pub dropout: Dropout,
    pub activation: Gelu,
    num_classes: usize,
}

impl<B: Backend> AslNet<B> {
    /// Create the network; `config` must already be valid
    fn new(config: &AslNetConfig, device: &B::Device) -> Self {
        let kernel = [config.kernel_size, config.kernel_size];
        let flattened = config.flattened_size().unwrap_or(0);

        let conv1 = Conv2dConfig::new([config.in_channels, config.conv1_filters], kernel).init(device);
        let conv2 = Conv2dConfig::new([config.conv1_filters, config.conv2_filters], kernel).init(device);
        let pool = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();

        let fc1 = LinearConfig::new(flattened, config.hidden_size).init(device);
        let fc2 = LinearConfig::new(config.hidden_size, config.num_classes).init(device);

        Self {
            conv1,
            conv2,
            pool,
            fc1,
            fc2,
            dropout: DropoutConfig::new(config.dropout).init(),
            activation: Gelu::new(),
            num_classes: config.num_classes,
        }
    }

    /// Forward pass through the network
    ///
    /// # Arguments
    /// * `images` - Input tensor of shape [batch_size, channels, height, width]
    ///
    /// # Returns
    /// * Logits tensor of shape [batch_size, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(images);
        let x = self.activation.forward(x);
        let x = self.pool.forward(x);

        let x = self.conv2.forward(x);
        let x = self.activation.forward(x);
        let x = self.pool.forward(x);

        // [B, C, H, W] -> [B, C * H * W]
        let x = x.flatten::<2>(1, 3);

        let x = self.fc1.forward(x);
        let x = self.activation.forward(x);
        let x = self.dropout.forward(x);
        self.fc2.forward(x)
    }

    /// Forward pass plus mean cross-entropy against the batch targets
    pub fn forward_classification(&self, batch: AslBatch<B>) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(batch.images);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), batch.targets);
        (loss, logits)
    }

    /// Get the number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

/// Number of correct argmax predictions in a batch
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    use burn::tensor::ElementConversion;

    let predictions = logits.argmax(1).squeeze::<1>(1);
    let correct: i64 = predictions.equal(targets).int().sum().into_scalar().elem();
    correct.max(0) as usize
}

/// Default configuration for images of the given spatial size
pub fn config_for_images(channels: usize, height: usize, width: usize) -> AslNetConfig {
    AslNetConfig::new()
        .with_num_classes(NUM_CLASSES)
        .with_in_channels(channels)
        .with_image_height(height)
        .with_image_width(width)
}
