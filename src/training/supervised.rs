//! Supervised Training Implementation
//!
//! A plain epoch loop over Burn's autodiff backend: one shuffled pass over the
//! training split with Adam updates, then one sequential pass over the test
//! split on the inner backend (no gradients, dropout disabled).

use burn::{
    data::dataloader::batcher::Batcher,
    data::dataset::Dataset,
    module::{AutodiffModule, Module},
    optim::{AdamConfig, GradientsParams, Optimizer},
    tensor::{
        backend::{AutodiffBackend, Backend},
        ElementConversion,
    },
};
use tracing::{debug, info};

use super::metrics::{EpochAccumulator, EpochMetrics, TrainingHistory};
use super::report;
use crate::dataset::{AslArrays, AslBatcher, AslDataset, BatchPlan, EpochSampler, SamplingOrder};
use crate::model::{count_correct, AslNet, TrainingConfig};
use crate::utils::error::Result;
use crate::utils::format_number;
use crate::utils::logging::TrainingLogger;

/// Result of a training run
#[derive(Debug)]
pub struct TrainingOutcome<B: AutodiffBackend> {
    pub model: AslNet<B>,
    pub history: TrainingHistory,
}

/// Train a fresh model on `arrays.train`, evaluating on `arrays.test` after
/// every epoch.
///
/// # Type Parameters
/// * `B` - The autodiff backend to use (e.g., `Autodiff<NdArray>`)
pub fn run_training<B>(config: &TrainingConfig, arrays: AslArrays, device: &B::Device) -> Result<TrainingOutcome<B>>
where
    B: AutodiffBackend,
{
    config.validate()?;

    let sample_dims = arrays.sample_dims();
    let net_config = config.net_config(sample_dims);
    let mut model = net_config.init::<B>(device)?;
    let mut optimizer = AdamConfig::new().init();

    let train = AslDataset::new(arrays.train);
    let test = AslDataset::new(arrays.test);

    let batcher = AslBatcher::<B>::new(device.clone(), sample_dims);
    let eval_batcher = AslBatcher::<B::InnerBackend>::new(device.clone(), sample_dims);

    info!(
        "Model: {} parameters, input {:?}, fc1 input {}",
        format_number(model.num_params()),
        sample_dims,
        net_config.flattened_size().unwrap_or_default()
    );
    info!(
        "Training on {} samples, evaluating on {} samples ({} epochs, batch size {}, lr {})",
        format_number(train.len()),
        format_number(test.len()),
        config.epochs,
        config.batch_size,
        config.learning_rate
    );

    let mut sampler = EpochSampler::new(config.batch_size, config.seed);
    let mut logger = TrainingLogger::new(config.epochs);
    let mut history = TrainingHistory::new();

    for epoch in 0..config.epochs {
        logger.start_epoch(epoch);

        let train_plan = sampler.plan(SamplingOrder::Shuffled, train.len());
        let (next_model, train_totals) =
            train_epoch(model, &mut optimizer, &train, &batcher, &train_plan, config.learning_rate);
        model = next_model;

        let test_plan = sampler.plan(SamplingOrder::Sequential, test.len());
        let test_totals = evaluate(&model.valid(), &test, &eval_batcher, &test_plan);

        let metrics = EpochMetrics {
            epoch: epoch + 1,
            train: train_totals.finish(train.len()),
            test: test_totals.finish(test.len()),
        };

        report::print_epoch(&metrics);
        logger.end_epoch(&metrics);
        history.push(metrics);
    }

    logger.log_complete();
    Ok(TrainingOutcome { model, history })
}

/// One pass over the training split with a parameter update per batch
pub fn train_epoch<B, O>(
    mut model: AslNet<B>,
    optimizer: &mut O,
    dataset: &AslDataset,
    batcher: &AslBatcher<B>,
    plan: &BatchPlan,
    learning_rate: f64,
) -> (AslNet<B>, EpochAccumulator)
where
    B: AutodiffBackend,
    O: Optimizer<AslNet<B>, B>,
{
    let mut totals = EpochAccumulator::new();
    let num_batches = plan.num_batches();

    for (batch_idx, indices) in plan.batches().enumerate() {
        let items = dataset.items(indices);
        if items.is_empty() {
            continue;
        }
        let batch_len = items.len();
        let batch = batcher.batch(items);
        let targets = batch.targets.clone();

        // Forward pass
        let (loss, logits) = model.forward_classification(batch);
        let loss_value: f64 = loss.clone().into_scalar().elem();
        let correct = count_correct(logits, targets);
        totals.record_batch(loss_value, correct, batch_len);

        // Backward pass and update
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optimizer.step(learning_rate, model, grads);

        if (batch_idx + 1) % 50 == 0 || batch_idx + 1 == num_batches {
            debug!(
                "  Batch {:>4}/{}: loss = {:.4}, running acc = {:.2}%",
                batch_idx + 1,
                num_batches,
                loss_value,
                100.0 * totals.correct() as f64 / totals.seen().max(1) as f64
            );
        }
    }

    (model, totals)
}

/// One pass over an evaluation split without parameter updates
pub fn evaluate<B: Backend>(
    model: &AslNet<B>,
    dataset: &AslDataset,
    batcher: &AslBatcher<B>,
    plan: &BatchPlan,
) -> EpochAccumulator {
    let mut totals = EpochAccumulator::new();

    for indices in plan.batches() {
        let items = dataset.items(indices);
        if items.is_empty() {
            continue;
        }
        let batch_len = items.len();
        let batch = batcher.batch(items);
        let targets = batch.targets.clone();

        let (loss, logits) = model.forward_classification(batch);
        let loss_value: f64 = loss.into_scalar().elem();
        totals.record_batch(loss_value, count_correct(logits, targets), batch_len);
    }

    totals
}
