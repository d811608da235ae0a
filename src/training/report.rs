//! Console report lines and learning-curve charts

use std::path::{Path, PathBuf};

use colored::Colorize;
use tracing::info;

use super::metrics::{EpochMetrics, TrainingHistory};
use crate::utils::charts::{generate_line_chart, DataSeries, YAxis, COLOR_PRIMARY, COLOR_SECONDARY};
use crate::utils::error::Result;

/// Losses at or below zero are floored here before taking the log
pub const MIN_LOSS: f64 = 1e-12;

pub const ACCURACY_CHART: &str = "accuracy.svg";
pub const LOSS_CHART: &str = "loss.svg";

/// Loss in decibels: `20 * log10(loss)`
pub fn to_decibels(loss: f64) -> f64 {
    20.0 * loss.max(MIN_LOSS).log10()
}

/// The two console lines reported after every epoch
pub fn format_epoch(metrics: &EpochMetrics) -> (String, String) {
    let train = format!(
        "Epoch: {:02}: Train Loss: {:.4}, Train Accuracy: {:2.3}%",
        metrics.epoch,
        metrics.train.loss,
        100.0 * metrics.train.accuracy
    );
    let test = format!(
        "            Test Loss: {:.4}, Test Accuracy: {:2.3}%",
        metrics.test.loss,
        100.0 * metrics.test.accuracy
    );
    (train, test)
}

/// Final summary line, built from the last appended epoch
pub fn format_final(history: &TrainingHistory) -> Option<String> {
    let last = history.last()?;
    Some(format!(
        "Final Train Accuracy: {:2.3}, Final Test Accuracy: {:2.3}",
        100.0 * last.train.accuracy,
        100.0 * last.test.accuracy
    ))
}

/// Epoch with the highest test accuracy, reported after the final line
pub fn format_best(history: &TrainingHistory) -> Option<String> {
    let best = history.best_test_epoch()?;
    Some(format!(
        "Best Test Accuracy: {:2.3}% (epoch {:02})",
        100.0 * best.test.accuracy,
        best.epoch
    ))
}

pub fn print_epoch(metrics: &EpochMetrics) {
    let (train, test) = format_epoch(metrics);
    println!("{}", train);
    println!("{}", test);
}

pub fn print_final(history: &TrainingHistory) {
    if let Some(line) = format_final(history) {
        println!();
        println!("{}", line.green().bold());
    }
    if let Some(line) = format_best(history) {
        println!("{}", line);
    }
}

/// Paths of the rendered charts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPaths {
    pub accuracy: PathBuf,
    pub loss: PathBuf,
}

/// Render the accuracy and loss (dB) charts into `output_dir`
pub fn render_charts(history: &TrainingHistory, output_dir: &Path) -> Result<ChartPaths> {
    std::fs::create_dir_all(output_dir)?;

    let percent = |values: Vec<f64>| values.into_iter().map(|v| 100.0 * v).collect::<Vec<_>>();
    let decibels = |values: Vec<f64>| values.into_iter().map(to_decibels).collect::<Vec<_>>();

    let accuracy_series = [
        DataSeries::from_values("Training Accuracy", &percent(history.train_accuracies()), COLOR_PRIMARY),
        DataSeries::from_values("Test Accuracy", &percent(history.test_accuracies()), COLOR_SECONDARY),
    ];
    let loss_series = [
        DataSeries::from_values("Training Loss", &decibels(history.train_losses()), COLOR_PRIMARY),
        DataSeries::from_values("Test Loss", &decibels(history.test_losses()), COLOR_SECONDARY),
    ];

    let paths = ChartPaths {
        accuracy: output_dir.join(ACCURACY_CHART),
        loss: output_dir.join(LOSS_CHART),
    };

    generate_line_chart(
        "Accuracy",
        "Epochs",
        &YAxis::fixed("Accuracy (%)", 0.0, 100.0, "%"),
        &accuracy_series,
        &paths.accuracy,
    )?;
    generate_line_chart(
        "Loss",
        "Epochs",
        &YAxis::fitted("Loss (dB)", ""),
        &loss_series,
        &paths.loss,
    )?;

    info!("Charts written to {} and {}", paths.accuracy.display(), paths.loss.display());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::metrics::SplitMetrics;

    fn metrics(epoch: usize, train_acc: f64, test_acc: f64) -> EpochMetrics {
        EpochMetrics {
            epoch,
            train: SplitMetrics {
                loss: 0.0123,
                accuracy: train_acc,
            },
            test: SplitMetrics {
                loss: 0.01,
                accuracy: test_acc,
            },
        }
    }

    #[test]
    fn test_to_decibels() {
        assert!((to_decibels(1.0)).abs() < 1e-12);
        assert!((to_decibels(0.1) + 20.0).abs() < 1e-9);
        assert!((to_decibels(0.0) + 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_epoch() {
        let (train, test) = format_epoch(&metrics(1, 0.45678, 0.5));
        assert_eq!(train, "Epoch: 01: Train Loss: 0.0123, Train Accuracy: 45.678%");
        assert_eq!(test, "            Test Loss: 0.0100, Test Accuracy: 50.000%");
    }

    #[test]
    fn test_format_final_uses_last_epoch() {
        let mut history = TrainingHistory::new();
        assert!(format_final(&history).is_none());

        history.push(metrics(1, 0.5, 0.4));
        history.push(metrics(2, 0.99, 0.95));
        assert_eq!(
            format_final(&history).unwrap(),
            "Final Train Accuracy: 99.000, Final Test Accuracy: 95.000"
        );
    }

    #[test]
    fn test_format_best_picks_highest_test_accuracy() {
        let mut history = TrainingHistory::new();
        assert!(format_best(&history).is_none());

        history.push(metrics(1, 0.5, 0.4));
        history.push(metrics(2, 0.8, 0.9));
        history.push(metrics(3, 0.95, 0.85));
        assert_eq!(format_best(&history).unwrap(), "Best Test Accuracy: 90.000% (epoch 02)");
    }

    #[test]
    fn test_render_charts() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = TrainingHistory::new();
        history.push(metrics(1, 0.3, 0.25));
        history.push(metrics(2, 0.6, 0.55));

        let paths = render_charts(&history, &dir.path().join("charts")).unwrap();
        let accuracy = std::fs::read_to_string(&paths.accuracy).unwrap();
        let loss = std::fs::read_to_string(&paths.loss).unwrap();

        assert!(accuracy.contains("Training Accuracy"));
        assert!(accuracy.contains("Test Accuracy"));
        assert!(loss.contains("Loss (dB)"));
    }
}
