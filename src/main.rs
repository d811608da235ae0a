//! ASL hand-sign classifier CLI
//!
//! Entry point for training the sign classifier on a pre-packaged dataset
//! container and for inspecting or converting that container.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use asl_signs::backend::{backend_name, default_device, TrainingBackend};
use asl_signs::dataset::{self, load_container, save_safetensors, AslArrays};
use asl_signs::training::{render_charts, report, run_training, TrainingConfig};
use asl_signs::utils::format_number;
use asl_signs::utils::logging::{init_logging, LogConfig};

/// ASL hand-sign classification with Burn
#[derive(Parser, Debug)]
#[command(name = "asl_signs")]
#[command(version)]
#[command(about = "Train a hand-sign letter classifier with Burn", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train the classifier and plot its learning curves
    Train {
        /// Dataset container (.safetensors, or .h5/.hdf5 with the `hdf5` feature)
        #[arg(short, long, default_value = "ASLdatasetGroup23.hdf5")]
        data: PathBuf,

        /// Directory for the accuracy and loss charts
        #[arg(short, long, default_value = "output/charts")]
        output_dir: PathBuf,

        /// JSON file overriding the default hyperparameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for the per-epoch shuffle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print array shapes and per-class counts of a container
    Inspect {
        /// Dataset container
        #[arg(short, long, default_value = "ASLdatasetGroup23.hdf5")]
        data: PathBuf,
    },

    /// Rewrite a container as .safetensors (u8 images stay u8, other pixel types become f32)
    Convert {
        /// Source container
        #[arg(short, long)]
        input: PathBuf,

        /// Destination .safetensors file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };

    if let Err(e) = init_logging(&log_config) {
        eprintln!("{}", e);
    }

    print_banner();

    match cli.command {
        Commands::Train {
            data,
            output_dir,
            config,
            seed,
        } => cmd_train(&data, &output_dir, config.as_deref(), seed),
        Commands::Inspect { data } => cmd_inspect(&data),
        Commands::Convert { input, output } => cmd_convert(&input, &output),
    }
}

fn print_banner() {
    println!(
        "{}",
        r#"
 +--------------------------------------------------+
 |   ASL Signs                                      |
 |   Hand-sign letter classification with Burn      |
 +--------------------------------------------------+
  "#
        .green()
    );
}

fn load_arrays(data: &Path) -> Result<AslArrays> {
    println!("{}", "Loading Dataset...".cyan());
    let arrays = load_container(data).with_context(|| format!("Failed to load dataset from {}", data.display()))?;
    println!("{}", arrays.summary());
    println!();
    Ok(arrays)
}

fn cmd_train(data: &Path, output_dir: &Path, config_path: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let mut config = match config_path {
        Some(path) => TrainingConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TrainingConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let arrays = load_arrays(data)?;
    if arrays.train.is_empty() {
        warn!("Training split is empty; every epoch will report zero accuracy");
    }

    let device = default_device();
    println!("Using device: {} ({:?})", backend_name(), device);
    println!();

    println!("{}", "Training Configuration:".cyan().bold());
    println!("  Epochs:        {}", config.epochs);
    println!("  Batch size:    {}", config.batch_size);
    println!("  Learning rate: {}", config.learning_rate);
    println!("  Dropout:       {}", config.model.dropout);
    println!("  Seed:          {}", config.seed);
    println!();

    println!("{}", "Starting Training...".green().bold());
    let outcome = run_training::<TrainingBackend>(&config, arrays, &device).context("Training failed")?;

    report::print_final(&outcome.history);

    let charts = render_charts(&outcome.history, output_dir).context("Failed to render charts")?;
    println!();
    println!("{}", "Charts:".cyan().bold());
    println!("  {}", charts.accuracy.display());
    println!("  {}", charts.loss.display());

    Ok(())
}

fn cmd_inspect(data: &Path) -> Result<()> {
    let arrays = load_arrays(data)?;
    info!("Sample shape {:?}", arrays.sample_dims());

    let train_counts = arrays.train.class_distribution();
    let test_counts = arrays.test.class_distribution();

    println!("{}", "Class Distribution:".cyan().bold());
    println!("  {:<8} {:>8} {:>8}", "class", "train", "test");
    for label in 0..dataset::NUM_CLASSES {
        let name = dataset::class_name(label).unwrap_or("?");
        println!(
            "  {:<8} {:>8} {:>8}",
            name,
            format_number(train_counts[label]),
            format_number(test_counts[label])
        );
    }
    println!(
        "  {:<8} {:>8} {:>8}",
        "total",
        format_number(arrays.train.len()),
        format_number(arrays.test.len())
    );

    Ok(())
}

fn cmd_convert(input: &Path, output: &Path) -> Result<()> {
    let arrays = load_arrays(input)?;
    save_safetensors(&arrays, output).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("{} {}", "Wrote".green(), output.display());
    Ok(())
}
