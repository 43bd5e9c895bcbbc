//! leafscan CLI - Leaf health classification

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use leafscan::classify::{
    Classification, DatasetBuilder, KernelWidth, Label, ModelContext, ModelRegistry,
    TrainOptions, run_training,
};
use leafscan::features::{ExtractOptions, FeatureVector, extract_with_options};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "leafscan")]
#[command(
    author,
    version,
    about = "Leaf health classification from photographs",
    long_about = None
)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a classifier from a healthy and an unhealthy image directory
    Train {
        /// Directory of healthy leaf images
        #[arg(long)]
        healthy: PathBuf,
        /// Directory of unhealthy leaf images
        #[arg(long)]
        unhealthy: PathBuf,
        /// Where to write the trained model
        #[arg(short, long)]
        output: PathBuf,
        /// Seed of the train/test shuffle
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Fraction of images held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_ratio: f64,
        /// Fixed Gaussian kernel width instead of the data-derived one
        #[arg(long)]
        kernel_eps: Option<f64>,
        /// Extract features on the calling thread only
        #[arg(long)]
        sequential: bool,
    },
    /// Classify a leaf image
    Predict {
        /// Image to classify
        image: PathBuf,
        /// Model file
        #[arg(
            short,
            long,
            conflicts_with = "registry",
            required_unless_present = "registry"
        )]
        model: Option<PathBuf>,
        /// Model registry (TOML)
        #[arg(short, long)]
        registry: Option<PathBuf>,
        /// Registry entry to use instead of the default
        #[arg(short, long, requires = "registry")]
        name: Option<String>,
    },
    /// Print the feature vector of an image
    Features {
        /// Input image
        image: PathBuf,
        /// Also write the resized analysis canvas as PNG
        #[arg(long)]
        canvas: Option<PathBuf>,
    },
    /// List the models of a registry
    Models {
        /// Model registry (TOML)
        #[arg(short, long)]
        registry: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}

fn print_features(features: &FeatureVector) {
    println!("Features:");
    for (name, value) in features.named() {
        println!("  {:<17} {:.4}", name, value);
    }
}

fn print_classification(image: &Path, model: &str, c: &Classification) {
    let p = &c.prediction;
    println!("Image: {}", image.display());
    println!("Model: {}", model);
    println!("Status: {}", p.label.name().to_uppercase());
    println!("Confidence: {:.1}%", p.confidence * 100.0);
    println!(
        "Probabilities: healthy {:.1}%, unhealthy {:.1}%",
        p.probabilities.healthy * 100.0,
        p.probabilities.unhealthy * 100.0
    );
    print_features(&c.features);
    if p.label == Label::Unhealthy {
        println!();
        println!("Early blight suspected.");
        println!("  - Show the leaf to an expert for a closer inspection");
        println!();
        println!("Recommendations:");
        println!("  - Plant resistant varieties");
        println!("  - Rotate crops");
        println!("  - Water correctly and keep foliage ventilated");
        println!("  - Apply fungicide");
        println!("  - Remove crop residue and keep tools clean");
    }
}

fn train(
    healthy: &Path,
    unhealthy: &Path,
    output: &Path,
    options: &TrainOptions,
    sequential: bool,
) -> Result<()> {
    let start = Instant::now();
    let builder = DatasetBuilder::new(healthy, unhealthy).parallel(!sequential);
    let (model, report) = run_training(&builder, options).context("Training failed")?;
    println!("{}", report);
    model
        .save(output)
        .with_context(|| format!("Failed to write model to {}", output.display()))?;
    println!("Model saved to: {}", output.display());
    println!("  Processing time: {:.2?}", start.elapsed());
    Ok(())
}

fn open_context(model: Option<PathBuf>, registry: Option<PathBuf>) -> Result<ModelContext> {
    let registry = match (model, registry) {
        (Some(path), _) => {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "model".to_string());
            ModelRegistry::single(name, path)
        }
        (None, Some(path)) => ModelRegistry::load(&path)
            .with_context(|| format!("Failed to load registry {}", path.display()))?,
        (None, None) => bail!("either --model or --registry is required"),
    };
    Ok(ModelContext::new(registry))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Train {
            healthy,
            unhealthy,
            output,
            seed,
            test_ratio,
            kernel_eps,
            sequential,
        } => {
            let options = TrainOptions {
                seed,
                test_ratio,
                kernel_width: kernel_eps.map_or(KernelWidth::Scale, KernelWidth::Fixed),
                ..TrainOptions::default()
            };
            train(&healthy, &unhealthy, &output, &options, sequential)?;
        }

        Commands::Predict {
            image,
            model,
            registry,
            name,
        } => {
            let context = open_context(model, registry)?;
            let name = match name {
                Some(n) => n,
                None => context
                    .registry()
                    .default_name()
                    .context("Registry lists no models")?
                    .to_string(),
            };
            context
                .select(&name)
                .with_context(|| format!("Failed to load model {:?}", name))?;
            let result = context
                .classify_image(&image)
                .with_context(|| format!("Failed to classify {}", image.display()))?;
            print_classification(&image, &name, &result);
        }

        Commands::Features { image, canvas } => {
            let options = ExtractOptions::default();
            let pixels = leafscan::io::read_image(&image)
                .with_context(|| format!("Failed to read {}", image.display()))?;
            info!("Input: {} x {}", pixels.width(), pixels.height());
            let features =
                extract_with_options(&pixels, &options).context("Feature extraction failed")?;
            println!("Image: {}", image.display());
            print_features(&features);
            if let Some(out) = canvas {
                let resized = leafscan::transform::scale_to_size(
                    &pixels,
                    options.canvas_size,
                    options.canvas_size,
                )
                .context("Failed to resize")?;
                leafscan::io::write_image(&resized, &out)
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                println!("Canvas saved to: {}", out.display());
            }
        }

        Commands::Models { registry } => {
            let registry = ModelRegistry::load(&registry)
                .with_context(|| format!("Failed to load registry {}", registry.display()))?;
            let default = registry.default_name();
            for name in registry.names() {
                let marker = if Some(name) == default { "*" } else { " " };
                let path = registry.path(name)?;
                println!("{} {:<16} {}", marker, name, path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("leafscan").chain(args.iter().copied()))
    }

    #[test]
    fn test_predict_requires_a_model_source() {
        assert!(parse(&["predict", "leaf.png"]).is_err());
        assert!(parse(&["predict", "leaf.png", "--model", "m.lsm"]).is_ok());
        let both = ["predict", "leaf.png", "-m", "m.lsm", "-r", "r.toml"];
        assert!(parse(&both).is_err());
        assert!(parse(&["predict", "leaf.png", "--name", "x"]).is_err());
    }

    #[test]
    fn test_train_defaults() {
        let cli = parse(&["train", "--healthy", "h", "--unhealthy", "u", "-o", "m"]).unwrap();
        match cli.command {
            Commands::Train {
                seed, test_ratio, ..
            } => {
                assert_eq!(seed, 42);
                assert_eq!(test_ratio, 0.2);
            }
            _ => panic!("expected train"),
        }
    }
}
