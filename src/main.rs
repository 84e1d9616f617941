use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epaper_palette::models::PipelineConfig;
use epaper_palette::services::optimizer::DEFAULT_MAX_EVALUATIONS;
use epaper_palette::services::{compare, read_rgba, ConversionService, Optimizer};

#[derive(Parser)]
#[command(name = "epaper-palette")]
#[command(about = "Convert photos for 4-color (white/black/red/yellow) e-paper displays")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gamut map, optionally remap lightness, and dither a raw RGBA image
    Convert {
        /// Input raw RGBA file
        #[arg(short, long)]
        input: PathBuf,

        /// Image width in pixels
        #[arg(long)]
        width: usize,

        /// Image height in pixels
        #[arg(long)]
        height: usize,

        /// Output raw RGBA file
        #[arg(short, long)]
        output: PathBuf,

        /// Pipeline configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip dithering and write the gamut-mapped preview
        #[arg(long)]
        preview: bool,

        /// Log quality metrics of the output against the input
        #[arg(long)]
        metrics: bool,
    },
    /// Approximately restore a photo from a dithered raw RGBA image
    Reconvert {
        /// Dithered raw RGBA file
        #[arg(short, long)]
        input: PathBuf,

        /// Image width in pixels
        #[arg(long)]
        width: usize,

        /// Image height in pixels
        #[arg(long)]
        height: usize,

        /// Output raw RGBA file
        #[arg(short, long)]
        output: PathBuf,

        /// Pipeline configuration the image was converted with (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Gaussian blur radius in pixels
        #[arg(long, default_value_t = 2)]
        blur_radius: u32,

        /// Manual brightness factor (0.5 - 2.0)
        #[arg(long, default_value_t = 1.0)]
        brightness: f64,
    },
    /// Print quality metrics of a reconstruction as JSON
    Metrics {
        /// Original raw RGBA file
        #[arg(long)]
        original: PathBuf,

        /// Reconstructed raw RGBA file
        #[arg(long)]
        reconstructed: PathBuf,

        /// Image width in pixels
        #[arg(long)]
        width: usize,

        /// Image height in pixels
        #[arg(long)]
        height: usize,
    },
    /// Search mode and dithering parameters that best preserve the image
    Optimize {
        /// Input raw RGBA file
        #[arg(short, long)]
        input: PathBuf,

        /// Image width in pixels
        #[arg(long)]
        width: usize,

        /// Image height in pixels
        #[arg(long)]
        height: usize,

        /// Starting pipeline configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum number of candidate configurations to score
        #[arg(long, default_value_t = DEFAULT_MAX_EVALUATIONS)]
        max_evaluations: usize,

        /// Write the best configuration here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the default pipeline configuration as YAML
    DefaultConfig,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "epaper_palette=info,four_color_dither=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            width,
            height,
            output,
            config,
            preview,
            metrics,
        } => {
            let service = ConversionService::new(load_config(config.as_deref())?)?;
            let (source, result) = service
                .convert_file(&input, &output, width, height, preview)
                .with_context(|| format!("Failed to convert {}", input.display()))?;
            if metrics {
                let report = compare(&source, &result)?;
                tracing::info!(
                    psnr = report.psnr,
                    ssim = report.ssim,
                    mean_delta_e = report.mean_delta_e,
                    histogram_correlation = report.histogram_correlation,
                    composite = report.composite,
                    "Quality metrics"
                );
            }
            Ok(())
        }
        Commands::Reconvert {
            input,
            width,
            height,
            output,
            config,
            blur_radius,
            brightness,
        } => {
            let service = ConversionService::new(load_config(config.as_deref())?)?;
            service
                .reconvert_file(&input, &output, width, height, blur_radius, brightness)
                .with_context(|| format!("Failed to reconvert {}", input.display()))?;
            Ok(())
        }
        Commands::Metrics {
            original,
            reconstructed,
            width,
            height,
        } => {
            let a = read_rgba(&original, width, height)
                .with_context(|| format!("Failed to read {}", original.display()))?;
            let b = read_rgba(&reconstructed, width, height)
                .with_context(|| format!("Failed to read {}", reconstructed.display()))?;
            let report = compare(&a, &b)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Optimize {
            input,
            width,
            height,
            config,
            max_evaluations,
            output,
        } => {
            let source = read_rgba(&input, width, height)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let result = Optimizer::new(load_config(config.as_deref())?)?
                .max_evaluations(max_evaluations)
                .optimize(&source)?;
            tracing::info!(
                initial_score = result.initial_score,
                score = result.score,
                evaluations = result.evaluations,
                "Best configuration found"
            );

            let yaml = result.config.to_yaml()?;
            match output {
                Some(path) => std::fs::write(&path, yaml)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{yaml}"),
            }
            Ok(())
        }
        Commands::DefaultConfig => {
            print!("{}", PipelineConfig::default().to_yaml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}
