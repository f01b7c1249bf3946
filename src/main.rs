//! `terrain-prep` CLI - Resize and normalize terrain texture images.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terrain_prep::batch::DEFAULT_OUTPUT_DIR;
use terrain_prep::pipeline::DEFAULT_ALLOWED_SIZES;
use terrain_prep::{AllowedSizes, BatchReport, Config, Processor, TargetSpec};

/// Resize and normalize terrain texture images into PNG assets.
#[derive(Parser, Debug)]
#[command(name = "terrain-prep")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Name of the output directory created next to each source image.
    #[arg(long, global = true, default_value = DEFAULT_OUTPUT_DIR, value_name = "NAME")]
    output_dir_name: String,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resize images to an exact size.
    Resize {
        /// Image file, or directory of images.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Width of the resized images.
        #[arg(long, default_value = "1024", value_name = "INT")]
        width: u32,

        /// Height of the resized images.
        #[arg(long, default_value = "1024", value_name = "INT")]
        height: u32,
    },

    /// Snap images to the nearest allowed size on each axis.
    Preprocess {
        /// Image file, or directory of images.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Allowed output sizes, comma separated.
        #[arg(long, value_delimiter = ',', value_name = "INT,...")]
        sizes: Vec<u32>,

        /// Treat PATH as a directory of asset directories and convert each one.
        #[arg(long)]
        asset_root: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("terrain_prep={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: Args) -> Result<()> {
    let (path, target, asset_root) = match args.command {
        Command::Resize { path, width, height } => {
            (path, TargetSpec::Explicit { width, height }, false)
        }
        Command::Preprocess {
            path,
            sizes,
            asset_root,
        } => {
            let sizes = if sizes.is_empty() {
                DEFAULT_ALLOWED_SIZES.to_vec()
            } else {
                sizes
            };
            let sizes = AllowedSizes::new(sizes).context("Invalid --sizes")?;
            (path, TargetSpec::Nearest(sizes), asset_root)
        }
    };

    if !path.exists() {
        anyhow::bail!("Input path does not exist: {}", path.display());
    }

    let config = Config {
        target,
        output_dir_name: args.output_dir_name,
        ..Config::default()
    };
    let processor = Processor::new(config).context("Failed to configure processor")?;

    let report = if asset_root {
        processor.run_asset_root(&path)
    } else {
        processor.run(&path)
    }
    .with_context(|| format!("Failed to process {}", path.display()))?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!(
        "Converted {} of {} images",
        report.converted.len(),
        report.total()
    );
    for failed in &report.failed {
        println!("  failed: {} ({})", failed.path.display(), failed.reason);
    }
}
