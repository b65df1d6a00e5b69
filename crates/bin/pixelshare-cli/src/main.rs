use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pixelshare::{
    select_shares, Error, FileStore, PixelBuffer, PixelMode, Reconstructor, ShareStore,
    SharingConfig, Splitter,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "pixelshare")]
#[command(about = "(k, n) threshold sharing of raw images", long_about = None)]
struct Args {
    /// TOML config file (threshold, shares, chunk_size, output_dir)
    #[arg(long, global = true, env = "PIXELSHARE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a raw pixel buffer into shares
    Split {
        /// Raw pixel bytes, row-major, no header
        #[arg(long)]
        input: PathBuf,

        /// Pixel mode (L, P, LA, I;16, RGB, YCbCr, LAB, HSV, RGBA, RGBX, CMYK, I, F)
        #[arg(long)]
        mode: PixelMode,

        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        /// Shares needed to reconstruct (k)
        #[arg(short = 'k', long)]
        threshold: Option<u16>,

        /// Shares to produce (n)
        #[arg(short = 'n', long)]
        shares: Option<u16>,

        /// Output directory for share files and metadata
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Rebuild the raw pixel buffer from a share directory
    Recover {
        /// Directory holding metadata.json and share_{x}.bin files
        #[arg(long)]
        dir: PathBuf,

        /// Where to write the recovered raw pixel bytes
        #[arg(long)]
        output: PathBuf,
    },

    /// Show the metadata and shares present in a share directory
    Inspect {
        #[arg(long)]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelshare=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Split {
            input,
            mode,
            width,
            height,
            threshold,
            shares,
            out,
        } => {
            let mut config = config;
            if let Some(k) = threshold {
                config.threshold = k;
            }
            if let Some(n) = shares {
                config.shares = n;
            }
            config.validate().context("invalid sharing parameters")?;
            let out = out.unwrap_or_else(|| config.output_dir.clone());
            split(&config, &input, mode, width, height, &out)
        }
        Command::Recover { dir, output } => recover(&config, &dir, &output),
        Command::Inspect { dir } => inspect(&dir),
    }
}

fn load_config(path: Option<&Path>) -> Result<SharingConfig> {
    match path {
        Some(path) => {
            let config = SharingConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            info!("loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(SharingConfig::default()),
    }
}

fn split(
    config: &SharingConfig,
    input: &Path,
    mode: PixelMode,
    width: u32,
    height: u32,
    out: &Path,
) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let image = PixelBuffer::new(mode, width, height, bytes)?;

    let splitter = Splitter::from_config(config)?;
    let output = pixelshare::split_image_to_dir(&image, &splitter, out)
        .with_context(|| format!("failed to write shares to {}", out.display()))?;

    println!(
        "wrote {} shares to {} ({} needed to recover)",
        output.shares.len(),
        out.display(),
        output.metadata.threshold
    );
    Ok(())
}

fn recover(config: &SharingConfig, dir: &Path, output: &Path) -> Result<()> {
    if !pixelshare::validate_shares(dir) {
        warn!("{} has no metadata.json or no share files", dir.display());
    }

    let bundle = FileStore::new(dir)
        .load_bundle()
        .with_context(|| format!("failed to load shares from {}", dir.display()))?;
    let image = Reconstructor::from_config(config).reconstruct_bundle(&bundle)?;

    fs::write(output, image.bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "recovered {} {}x{} image to {}",
        image.mode(),
        image.width(),
        image.height(),
        output.display()
    );
    Ok(())
}

fn inspect(dir: &Path) -> Result<()> {
    let store = FileStore::new(dir);
    let bundle = store
        .load_bundle()
        .with_context(|| format!("failed to load shares from {}", dir.display()))?;

    let Some(meta) = bundle.metadata() else {
        println!("shares present: {:?}", bundle.points());
        bail!("no metadata.json in {}", dir.display());
    };

    println!("version:   {}", meta.version);
    println!("mode:      {}", meta.mode);
    println!("size:      {}x{}", meta.width(), meta.height());
    println!("threshold: {} of {}", meta.threshold, meta.shares);
    println!("present:   {:?}", bundle.points());

    // same checks recover runs before interpolating
    match select_shares(meta, bundle.shares()) {
        Ok(_) => println!("status:    recoverable"),
        Err(Error::InsufficientShares { required, supplied, .. }) => println!(
            "status:    need {} more share(s)",
            required as usize - supplied
        ),
        Err(e) => println!("status:    not recoverable: {e}"),
    }
    Ok(())
}
