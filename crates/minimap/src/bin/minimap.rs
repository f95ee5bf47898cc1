//! minimap CLI: marker detection, colour calibration and waypoint checks.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use image::RgbImage;
use minimap::calibrate::{CalibrationEngine, CalibrationSample, ChannelPercentiles};
use minimap::core::{init_tracing, ColorRange, LogFormat};
use minimap::detect::{crop_region, detect_image, hsv_from_rgb_image, mask_to_gray};
use minimap::{DetectionResult, MinimapConfig};
use nalgebra::Point2;
use serde::Serialize;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "minimap")]
#[command(about = "Detect minimap markers, calibrate marker colours and check departure points")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit log lines on stderr as JSON objects.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect primary and secondary markers in one frame.
    Detect(DetectArgs),

    /// Derive the primary marker colour range from clicks on a frame.
    Calibrate(CalibrateArgs),

    /// List departure points reached by a position.
    Check(CheckArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Config document (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input frame (any format the `image` crate reads).
    #[arg(long)]
    image: PathBuf,

    /// Minimap region inside the frame as x,y,width,height.
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CalibrateArgs {
    /// Input frame (any format the `image` crate reads).
    #[arg(long)]
    image: PathBuf,

    /// Minimap region inside the frame as x,y,width,height.
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    /// Clicked pixel as x,y in region coordinates. Repeat for more samples.
    #[arg(long = "click", value_parser = parse_click, required = true, num_args = 1..)]
    clicks: Vec<(usize, usize)>,

    /// Config document to update with --write.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store the derived range as the primary marker range in --config.
    #[arg(long, requires = "config")]
    write: bool,

    /// Write the preview mask of the frame as an image.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CheckArgs {
    /// Config document with departure points.
    #[arg(long)]
    config: PathBuf,

    #[arg(long, allow_hyphen_values = true)]
    x: f32,

    #[arg(long, allow_hyphen_values = true)]
    y: f32,
}

#[derive(Serialize)]
struct DetectReport {
    result: DetectionResult,
    departure_hits: Vec<String>,
}

#[derive(Serialize)]
struct CalibrateReport {
    range: ColorRange,
    pool_size: usize,
    percentiles: [ChannelPercentiles; 3],
    preview_pixels: usize,
}

fn parse_numbers<T: std::str::FromStr>(s: &str, n: usize, what: &str) -> Result<Vec<T>, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<T>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("expected {what}, got {s:?}"))?;
    if parts.len() != n {
        return Err(format!("expected {what}, got {s:?}"));
    }
    Ok(parts)
}

fn parse_region(s: &str) -> Result<Region, String> {
    let v = parse_numbers::<u32>(s, 4, "x,y,width,height")?;
    Ok(Region {
        x: v[0],
        y: v[1],
        width: v[2],
        height: v[3],
    })
}

fn parse_click(s: &str) -> Result<(usize, usize), String> {
    let v = parse_numbers::<usize>(s, 2, "x,y")?;
    Ok((v[0], v[1]))
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_tracing(level, format)?;

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Calibrate(args) => run_calibrate(&args),
        Commands::Check(args) => run_check(&args),
    }
}

fn load_region(path: &Path, region: Option<Region>) -> CliResult<RgbImage> {
    tracing::info!("Loading image: {}", path.display());
    let frame = image::open(path)?.to_rgb8();
    tracing::info!("Image size: {}x{}", frame.width(), frame.height());
    match region {
        Some(r) => Ok(crop_region(&frame, r.x, r.y, r.width, r.height)?),
        None => Ok(frame),
    }
}

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let config = match &args.config {
        Some(path) => MinimapConfig::load_json(path)?,
        None => MinimapConfig::default(),
    };
    let region = load_region(&args.image, args.region)?;
    let mut engine = config.build_engine()?;
    let result = detect_image(&mut engine, &region);

    tracing::info!(
        "primary detected: {}, secondary markers: {}",
        result.primary.detected,
        result.secondary.count
    );

    let departure_hits = config
        .hits(result.player_position())
        .map(|p| p.name.clone())
        .collect::<Vec<_>>();
    for name in &departure_hits {
        tracing::info!("Departure point reached: {}", name);
    }

    let json = serde_json::to_string_pretty(&DetectReport {
        result,
        departure_hits,
    })?;
    match &args.out {
        Some(path) => {
            fs::write(path, json)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_calibrate(args: &CalibrateArgs) -> CliResult<()> {
    let region = load_region(&args.image, args.region)?;
    let hsv = hsv_from_rgb_image(&region);
    let samples = args
        .clicks
        .iter()
        .map(|&(x, y)| CalibrationSample::new(hsv.view(), x, y))
        .collect::<Vec<_>>();
    let outcome = CalibrationEngine::default().calibrate(&samples)?;

    if let Some(path) = &args.preview {
        mask_to_gray(&outcome.preview)?.save(path)?;
        tracing::info!("Preview mask written to {}", path.display());
    }

    if args.write {
        if let Some(path) = &args.config {
            let mut config = if path.exists() {
                MinimapConfig::load_json(path)?
            } else {
                MinimapConfig::default()
            };
            config.detector.primary.ranges = vec![outcome.range];
            config.write_json(path)?;
            tracing::info!("Primary range written to {}", path.display());
        }
    }

    let json = serde_json::to_string_pretty(&CalibrateReport {
        range: outcome.range,
        pool_size: outcome.pool_size,
        percentiles: outcome.percentiles,
        preview_pixels: outcome.preview.count(),
    })?;
    println!("{json}");
    Ok(())
}

fn run_check(args: &CheckArgs) -> CliResult<()> {
    let config = MinimapConfig::load_json(&args.config)?;
    let position = Point2::new(args.x, args.y);
    let mut any = false;
    for point in config.hits(Some(position)) {
        println!("{}", point.name);
        any = true;
    }
    if !any {
        tracing::info!("No departure point reached at ({}, {})", args.x, args.y);
    }
    Ok(())
}
