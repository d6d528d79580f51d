use clap::{ArgAction, Parser};
use cli::{ConversionJob, Destination, FileConfig};
use color_eyre::eyre::Result;
use raster_rects::{ConversionConfig, OutputFormat};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

/// Convert black pixels in an image into an array of rectangle coordinates
/// (`[llx, lly, urx, ury]`, bottom-left origin, y up).
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input image (PNG, JPEG, BMP or TIFF)
    input: PathBuf,
    /// Uniform scale factor for both X and Y [default: 1.0]
    #[arg(long, allow_negative_numbers = true)]
    scale: Option<f64>,
    /// Scale factor in X (overrides --scale)
    #[arg(long, allow_negative_numbers = true)]
    scale_x: Option<f64>,
    /// Scale factor in Y (overrides --scale)
    #[arg(long, allow_negative_numbers = true)]
    scale_y: Option<f64>,
    /// Offset added to all X coordinates [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    offset_x: Option<f64>,
    /// Offset added to all Y coordinates [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    offset_y: Option<f64>,
    /// Black threshold (0-255): a pixel is black if all RGB channels <= threshold [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<i64>,
    /// Output file; prints to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(
        long,
        help = format!("Output format: {} [default: json]", OutputFormat::names().join(", "))
    )]
    format: Option<OutputFormat>,
    /// TOML or JSON file with default values for the options above; a relative
    /// `output` in it is resolved against the file's directory
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Worker threads for the pixel scan
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,
    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn flag_config(&self) -> ConversionConfig {
        ConversionConfig {
            scale: self.scale,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            threshold: self.threshold,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // stdout carries the rectangles, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let file_config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let job = ConversionJob {
        input: cli.input.clone(),
        config: cli.flag_config().or(file_config.conversion),
        jobs: cli.jobs,
        format: cli.format.or(file_config.format).unwrap_or_default(),
        destination: Destination::from_option(cli.output.clone().or(file_config.output)),
    };

    let result = job.run()?;
    info!(
        "Done: {} rectangles from {}x{} image",
        result.len(),
        result.image_width,
        result.image_height
    );

    Ok(())
}
