/// Point cloud to block script converter entry point
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueHint};
use std::path::PathBuf;
use voxelizer::config::batch_size_from_signed;
use voxelizer::{VoxelConverter, VoxelizerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "point-cloud-voxelizer",
    version,
    about = "Convert a coloured LAS/LAZ point cloud into batched block placement scripts"
)]
struct Cli {
    /// Input .las or .laz file (overrides the config file)
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Output directory for scripts and manifest
    #[arg(short = 'o', long = "output-dir", value_hint = ValueHint::DirPath)]
    output_dir: Option<PathBuf>,

    /// JSON configuration file; command line flags take precedence
    #[arg(short = 'c', long = "config", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Lattice cells per world unit
    #[arg(long = "scale")]
    scale: Option<f64>,

    /// Placement entries per script
    #[arg(long = "batch-size", allow_negative_numbers = true)]
    batch_size: Option<i64>,

    /// Colour multiplier (1.0 = unchanged)
    #[arg(long = "brightness")]
    brightness: Option<f64>,

    /// Highlight threshold for all channels (16 bit)
    #[arg(long = "threshold")]
    threshold: Option<u16>,
    /// Highlight threshold, red channel
    #[arg(long = "threshold-r")]
    threshold_r: Option<u16>,
    /// Highlight threshold, green channel
    #[arg(long = "threshold-g")]
    threshold_g: Option<u16>,
    /// Highlight threshold, blue channel
    #[arg(long = "threshold-b")]
    threshold_b: Option<u16>,

    /// Lattice start X
    #[arg(long = "start-x", allow_negative_numbers = true)]
    start_x: Option<i64>,
    /// Lattice start Y
    #[arg(long = "start-y", allow_negative_numbers = true)]
    start_y: Option<i64>,
    /// Lattice start Z
    #[arg(long = "start-z", allow_negative_numbers = true)]
    start_z: Option<i64>,

    /// Keep points down to this distance below the ground level
    #[arg(long = "ground-offset")]
    ground_offset: Option<f64>,

    /// Skip writing manifest.json
    #[arg(long = "no-manifest")]
    no_manifest: bool,
}

fn build_config(cli: &Cli) -> Result<VoxelizerConfig> {
    let mut cfg = match &cli.config {
        Some(path) => VoxelizerConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VoxelizerConfig::default(),
    };

    if let Some(v) = &cli.input { cfg.input_path = v.clone(); }
    if let Some(v) = &cli.output_dir { cfg.output_dir = v.clone(); }
    if let Some(v) = cli.scale { cfg.scale = v; }
    if let Some(v) = cli.batch_size { cfg.batch_size = batch_size_from_signed(v)?; }
    if let Some(v) = cli.brightness { cfg.brightness = v; }
    if let Some(v) = cli.threshold { cfg.highlight_thresholds = [v; 3]; }
    if let Some(v) = cli.threshold_r { cfg.highlight_thresholds[0] = v; }
    if let Some(v) = cli.threshold_g { cfg.highlight_thresholds[1] = v; }
    if let Some(v) = cli.threshold_b { cfg.highlight_thresholds[2] = v; }
    if let Some(v) = cli.start_x { cfg.start_offset[0] = v; }
    if let Some(v) = cli.start_y { cfg.start_offset[1] = v; }
    if let Some(v) = cli.start_z { cfg.start_offset[2] = v; }
    if let Some(v) = cli.ground_offset { cfg.ground_offset = v; }
    if cli.no_manifest { cfg.write_manifest = false; }

    if cfg.input_path.as_os_str().is_empty() {
        bail!("no input file given (pass it as an argument or set input_path in the config)");
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let converter = VoxelConverter::new(config)?;
    let summary = converter.convert()?;

    println!(
        "Wrote {} scripts ({} blocks) to {}",
        summary.batch_count,
        summary.voxel_count,
        converter.config().output_dir.display()
    );
    Ok(())
}
