/// Bathymetric survey to shaded raster image entry point
use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::DVec3;
use point_cloud_raster::{ConvertOptions, DEFAULT_OUTPUT, Projection, RasterConverter, RenderSettings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "point-cloud-raster", version, about = "Rasterize a depth survey into a shaded image")]
struct Cli {
    /// Survey file: `lat lon depth` text, or .las/.laz
    input: PathBuf,

    /// Image width in pixels
    width: usize,

    /// Image height in pixels (defaults to the width)
    #[arg(long)]
    height: Option<usize>,

    /// Output image, format chosen by extension
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// JSON render settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Light direction as X,Y,Z
    #[arg(long, value_name = "X,Y,Z")]
    sun_dir: Option<String>,

    /// Number of colour map samples
    #[arg(long)]
    colors: Option<u32>,

    /// Input coordinates are already planar metres
    #[arg(long)]
    planar: bool,

    /// Rasterize on all cores
    #[arg(long)]
    parallel: bool,

    /// No progress output
    #[arg(short, long)]
    quiet: bool,
}

fn parse_sun_dir(value: &str) -> Result<DVec3> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid light direction '{value}'"))?;
    if parts.len() != 3 {
        bail!("light direction needs 3 components, got {}", parts.len());
    }
    Ok(DVec3::new(parts[0], parts[1], parts[2]))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => RenderSettings::from_json_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };
    if let Some(sun) = &cli.sun_dir {
        settings.sun_direction = parse_sun_dir(sun)?;
    }
    if let Some(colors) = cli.colors {
        settings.nb_colors = colors;
    }
    if cli.planar {
        settings.projection = Projection::Planar;
    }
    settings.parallel |= cli.parallel;

    let options = ConvertOptions {
        width: cli.width,
        height: cli.height.unwrap_or(cli.width),
        settings,
        quiet: cli.quiet,
    };

    let converter = RasterConverter::new(&cli.input, &cli.output, options)?;
    converter
        .convert()
        .with_context(|| format!("failed to rasterize {}", cli.input.display()))?;

    Ok(())
}
