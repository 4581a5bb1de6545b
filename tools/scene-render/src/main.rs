//! Command-line renderer for SceneKit.
//!
//! Loads an SVG document, replays its scene graph on a drawing surface and
//! saves the result.
//!
//! ## Usage
//!
//! ```bash
//! # Re-emit a document as SVG markup
//! scene-render drawing.svg -o out.svg
//!
//! # Rasterize to PNG with a font for text
//! scene-render drawing.svg -o out.png --font fonts/Dense.ttf
//!
//! # Settings from a JSON file, overridden on the command line
//! scene-render drawing.svg -o out.png --config render.json --width 1024
//!
//! # Keep the effective settings for the next run
//! scene-render drawing.svg -o out.png --width 1024 --save-config render.json
//!
//! # Per-crate log filtering
//! scene-render drawing.svg -o out.svg --log-filter scenekit_svg=debug
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use scenekit_canvas::{RasterCanvas, SvgWriter};
use scenekit_common::{init_logging, LogConfig, LogFormat, RenderConfig};
use scenekit_svg::color::parse_color;
use scenekit_svg::{Color, DrawingSurface, SvgDocument};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "scene-render")]
#[command(about = "Render SVG documents to SVG markup or PNG images")]
struct Cli {
    /// Input SVG document
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Output backend; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Output width, overriding the document and config
    #[arg(long)]
    width: Option<u32>,

    /// Output height, overriding the document and config
    #[arg(long)]
    height: Option<u32>,

    /// JSON render configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Font file for raster text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Log filter directives, replacing --log-level (e.g. "scenekit_svg=debug,warn")
    #[arg(long)]
    log_filter: Option<String>,

    /// Write the effective configuration to this JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    /// SVG markup
    Svg,
    /// PNG image
    Png,
}

impl Backend {
    /// Pick a backend from the output file extension.
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(log_config(&cli, &config)).context("failed to install logger")?;

    if let Some(path) = &cli.save_config {
        save_config(&config, path)?;
    }

    let backend = match cli.backend.or_else(|| Backend::from_path(&cli.output)) {
        Some(backend) => backend,
        None => bail!(
            "cannot infer backend from {}; pass --backend svg|png",
            cli.output.display()
        ),
    };

    let doc = SvgDocument::from_file(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    let (width, height) = output_size(&doc, &cli, &config);

    match backend {
        Backend::Svg => {
            let mut writer = SvgWriter::new();
            render_and_save(&doc, &mut writer, width, height, &cli.output)?;
        }
        Backend::Png => {
            let mut canvas = raster_canvas(&config)?;
            render_and_save(&doc, &mut canvas, width, height, &cli.output)?;
        }
    }

    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        ?backend,
        width,
        height,
        nodes = doc.node_count(),
        "Rendered document"
    );
    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(font) = &cli.font {
        config.font_path = Some(font.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn save_config(config: &RenderConfig, path: &Path) -> Result<()> {
    config
        .save(path)
        .with_context(|| format!("failed to save config {}", path.display()))?;
    info!(path = %path.display(), "Saved render configuration");
    Ok(())
}

fn log_config(cli: &Cli, config: &RenderConfig) -> LogConfig {
    let log = LogConfig::for_level(&config.log_level).with_format(cli.log_format);
    match &cli.log_filter {
        Some(filter) => log.with_filter(filter.as_str()),
        None => log,
    }
}

/// Explicit flags win, then the document's own size, then the config.
fn output_size(doc: &SvgDocument, cli: &Cli, config: &RenderConfig) -> (u32, u32) {
    let (doc_width, doc_height) = doc.size();
    let width = cli
        .width
        .or(doc.width.map(|_| doc_width))
        .unwrap_or(config.width);
    let height = cli
        .height
        .or(doc.height.map(|_| doc_height))
        .unwrap_or(config.height);
    (width, height)
}

fn raster_canvas(config: &RenderConfig) -> Result<RasterCanvas> {
    let background = parse_color(&config.background).unwrap_or_else(|| {
        warn!(background = %config.background, "Unsupported background color, using white");
        Color::WHITE
    });
    let canvas = RasterCanvas::new().with_background(background);

    match &config.font_path {
        Some(path) => canvas
            .with_font_file(path)
            .with_context(|| format!("failed to load font {}", path.display())),
        None => Ok(canvas),
    }
}

fn render_and_save<S: DrawingSurface>(
    doc: &SvgDocument,
    surface: &mut S,
    width: u32,
    height: u32,
    output: &Path,
) -> Result<()> {
    doc.render_with_size(surface, width, height);
    surface
        .save_to_file(output)
        .with_context(|| format!("failed to save {}", output.display()))
}
