//! text-overlay - recognized-text bounding boxes over a scaled image
//!
//! Fits an image into a viewport, hands it to a text recognizer and paints
//! an outline around every recognized element.

mod app;
mod config;
mod overlay;
mod shared;
mod source;
mod vision;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::Viewer;
use crate::config::AppConfig;
use crate::overlay::RecordingSurface;
use crate::vision::FixtureRecognizer;

/// text-overlay - draw recognized text boxes over an image
#[derive(Parser, Debug)]
#[command(name = "text-overlay", version)]
#[command(about = "Scale an image to a viewport and outline recognized text")]
struct Args {
    /// Image asset to display
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Recognition fixture (JSON) served as the recognizer output
    #[arg(short, long)]
    fixture: Option<PathBuf>,

    /// Configuration file (defaults to the per-user config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport size as WIDTHxHEIGHT, overriding the config
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<(u32, u32)>,

    /// Number of "find text" presses to simulate
    #[arg(long, default_value = "1")]
    presses: u32,

    /// Where to write the rendered frame
    #[arg(short, long, default_value = "overlay.png")]
    output: PathBuf,

    /// Also write the overlay draw calls as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Override the recognition timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_or_create_config(args.config.as_deref())?;
    if let Some((width, height)) = args.viewport {
        config.viewport.width = width;
        config.viewport.height = height;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.recognition.timeout_ms = timeout_ms;
    }

    if let Some(path) = &args.write_config {
        config::save_config(&config, path)
            .with_context(|| format!("Failed to write configuration to {:?}", path))?;
        info!("Configuration written to {:?}", path);
        return Ok(());
    }

    let (Some(image), Some(fixture)) = (&args.image, &args.fixture) else {
        bail!("--image and --fixture are required unless --write-config is given");
    };

    run(&args, image, fixture, config)?;

    info!("text-overlay finished");
    Ok(())
}

/// Load configuration from an explicit path, the user config file, or defaults
fn load_or_create_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let config = config::load_config(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    if let Ok(config_dir) = config::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            match config::load_config(&config_path) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", config_path);
                    return Ok(config);
                }
                Err(e) => warn!("Ignoring invalid configuration {:?}: {}", config_path, e),
            }
        }
    }
    info!("Using default configuration");
    Ok(AppConfig::default())
}

/// Load the asset, simulate the button presses and write the outputs
fn run(args: &Args, image: &Path, fixture: &Path, config: AppConfig) -> Result<()> {
    let bitmap = source::load_bitmap(image)?;
    let recognizer = Arc::new(FixtureRecognizer::from_path(fixture));
    let timeout = Duration::from_millis(config.recognition.timeout_ms);

    let mut viewer = Viewer::new(bitmap, recognizer, config);

    for _ in 0..args.presses.max(1) {
        viewer.find_text()?;
    }

    match viewer.wait_for_result(timeout) {
        Some(notice) => println!("{}", notice),
        None => warn!("No recognition result within {:?}", timeout),
    }

    // Results of superseded presses that already arrived are dropped here
    viewer.poll();
    let runtime = viewer.runtime();
    if runtime.is_recognizing() {
        info!("{} superseded requests still running", runtime.in_flight);
    }
    if let Some(fit) = viewer.fit() {
        info!(
            "Displayed {}x{} at ({}, {}), factor {:.3}, {} elements, {} superseded results",
            viewer.displayed().width(),
            viewer.displayed().height(),
            fit.offset_x,
            fit.offset_y,
            fit.scale,
            runtime.elements_displayed,
            runtime.stale_results
        );
    }

    let frame = viewer.render();
    frame
        .save(&args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    info!("Rendered frame written to {:?}", args.output);

    if let Some(report_path) = &args.report {
        let viewport = viewer.config().viewport;
        let mut recording = RecordingSurface::new(viewport.width, viewport.height);
        viewer.paint_overlay(&mut recording);
        let content = serde_json::to_string_pretty(&recording)?;
        std::fs::write(report_path, content)
            .with_context(|| format!("Failed to write {:?}", report_path))?;
        info!(
            "Overlay report with {} boxes written to {:?}",
            recording.rects().len(),
            report_path
        );
    }

    Ok(())
}

/// Parse "WIDTHxHEIGHT"
fn parse_viewport(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let width: u32 = width.trim().parse().map_err(|e| format!("invalid width: {}", e))?;
    let height: u32 = height.trim().parse().map_err(|e| format!("invalid height: {}", e))?;
    if width == 0 || height == 0 {
        return Err("viewport dimensions must be positive".to_string());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewport() {
        assert_eq!(parse_viewport("500x400"), Ok((500, 400)));
        assert_eq!(parse_viewport("1080X1920"), Ok((1080, 1920)));
        assert!(parse_viewport("500").is_err());
        assert!(parse_viewport("0x10").is_err());
        assert!(parse_viewport("axb").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "text-overlay",
            "--image",
            "page.png",
            "--fixture",
            "page.json",
            "--viewport",
            "500x500",
            "--presses",
            "3",
        ]);
        assert_eq!(args.viewport, Some((500, 500)));
        assert_eq!(args.presses, 3);
        assert_eq!(args.output, PathBuf::from("overlay.png"));
    }

    #[test]
    fn test_run_writes_frame_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("page.png");
        let fixture = dir.path().join("page.json");
        let output = dir.path().join("out.png");
        let report = dir.path().join("report.json");

        source::Bitmap::filled(100, 200, [255, 255, 255, 255]).pixels.save(&image).unwrap();
        std::fs::write(
            &fixture,
            r#"{"image_width":100,"image_height":200,"blocks":[{"lines":[{"elements":[
                {"text":"Hi","bounding_box":{"left":10,"top":10,"right":50,"bottom":30}}]}]}]}"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "text-overlay",
            "--image",
            image.to_str().unwrap(),
            "--fixture",
            fixture.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
        ]);
        let mut config = AppConfig::default();
        config.viewport.width = 50;
        config.viewport.height = 100;

        run(&args, &image, &fixture, config).unwrap();

        let frame = image::open(&output).unwrap();
        assert_eq!((frame.width(), frame.height()), (50, 100));

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        let rect = &report["ops"][0]["rect"];
        assert_eq!(rect["left"], 5.0);
        assert_eq!(rect["top"], 5.0);
        assert_eq!(rect["right"], 25.0);
        assert_eq!(rect["bottom"], 15.0);
    }
}
