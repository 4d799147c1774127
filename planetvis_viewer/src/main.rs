//! PlanetVis CLI
//!
//! Animate a table of solar system body positions in the browser.

use anyhow::Context;
use clap::Parser;
use planetvis_core::PauseMode;
use planetvis_viewer::{pipeline, ViewerConfig};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// PlanetVis - interactive 3D animation of ephemeris tables
#[derive(Parser, Debug)]
#[command(name = "planetvis")]
#[command(about = "Render a CSV of celestial body positions as an animated 3D scene", long_about = None)]
struct Args {
    /// CSV with one row per (body, timestamp)
    input: Option<PathBuf>,
    
    /// JSON configuration file (flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,
    
    /// HTML page to write
    #[arg(short, long)]
    output: Option<PathBuf>,
    
    /// Also write the raw figure JSON
    #[arg(long)]
    json: Option<PathBuf>,
    
    /// Page title
    #[arg(long)]
    title: Option<String>,
    
    /// Export sampled frames as PNG images (slow)
    #[arg(long)]
    export_frames: bool,
    
    /// Export every n-th frame
    #[arg(long)]
    stride: Option<usize>,
    
    /// Pixel scale of exported images
    #[arg(long)]
    scale: Option<u32>,
    
    /// Directory for exported images
    #[arg(long)]
    frames_dir: Option<PathBuf>,
    
    /// Delay between frames while playing, in milliseconds
    #[arg(long)]
    frame_duration_ms: Option<u64>,
    
    /// What Pause does (first, current)
    #[arg(long)]
    pause_mode: Option<PauseMode>,
    
    /// Column holding the body name
    #[arg(long)]
    name_column: Option<String>,
    
    /// Column holding the timestamp
    #[arg(long)]
    date_column: Option<String>,
    
    /// Stream the scene to a Rerun viewer (needs the visualization feature)
    #[arg(long)]
    rerun: bool,
    
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Layers the flags on top of a base configuration.
    fn apply(self, config: &mut ViewerConfig) {
        if let Some(input) = self.input {
            config.input = Some(input);
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(json) = self.json {
            config.json_output = Some(json);
        }
        if let Some(title) = self.title {
            config.title = title;
        }
        if self.export_frames {
            config.export.enabled = true;
        }
        if let Some(stride) = self.stride {
            config.export.stride = stride;
        }
        if let Some(scale) = self.scale {
            config.export.scale = scale;
        }
        if let Some(dir) = self.frames_dir {
            config.export.out_dir = dir;
        }
        if let Some(ms) = self.frame_duration_ms {
            config.scene.frame_duration_ms = ms;
        }
        if let Some(mode) = self.pause_mode {
            config.scene.pause_mode = mode;
        }
        if let Some(column) = self.name_column {
            config.columns.body = column;
        }
        if let Some(column) = self.date_column {
            config.columns.timestamp = column;
        }
        if self.rerun {
            config.rerun = true;
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("loading config {:?}", path))?,
        None => ViewerConfig::default(),
    };
    args.apply(&mut config);
    
    let summary = pipeline::run(&config)?;
    
    info!(
        "✓ {} bodies, {} frames - open {:?} in a browser",
        summary.bodies, summary.frames, summary.html
    );
    if let Some(json) = &summary.json {
        info!("✓ figure JSON written to {:?}", json);
    }
    if let Some(export) = &summary.export {
        info!(
            "✓ {} frames saved to {:?}",
            export.written.len(),
            config.export.out_dir
        );
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    
    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
    
    info!("PlanetVis v{}", env!("CARGO_PKG_VERSION"));
    
    if let Err(e) = run(args) {
        error!("✗ {:#}", e);
        std::process::exit(1);
    }
}
