//! The end-to-end run: read, index, assemble, hand off, export.

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::exporter::{ExportSummary, FrameExporter};
use crate::html;
use crate::visualizer::RerunViewer;
use planetvis_core::{loader, Scene, StyleTable, TrajectoryIndex};
use std::path::PathBuf;

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub bodies: usize,
    pub frames: usize,
    pub html: PathBuf,
    pub json: Option<PathBuf>,
    pub export: Option<ExportSummary>,
}

/// Reads the input table and assembles its scene.
pub fn build_scene(config: &ViewerConfig) -> Result<Scene, ViewerError> {
    let input = config
        .input
        .as_ref()
        .ok_or_else(|| ViewerError::Config("no input table given".to_string()))?;
    
    let observations = loader::load_observations(input, &config.columns)?;
    
    tracing::info!("Generating frames");
    let index = TrajectoryIndex::build(observations)?;
    let scene = Scene::assemble(&index, &StyleTable::solar_system(), &config.scene)?;
    Ok(scene)
}

/// Runs the whole pipeline.
///
/// The interactive page is written before frames are exported, so a failed
/// export leaves a usable page behind.
pub fn run(config: &ViewerConfig) -> Result<RunSummary, ViewerError> {
    config.validate()?;
    
    let scene = build_scene(config)?;
    
    html::write_html(&scene, &config.title, &config.output)?;
    if let Some(json_path) = &config.json_output {
        html::write_json(&scene, json_path)?;
    }
    
    if config.rerun {
        RerunViewer::new("planetvis").log_scene(&scene);
    }
    
    let export = if config.export.enabled {
        let summary = FrameExporter::new(config.export.clone()).export(&scene)?;
        tracing::info!("Exported {} frames", summary.written.len());
        Some(summary)
    } else {
        None
    };
    
    Ok(RunSummary {
        bodies: scene.markers().len(),
        frames: scene.frames().len(),
        html: config.output.clone(),
        json: config.json_output.clone(),
        export,
    })
}
