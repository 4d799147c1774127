//! Still-image export of sampled animation frames.
//!
//! Renders every n-th frame to a numbered PNG (`frame_0000.png`, ...) for
//! stitching into a video. Each frame is independent and writes its own
//! file, so frames are rendered in parallel.

use crate::config::ExportConfig;
use crate::error::ViewerError;
use planetvis_core::{Frame, MarkerStyle, Position, Scene};
use plotters::prelude::*;
use rayon::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

const BACKGROUND: RGBColor = RGBColor(17, 17, 17);
const GRID: RGBColor = RGBColor(80, 103, 132);

/// Result of an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Written image files, in export order
    pub written: Vec<PathBuf>,
    
    /// Index of each exported frame in the full animation
    pub source_indices: Vec<usize>,
}

/// Cube enclosing every body in every frame.
///
/// Shared by all images so the camera does not jump between frames.
#[derive(Debug, Clone, PartialEq)]
struct SceneBounds {
    x: Range<f64>,
    y: Range<f64>,
    z: Range<f64>,
}

impl SceneBounds {
    fn of(scene: &Scene) -> Self {
        let mut min = Position::repeat(f64::INFINITY);
        let mut max = Position::repeat(f64::NEG_INFINITY);
        
        for position in scene.frames().iter().flat_map(Frame::positions) {
            min = min.inf(&position);
            max = max.sup(&position);
        }
        
        if !min.iter().all(|v| v.is_finite()) {
            min = Position::zeros();
            max = Position::zeros();
        }
        
        let center = (min + max) / 2.0;
        let half = ((max - min).max() / 2.0 * 1.05).max(1e-6);
        let range = |c: f64| (c - half)..(c + half);
        
        Self {
            x: range(center.x),
            y: range(center.y),
            z: range(center.z),
        }
    }
}

/// Writes sampled frames as PNG images.
pub struct FrameExporter {
    config: ExportConfig,
}

impl FrameExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }
    
    /// Path of the `export_index`-th image.
    pub fn frame_path(&self, export_index: usize) -> PathBuf {
        self.config
            .out_dir
            .join(format!("frame_{:04}.png", export_index))
    }
    
    /// Exports every `stride`-th frame of the scene.
    ///
    /// The output directory is created if needed; an existing one is reused.
    pub fn export(&self, scene: &Scene) -> Result<ExportSummary, ViewerError> {
        let sampled = scene.sample_frames(self.config.stride)?;
        let size = self.config.image_size()?;
        
        std::fs::create_dir_all(&self.config.out_dir)
            .map_err(|e| ViewerError::export(&self.config.out_dir, e))?;
        
        tracing::info!(
            "Saving {} of {} frames to {:?}",
            sampled.len(),
            scene.frames().len(),
            self.config.out_dir
        );
        
        let bounds = SceneBounds::of(scene);
        let styles: Vec<MarkerStyle> = scene.markers().iter().map(|m| m.style).collect();
        
        let written = sampled
            .par_iter()
            .map(|sample| {
                let path = self.frame_path(sample.export_index);
                self.render(sample.frame, &styles, &bounds, size, &path)?;
                tracing::debug!("  {} -> {:?}", sample.frame.name, path);
                Ok(path)
            })
            .collect::<Result<Vec<_>, ViewerError>>()?;
        
        Ok(ExportSummary {
            written,
            source_indices: sampled.iter().map(|s| s.source_index).collect(),
        })
    }
    
    /// Draws one frame. The ecliptic (x, y) is the horizontal plane.
    fn render(
        &self,
        frame: &Frame,
        styles: &[MarkerStyle],
        bounds: &SceneBounds,
        size: (u32, u32),
        path: &Path,
    ) -> Result<(), ViewerError> {
        let fail = |e: &dyn std::fmt::Display| ViewerError::export(path, e);
        let scale = self.config.scale.max(1);
        
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&BACKGROUND).map_err(|e| fail(&e))?;
        
        let mut chart = ChartBuilder::on(&root)
            .margin(scale.saturating_mul(10))
            .build_cartesian_3d(bounds.x.clone(), bounds.z.clone(), bounds.y.clone())
            .map_err(|e| fail(&e))?;
        
        chart.with_projection(|mut pb| {
            pb.yaw = 0.7;
            pb.pitch = 0.45;
            pb.scale = 0.9;
            pb.into_matrix()
        });
        
        let edge_style = GRID.stroke_width(scale);
        chart
            .draw_series(
                box_edges(bounds)
                    .into_iter()
                    .map(|edge| PathElement::new(edge.to_vec(), edge_style)),
            )
            .map_err(|e| fail(&e))?;
        
        chart
            .draw_series(frame.positions().zip(styles).enumerate().map(|(i, (p, style))| {
                let (r, g, b) = style.rgb_for_trace(i);
                let radius = (style.size.saturating_mul(scale) / 2).max(1);
                Circle::new((p.x, p.z, p.y), radius, RGBColor(r, g, b).filled())
            }))
            .map_err(|e| fail(&e))?;
        
        root.present().map_err(|e| fail(&e))?;
        Ok(())
    }
}

/// The twelve edges of the bounding cube, in chart coordinates.
fn box_edges(bounds: &SceneBounds) -> Vec<[(f64, f64, f64); 2]> {
    let (x0, x1) = (bounds.x.start, bounds.x.end);
    let (y0, y1) = (bounds.z.start, bounds.z.end);
    let (z0, z1) = (bounds.y.start, bounds.y.end);
    
    let mut edges = Vec::with_capacity(12);
    for &a in &[y0, y1] {
        for &b in &[z0, z1] {
            edges.push([(x0, a, b), (x1, a, b)]);
        }
    }
    for &a in &[x0, x1] {
        for &b in &[z0, z1] {
            edges.push([(a, y0, b), (a, y1, b)]);
        }
    }
    for &a in &[x0, x1] {
        for &b in &[y0, y1] {
            edges.push([(a, b, z0), (a, b, z1)]);
        }
    }
    edges
}
