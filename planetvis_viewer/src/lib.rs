//! PlanetVis Viewer
//!
//! Takes the scene assembled by `planetvis_core` and puts it in front of a
//! person:
//! - an interactive HTML page driven by plotly.js ([`html`])
//! - numbered still images of sampled frames ([`exporter`])
//! - optionally, a Rerun viewer stream ([`visualizer`])
//!
//! # Usage
//!
//! ```ignore
//! use planetvis_viewer::{pipeline, ViewerConfig};
//!
//! let config = ViewerConfig {
//!     input: Some("solar_system_positions_with_velocity.csv".into()),
//!     ..Default::default()
//! };
//! let summary = pipeline::run(&config)?;
//! ```

pub mod config;
pub mod error;
pub mod exporter;
pub mod html;
pub mod pipeline;
pub mod visualizer;

pub use config::{ExportConfig, ViewerConfig};
pub use error::ViewerError;
pub use exporter::{ExportSummary, FrameExporter};
pub use pipeline::RunSummary;
pub use visualizer::RerunViewer;
