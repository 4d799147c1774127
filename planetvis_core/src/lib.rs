//! PlanetVis Core - Ephemeris Tables to Animation Scenes
//!
//! This library turns a flat table of celestial-body positions into an
//! animated 3D scene description:
//! 1. **Loading**: CSV rows become typed [`Observation`]s
//! 2. **Indexing**: rows are grouped per body and aligned to one shared,
//!    sorted timestamp axis ([`TrajectoryIndex`])
//! 3. **Assembly**: initial markers, one frame per timestamp and the
//!    playback controls that reference frames by name ([`Scene`])
//!
//! The assembled [`Scene`] serializes to the figure layout consumed by
//! plotly.js; rendering itself happens outside this crate.
//!
//! # Example
//!
//! ```ignore
//! use planetvis_core::{loader, ColumnMap, Scene, SceneOptions, StyleTable, TrajectoryIndex};
//!
//! let observations = loader::load_observations("positions.csv", &ColumnMap::default())?;
//! let index = TrajectoryIndex::build(observations)?;
//! let scene = Scene::assemble(&index, &StyleTable::solar_system(), &SceneOptions::default())?;
//! ```

pub mod error;
pub mod model;
pub mod loader;
pub mod indexer;
pub mod style;
pub mod scene;

// Re-export key types for convenience
pub use error::{Result, VisError};
pub use model::{category, Observation, Position, TimeKey, Timestamp, TimestampKind};
pub use loader::ColumnMap;
pub use indexer::TrajectoryIndex;
pub use style::{MarkerColor, MarkerStyle, StyleTable, DEFAULT_COLORWAY};
pub use scene::{Frame, Marker, PauseMode, SampledFrame, Scene, SceneOptions, Theme};
