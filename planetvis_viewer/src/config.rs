//! Run configuration.
//!
//! Defaults live here; a JSON file can override them and CLI flags override
//! the file.

use crate::error::ViewerError;
use planetvis_core::{ColumnMap, SceneOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for still-image frame export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Whether frames are exported at all (slow)
    pub enabled: bool,
    
    /// Export every n-th frame
    pub stride: usize,
    
    /// Pixel multiplier applied to the base size
    pub scale: u32,
    
    /// Directory receiving `frame_0000.png`, `frame_0001.png`, ...
    pub out_dir: PathBuf,
    
    pub base_width: u32,
    pub base_height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stride: 5,
            scale: 2,
            out_dir: PathBuf::from("frames"),
            base_width: 700,
            base_height: 500,
        }
    }
}

/// Largest width or height, in pixels, an exported frame may have.
pub const MAX_IMAGE_SIDE: u32 = 16_384;

impl ExportConfig {
    /// Final image size in pixels, `base * scale` on each side.
    pub fn image_size(&self) -> Result<(u32, u32), ViewerError> {
        let side = |base: u32, what: &str| {
            base.checked_mul(self.scale)
                .filter(|&px| px > 0 && px <= MAX_IMAGE_SIDE)
                .ok_or_else(|| {
                    ViewerError::Config(format!(
                        "export {} {} x scale {} must be between 1 and {} pixels",
                        what, base, self.scale, MAX_IMAGE_SIDE
                    ))
                })
        };
        Ok((side(self.base_width, "width")?, side(self.base_height, "height")?))
    }
}

/// Configuration for a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Ephemeris CSV to read
    pub input: Option<PathBuf>,
    
    pub columns: ColumnMap,
    
    /// Standalone HTML page with the interactive scene
    pub output: PathBuf,
    
    /// Optional raw figure JSON
    pub json_output: Option<PathBuf>,
    
    /// Page title
    pub title: String,
    
    pub export: ExportConfig,
    
    pub scene: SceneOptions,
    
    /// Also stream the scene to a Rerun viewer
    pub rerun: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            input: None,
            columns: ColumnMap::default(),
            output: PathBuf::from("planetvis.html"),
            json_output: None,
            title: "Solar System".to_string(),
            export: ExportConfig::default(),
            scene: SceneOptions::default(),
            rerun: false,
        }
    }
}

impl ViewerConfig {
    /// Loads a configuration file; absent fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ViewerError::Config(format!("cannot read {:?}: {}", path, e)))?;
        Self::from_json(&text)
    }
    
    pub fn from_json(text: &str) -> Result<Self, ViewerError> {
        serde_json::from_str(text).map_err(|e| ViewerError::Config(e.to_string()))
    }
    
    /// Checks values that would only fail deep inside a run.
    pub fn validate(&self) -> Result<(), ViewerError> {
        if self.input.is_none() {
            return Err(ViewerError::Config("no input table given".to_string()));
        }
        if self.export.stride == 0 {
            return Err(ViewerError::Config("export stride must be >= 1".to_string()));
        }
        if self.export.scale == 0 {
            return Err(ViewerError::Config("export scale must be >= 1".to_string()));
        }
        self.export.image_size()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetvis_core::PauseMode;
    
    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        
        assert!(!config.export.enabled);
        assert_eq!(config.export.stride, 5);
        assert_eq!(config.export.image_size().unwrap(), (1400, 1000));
        assert_eq!(config.scene.frame_duration_ms, 50);
        assert_eq!(config.columns.timestamp, "date");
    }
    
    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(
            r#"{
                "input": "positions.csv",
                "export": { "enabled": true, "stride": 2 },
                "scene": { "pause_mode": "current" },
                "columns": { "timestamp": "jd" }
            }"#,
        )
        .unwrap();
        
        assert_eq!(config.input, Some(PathBuf::from("positions.csv")));
        assert!(config.export.enabled);
        assert_eq!(config.export.stride, 2);
        assert_eq!(config.export.scale, 2);
        assert_eq!(config.scene.pause_mode, PauseMode::Current);
        assert_eq!(config.scene.axis_title, "AU");
        assert_eq!(config.columns.timestamp, "jd");
        assert_eq!(config.columns.body, "name");
        assert!(config.validate().is_ok());
    }
    
    #[test]
    fn test_invalid_json() {
        let err = ViewerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }
    
    #[test]
    fn test_validate_rejects_zero_stride() {
        let mut config = ViewerConfig {
            input: Some(PathBuf::from("x.csv")),
            ..Default::default()
        };
        config.export.stride = 0;
        assert!(config.validate().is_err());
        
        assert!(ViewerConfig::default().validate().is_err());
    }
    
    #[test]
    fn test_validate_rejects_oversized_images() {
        let mut config = ViewerConfig {
            input: Some(PathBuf::from("x.csv")),
            ..Default::default()
        };
        
        config.export.scale = 10_000_000;
        assert!(matches!(config.export.image_size(), Err(ViewerError::Config(_))));
        assert!(matches!(config.validate(), Err(ViewerError::Config(_))));
        
        config.export.scale = 2;
        config.export.base_width = u32::MAX;
        assert!(matches!(config.validate(), Err(ViewerError::Config(_))));
        
        config.export.base_width = 0;
        assert!(config.validate().is_err());
        
        config.export.base_width = MAX_IMAGE_SIDE / 2;
        assert_eq!(config.export.image_size().unwrap(), (MAX_IMAGE_SIDE, 1000));
    }
}
