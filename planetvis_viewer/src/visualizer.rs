//! Rerun visualization of assembled scenes.
//!
//! An alternative to the browser page: streams every frame to a Rerun
//! viewer. Only available with the `visualization` feature.
//!
//! # What Gets Logged
//!
//! - Bodies as colored, labeled points on a `frame` sequence timeline
//! - The frame's timestamp as a text entry

#[cfg(feature = "visualization")]
use rerun::{Color, Points3D, Position3D, Radius, RecordingStream};
use planetvis_core::Scene;

/// Streams scenes to a Rerun viewer.
pub struct RerunViewer {
    #[cfg(feature = "visualization")]
    rec: Option<RecordingStream>,
    
    /// Whether visualization is enabled
    enabled: bool,
}

impl RerunViewer {
    /// Creates a viewer with visualization disabled.
    pub fn disabled() -> Self {
        Self {
            #[cfg(feature = "visualization")]
            rec: None,
            enabled: false,
        }
    }
    
    /// Spawns a Rerun viewer.
    #[cfg(feature = "visualization")]
    pub fn new(name: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(name).spawn() {
            Ok(rec) => {
                tracing::info!("Rerun visualization enabled");
                Self {
                    rec: Some(rec),
                    enabled: true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to initialize Rerun: {:?}", e);
                Self::disabled()
            }
        }
    }
    
    /// Returns a disabled viewer when the feature is not compiled in.
    #[cfg(not(feature = "visualization"))]
    pub fn new(_name: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }
    
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    
    /// Logs every frame of the scene.
    #[cfg(feature = "visualization")]
    pub fn log_scene(&self, scene: &Scene) {
        let Some(ref rec) = self.rec else {
            return;
        };
        
        let markers = scene.markers();
        let labels: Vec<String> = markers.iter().map(|m| m.name.clone()).collect();
        let colors: Vec<Color> = markers
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let (r, g, b) = m.style.rgb_for_trace(i);
                Color::from_rgb(r, g, b)
            })
            .collect();
        let radii: Vec<Radius> = markers
            .iter()
            .map(|m| Radius::new_ui_points(m.style.size as f32))
            .collect();
        
        for (i, frame) in scene.frames().iter().enumerate() {
            rec.set_time_sequence("frame", i as i64);
            
            let points: Vec<Position3D> = frame
                .positions()
                .map(|p| Position3D::new(p.x as f32, p.y as f32, p.z as f32))
                .collect();
            
            let _ = rec.log(
                "solar_system/bodies",
                &Points3D::new(points)
                    .with_colors(colors.clone())
                    .with_radii(radii.clone())
                    .with_labels(labels.clone()),
            );
            let _ = rec.log("solar_system/date", &rerun::TextLog::new(frame.name.clone()));
        }
        
        tracing::info!("Logged {} frames to Rerun", scene.frames().len());
    }
    
    #[cfg(not(feature = "visualization"))]
    pub fn log_scene(&self, _scene: &Scene) {}
}
