//! Frame/Scene Assembler
//!
//! Builds the complete animation handed to the renderer:
//! - one static marker per body at the first timestamp
//! - one named frame per timestamp holding every body's position
//! - Play / Reset / Pause buttons and a scrubbing slider that refer to
//!   frames by name
//!
//! The renderer pairs frame entries with markers by position, not by name,
//! so every frame lists bodies in the same order as the markers.
//!
//! A [`Scene`] serializes to the `{data, layout, frames}` figure that
//! `Plotly.newPlot` accepts.

use crate::error::{Result, VisError};
use crate::indexer::TrajectoryIndex;
use crate::model::Position;
use crate::style::{MarkerStyle, StyleTable};
use serde::{Deserialize, Serialize, Serializer};

const TRACE_TYPE: &str = "scatter3d";
const ANIMATE: &str = "animate";

// =============================================================================
// OPTIONS
// =============================================================================

/// What the Pause button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseMode {
    /// Jump back to and hold the first frame
    #[default]
    FirstFrame,
    
    /// Stop on whichever frame is currently displayed
    Current,
}

impl std::str::FromStr for PauseMode {
    type Err = String;
    
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" | "first_frame" => Ok(PauseMode::FirstFrame),
            "current" => Ok(PauseMode::Current),
            _ => Err(format!("Unknown pause mode: {} (expected first or current)", s)),
        }
    }
}

/// Colors applied to the whole figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub font_color: String,
    pub grid_color: String,
}

impl Theme {
    /// Dark background with white text.
    pub fn dark() -> Self {
        Self {
            paper_bgcolor: "rgb(17,17,17)".to_string(),
            plot_bgcolor: "rgb(17,17,17)".to_string(),
            font_color: "white".to_string(),
            grid_color: "#506784".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Everything about the scene that does not come from the input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    /// Delay between frames while playing, in milliseconds
    pub frame_duration_ms: u64,
    
    pub pause_mode: PauseMode,
    
    pub theme: Theme,
    
    /// Title of all three axes
    pub axis_title: String,
    
    /// Slider left edge, as a fraction of the figure width
    pub slider_x: f64,
    
    /// Slider length, as a fraction of the figure width
    pub slider_len: f64,
    
    /// Space above the slider in pixels
    pub slider_pad_top: u32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            frame_duration_ms: 50,
            pause_mode: PauseMode::FirstFrame,
            theme: Theme::dark(),
            axis_title: "AU".to_string(),
            slider_x: 0.1,
            slider_len: 0.8,
            slider_pad_top: 50,
        }
    }
}

// =============================================================================
// TRACES AND FRAMES
// =============================================================================

/// Static marker for one body, positioned at the first timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    #[serde(rename = "type")]
    trace_type: &'static str,
    x: [f64; 1],
    y: [f64; 1],
    z: [f64; 1],
    mode: &'static str,
    #[serde(rename = "marker")]
    pub style: MarkerStyle,
    /// Raw body identifier, shown in the legend
    pub name: String,
}

impl Marker {
    fn new(name: &str, position: Position, style: MarkerStyle) -> Self {
        Self {
            trace_type: TRACE_TYPE,
            x: [position.x],
            y: [position.y],
            z: [position.z],
            mode: "markers",
            style,
            name: name.to_string(),
        }
    }
    
    pub fn position(&self) -> Position {
        Position::new(self.x[0], self.y[0], self.z[0])
    }
}

/// Position update for one body within a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramePoint {
    #[serde(rename = "type")]
    trace_type: &'static str,
    x: [f64; 1],
    y: [f64; 1],
    z: [f64; 1],
}

impl FramePoint {
    fn new(position: Position) -> Self {
        Self {
            trace_type: TRACE_TYPE,
            x: [position.x],
            y: [position.y],
            z: [position.z],
        }
    }
    
    pub fn position(&self) -> Position {
        Position::new(self.x[0], self.y[0], self.z[0])
    }
}

/// Snapshot of every body at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Timestamp string; the key used by buttons and slider steps
    pub name: String,
    
    /// One point per body, in marker order
    pub data: Vec<FramePoint>,
}

impl Frame {
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.data.iter().map(FramePoint::position)
    }
}

// =============================================================================
// PLAYBACK CONTROLS
// =============================================================================

/// Which frames an `animate` call targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimateTarget {
    /// All frames, in order (`null`)
    All,
    
    /// Halts any running animation (`[null]`)
    Stop,
    
    /// The named frames (`["2024-01-01"]`)
    Frames(Vec<String>),
}

impl Serialize for AnimateTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            AnimateTarget::All => serializer.serialize_none(),
            AnimateTarget::Stop => [None::<String>].serialize(serializer),
            AnimateTarget::Frames(names) => names.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    /// Interrupt the current animation and start this one right away
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameTiming {
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redraw: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub duration: u64,
}

/// Second argument of an `animate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<AnimationMode>,
    pub frame: FrameTiming,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fromcurrent: Option<bool>,
}

impl AnimationOptions {
    /// Zero-duration jump with no transition.
    fn jump(redraw: Option<bool>) -> Self {
        Self {
            mode: Some(AnimationMode::Immediate),
            frame: FrameTiming { duration: 0, redraw },
            transition: Some(Transition { duration: 0 }),
            fromcurrent: None,
        }
    }
}

/// Arguments of an `animate` call, serialized as `[target, options]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimateArgs(pub AnimateTarget, pub AnimationOptions);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    method: &'static str,
    pub args: AnimateArgs,
}

impl Button {
    fn animate(label: &str, args: AnimateArgs) -> Self {
        Self {
            label: label.to_string(),
            method: ANIMATE,
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct UpdateMenu {
    #[serde(rename = "type")]
    menu_type: &'static str,
    buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliderStep {
    method: &'static str,
    pub label: String,
    pub args: AnimateArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Pad {
    t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Slider {
    active: usize,
    pad: Pad,
    steps: Vec<SliderStep>,
    x: f64,
    len: f64,
}

// =============================================================================
// LAYOUT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
struct AxisTitle {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Axis {
    title: AxisTitle,
    gridcolor: String,
    backgroundcolor: String,
    showbackground: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SceneLayout {
    aspectmode: &'static str,
    xaxis: Axis,
    yaxis: Axis,
    zaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Font {
    color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Layout {
    scene: SceneLayout,
    font: Font,
    paper_bgcolor: String,
    plot_bgcolor: String,
    updatemenus: Vec<UpdateMenu>,
    sliders: Vec<Slider>,
}

impl Layout {
    fn new(options: &SceneOptions, buttons: Vec<Button>, steps: Vec<SliderStep>) -> Self {
        let theme = &options.theme;
        let axis = || Axis {
            title: AxisTitle {
                text: options.axis_title.clone(),
            },
            gridcolor: theme.grid_color.clone(),
            backgroundcolor: theme.plot_bgcolor.clone(),
            showbackground: true,
        };
        
        Self {
            scene: SceneLayout {
                aspectmode: "data",
                xaxis: axis(),
                yaxis: axis(),
                zaxis: axis(),
            },
            font: Font {
                color: theme.font_color.clone(),
            },
            paper_bgcolor: theme.paper_bgcolor.clone(),
            plot_bgcolor: theme.plot_bgcolor.clone(),
            updatemenus: vec![UpdateMenu {
                menu_type: "buttons",
                buttons,
            }],
            sliders: vec![Slider {
                active: 0,
                pad: Pad {
                    t: options.slider_pad_top,
                },
                steps,
                x: options.slider_x,
                len: options.slider_len,
            }],
        }
    }
}

// =============================================================================
// SCENE
// =============================================================================

/// A frame picked for still-image export.
#[derive(Debug, Clone, Copy)]
pub struct SampledFrame<'a> {
    /// Sequence number of the exported image
    pub export_index: usize,
    
    /// Position of the frame in the full animation
    pub source_index: usize,
    
    pub frame: &'a Frame,
}

/// The complete animation: markers, frames and playback controls.
///
/// Built once by [`Scene::assemble`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    data: Vec<Marker>,
    layout: Layout,
    frames: Vec<Frame>,
}

impl Scene {
    /// Assembles the scene from an index of aligned trajectories.
    pub fn assemble(
        index: &TrajectoryIndex,
        styles: &StyleTable,
        options: &SceneOptions,
    ) -> Result<Self> {
        if index.is_empty() || index.body_count() == 0 {
            return Err(VisError::EmptyTable);
        }
        
        // Frames read trajectories by axis index
        let mut trajectories = Vec::with_capacity(index.body_count());
        for body in index.bodies() {
            let trajectory = index.trajectory(body).unwrap_or(&[]);
            if trajectory.len() != index.len() {
                return Err(VisError::misaligned(
                    body,
                    index.len(),
                    trajectory.len(),
                    "trajectory length differs from timestamp axis",
                ));
            }
            trajectories.push((body.as_str(), trajectory));
        }
        
        let data: Vec<Marker> = trajectories
            .iter()
            .map(|(body, trajectory)| Marker::new(body, trajectory[0], styles.resolve(body)))
            .collect();
        
        let frames: Vec<Frame> = index
            .axis()
            .iter()
            .enumerate()
            .map(|(i, timestamp)| Frame {
                name: timestamp.to_string(),
                data: trajectories
                    .iter()
                    .map(|(_, trajectory)| FramePoint::new(trajectory[i]))
                    .collect(),
            })
            .collect();
        
        tracing::debug!(
            "Assembled {} markers and {} frames",
            data.len(),
            frames.len()
        );
        
        let first = frames[0].name.clone();
        let buttons = playback_buttons(&first, options);
        let steps = frames.iter().map(|f| slider_step(&f.name)).collect();
        let layout = Layout::new(options, buttons, steps);
        
        Ok(Self {
            data,
            layout,
            frames,
        })
    }
    
    /// Initial per-body markers, in body order.
    pub fn markers(&self) -> &[Marker] {
        &self.data
    }
    
    /// All frames, in timestamp order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
    
    pub fn frame_names(&self) -> Vec<&str> {
        self.frames.iter().map(|f| f.name.as_str()).collect()
    }
    
    /// Play, Reset and Pause, in display order.
    pub fn buttons(&self) -> &[Button] {
        self.layout
            .updatemenus
            .first()
            .map(|menu| menu.buttons.as_slice())
            .unwrap_or(&[])
    }
    
    pub fn button(&self, label: &str) -> Option<&Button> {
        self.buttons().iter().find(|b| b.label == label)
    }
    
    pub fn slider_steps(&self) -> &[SliderStep] {
        self.layout
            .sliders
            .first()
            .map(|slider| slider.steps.as_slice())
            .unwrap_or(&[])
    }
    
    /// Picks every `stride`-th frame starting with the first.
    pub fn sample_frames(&self, stride: usize) -> Result<Vec<SampledFrame<'_>>> {
        if stride == 0 {
            return Err(VisError::InvalidStride(stride));
        }
        
        Ok(self
            .frames
            .iter()
            .enumerate()
            .step_by(stride)
            .enumerate()
            .map(|(export_index, (source_index, frame))| SampledFrame {
                export_index,
                source_index,
                frame,
            })
            .collect())
    }
    
    /// Serializes the figure for the browser renderer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn playback_buttons(first_frame: &str, options: &SceneOptions) -> Vec<Button> {
    let play = AnimateArgs(
        AnimateTarget::All,
        AnimationOptions {
            mode: None,
            frame: FrameTiming {
                duration: options.frame_duration_ms,
                redraw: None,
            },
            transition: None,
            fromcurrent: Some(true),
        },
    );
    
    let to_first = || {
        AnimateArgs(
            AnimateTarget::Frames(vec![first_frame.to_string()]),
            AnimationOptions {
                mode: Some(AnimationMode::Immediate),
                frame: FrameTiming {
                    duration: 0,
                    redraw: None,
                },
                transition: None,
                fromcurrent: None,
            },
        )
    };
    
    let pause = match options.pause_mode {
        PauseMode::FirstFrame => to_first(),
        PauseMode::Current => AnimateArgs(AnimateTarget::Stop, AnimationOptions::jump(Some(false))),
    };
    
    vec![
        Button::animate("Play", play),
        Button::animate("Reset", to_first()),
        Button::animate("Pause", pause),
    ]
}

fn slider_step(frame_name: &str) -> SliderStep {
    SliderStep {
        method: ANIMATE,
        label: frame_name.to_string(),
        args: AnimateArgs(
            AnimateTarget::Frames(vec![frame_name.to_string()]),
            AnimationOptions::jump(Some(true)),
        ),
    }
}
