use glam::DVec3;
use lissa_core::{Segment, TrailSlot};
use serde::{Deserialize, Serialize};

use crate::geometry::{AxisBounds, Layer, LayerStyles, MarkerStyle};

/// Draw surface that accepts geometry updates.
///
/// The animation core never draws; it pushes named polylines, vector slots,
/// marker style and axis bounds through this interface.
pub trait Renderer {
    fn set_axis_bounds(&mut self, bounds: AxisBounds);

    /// Replace the geometry and opacity of one vector slot. `None` clears it.
    fn set_vector(&mut self, slot: usize, segment: Option<Segment>, opacity: f64);

    /// Drop vector slots at or beyond `len`.
    fn truncate_vectors(&mut self, len: usize);

    /// Replace a polyline layer. An empty slice clears it.
    fn set_polyline(&mut self, layer: Layer, points: &[DVec3]);

    fn set_marker_style(&mut self, style: MarkerStyle);

    /// Colours and arrow heads for the polyline layers and vector slots.
    fn set_layer_styles(&mut self, styles: LayerStyles);

    /// Called once after every frame's updates have been pushed.
    fn frame_done(&mut self, _frame: usize) {}
}

/// Snapshot of everything on the draw surface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub frame: Option<usize>,
    pub bounds: Option<AxisBounds>,
    pub marker: MarkerStyle,
    #[serde(default)]
    pub styles: LayerStyles,
    pub static_trace: Vec<DVec3>,
    pub time_track: Vec<DVec3>,
    pub vectors: Vec<TrailSlot>,
}

impl Scene {
    pub fn polyline(&self, layer: Layer) -> &[DVec3] {
        match layer {
            Layer::Static => &self.static_trace,
            Layer::Track => &self.time_track,
        }
    }

    /// Vector slots that currently hold geometry.
    pub fn visible_vectors(&self) -> impl Iterator<Item = (usize, &TrailSlot)> {
        self.vectors
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.segment.is_some())
    }

    pub fn is_blank(&self) -> bool {
        self.static_trace.is_empty()
            && self.time_track.is_empty()
            && self.visible_vectors().next().is_none()
    }
}

/// In-memory renderer that keeps the current scene. Used headless and for
/// export.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    scene: Scene,
    frames_rendered: usize,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Frames completed since creation.
    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }
}

impl Renderer for SceneRecorder {
    fn set_axis_bounds(&mut self, bounds: AxisBounds) {
        self.scene.bounds = Some(bounds);
    }

    fn set_vector(&mut self, slot: usize, segment: Option<Segment>, opacity: f64) {
        if slot >= self.scene.vectors.len() {
            self.scene.vectors.resize(slot + 1, TrailSlot { segment: None, opacity: 1.0 });
        }
        self.scene.vectors[slot] = TrailSlot { segment, opacity };
    }

    fn truncate_vectors(&mut self, len: usize) {
        self.scene.vectors.truncate(len);
    }

    fn set_polyline(&mut self, layer: Layer, points: &[DVec3]) {
        let target = match layer {
            Layer::Static => &mut self.scene.static_trace,
            Layer::Track => &mut self.scene.time_track,
        };
        target.clear();
        target.extend_from_slice(points);
    }

    fn set_marker_style(&mut self, style: MarkerStyle) {
        self.scene.marker = style;
    }

    fn set_layer_styles(&mut self, styles: LayerStyles) {
        self.scene.styles = styles;
    }

    fn frame_done(&mut self, frame: usize) {
        self.scene.frame = Some(frame);
        self.frames_rendered += 1;
    }
}
