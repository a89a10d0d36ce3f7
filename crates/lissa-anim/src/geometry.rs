use glam::DVec3;
use lissa_core::Segment;
use serde::{Deserialize, Serialize};

use crate::renderer::Renderer;

/// View limits for the three axes, each as `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl AxisBounds {
    /// `[-lim, lim]` on every axis.
    pub fn symmetric(lim: f64) -> Self {
        Self { x: (-lim, lim), y: (-lim, lim), z: (-lim, lim) }
    }
}

/// Polyline layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// The whole loop, redrawn every frame.
    Static,
    /// The loop up to the current frame.
    Track,
}

/// Colour and decoration for a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub color: [f32; 3],
    pub arrow_head: bool,
}

const STATIC_STYLE: LayerStyle = LayerStyle { color: [0.0, 0.0, 1.0], arrow_head: false };
const TRACK_STYLE: LayerStyle = LayerStyle { color: [0.0, 0.5, 0.0], arrow_head: false };
const VECTOR_STYLE: LayerStyle = LayerStyle { color: [1.0, 0.0, 0.0], arrow_head: true };

/// Styles for the two polyline layers and the vector slots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStyles {
    pub static_trace: LayerStyle,
    pub time_track: LayerStyle,
    pub vectors: LayerStyle,
}

impl Default for LayerStyles {
    fn default() -> Self {
        Self { static_trace: STATIC_STYLE, time_track: TRACK_STYLE, vectors: VECTOR_STYLE }
    }
}

impl LayerStyles {
    pub fn polyline(&self, layer: Layer) -> LayerStyle {
        match layer {
            Layer::Static => self.static_trace,
            Layer::Track => self.time_track,
        }
    }
}

/// How polylines are drawn: joined, or as separate point markers for
/// fragmented (gapped) data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerStyle {
    #[default]
    Line,
    Points,
}

impl MarkerStyle {
    pub fn for_fragmented(fragmented: bool) -> Self {
        if fragmented {
            MarkerStyle::Points
        } else {
            MarkerStyle::Line
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorUpdate {
    pub slot: usize,
    pub segment: Option<Segment>,
    pub opacity: f64,
}

/// Everything one tick changes. `None` layers are left as they are.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryUpdate<'a> {
    pub frame: usize,
    pub bounds: Option<AxisBounds>,
    pub vectors: Vec<VectorUpdate>,
    pub static_trace: Option<&'a [DVec3]>,
    pub time_track: Option<&'a [DVec3]>,
}

impl GeometryUpdate<'_> {
    /// Push this update to a renderer, bounds first.
    pub fn apply_to<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        if let Some(bounds) = self.bounds {
            renderer.set_axis_bounds(bounds);
        }
        for v in &self.vectors {
            renderer.set_vector(v.slot, v.segment, v.opacity);
        }
        if let Some(points) = self.static_trace {
            renderer.set_polyline(Layer::Static, points);
        }
        if let Some(points) = self.time_track {
            renderer.set_polyline(Layer::Track, points);
        }
        renderer.frame_done(self.frame);
    }
}
