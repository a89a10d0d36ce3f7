use glam::DVec3;
use lissa_anim::{AxisBounds, Layer, LayerStyles, MarkerStyle, Renderer, Scene, SceneRecorder};
use lissa_core::Segment;

/// Headless renderer: keeps the scene and logs a one-line summary per frame.
#[derive(Debug, Default)]
pub struct LogRenderer {
    recorder: SceneRecorder,
    /// Log at info level every this many frames; 0 disables.
    every: usize,
}

impl LogRenderer {
    pub fn new(every: usize) -> Self {
        Self { recorder: SceneRecorder::new(), every }
    }

    pub fn scene(&self) -> &Scene {
        self.recorder.scene()
    }

    pub fn frames_rendered(&self) -> usize {
        self.recorder.frames_rendered()
    }
}

impl Renderer for LogRenderer {
    fn set_axis_bounds(&mut self, bounds: AxisBounds) {
        self.recorder.set_axis_bounds(bounds);
    }

    fn set_vector(&mut self, slot: usize, segment: Option<Segment>, opacity: f64) {
        self.recorder.set_vector(slot, segment, opacity);
    }

    fn truncate_vectors(&mut self, len: usize) {
        self.recorder.truncate_vectors(len);
    }

    fn set_polyline(&mut self, layer: Layer, points: &[DVec3]) {
        self.recorder.set_polyline(layer, points);
    }

    fn set_marker_style(&mut self, style: MarkerStyle) {
        log::debug!("marker style {:?}", style);
        self.recorder.set_marker_style(style);
    }

    fn set_layer_styles(&mut self, styles: LayerStyles) {
        log::debug!("layer styles {:?}", styles);
        self.recorder.set_layer_styles(styles);
    }

    fn frame_done(&mut self, frame: usize) {
        self.recorder.frame_done(frame);
        let scene = self.recorder.scene();
        let summary = format!(
            "frame {}: static {} pts, track {} pts, {} vectors, bounds {:?}",
            frame,
            scene.static_trace.len(),
            scene.time_track.len(),
            scene.visible_vectors().count(),
            scene.bounds.map(|b| b.x),
        );
        if self.every > 0 && self.recorder.frames_rendered() % self.every == 0 {
            log::info!("{}", summary);
        } else {
            log::trace!("{}", summary);
        }
    }
}
