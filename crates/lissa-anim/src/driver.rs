use lissa_core::{FrameState, SampleBuffer, VectorTrailBuffer, WaveParameters, WaveResult};

use crate::geometry::{AxisBounds, GeometryUpdate, VectorUpdate};

/// Per-tick state machine: turns the toggles, the sample buffer and a frame
/// index into a geometry update.
///
/// The only state carried between ticks is the vector trail ring.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    trail: VectorTrailBuffer,
}

impl AnimationDriver {
    pub fn new(n_vector: usize) -> Self {
        Self { trail: VectorTrailBuffer::new(n_vector) }
    }

    pub fn trail(&self) -> &VectorTrailBuffer {
        &self.trail
    }

    pub fn resize_trail(&mut self, n_vector: usize) {
        self.trail.resize(n_vector);
    }

    pub fn clear(&mut self) {
        self.trail.clear();
    }

    /// Compute one frame.
    ///
    /// Order is fixed: bounds, then vectors, then the static trace, then the
    /// time track.
    pub fn update<'a>(
        &mut self,
        state: &FrameState,
        params: &WaveParameters,
        n_vector: usize,
        samples: &'a SampleBuffer,
        frame: usize,
    ) -> WaveResult<GeometryUpdate<'a>> {
        let mut update = GeometryUpdate { frame, ..Default::default() };

        if state.autoscale {
            update.bounds = Some(AxisBounds::symmetric(params.autoscale_limit()));
        }

        if let Some(n_vect) = state.vector_count(n_vector) {
            let position = samples.point(frame)?;
            let written = self.trail.write_vector(frame, n_vect, position)?;
            self.trail.apply_opacity(n_vect, written)?;
            update.vectors = self.trail.slots()[..n_vect]
                .iter()
                .enumerate()
                .map(|(slot, s)| VectorUpdate { slot, segment: s.segment, opacity: s.opacity })
                .collect();
        }

        if state.static_trace {
            update.static_trace = Some(samples.points());
        }

        if state.time_track {
            update.time_track = Some(samples.prefix(frame));
        }

        log::trace!("frame {} -> {} vectors", frame, update.vectors.len());
        Ok(update)
    }
}
