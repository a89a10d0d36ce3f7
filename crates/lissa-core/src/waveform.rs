//! Waveform generation: parameters in, a fixed-length 3D sample buffer out.

use glam::DVec3;

use crate::config::AnimationConfig;
use crate::error::{WaveError, WaveResult};
use crate::parameter::{Axis, WaveParameters};

/// Intermittent-signal settings applied on top of the raw trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fragmentation {
    pub enabled: bool,
    pub plot_len: usize,
    pub no_plot_len: usize,
}

impl Fragmentation {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(plot_len: usize, no_plot_len: usize) -> Self {
        Self { enabled: true, plot_len, no_plot_len }
    }

    pub fn from_config(config: &AnimationConfig, enabled: bool) -> Self {
        Self {
            enabled,
            plot_len: config.fragmented_plot_len,
            no_plot_len: config.fragmented_no_plot_len,
        }
    }

    pub fn total_len(&self) -> usize {
        self.plot_len.saturating_add(self.no_plot_len)
    }
}

/// One sampled loop of the trajectory: position at every discrete time step.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<DVec3>,
}

impl SampleBuffer {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Position at time `t`.
    pub fn point(&self, t: usize) -> WaveResult<DVec3> {
        self.samples
            .get(t)
            .copied()
            .ok_or(WaveError::IndexOutOfRange { index: t, len: self.samples.len() })
    }

    pub fn points(&self) -> &[DVec3] {
        &self.samples
    }

    /// Samples strictly before `t`; empty at 0, clamped to the full buffer.
    pub fn prefix(&self, t: usize) -> &[DVec3] {
        &self.samples[..t.min(self.samples.len())]
    }

    /// One coordinate row of the 3×n layout.
    pub fn axis(&self, axis: Axis) -> impl Iterator<Item = f64> + '_ {
        let i = axis.index();
        self.samples.iter().map(move |p| p[i])
    }
}

/// Sample the trajectory over `n_point` steps, then apply fragmentation.
///
/// With fragmentation enabled the buffer is split into consecutive blocks of
/// `plot_len + no_plot_len` samples. The first `plot_len` samples of each full
/// block are kept and the rest are set to the zero vector. Samples after the
/// last full block keep their raw values.
pub fn generate(
    params: &WaveParameters,
    n_point: usize,
    fragmentation: &Fragmentation,
) -> WaveResult<SampleBuffer> {
    if n_point == 0 {
        return Err(WaveError::InvalidConfig(
            "sample count must be positive".to_string(),
        ));
    }

    let mut samples: Vec<DVec3> = (0..n_point).map(|t| params.position(t, n_point)).collect();

    if fragmentation.enabled {
        let total_len = fragmentation.total_len();
        if total_len == 0 {
            return Err(WaveError::InvalidConfig(
                "plot length + gap length must be positive when fragmented".to_string(),
            ));
        }
        let blocks = n_point / total_len;
        for block in samples.chunks_exact_mut(total_len).take(blocks) {
            for sample in &mut block[fragmentation.plot_len..] {
                *sample = DVec3::ZERO;
            }
        }
    }

    Ok(SampleBuffer { samples })
}

/// Owns the sample buffer and regenerates it only when marked stale.
#[derive(Debug, Default)]
pub struct WaveformGenerator {
    buffer: Option<SampleBuffer>,
}

impl WaveformGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the current buffer; the next `ensure` regenerates it.
    pub fn invalidate(&mut self) {
        self.buffer = None;
    }

    pub fn is_stale(&self) -> bool {
        self.buffer.is_none()
    }

    /// Regenerate immediately, replacing the current buffer.
    pub fn regenerate(
        &mut self,
        params: &WaveParameters,
        n_point: usize,
        fragmentation: &Fragmentation,
    ) -> WaveResult<&SampleBuffer> {
        let buffer = generate(params, n_point, fragmentation)?;
        log::debug!(
            "regenerated {} samples (fragmented: {})",
            buffer.len(),
            fragmentation.enabled
        );
        Ok(&*self.buffer.insert(buffer))
    }

    /// Current buffer, regenerating first if stale.
    pub fn ensure(
        &mut self,
        params: &WaveParameters,
        n_point: usize,
        fragmentation: &Fragmentation,
    ) -> WaveResult<&SampleBuffer> {
        match self.buffer.take() {
            Some(buffer) => Ok(&*self.buffer.insert(buffer)),
            None => self.regenerate(params, n_point, fragmentation),
        }
    }

    pub fn buffer(&self) -> Option<&SampleBuffer> {
        self.buffer.as_ref()
    }
}
