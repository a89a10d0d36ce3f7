use serde::{Deserialize, Serialize};

use crate::error::{WaveError, WaveResult};

/// Animation timing, trail length and fragmentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Samples per animation loop. Must stay above `n_vector`.
    pub n_point: usize,
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Restart from frame 0 after the last frame.
    pub repeat: bool,
    /// Extra pause between loops in milliseconds.
    pub repeat_delay_ms: u64,
    /// Trailing vectors drawn in vector-track mode. Range: 1..=n_point/2
    pub n_vector: usize,
    /// Samples kept per fragmentation block.
    pub fragmented_plot_len: usize,
    /// Samples zeroed per fragmentation block.
    pub fragmented_no_plot_len: usize,
    /// Frame rate written into exports.
    pub fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            n_point: 360,
            interval_ms: 30,
            repeat: true,
            repeat_delay_ms: 0,
            n_vector: 1,
            fragmented_plot_len: 10,
            fragmented_no_plot_len: 5,
            fps: 60,
        }
    }
}

impl AnimationConfig {
    /// Length of one fragmentation block (plot + gap).
    pub fn fragment_total_len(&self) -> usize {
        self.fragmented_plot_len.saturating_add(self.fragmented_no_plot_len)
    }

    /// Largest vector count the sample count allows.
    pub fn max_vectors(&self) -> usize {
        self.n_point / 2
    }

    pub fn validate(&self) -> WaveResult<()> {
        check_sample_count(self.n_point)?;
        check_vector_count(self.n_vector, self.n_point)?;
        check_fragmentation(
            self.fragmented_plot_len,
            self.fragmented_no_plot_len,
            self.n_point,
        )
    }
}

pub fn check_sample_count(n_point: usize) -> WaveResult<()> {
    if n_point == 0 {
        return Err(WaveError::InvalidConfig(
            "sample count must be positive".to_string(),
        ));
    }
    Ok(())
}

pub fn check_vector_count(n_vector: usize, n_point: usize) -> WaveResult<()> {
    if n_vector == 0 || n_vector > n_point / 2 || n_vector >= n_point {
        return Err(WaveError::InvalidConfig(format!(
            "vector count must be between 1 and {} (half the sample count)",
            n_point / 2
        )));
    }
    Ok(())
}

/// Block lengths must be usable whether or not fragmentation is currently on.
pub fn check_fragmentation(plot_len: usize, no_plot_len: usize, n_point: usize) -> WaveResult<()> {
    if plot_len == 0 && no_plot_len == 0 {
        return Err(WaveError::InvalidConfig(
            "plot length + gap length must be positive".to_string(),
        ));
    }
    if plot_len > n_point || no_plot_len > n_point - plot_len {
        return Err(WaveError::InvalidConfig(
            "plot length + gap length must not exceed sample count".to_string(),
        ));
    }
    Ok(())
}
