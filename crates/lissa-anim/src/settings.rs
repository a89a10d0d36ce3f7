use lissa_core::{AnimationConfig, FrameState, WaveParameters};
use serde::{Deserialize, Serialize};

/// Everything a visualizer starts from. Missing sections take defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    pub animation: AnimationConfig,
    pub parameters: WaveParameters,
    pub frame_state: FrameState,
    /// Preset selected at start-up; the first catalogue entry when absent.
    pub preset: Option<String>,
}
