use std::io;
use std::path::{Path, PathBuf};

use lissa_anim::VisualizerSettings;
use serde::{Deserialize, Serialize};

/// On-disk session file: visualizer settings plus run options.
///
/// ```json
/// {
///   "animation": { "n_point": 720, "n_vector": 30 },
///   "frame_state": { "vectorTrack": true, "timeTrack": true },
///   "preset": "Wide Cone",
///   "frames": 1440
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(flatten)]
    pub settings: VisualizerSettings,
    /// Frames to render before exiting. One loop when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<PathBuf>,
}

/// Save a session file to disk as JSON.
pub fn save_session(path: &Path, session: &SessionConfig) -> io::Result<()> {
    let json = serde_json::to_string_pretty(session)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}

/// Load a session file from disk.
pub fn load_session(path: &Path) -> io::Result<SessionConfig> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
