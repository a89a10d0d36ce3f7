pub mod error;
pub mod parameter;
pub mod config;
pub mod waveform;
pub mod preset;
pub mod trail;
pub mod frame_state;

pub use error::{WaveError, WaveResult};
pub use parameter::{Axis, AxisWave, ParameterName, Quantity, WaveParameters, PARAMETER_COUNT};
pub use config::AnimationConfig;
pub use waveform::{generate, Fragmentation, SampleBuffer, WaveformGenerator};
pub use preset::{
    builtin_presets, Access, PresetDefinition, PresetResolver, PresetSlot, ResolvedAssignment,
    ResolvedSlot, TableEntry,
};
pub use trail::{Segment, TrailSlot, VectorTrailBuffer};
pub use frame_state::{FrameState, Toggle, ToggleEffect};
