pub mod geometry;
pub mod renderer;
pub mod scheduler;
pub mod driver;
pub mod input;
pub mod settings;
pub mod export;
pub mod context;

pub use geometry::{AxisBounds, GeometryUpdate, Layer, LayerStyle, LayerStyles, MarkerStyle, VectorUpdate};
pub use renderer::{Renderer, Scene, SceneRecorder};
pub use scheduler::{FrameSequence, ManualScheduler, Scheduler, SchedulerState, TimerScheduler};
pub use driver::AnimationDriver;
pub use input::{ParameterChange, ParameterControl, ParameterPanel};
pub use settings::VisualizerSettings;
pub use export::{export_frames, ExportFormat, ExportSummary};
pub use context::Visualizer;
