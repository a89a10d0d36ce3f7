//! Offline export: one full pass over the frame sequence, written as scene
//! snapshots.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use lissa_core::{
    generate, AnimationConfig, Fragmentation, FrameState, WaveError, WaveParameters, WaveResult,
};
use serde::Serialize;

use crate::driver::AnimationDriver;
use crate::geometry::{LayerStyles, MarkerStyle};
use crate::renderer::{Renderer, Scene, SceneRecorder};

/// Output layout, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `.json`: a single document with timing metadata and every frame.
    Json,
    /// `.jsonl`: one scene per line.
    JsonLines,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> WaveResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(ExportFormat::Json),
            Some("jsonl") => Ok(ExportFormat::JsonLines),
            Some(other) => Err(WaveError::Export(format!(
                "unsupported export format '.{}' (expected .json or .jsonl)",
                other
            ))),
            None => Err(WaveError::Export(format!(
                "'{}' has no file extension (expected .json or .jsonl)",
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub frames: usize,
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    fps: u32,
    interval_ms: u64,
    n_point: usize,
    frames: &'a [Scene],
}

/// Render frames `0..n_point` once with a fresh driver and write them to
/// `path`. Live animation state is not touched.
///
/// Frames go to a `.part` file next to `path`, renamed into place once
/// complete. On failure the partial file is removed and `path` is left as
/// it was.
pub fn export_frames(
    config: &AnimationConfig,
    params: &WaveParameters,
    state: &FrameState,
    path: &Path,
) -> WaveResult<ExportSummary> {
    let format = ExportFormat::from_path(path)?;
    config.validate()?;

    let samples = generate(params, config.n_point, &Fragmentation::from_config(config, state.fragmented))?;
    let mut driver = AnimationDriver::new(config.n_vector);
    let mut recorder = SceneRecorder::new();
    recorder.set_marker_style(MarkerStyle::for_fragmented(state.fragmented));
    recorder.set_layer_styles(LayerStyles::default());

    let partial = partial_path(path);
    let written = File::create(&partial)
        .map_err(WaveError::from)
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            match format {
                ExportFormat::Json => {
                    let mut frames = Vec::with_capacity(config.n_point);
                    for frame in 0..config.n_point {
                        driver
                            .update(state, params, config.n_vector, &samples, frame)?
                            .apply_to(&mut recorder);
                        frames.push(recorder.scene().clone());
                    }
                    let doc = ExportDocument {
                        fps: config.fps,
                        interval_ms: config.interval_ms,
                        n_point: config.n_point,
                        frames: &frames,
                    };
                    write_document(&mut out, &doc)?;
                }
                ExportFormat::JsonLines => {
                    for frame in 0..config.n_point {
                        driver
                            .update(state, params, config.n_vector, &samples, frame)?
                            .apply_to(&mut recorder);
                        write_line(&mut out, recorder.scene())?;
                    }
                }
            }
            out.flush()?;
            Ok(())
        })
        .and_then(|()| std::fs::rename(&partial, path).map_err(WaveError::from));
    if let Err(e) = written {
        if partial.exists() {
            std::fs::remove_file(&partial).ok();
        }
        log::warn!("export to {} failed: {}", path.display(), e);
        return Err(e);
    }

    log::info!(
        "exported {} frames to {} ({:?})",
        recorder.frames_rendered(),
        path.display(),
        format
    );
    Ok(ExportSummary {
        path: path.to_path_buf(),
        format,
        frames: recorder.frames_rendered(),
    })
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn write_document<W: Write>(out: &mut W, doc: &ExportDocument) -> io::Result<()> {
    serde_json::to_writer(out, doc).map_err(io::Error::from)
}

/// One scene followed by a newline.
fn write_line<W: Write>(out: &mut W, scene: &Scene) -> io::Result<()> {
    serde_json::to_writer(&mut *out, scene).map_err(io::Error::from)?;
    out.write_all(b"\n")
}
