//! lissa - headless driver for the 3D Lissajous trajectory animation

mod log_renderer;
mod session;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use lissa_anim::{ManualScheduler, Scheduler, TimerScheduler, Visualizer, VisualizerSettings};
use lissa_core::{builtin_presets, WaveResult};

use crate::log_renderer::LogRenderer;
use crate::session::{load_session, save_session, SessionConfig};

#[derive(Parser)]
#[command(name = "lissa")]
#[command(about = "Animate a 3D Lissajous trajectory headless and export its frames", long_about = None)]
struct Args {
    /// Session file (JSON) with animation, parameters, frame_state and preset sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preset to select at start-up (overrides the session file)
    #[arg(short, long)]
    preset: Option<String>,

    /// Frames to render (default: one full loop)
    #[arg(short, long)]
    frames: Option<usize>,

    /// Tick on the wall clock at the configured interval instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Export the full frame sequence afterwards (.json or .jsonl)
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write the effective session (after command-line overrides) to this file
    #[arg(long)]
    save_session: Option<PathBuf>,

    /// Print the built-in presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Log structural changes (debug level)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::builder().filter_level(level).parse_default_env().init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.list_presets {
        for preset in builtin_presets()? {
            println!("{}", preset.name());
        }
        return Ok(());
    }

    let mut session = match &args.config {
        Some(path) => {
            log::info!("loading session {}", path.display());
            load_session(path)?
        }
        None => SessionConfig::default(),
    };
    if let Some(preset) = args.preset {
        session.settings.preset = Some(preset);
    }
    if args.frames.is_some() {
        session.frames = args.frames;
    }
    if args.export.is_some() {
        session.export = args.export;
    }
    if let Some(path) = &args.save_session {
        save_session(path, &session)?;
        log::info!("session written to {}", path.display());
    }

    let frames = session.frames.unwrap_or(session.settings.animation.n_point);
    let export = session.export;

    if args.realtime {
        let delay = Duration::from_millis(session.settings.animation.repeat_delay_ms);
        let scheduler = TimerScheduler::new().with_repeat_delay(delay);
        drive(session.settings, scheduler, frames, export.as_deref())?;
    } else {
        drive(session.settings, ManualScheduler::new(), frames, export.as_deref())?;
    }
    Ok(())
}

fn drive<S: Scheduler>(
    settings: VisualizerSettings,
    scheduler: S,
    frames: usize,
    export: Option<&Path>,
) -> WaveResult<()> {
    let every = settings.animation.n_point.max(1);
    let mut visualizer = Visualizer::new(settings, scheduler, LogRenderer::new(every))?;
    log::info!("preset '{}'", visualizer.active_preset());

    visualizer.start();
    let rendered = visualizer.run(frames)?;
    if rendered < frames {
        log::warn!("scheduler finished after {} of {} frames", rendered, frames);
    }
    let renderer = visualizer.renderer();
    let scene = renderer.scene();
    println!(
        "rendered {} frames (last frame {:?}, {} visible vectors)",
        renderer.frames_rendered(),
        scene.frame,
        scene.visible_vectors().count()
    );

    if let Some(path) = export {
        let summary = visualizer.export(path)?;
        println!(
            "exported {} frames to {} ({:?})",
            summary.frames,
            summary.path.display(),
            summary.format
        );
    }

    visualizer.stop();
    Ok(())
}
