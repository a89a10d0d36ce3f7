//! The owning visualizer context.
//!
//! `Visualizer` holds every piece of mutable state: config, parameters,
//! toggles, preset selection, sample buffer, vector trail, scheduler and
//! renderer. Structural edits go through `with_paused` so they never land
//! between the halves of a frame.

use std::path::Path;
use std::time::Duration;

use lissa_core::config::{check_fragmentation, check_vector_count};
use lissa_core::{
    AnimationConfig, Fragmentation, FrameState, ParameterName, PresetResolver, ResolvedAssignment,
    SampleBuffer, Toggle, ToggleEffect, VectorTrailBuffer, WaveParameters, WaveResult,
    WaveformGenerator,
};

use crate::driver::AnimationDriver;
use crate::export::{export_frames, ExportSummary};
use crate::geometry::{Layer, LayerStyles, MarkerStyle};
use crate::input::{ParameterChange, ParameterPanel};
use crate::renderer::Renderer;
use crate::scheduler::Scheduler;
use crate::settings::VisualizerSettings;

pub struct Visualizer<S: Scheduler, R: Renderer> {
    config: AnimationConfig,
    params: WaveParameters,
    state: FrameState,
    presets: PresetResolver,
    resolved: ResolvedAssignment,
    panel: ParameterPanel,
    generator: WaveformGenerator,
    driver: AnimationDriver,
    scheduler: S,
    renderer: R,
}

impl<S: Scheduler, R: Renderer> Visualizer<S, R> {
    /// Validate `settings`, select the start-up preset and generate the
    /// first sample buffer. The scheduler is not started.
    pub fn new(settings: VisualizerSettings, scheduler: S, mut renderer: R) -> WaveResult<Self> {
        let VisualizerSettings { animation: config, parameters, frame_state: state, preset } =
            settings;
        config.validate()?;

        let mut params = parameters;
        let mut presets = PresetResolver::builtin()?;
        let preset = match preset {
            Some(name) => name,
            None => presets.active().name().to_string(),
        };
        let resolved = presets.select(&preset, &mut params)?;

        let mut panel = ParameterPanel::new(&params, config.n_point as f64);
        panel.apply(&resolved);

        let mut generator = WaveformGenerator::new();
        generator.regenerate(
            &params,
            config.n_point,
            &Fragmentation::from_config(&config, state.fragmented),
        )?;
        renderer.set_marker_style(MarkerStyle::for_fragmented(state.fragmented));
        renderer.set_layer_styles(LayerStyles::default());

        Ok(Self {
            driver: AnimationDriver::new(config.n_vector),
            config,
            params,
            state,
            presets,
            resolved,
            panel,
            generator,
            scheduler,
            renderer,
        })
    }

    // ── Playback ─────────────────────────────────────────────────

    pub fn start(&mut self) {
        let period = Duration::from_millis(self.config.interval_ms);
        self.scheduler.start(period, self.config.n_point, self.config.repeat);
        log::info!(
            "animation started: {} frames, {} ms interval, repeat {}",
            self.config.n_point,
            self.config.interval_ms,
            self.config.repeat
        );
    }

    /// Wait for the next scheduler tick and render it. `Ok(None)` when the
    /// scheduler is paused, finished or stopped.
    pub fn tick(&mut self) -> WaveResult<Option<usize>> {
        let Some(frame) = self.scheduler.next_tick() else {
            return Ok(None);
        };
        self.render_frame(frame)?;
        Ok(Some(frame))
    }

    /// Tick until `max_frames` frames are rendered or the scheduler stops
    /// producing them. Returns the number rendered.
    pub fn run(&mut self, max_frames: usize) -> WaveResult<usize> {
        let mut rendered = 0;
        while rendered < max_frames {
            if self.tick()?.is_none() {
                break;
            }
            rendered += 1;
        }
        Ok(rendered)
    }

    pub fn pause(&mut self) {
        self.scheduler.pause();
        log::debug!("animation paused");
    }

    pub fn resume(&mut self) {
        self.scheduler.resume();
        log::debug!("animation resumed");
    }

    /// Disable repeat and release the scheduler. No tick fires afterwards.
    pub fn stop(&mut self) {
        self.config.repeat = false;
        self.scheduler.stop();
        log::info!("animation stopped");
    }

    /// Clear all geometry, regenerate and rewind to frame 0.
    pub fn reset(&mut self) -> WaveResult<()> {
        self.with_paused(|v| v.reset_locked())
    }

    // ── Edits ────────────────────────────────────────────────────

    /// Flip a render toggle and carry out its side effect.
    pub fn set_toggle(&mut self, toggle: Toggle, on: bool) -> WaveResult<()> {
        if toggle == Toggle::Fragmented && on {
            let config = &self.config;
            let checked = check_fragmentation(
                config.fragmented_plot_len,
                config.fragmented_no_plot_len,
                config.n_point,
            );
            if let Err(e) = checked {
                log::warn!("rejected fragmentation toggle: {}", e);
                return Err(e);
            }
        }
        self.with_paused(|v| {
            let previous = (v.config.clone(), v.state);
            let effect = v.state.set(toggle, on);
            log::debug!("{} -> {} ({:?})", toggle.name(), on, effect);
            match effect {
                ToggleEffect::None => Ok(()),
                ToggleEffect::ClearVectors => {
                    v.clear_vectors();
                    Ok(())
                }
                ToggleEffect::Reset => v.reset_or_restore(previous),
                ToggleEffect::Regenerate => {
                    v.renderer
                        .set_marker_style(MarkerStyle::for_fragmented(v.state.fragmented));
                    v.reset_or_restore(previous)
                }
            }
        })
    }

    /// Edit one parameter through the input surface. Linked values are
    /// re-derived and the animation restarts from frame 0.
    pub fn set_parameter(&mut self, name: ParameterName, value: f64) -> WaveResult<ParameterChange> {
        self.with_paused(|v| {
            let change = v.panel.set(name, value)?;
            v.params = v.panel.values();
            v.resolved = v.presets.refresh(&mut v.params);
            v.panel.apply(&v.resolved);
            v.reset_locked()?;
            Ok(change)
        })
    }

    pub fn select_preset(&mut self, name: &str) -> WaveResult<()> {
        self.with_paused(|v| {
            v.resolved = v.presets.select(name, &mut v.params)?;
            v.panel.apply(&v.resolved);
            v.reset_locked()
        })
    }

    /// Change the trailing vector count. Rejected outside `1..=n_point/2`.
    pub fn set_n_vector(&mut self, n_vector: usize) -> WaveResult<()> {
        if let Err(e) = check_vector_count(n_vector, self.config.n_point) {
            log::warn!("rejected vector count {}: {}", n_vector, e);
            return Err(e);
        }
        self.with_paused(|v| {
            v.config.n_vector = n_vector;
            v.driver.resize_trail(n_vector);
            v.renderer.truncate_vectors(n_vector);
            v.reset_locked()
        })
    }

    /// Change the fragmentation block lengths. Rejected when both are zero or
    /// they add up to more than the sample count.
    pub fn set_fragmentation(&mut self, plot_len: usize, no_plot_len: usize) -> WaveResult<()> {
        if let Err(e) = check_fragmentation(plot_len, no_plot_len, self.config.n_point) {
            log::warn!("rejected fragmentation {}+{}: {}", plot_len, no_plot_len, e);
            return Err(e);
        }
        self.with_paused(|v| {
            let previous = (v.config.clone(), v.state);
            v.config.fragmented_plot_len = plot_len;
            v.config.fragmented_no_plot_len = no_plot_len;
            v.reset_or_restore(previous)
        })
    }

    /// Write the full frame sequence to `path`, then restart playback from
    /// frame 0.
    pub fn export(&mut self, path: impl AsRef<Path>) -> WaveResult<ExportSummary> {
        self.scheduler.pause();
        let exported = export_frames(&self.config, &self.params, &self.state, path.as_ref());
        let reset = self.reset_locked();
        self.scheduler.resume();
        let summary = exported?;
        reset?;
        Ok(summary)
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn parameters(&self) -> &WaveParameters {
        &self.params
    }

    pub fn frame_state(&self) -> &FrameState {
        &self.state
    }

    pub fn panel(&self) -> &ParameterPanel {
        &self.panel
    }

    /// Notifications for every accepted parameter edit.
    pub fn subscribe(&mut self) -> crossbeam::channel::Receiver<ParameterChange> {
        self.panel.subscribe()
    }

    pub fn resolved(&self) -> &ResolvedAssignment {
        &self.resolved
    }

    pub fn preset_names(&self) -> impl Iterator<Item = &str> {
        self.presets.names()
    }

    pub fn active_preset(&self) -> &str {
        self.presets.active().name()
    }

    pub fn samples(&self) -> Option<&SampleBuffer> {
        self.generator.buffer()
    }

    pub fn trail(&self) -> &VectorTrailBuffer {
        self.driver.trail()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    // ── Internals ────────────────────────────────────────────────

    /// Pause, mutate, resume. Resumes even when `f` fails.
    fn with_paused<T>(&mut self, f: impl FnOnce(&mut Self) -> WaveResult<T>) -> WaveResult<T> {
        self.scheduler.pause();
        let result = f(self);
        self.scheduler.resume();
        result
    }

    fn fragmentation(&self) -> Fragmentation {
        Fragmentation::from_config(&self.config, self.state.fragmented)
    }

    fn render_frame(&mut self, frame: usize) -> WaveResult<()> {
        let fragmentation = self.fragmentation();
        let samples = self.generator.ensure(&self.params, self.config.n_point, &fragmentation)?;
        let update =
            self.driver
                .update(&self.state, &self.params, self.config.n_vector, samples, frame)?;
        update.apply_to(&mut self.renderer);
        Ok(())
    }

    fn clear_vectors(&mut self) {
        self.driver.clear();
        for slot in 0..self.driver.trail().len() {
            self.renderer.set_vector(slot, None, 1.0);
        }
    }

    /// Reset body; the caller holds the scheduler paused.
    fn reset_locked(&mut self) -> WaveResult<()> {
        self.renderer.set_polyline(Layer::Static, &[]);
        self.renderer.set_polyline(Layer::Track, &[]);
        self.clear_vectors();
        self.generator.invalidate();
        let fragmentation = self.fragmentation();
        self.generator.regenerate(&self.params, self.config.n_point, &fragmentation)?;
        self.scheduler.restart();
        log::debug!("animation reset");
        Ok(())
    }

    /// Reset after a structural edit. If regeneration fails, put back the
    /// config and toggles from before the edit and regenerate from those.
    fn reset_or_restore(&mut self, previous: (AnimationConfig, FrameState)) -> WaveResult<()> {
        let Err(e) = self.reset_locked() else {
            return Ok(());
        };
        log::warn!("reset failed, restoring previous settings: {}", e);
        (self.config, self.state) = previous;
        self.renderer
            .set_marker_style(MarkerStyle::for_fragmented(self.state.fragmented));
        self.reset_locked()?;
        Err(e)
    }
}
