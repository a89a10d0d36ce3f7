//! Frame scheduling: which frame comes next, and when.
//!
//! A scheduler owns the frame counter and the timing source. Ticks are pulled
//! by the owner with `next_tick`, so frame updates always run on the thread
//! that also applies edits and never interleave with them.

use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver};

/// Lifecycle of a scheduler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not started yet.
    Idle,
    Running,
    Paused,
    /// Reached the last frame with repeat disabled.
    Finished,
    /// Stopped for good; no tick fires after this.
    Stopped,
}

/// Cycles through `[0, len)`, wrapping when `repeat` is set and holding at
/// the end otherwise.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    len: usize,
    next: usize,
    repeat: bool,
    finished: bool,
}

impl FrameSequence {
    pub fn new(len: usize, repeat: bool) -> Self {
        Self { len, next: 0, repeat, finished: len == 0 }
    }

    /// The next frame index, or `None` once a non-repeating sequence ends.
    pub fn advance(&mut self) -> Option<usize> {
        if self.finished {
            return None;
        }
        let frame = self.next;
        self.next += 1;
        if self.next >= self.len {
            if self.repeat {
                self.next = 0;
            } else {
                self.finished = true;
            }
        }
        Some(frame)
    }

    /// Rewind to frame 0.
    pub fn restart(&mut self) {
        self.next = 0;
        self.finished = self.len == 0;
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True when the following `advance` starts a new loop.
    pub fn at_loop_start(&self) -> bool {
        self.next == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Timer contract the animation runs on.
pub trait Scheduler {
    /// Register a run over `frames` frames, one every `period`.
    fn start(&mut self, period: Duration, frames: usize, repeat: bool);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Disable repeat and release the registration.
    fn stop(&mut self);

    /// Rewind to frame 0 without releasing the registration.
    fn restart(&mut self);

    fn state(&self) -> SchedulerState;

    /// Wait for the next tick and return its frame index. `None` when not
    /// running.
    fn next_tick(&mut self) -> Option<usize>;

    fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }
}

/// Shared bookkeeping for both scheduler flavours.
#[derive(Debug, Clone)]
struct Playback {
    sequence: FrameSequence,
    state: SchedulerState,
}

impl Default for Playback {
    fn default() -> Self {
        Self { sequence: FrameSequence::new(0, false), state: SchedulerState::Idle }
    }
}

impl Playback {
    fn start(&mut self, frames: usize, repeat: bool) {
        self.sequence = FrameSequence::new(frames, repeat);
        self.state = SchedulerState::Running;
    }

    fn pause(&mut self) -> bool {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Paused;
            return true;
        }
        false
    }

    fn resume(&mut self) -> bool {
        if self.state == SchedulerState::Paused {
            self.state = SchedulerState::Running;
            return true;
        }
        false
    }

    fn stop(&mut self) {
        self.sequence.set_repeat(false);
        self.state = SchedulerState::Stopped;
    }

    fn restart(&mut self) {
        self.sequence.restart();
        if self.state == SchedulerState::Finished {
            self.state = SchedulerState::Running;
        }
    }

    fn advance(&mut self) -> Option<usize> {
        if self.state != SchedulerState::Running {
            return None;
        }
        let frame = self.sequence.advance();
        if self.sequence.is_finished() {
            self.state = SchedulerState::Finished;
        }
        frame
    }
}

/// Scheduler without a clock: every `next_tick` returns the next frame
/// immediately. Drives headless runs and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    playback: Playback,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(&self) -> &FrameSequence {
        &self.playback.sequence
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, _period: Duration, frames: usize, repeat: bool) {
        self.playback.start(frames, repeat);
    }

    fn pause(&mut self) {
        self.playback.pause();
    }

    fn resume(&mut self) {
        self.playback.resume();
    }

    fn stop(&mut self) {
        self.playback.stop();
    }

    fn restart(&mut self) {
        self.playback.restart();
    }

    fn state(&self) -> SchedulerState {
        self.playback.state
    }

    fn next_tick(&mut self) -> Option<usize> {
        self.playback.advance()
    }
}

/// Wall-clock scheduler backed by a crossbeam tick channel.
pub struct TimerScheduler {
    playback: Playback,
    ticker: Option<Receiver<Instant>>,
    repeat_delay: Duration,
    fresh: bool,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self {
            playback: Playback::default(),
            ticker: None,
            repeat_delay: Duration::ZERO,
            fresh: true,
        }
    }

    /// Extra wait inserted before each new loop.
    pub fn with_repeat_delay(mut self, delay: Duration) -> Self {
        self.repeat_delay = delay;
        self
    }

    fn drain(&self) {
        if let Some(ticker) = &self.ticker {
            for _ in ticker.try_iter() {}
        }
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TimerScheduler {
    fn start(&mut self, period: Duration, frames: usize, repeat: bool) {
        self.playback.start(frames, repeat);
        self.ticker = Some(channel::tick(period));
        self.fresh = true;
        log::info!("timer scheduler started: {} frames every {:?}", frames, period);
    }

    fn pause(&mut self) {
        self.playback.pause();
    }

    fn resume(&mut self) {
        if self.playback.resume() {
            // Ticks that piled up while paused must not fire in a burst
            self.drain();
        }
    }

    fn stop(&mut self) {
        self.playback.stop();
        self.ticker = None;
        log::info!("timer scheduler stopped");
    }

    fn restart(&mut self) {
        self.playback.restart();
        self.fresh = true;
        self.drain();
    }

    fn state(&self) -> SchedulerState {
        self.playback.state
    }

    fn next_tick(&mut self) -> Option<usize> {
        if self.playback.state != SchedulerState::Running {
            return None;
        }
        let ticker = self.ticker.as_ref()?;
        let looping = !self.fresh && self.playback.sequence.at_loop_start();
        ticker.recv().ok()?;
        self.fresh = false;
        if looping && !self.repeat_delay.is_zero() {
            let _ = channel::after(self.repeat_delay).recv();
            self.drain();
        }
        self.playback.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_repeats() {
        let mut seq = FrameSequence::new(3, true);
        let frames: Vec<usize> = (0..7).filter_map(|_| seq.advance()).collect();
        assert_eq!(frames, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_sequence_holds_at_end() {
        let mut seq = FrameSequence::new(3, false);
        let frames: Vec<usize> = (0..5).filter_map(|_| seq.advance()).collect();
        assert_eq!(frames, vec![0, 1, 2]);
        assert!(seq.is_finished());
        seq.restart();
        assert_eq!(seq.advance(), Some(0));
    }

    #[test]
    fn test_empty_sequence() {
        let mut seq = FrameSequence::new(0, true);
        assert_eq!(seq.advance(), None);
    }

    #[test]
    fn test_manual_lifecycle() {
        let mut s = ManualScheduler::new();
        assert_eq!(s.state(), SchedulerState::Idle);
        assert_eq!(s.next_tick(), None);

        s.start(Duration::from_millis(30), 4, true);
        assert_eq!(s.next_tick(), Some(0));
        assert_eq!(s.next_tick(), Some(1));

        s.pause();
        assert_eq!(s.next_tick(), None);
        s.resume();
        assert_eq!(s.next_tick(), Some(2));

        s.restart();
        assert_eq!(s.next_tick(), Some(0));

        s.stop();
        assert_eq!(s.state(), SchedulerState::Stopped);
        assert!(!s.sequence().repeat());
        assert_eq!(s.next_tick(), None);
        s.resume();
        assert_eq!(s.next_tick(), None);
    }

    #[test]
    fn test_manual_finish_and_restart() {
        let mut s = ManualScheduler::new();
        s.start(Duration::ZERO, 2, false);
        assert_eq!(s.next_tick(), Some(0));
        assert_eq!(s.next_tick(), Some(1));
        assert_eq!(s.state(), SchedulerState::Finished);
        assert_eq!(s.next_tick(), None);
        s.restart();
        assert!(s.is_running());
        assert_eq!(s.next_tick(), Some(0));
    }

    #[test]
    fn test_timer_ticks() {
        let mut s = TimerScheduler::new();
        s.start(Duration::from_millis(1), 3, false);
        let frames: Vec<usize> = (0..5).filter_map(|_| s.next_tick()).collect();
        assert_eq!(frames, vec![0, 1, 2]);
        assert_eq!(s.state(), SchedulerState::Finished);
    }

    #[test]
    fn test_timer_stop_releases() {
        let mut s = TimerScheduler::new().with_repeat_delay(Duration::from_millis(1));
        s.start(Duration::from_millis(1), 2, true);
        assert_eq!(s.next_tick(), Some(0));
        assert_eq!(s.next_tick(), Some(1));
        assert_eq!(s.next_tick(), Some(0));
        s.stop();
        assert_eq!(s.next_tick(), None);
    }
}
