//! # Frame Statistics (`stats.rs`)
//!
//! A small performance counter in the spirit of the classic browser stats panel. It is fed one
//! [`FrameStats::update`] call per animation frame and exposes:
//!
//! - **FPS mode**: frames counted over a rolling one-second window, with the lowest and highest
//!   values seen so far.
//! - **MS mode**: the time between the two most recent updates.
//!
//! A short history of the active metric is kept for the bar graph drawn by [`crate::gui`].

use std::collections::VecDeque;

use web_time::{Duration, Instant};

/// Which metric the overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsMode {
    #[default]
    Fps,
    Ms,
}

impl StatsMode {
    pub fn label(self) -> &'static str {
        match self {
            StatsMode::Fps => "FPS",
            StatsMode::Ms => "MS",
        }
    }
}

/// Running frame-rate and frame-time counters.
#[derive(Debug, Clone)]
pub struct FrameStats {
    mode: StatsMode,
    window_start: Option<Instant>,
    last_update: Option<Instant>,
    frames_in_window: u32,
    fps: f32,
    ms: f32,
    min_fps: f32,
    max_fps: f32,
    history: VecDeque<f32>,
}

impl FrameStats {
    /// Number of samples kept for the graph.
    pub const HISTORY_LEN: usize = 74;
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(mode: StatsMode) -> Self {
        Self {
            mode,
            window_start: None,
            last_update: None,
            frames_in_window: 0,
            fps: 0.0,
            ms: 0.0,
            min_fps: f32::INFINITY,
            max_fps: 0.0,
            history: VecDeque::with_capacity(Self::HISTORY_LEN),
        }
    }

    pub fn mode(&self) -> StatsMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: StatsMode) {
        if self.mode != mode {
            self.mode = mode;
            self.history.clear();
        }
    }

    pub fn cycle_mode(&mut self) {
        self.set_mode(match self.mode {
            StatsMode::Fps => StatsMode::Ms,
            StatsMode::Ms => StatsMode::Fps,
        });
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn ms(&self) -> f32 {
        self.ms
    }

    /// Lowest and highest FPS reported so far, once a full window has elapsed.
    pub fn fps_range(&self) -> Option<(f32, f32)> {
        (self.max_fps > 0.0).then_some((self.min_fps, self.max_fps))
    }

    /// Current value of the active metric.
    pub fn value(&self) -> f32 {
        match self.mode {
            StatsMode::Fps => self.fps,
            StatsMode::Ms => self.ms,
        }
    }

    pub fn history(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.history.iter().copied()
    }

    /// Records that a frame happened at `now`.
    pub fn update(&mut self, now: Instant) {
        let window_start = *self.window_start.get_or_insert(now);

        if let Some(last) = self.last_update {
            self.ms = now.saturating_duration_since(last).as_secs_f32() * 1000.0;
            if self.mode == StatsMode::Ms {
                self.push_history(self.ms);
            }
        }
        self.last_update = Some(now);
        self.frames_in_window += 1;

        let elapsed = now.saturating_duration_since(window_start);
        if elapsed >= Self::WINDOW {
            self.fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
            self.min_fps = self.min_fps.min(self.fps);
            self.max_fps = self.max_fps.max(self.fps);
            if self.mode == StatsMode::Fps {
                self.push_history(self.fps);
            }
            log::trace!("{:.1} fps ({:.2} ms)", self.fps, self.ms);
            self.window_start = Some(now);
            self.frames_in_window = 0;
        }
    }

    fn push_history(&mut self, value: f32) {
        if self.history.len() == Self::HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(value);
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(StatsMode::Fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(stats: &mut FrameStats, start: Instant, frames: u32, interval: Duration) -> Instant {
        let mut now = start;
        for _ in 0..frames {
            stats.update(now);
            now += interval;
        }
        now
    }

    #[test]
    fn reports_fps_after_one_second() {
        let mut stats = FrameStats::default();
        let start = Instant::now();
        // 61 updates spaced 1/60 s apart span exactly one second.
        feed(&mut stats, start, 61, Duration::from_micros(16_667));
        assert!((stats.fps() - 61.0).abs() < 0.5, "fps = {}", stats.fps());
        assert_eq!(stats.history().len(), 1);
    }

    #[test]
    fn no_fps_before_window_elapses() {
        let mut stats = FrameStats::default();
        feed(&mut stats, Instant::now(), 10, Duration::from_millis(10));
        assert_eq!(stats.fps(), 0.0);
        assert!(stats.fps_range().is_none());
    }

    #[test]
    fn ms_tracks_latest_interval() {
        let mut stats = FrameStats::new(StatsMode::Ms);
        feed(&mut stats, Instant::now(), 3, Duration::from_millis(20));
        assert!((stats.ms() - 20.0).abs() < 1e-3);
        assert_eq!(stats.value(), stats.ms());
        assert_eq!(stats.history().len(), 2);
    }

    #[test]
    fn min_max_follow_windows() {
        let mut stats = FrameStats::default();
        let start = Instant::now();
        let next = feed(&mut stats, start, 31, Duration::from_micros(33_334));
        feed(&mut stats, next, 61, Duration::from_micros(16_667));
        let (min, max) = stats.fps_range().unwrap();
        assert!(min < max);
    }

    #[test]
    fn history_is_bounded() {
        let mut stats = FrameStats::new(StatsMode::Ms);
        feed(&mut stats, Instant::now(), 500, Duration::from_millis(5));
        assert_eq!(stats.history().len(), FrameStats::HISTORY_LEN);
    }

    #[test]
    fn cycling_mode_clears_history() {
        let mut stats = FrameStats::new(StatsMode::Ms);
        feed(&mut stats, Instant::now(), 5, Duration::from_millis(5));
        stats.cycle_mode();
        assert_eq!(stats.mode(), StatsMode::Fps);
        assert_eq!(stats.history().len(), 0);
    }
}
