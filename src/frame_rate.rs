//! Idle/active frame-rate throttle.

use std::thread;
use std::time::{Duration, Instant};

pub const IDLE_FPS: u32 = 10;
pub const ACTIVE_FPS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    Idle,
    Active,
}

impl FrameMode {
    pub fn fps(self) -> u32 {
        match self {
            FrameMode::Idle => IDLE_FPS,
            FrameMode::Active => ACTIVE_FPS,
        }
    }
}

/// Goes active on the first frame with a touch; goes idle only after two
/// touch-free frames in a row, so a release frame still counts as active.
#[derive(Debug, Clone)]
pub struct FrameRateController {
    mode: FrameMode,
    prev_touched: bool,
}

impl Default for FrameRateController {
    fn default() -> Self {
        FrameRateController {
            mode: FrameMode::Idle,
            prev_touched: false,
        }
    }
}

impl FrameRateController {
    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    /// Feeds one frame's touch count. Returns the new mode when it changed;
    /// the caller applies its rate from the next frame on.
    pub fn observe(&mut self, touch_count: usize) -> Option<FrameMode> {
        let touched = touch_count > 0;
        let next = if !touched && !self.prev_touched {
            FrameMode::Idle
        } else {
            FrameMode::Active
        };
        self.prev_touched = touched;

        if next == self.mode {
            return None;
        }
        self.mode = next;
        Some(next)
    }
}

/// Holds each frame to the current target interval.
///
/// nannou's event loop does not throttle on its own, so the frame loop
/// sleeps out whatever is left of the interval at the end of `update`.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    frame_start: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        FramePacer {
            interval: frame_interval(fps),
            frame_start: Instant::now(),
        }
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.interval = frame_interval(fps);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left in the current frame at `now`.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.frame_start))
    }

    /// Sleeps until the current frame's interval is used up, then starts
    /// the next frame.
    pub fn wait(&mut self) {
        let left = self.remaining(Instant::now());
        if !left.is_zero() {
            thread::sleep(left);
        }
        self.frame_start = Instant::now();
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        FramePacer::new(IDLE_FPS)
    }
}

fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}
