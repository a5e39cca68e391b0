//! Per-frame touch handling: taps fire on release, at the position the
//! touch had on the frame before it lifted.

use nannou::geom::Point2;

use crate::frame_rate::{FrameMode, FrameRateController};

/// What the touch device reported this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchSample {
    pub count: usize,
    /// First touch point, when `count > 0`.
    pub first: Option<Point2>,
}

impl TouchSample {
    pub fn none() -> Self {
        TouchSample::default()
    }

    pub fn at(p: Point2) -> Self {
        TouchSample {
            count: 1,
            first: Some(p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    pub mode: FrameMode,
    /// New frame rate to apply from the next frame, if it changed.
    pub fps_change: Option<u32>,
    /// Position of the touch currently held down.
    pub touch: Option<Point2>,
    /// Where a tap was released this frame.
    pub release: Option<Point2>,
}

#[derive(Debug, Clone, Default)]
pub struct TouchDispatcher {
    rate: FrameRateController,
    down_at: Option<Point2>,
}

impl TouchDispatcher {
    pub fn mode(&self) -> FrameMode {
        self.rate.mode()
    }

    pub fn step(&mut self, sample: TouchSample) -> FrameStep {
        let fps_change = self.rate.observe(sample.count).map(FrameMode::fps);
        let mode = self.rate.mode();
        let mut step = FrameStep {
            mode,
            fps_change,
            touch: None,
            release: None,
        };

        if mode == FrameMode::Idle {
            self.down_at = None;
            return step;
        }

        if sample.count > 0 {
            // a touch without a position is still a touch; keep the last one
            if sample.first.is_some() {
                self.down_at = sample.first;
            }
            step.touch = self.down_at;
        } else {
            step.release = self.down_at.take();
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::geom::pt2;

    #[test]
    fn tap_fires_once_on_release_at_the_last_down_position() {
        let mut d = TouchDispatcher::default();

        let s = d.step(TouchSample::at(pt2(10.0, 10.0)));
        assert_eq!(s.release, None);
        assert_eq!(s.fps_change, Some(30));

        let s = d.step(TouchSample::at(pt2(12.0, 11.0)));
        assert_eq!(s.release, None);
        assert_eq!(s.touch, Some(pt2(12.0, 11.0)));

        let s = d.step(TouchSample::none());
        assert_eq!(s.release, Some(pt2(12.0, 11.0)));
        assert_eq!(s.mode, FrameMode::Active);

        let s = d.step(TouchSample::none());
        assert_eq!(s.release, None);
        assert_eq!(s.mode, FrameMode::Idle);
        assert_eq!(s.fps_change, Some(10));
    }

    #[test]
    fn idle_frames_never_dispatch() {
        let mut d = TouchDispatcher::default();
        for _ in 0..5 {
            let s = d.step(TouchSample::none());
            assert_eq!(s.release, None);
            assert_eq!(s.fps_change, None);
            assert_eq!(s.mode, FrameMode::Idle);
        }
    }

    #[test]
    fn quick_retap_dispatches_each_release() {
        let mut d = TouchDispatcher::default();
        let releases: Vec<_> = [
            TouchSample::at(pt2(1.0, 1.0)),
            TouchSample::none(),
            TouchSample::at(pt2(2.0, 2.0)),
            TouchSample::none(),
            TouchSample::none(),
        ]
        .into_iter()
        .map(|sample| d.step(sample).release)
        .collect();

        assert_eq!(
            releases,
            vec![None, Some(pt2(1.0, 1.0)), None, Some(pt2(2.0, 2.0)), None]
        );
    }
}
