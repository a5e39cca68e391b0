//! One render session: the scene, the track rows and the per-frame
//! sample, dispatch and close-check cycle.

use std::sync::Arc;
use std::time::Duration;

use nannou::color::named::{BLACK, ORANGE, WHITE};
use nannou::geom::{pt2, Point2};
use tracing::{debug, info, warn};

use crate::coordination::{CloseFlag, Coordinator, NowPlaying};
use crate::dispatch::{TouchDispatcher, TouchSample};
use crate::frame_rate::{FrameMode, FramePacer};
use crate::render_drawing::Surface;
use crate::scene::{Scene, SceneError};
use crate::text_fit::TextMetrics;
use crate::track_list::{TrackLayout, TrackRows, ROW_PAD};
use crate::ui::{build_player_scene, PlayerScene, FONT_SIZE};

const TOUCH_MARK_RADIUS: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue { fps_change: Option<u32> },
    Close,
}

pub struct Session {
    player: PlayerScene,
    tracks: TrackRows,
    dispatcher: TouchDispatcher,
    pacer: FramePacer,
    close: Arc<CloseFlag>,
    now_playing: Arc<NowPlaying>,
    highlight: Option<usize>,
    touch: Option<Point2>,
}

impl Session {
    pub fn new(
        width: f32,
        height: f32,
        titles: &[String],
        metrics: &impl TextMetrics,
        ctx: &Coordinator,
    ) -> Result<Self, SceneError> {
        let player = build_player_scene(width, height, metrics, ctx)?;
        let layout = TrackLayout::new(player.panel, ROW_PAD, FONT_SIZE);
        let tracks = TrackRows::new(titles, layout, metrics);
        debug!(widgets = player.scene.len(), tracks = titles.len(), "session built");

        Ok(Session {
            player,
            tracks,
            dispatcher: TouchDispatcher::default(),
            pacer: FramePacer::default(),
            close: Arc::clone(&ctx.close),
            now_playing: Arc::clone(&ctx.now_playing),
            highlight: None,
            touch: None,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.player.scene
    }

    pub fn player(&self) -> &PlayerScene {
        &self.player
    }

    pub fn tracks(&self) -> &TrackRows {
        &self.tracks
    }

    pub fn mode(&self) -> FrameMode {
        self.dispatcher.mode()
    }

    /// Target length of one frame at the current rate.
    pub fn frame_interval(&self) -> Duration {
        self.pacer.interval()
    }

    /// Sleeps out the rest of this frame.
    pub fn pace(&mut self) {
        self.pacer.wait();
    }

    /// One frame of input handling. Never blocks on a shared lock.
    pub fn tick(&mut self, sample: TouchSample) -> Tick {
        let step = self.dispatcher.step(sample);
        if let Some(fps) = step.fps_change {
            info!(fps, "frame rate changed");
            self.pacer.set_fps(fps);
        }

        self.touch = step.touch;
        if let Some(p) = step.release {
            let fired = self.player.scene.dispatch_tap(p);
            debug!(x = p.x, y = p.y, fired = fired.len(), "tap released");
        }

        if let Some(index) = self.now_playing.try_get() {
            self.highlight = index;
        }

        match self.close.try_is_requested() {
            Some(true) => Tick::Close,
            Some(false) => Tick::Continue {
                fps_change: step.fps_change,
            },
            None => {
                warn!("close flag busy; checking next frame");
                Tick::Continue {
                    fps_change: step.fps_change,
                }
            }
        }
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.clear(WHITE);
        self.player.scene.draw(surface);
        self.tracks.draw(self.highlight, surface);

        if let Some(p) = self.touch {
            surface.circle(p, TOUCH_MARK_RADIUS, ORANGE);
            surface.text("0", p - pt2(10.0, 70.0), FONT_SIZE, BLACK);
        }
    }
}
