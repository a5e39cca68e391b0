//! What tapping a widget does. Each action carries handles to exactly the
//! shared cells it touches.

use std::sync::Arc;
use std::time::Duration;

use nannou::color::named::{DARKGREEN, MAROON};
use tracing::{debug, info, warn};

use crate::coordination::{
    step_volume, CloseFlag, Coordinator, PlaybackGate, SharedConfig, VolumeChange,
};
use crate::render_drawing::Color;
use crate::scene::{Scene, WidgetId};

/// Both labels are five bytes so the button text never changes width.
pub const PLAY_LABEL: &str = " play";
pub const PAUSE_LABEL: &str = "pause";

pub const PAUSED_COLOR: Color = DARKGREEN;
pub const PLAYING_COLOR: Color = MAROON;

pub const CLOSE_WAKE_BACKOFF: Duration = Duration::from_millis(250);
pub const CLOSE_WAKE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub enum Action {
    /// Ask the frame loop to stop, then release a paused playback thread.
    RequestClose {
        close: Arc<CloseFlag>,
        playback: Arc<PlaybackGate>,
    },
    /// Flip play/pause; relabels the linked text and recolours itself.
    TogglePlayback { playback: Arc<PlaybackGate> },
    StepVolume { config: SharedConfig, up: bool },
}

impl Action {
    pub fn request_close(ctx: &Coordinator) -> Self {
        Action::RequestClose {
            close: Arc::clone(&ctx.close),
            playback: Arc::clone(&ctx.playback),
        }
    }

    pub fn toggle_playback(ctx: &Coordinator) -> Self {
        Action::TogglePlayback {
            playback: Arc::clone(&ctx.playback),
        }
    }

    pub fn increase_volume(ctx: &Coordinator) -> Self {
        Action::StepVolume {
            config: Arc::clone(&ctx.config),
            up: true,
        }
    }

    pub fn decrease_volume(ctx: &Coordinator) -> Self {
        Action::StepVolume {
            config: Arc::clone(&ctx.config),
            up: false,
        }
    }

    /// `this` is the widget the action is attached to.
    pub fn run(&self, scene: &mut Scene, this: WidgetId) {
        match self {
            Action::RequestClose { close, playback } => request_close(close, playback),
            Action::TogglePlayback { playback } => toggle_playback(playback, scene, this),
            Action::StepVolume { config, up } => {
                info!(up, "volume step requested");
                match step_volume(config, *up) {
                    VolumeChange::Changed(volume) => info!(volume, "volume set"),
                    VolumeChange::AtBound(volume) => {
                        info!(volume, "volume already at its limit, did nothing")
                    }
                }
            }
        }
    }
}

fn request_close(close: &CloseFlag, playback: &PlaybackGate) {
    if !close.try_request() {
        warn!("close flag busy; ignoring tap");
        return;
    }
    info!("close requested, waking playback thread");

    if !playback.force_wake(CLOSE_WAKE_BACKOFF, CLOSE_WAKE_TIMEOUT) {
        warn!(timeout = ?CLOSE_WAKE_TIMEOUT, "could not wake playback thread");
    }
}

fn toggle_playback(playback: &PlaybackGate, scene: &mut Scene, this: WidgetId) {
    let Some(active) = playback.try_toggle() else {
        warn!("playback lock busy; ignoring tap");
        return;
    };
    info!(active, "playback toggled");

    let (label, color) = if active {
        (PAUSE_LABEL, PLAYING_COLOR)
    } else {
        (PLAY_LABEL, PAUSED_COLOR)
    };

    if let Err(err) = scene.set_color(this, color) {
        warn!(%err, "cannot recolour play button");
    }
    let linked = scene.get(this).ok().and_then(|widget| widget.linked());
    match linked {
        Some(label_id) => {
            if let Err(err) = scene.set_text(label_id, label) {
                warn!(%err, "cannot relabel play button");
            }
        }
        None => debug!("play button has no label"),
    }
}
