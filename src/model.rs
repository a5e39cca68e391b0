//! App state owned by the nannou event loop, and the startup/shutdown
//! sequence around it.

use std::path::Path;
use std::thread::JoinHandle;

use audio_manager::{AudioError, RodioDevice, TrackCatalog, WavCache};
use nannou::geom::Point2;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::actions::{CLOSE_WAKE_BACKOFF, CLOSE_WAKE_TIMEOUT};
use crate::cli::Cli;
use crate::config::{ConfigStore, PlayerConfig};
use crate::coordination::Coordinator;
use crate::dispatch::TouchSample;
use crate::logging::init_logging;
use crate::playback::{spawn_playback, PlaybackJob};
use crate::scene::SceneError;
use crate::session::Session;
use crate::text_fit::TextMetrics;

/// Touch id used for the primary mouse button.
pub const MOUSE_TOUCH_ID: u64 = u64::MAX;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not open window: {0}")]
    Window(String),

    #[error("could not build scene: {0}")]
    Scene(#[from] SceneError),
}

#[derive(Debug, Clone, Copy)]
struct TouchPoint {
    id: u64,
    pos: Point2,
    sampled: bool,
}

/// Active touch points, in the order they went down.
///
/// A touch that starts and ends between two samples is still reported
/// once, so a quick tap is never lost.
#[derive(Debug, Default)]
pub struct TouchTracker {
    points: Vec<TouchPoint>,
    flash: Option<Point2>,
}

impl TouchTracker {
    pub fn press(&mut self, id: u64, pos: Point2) {
        self.release(id);
        self.points.push(TouchPoint {
            id,
            pos,
            sampled: false,
        });
    }

    pub fn move_to(&mut self, id: u64, pos: Point2) {
        if let Some(point) = self.points.iter_mut().find(|p| p.id == id) {
            point.pos = pos;
        }
    }

    pub fn release(&mut self, id: u64) {
        if let Some(i) = self.points.iter().position(|p| p.id == id) {
            let point = self.points.remove(i);
            if !point.sampled {
                self.flash = Some(point.pos);
            }
        }
    }

    pub fn is_down(&self, id: u64) -> bool {
        self.points.iter().any(|p| p.id == id)
    }

    pub fn sample(&mut self) -> TouchSample {
        let flash = self.flash.take();
        for point in &mut self.points {
            point.sampled = true;
        }

        match self.points.first() {
            Some(first) => TouchSample {
                count: self.points.len(),
                first: Some(first.pos),
            },
            None => match flash {
                Some(pos) => TouchSample::at(pos),
                None => TouchSample::none(),
            },
        }
    }
}

/// The rows to show and the job to play. A file given directly replaces
/// the directory listing, so row `i` always names `job.tracks[i]`.
pub fn plan_tracks(
    music_dir: &Path,
    input: Option<&Path>,
    config: &PlayerConfig,
) -> (TrackCatalog, PlaybackJob) {
    if let Some(path) = input {
        return (TrackCatalog::single(path), PlaybackJob::single(path.to_path_buf()));
    }

    let catalog = match TrackCatalog::scan(music_dir) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(code = err.status_code(), %err, "track scan failed");
            TrackCatalog::default()
        }
    };
    let job = PlaybackJob {
        tracks: catalog.paths(),
        start: config.current_track,
        repeat: config.repeat,
        shuffle: config.shuffle,
    };
    (catalog, job)
}

type PlaybackHandle = JoinHandle<Result<(), AudioError>>;

/// Everything that exists before the window does: logging, config, the
/// track list and the (still waiting) playback thread.
pub struct Bootstrap {
    ctx: Coordinator,
    config_store: ConfigStore,
    titles: Vec<String>,
    playback: Option<PlaybackHandle>,
    log_guard: Option<WorkerGuard>,
}

impl Bootstrap {
    pub fn prepare(cli: &Cli) -> Self {
        let log_guard = match init_logging(&cli.log_dir(), &cli.log_filter) {
            Ok(guard) => Some(guard),
            Err(err) => {
                eprintln!("ncap: file logging disabled: {err}");
                None
            }
        };
        info!(started = %chrono::Local::now().to_rfc3339(), "ncap starting");

        let config_store = ConfigStore::new(cli.config_path());
        let config = match config_store.init() {
            Ok((config, init)) => {
                info!(?init, path = %config_store.path().display(), "config ready");
                config
            }
            Err(err) => {
                error!(%err, "config init failed, using defaults");
                PlayerConfig::default()
            }
        };
        config.log_dump();

        let (catalog, job) = plan_tracks(&cli.music_dir, cli.input.as_deref(), &config);
        info!(tracks = catalog.len(), "track catalog loaded");

        let device = RodioDevice::with_poll_interval(config.performance_mode.poll_interval());
        info!(poll = ?device.poll_interval(), "audio device ready");
        let ctx = Coordinator::new(config);
        let playback = match spawn_playback(
            ctx.clone(),
            job,
            WavCache::new(cli.cache_path()),
            device,
        ) {
            Ok(handle) => {
                info!("spawned playback thread");
                Some(handle)
            }
            Err(err) => {
                error!(%err, "could not spawn playback thread");
                None
            }
        };

        Bootstrap {
            ctx,
            config_store,
            titles: catalog.titles(),
            playback,
            log_guard,
        }
    }

    /// Releases the playback thread without ever starting the UI.
    pub fn abort(self, reason: &StartupError) {
        error!(%reason, "startup aborted");
        self.ctx.close.request();
        self.ctx.ready.signal();
        finish(&self.ctx, &self.config_store, self.playback);
    }
}

pub struct Model {
    pub session: Session,
    pub touches: TouchTracker,
    ctx: Coordinator,
    config_store: ConfigStore,
    playback: Option<PlaybackHandle>,
    _log_guard: Option<WorkerGuard>,
}

impl Model {
    /// Builds the scene for a `width` x `height` window, then lets the
    /// playback thread go.
    pub fn new(
        bootstrap: Bootstrap,
        width: f32,
        height: f32,
        metrics: &impl TextMetrics,
    ) -> Result<Self, (Bootstrap, StartupError)> {
        info!(width, height, "window ready");
        let session = Session::new(width, height, &bootstrap.titles, metrics, &bootstrap.ctx);
        let session = match session {
            Ok(session) => session,
            Err(err) => return Err((bootstrap, err.into())),
        };

        info!("initialization finished, signalling playback thread");
        bootstrap.ctx.ready.signal();

        Ok(Model {
            session,
            touches: TouchTracker::default(),
            ctx: bootstrap.ctx,
            config_store: bootstrap.config_store,
            playback: bootstrap.playback,
            _log_guard: bootstrap.log_guard,
        })
    }

    /// Stops playback, joins its thread and saves the config.
    pub fn shutdown(self) {
        info!("closing window");
        self.ctx.close.request();
        finish(&self.ctx, &self.config_store, self.playback);
        info!("main finished");
    }
}

fn finish(ctx: &Coordinator, config_store: &ConfigStore, playback: Option<PlaybackHandle>) {
    if !ctx.playback.force_wake(CLOSE_WAKE_BACKOFF, CLOSE_WAKE_TIMEOUT) {
        warn!("could not wake playback thread");
    }

    if let Some(handle) = playback {
        info!("joining playback thread");
        match handle.join() {
            Ok(Ok(())) => info!(code = 0, "playback thread joined"),
            Ok(Err(err)) => info!(code = err.status_code(), "playback thread joined"),
            Err(_) => error!("playback thread panicked"),
        }
    }

    if let Err(err) = config_store.save(&ctx.config_snapshot()) {
        error!(%err, "could not save config");
    }
}
