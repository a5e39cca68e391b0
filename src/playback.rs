//! The playback thread: waits for the UI, then converts and plays tracks
//! until the list runs out or the window closes.

use std::io;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use audio_manager::{AudioDevice, AudioError, PlayOutcome, PlaybackControl, Transcoder};
use rand::Rng;
use tracing::{error, info};

use crate::coordination::{Coordinator, VOLUME_MAX};

/// What to play and in which order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackJob {
    pub tracks: Vec<PathBuf>,
    pub start: usize,
    pub repeat: bool,
    pub shuffle: bool,
}

impl PlaybackJob {
    /// A job that plays exactly one file.
    pub fn single(path: PathBuf) -> Self {
        PlaybackJob {
            tracks: vec![path],
            start: 0,
            repeat: false,
            shuffle: false,
        }
    }

    /// The index to play after `current`, or `None` when the job is done.
    pub fn next_index(&self, current: usize, rng: &mut impl Rng) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        if self.shuffle {
            return Some(rng.gen_range(0..len));
        }
        match current + 1 {
            next if next < len => Some(next),
            _ if self.repeat => Some(0),
            _ => None,
        }
    }

    fn first_index(&self) -> Option<usize> {
        match self.tracks.len() {
            0 => None,
            len => Some(self.start.min(len - 1)),
        }
    }
}

/// [`PlaybackControl`] over the shared coordination cells.
pub struct SharedControl<'a> {
    ctx: &'a Coordinator,
}

impl<'a> SharedControl<'a> {
    pub fn new(ctx: &'a Coordinator) -> Self {
        SharedControl { ctx }
    }
}

impl PlaybackControl for SharedControl<'_> {
    fn wait_until_playing(&self) -> bool {
        self.ctx.playback.wait_until_active(&self.ctx.close)
    }

    fn should_stop(&self) -> bool {
        self.ctx.close.is_requested()
    }

    fn is_playing(&self) -> Option<bool> {
        self.ctx.playback.try_is_active()
    }

    fn volume(&self) -> Option<f32> {
        self.ctx
            .try_volume()
            .map(|volume| f32::from(volume) / f32::from(VOLUME_MAX))
    }
}

pub fn spawn_playback<T, D>(
    ctx: Coordinator,
    job: PlaybackJob,
    transcoder: T,
    device: D,
) -> io::Result<JoinHandle<Result<(), AudioError>>>
where
    T: Transcoder + Send + 'static,
    D: AudioDevice + Send + 'static,
{
    thread::Builder::new()
        .name("playback".to_string())
        .spawn(move || {
            let result = run_playback(&ctx, &job, &transcoder, &device);
            if let Err(err) = &result {
                error!(code = err.status_code(), %err, "playback failed");
            }
            ctx.now_playing.set(None);
            result
        })
}

/// Body of the playback thread.
pub fn run_playback(
    ctx: &Coordinator,
    job: &PlaybackJob,
    transcoder: &impl Transcoder,
    device: &impl AudioDevice,
) -> Result<(), AudioError> {
    ctx.ready.wait();
    info!("playback thread received ready signal");

    let control = SharedControl::new(ctx);
    let mut rng = rand::thread_rng();
    let mut index = job.first_index();

    while let Some(current) = index {
        if ctx.close.is_requested() {
            info!("close requested before playback");
            break;
        }

        ctx.now_playing.set(Some(current));
        let source = &job.tracks[current];
        let output = transcoder.convert(source)?;

        match device.play(&output, &control)? {
            PlayOutcome::Interrupted => break,
            PlayOutcome::Finished => {
                info!(track = current, "track finished");
                index = job.next_index(current, &mut rng);
            }
        }
    }

    info!("playback thread done");
    Ok(())
}
