use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink};
use tracing::{debug, info};

use crate::error::AudioError;

/// How the device learns what the listener wants while a file plays.
pub trait PlaybackControl {
    /// Blocks while playback is paused. Returns `false` when the wait ended
    /// because the player is shutting down.
    fn wait_until_playing(&self) -> bool;

    /// Whether the player is shutting down.
    fn should_stop(&self) -> bool;

    /// Current play/pause state. `None` when it could not be read right now.
    fn is_playing(&self) -> Option<bool>;

    /// Output gain in `[0.0, 1.0]`. `None` when it could not be read right now.
    fn volume(&self) -> Option<f32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Finished,
    Interrupted,
}

pub trait AudioDevice {
    /// Plays `path` to the end, or until `control` asks to stop.
    fn play(&self, path: &Path, control: &dyn PlaybackControl)
        -> Result<PlayOutcome, AudioError>;
}

/// Plays through the default output device.
#[derive(Debug, Clone)]
pub struct RodioDevice {
    poll: Duration,
}

impl RodioDevice {
    /// `poll` is how often a playing sink re-reads the shared controls.
    pub fn with_poll_interval(poll: Duration) -> Self {
        RodioDevice { poll }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll
    }
}

impl AudioDevice for RodioDevice {
    fn play(
        &self,
        path: &Path,
        control: &dyn PlaybackControl,
    ) -> Result<PlayOutcome, AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|err| AudioError::Decode {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;

        // the stream must outlive the sink
        let (_stream, stream_handle) =
            OutputStream::try_default().map_err(|err| AudioError::Device(err.to_string()))?;
        let sink = Sink::try_new(&stream_handle).map_err(|err| AudioError::Device(err.to_string()))?;
        sink.pause();
        sink.append(source);

        info!(path = %path.display(), "playing audio");
        let outcome = drive(&sink, control, self.poll);
        sink.stop();
        info!(?outcome, "playback ended");
        Ok(outcome)
    }
}

fn drive(sink: &Sink, control: &dyn PlaybackControl, poll: Duration) -> PlayOutcome {
    let mut playing = false;

    loop {
        if control.should_stop() {
            return PlayOutcome::Interrupted;
        }

        if let Some(volume) = control.volume() {
            sink.set_volume(volume);
        }

        match (playing, control.is_playing()) {
            (true, Some(false)) => {
                sink.pause();
                playing = false;
                continue;
            }
            (false, Some(true)) => {
                sink.play();
                playing = true;
            }
            (false, _) => {
                debug!("paused, waiting for play signal");
                if !control.wait_until_playing() {
                    return PlayOutcome::Interrupted;
                }
                sink.play();
                playing = true;
                continue;
            }
            (true, _) => {}
        }

        if sink.empty() {
            return PlayOutcome::Finished;
        }
        thread::sleep(poll);
    }
}
