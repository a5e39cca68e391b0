use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use audio_manager::{AudioDevice, AudioError, PlayOutcome, PlaybackControl, Transcoder};
use nannou::color::named::WHITE;
use nannou::geom::pt2;
use ncap::actions::Action;
use ncap::config::PlayerConfig;
use ncap::coordination::Coordinator;
use ncap::playback::{spawn_playback, PlaybackJob};
use ncap::scene::{Drawable, Scene, Shape};

const BOUND: Duration = Duration::from_secs(10);

/// Records what it was asked to convert and returns a fake cache path.
#[derive(Clone)]
struct FakeTranscoder {
    converted: Arc<Mutex<Vec<PathBuf>>>,
    fail: bool,
}

impl FakeTranscoder {
    fn new() -> Self {
        FakeTranscoder {
            converted: Arc::default(),
            fail: false,
        }
    }

    fn converted(&self) -> Vec<PathBuf> {
        self.converted.lock().unwrap().clone()
    }
}

impl Transcoder for FakeTranscoder {
    fn convert(&self, source: &Path) -> Result<PathBuf, AudioError> {
        self.converted.lock().unwrap().push(source.to_path_buf());
        if self.fail {
            return Err(AudioError::Decode {
                path: source.to_path_buf(),
                reason: "fake failure".into(),
            });
        }
        Ok(PathBuf::from("/cache/out.wav"))
    }
}

/// Sleeps on the playback condition like a paused device would, and
/// reports when it starts waiting and when it is released.
struct WaitingDevice {
    waiting: Sender<()>,
    released: Sender<bool>,
}

impl AudioDevice for WaitingDevice {
    fn play(
        &self,
        _path: &Path,
        control: &dyn PlaybackControl,
    ) -> Result<PlayOutcome, AudioError> {
        let _ = self.waiting.send(());
        let playing = control.wait_until_playing();
        let _ = self.released.send(playing);
        Ok(if playing {
            PlayOutcome::Finished
        } else {
            PlayOutcome::Interrupted
        })
    }
}

fn waiting_device() -> (WaitingDevice, Receiver<()>, Receiver<bool>) {
    let (waiting, waiting_rx) = mpsc::channel();
    let (released, released_rx) = mpsc::channel();
    (WaitingDevice { waiting, released }, waiting_rx, released_rx)
}

fn close_button(ctx: &Coordinator) -> Scene {
    let mut scene = Scene::with_capacity(1);
    scene
        .push(
            Drawable::new(
                Shape::Rect {
                    pos: pt2(0.0, 0.0),
                    size: pt2(100.0, 100.0),
                },
                WHITE,
            )
            .with_action(Action::request_close(ctx)),
        )
        .unwrap();
    scene
}

#[test]
fn playback_waits_for_the_ready_signal() {
    let ctx = Coordinator::new(PlayerConfig::default());
    let transcoder = FakeTranscoder::new();
    let (device, waiting, _released) = waiting_device();

    let handle = spawn_playback(
        ctx.clone(),
        PlaybackJob::single("/music/a.m4a".into()),
        transcoder.clone(),
        device,
    )
    .unwrap();

    thread::sleep(Duration::from_millis(100));
    assert!(transcoder.converted().is_empty());

    ctx.ready.signal();
    waiting.recv_timeout(BOUND).unwrap();
    assert_eq!(transcoder.converted(), vec![PathBuf::from("/music/a.m4a")]);
    assert_eq!(ctx.now_playing.get(), Some(0));

    ctx.close.request();
    assert!(ctx.playback.force_wake(Duration::from_millis(10), BOUND));
    handle.join().unwrap().unwrap();
    assert_eq!(ctx.now_playing.get(), None);
}

#[test]
fn close_tap_releases_a_paused_playback_thread_despite_contention() {
    let ctx = Coordinator::new(PlayerConfig::default());
    let (device, waiting, released) = waiting_device();
    let handle = spawn_playback(
        ctx.clone(),
        PlaybackJob::single("/music/a.m4a".into()),
        FakeTranscoder::new(),
        device,
    )
    .unwrap();

    ctx.ready.signal();
    waiting.recv_timeout(BOUND).unwrap();

    // a third thread keeps grabbing the playback lock
    let stop = Arc::new(AtomicBool::new(false));
    let contender = {
        let playback = Arc::clone(&ctx.playback);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                let _ = playback.try_is_active();
                thread::yield_now();
            }
        })
    };

    let mut scene = close_button(&ctx);
    assert_eq!(scene.dispatch_tap(pt2(50.0, 50.0)).len(), 1);

    assert!(ctx.close.is_requested());
    assert_eq!(released.recv_timeout(BOUND), Ok(false));
    handle.join().unwrap().unwrap();
    stop.store(true, Ordering::Relaxed);
    contender.join().unwrap();
}

#[test]
fn close_before_ready_means_nothing_is_converted() {
    let ctx = Coordinator::new(PlayerConfig::default());
    let transcoder = FakeTranscoder::new();
    let (device, _waiting, _released) = waiting_device();
    let handle = spawn_playback(
        ctx.clone(),
        PlaybackJob::single("/music/a.m4a".into()),
        transcoder.clone(),
        device,
    )
    .unwrap();

    ctx.close.request();
    ctx.ready.signal();

    handle.join().unwrap().unwrap();
    assert!(transcoder.converted().is_empty());
}

#[test]
fn conversion_failure_ends_only_the_playback_thread() {
    let ctx = Coordinator::new(PlayerConfig::default());
    let transcoder = FakeTranscoder {
        fail: true,
        ..FakeTranscoder::new()
    };
    let (device, _waiting, _released) = waiting_device();
    let handle = spawn_playback(
        ctx.clone(),
        PlaybackJob::single("/music/broken.m4a".into()),
        transcoder,
        device,
    )
    .unwrap();

    ctx.ready.signal();
    let err = handle.join().unwrap().unwrap_err();
    assert_eq!(err.status_code(), 2);

    // the UI side is untouched and still usable
    assert!(!ctx.playback.is_active());
    assert!(!ctx.close.is_requested());
    assert_eq!(ctx.now_playing.get(), None);
    assert_eq!(ctx.playback.try_toggle(), Some(true));
}

#[test]
fn finished_tracks_advance_through_the_job() {
    let ctx = Coordinator::new(PlayerConfig::default());
    let transcoder = FakeTranscoder::new();
    let (device, waiting, released) = waiting_device();
    let job = PlaybackJob {
        tracks: vec!["/m/0.mp3".into(), "/m/1.mp3".into(), "/m/2.mp3".into()],
        start: 1,
        repeat: false,
        shuffle: false,
    };
    let handle = spawn_playback(ctx.clone(), job, transcoder.clone(), device).unwrap();

    // already playing, so the device never actually sleeps
    assert_eq!(ctx.playback.try_toggle(), Some(true));
    ctx.ready.signal();

    for _ in 0..2 {
        waiting.recv_timeout(BOUND).unwrap();
        assert_eq!(released.recv_timeout(BOUND), Ok(true));
    }
    handle.join().unwrap().unwrap();

    assert_eq!(
        transcoder.converted(),
        vec![PathBuf::from("/m/1.mp3"), PathBuf::from("/m/2.mp3")]
    );
}
