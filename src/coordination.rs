//! State shared between the render thread and the playback thread.
//!
//! Every scalar sits behind exactly one mutex. The render thread only uses
//! the non-blocking `try_*` accessors and treats `None` as "unchanged this
//! frame"; the playback thread is free to block.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::PlayerConfig;

pub type SharedConfig = Arc<Mutex<PlayerConfig>>;

/// Blocking lock that recovers the value from a poisoned mutex.
pub fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(context, "mutex poisoned; recovering");
            poisoned.into_inner()
        }
    }
}

/// Non-blocking lock. `None` means someone else holds it right now.
pub fn try_lock_or_recover<'a, T>(
    lock: &'a Mutex<T>,
    context: &str,
) -> Option<MutexGuard<'a, T>> {
    match lock.try_lock() {
        Ok(guard) => Some(guard),
        Err(TryLockError::Poisoned(poisoned)) => {
            warn!(context, "mutex poisoned; recovering");
            Some(poisoned.into_inner())
        }
        Err(TryLockError::WouldBlock) => {
            debug!(context, "lock busy");
            None
        }
    }
}

/// One-shot "render is initialised" handshake.
#[derive(Debug, Default)]
pub struct ReadySignal {
    ready: Mutex<bool>,
    cv: Condvar,
}

impl ReadySignal {
    pub fn signal(&self) {
        let mut ready = lock_or_recover(&self.ready, "ready");
        if *ready {
            warn!("ready signalled twice");
            return;
        }
        *ready = true;
        self.cv.notify_all();
        info!("render ready signalled");
    }

    pub fn wait(&self) {
        let mut ready = lock_or_recover(&self.ready, "ready");
        while !*ready {
            ready = match self.cv.wait(ready) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Returns whether the signal arrived within `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let ready = lock_or_recover(&self.ready, "ready");
        let result = self.cv.wait_timeout_while(ready, timeout, |ready| !*ready);
        match result {
            Ok((ready, _)) => *ready,
            Err(poisoned) => *poisoned.into_inner().0,
        }
    }

    pub fn is_ready(&self) -> bool {
        *lock_or_recover(&self.ready, "ready")
    }
}

#[derive(Debug, Default)]
pub struct CloseFlag {
    requested: Mutex<bool>,
}

impl CloseFlag {
    /// Sets the flag if the lock is free. Returns whether it was set.
    pub fn try_request(&self) -> bool {
        match try_lock_or_recover(&self.requested, "close") {
            Some(mut requested) => {
                *requested = true;
                true
            }
            None => false,
        }
    }

    /// Blocking set, for shutdown paths outside the frame loop.
    pub fn request(&self) {
        *lock_or_recover(&self.requested, "close") = true;
    }

    pub fn try_is_requested(&self) -> Option<bool> {
        try_lock_or_recover(&self.requested, "close").map(|requested| *requested)
    }

    pub fn is_requested(&self) -> bool {
        *lock_or_recover(&self.requested, "close")
    }

    #[cfg(test)]
    pub(crate) fn lock_for_test(&self) -> MutexGuard<'_, bool> {
        lock_or_recover(&self.requested, "close")
    }
}

/// Play/pause flag plus the condition the playback thread sleeps on while
/// paused.
#[derive(Debug, Default)]
pub struct PlaybackGate {
    active: Mutex<bool>,
    cv: Condvar,
}

impl PlaybackGate {
    /// Flips the flag if the lock is free and returns the new state.
    /// Waiters are woken when it becomes active.
    pub fn try_toggle(&self) -> Option<bool> {
        let mut active = try_lock_or_recover(&self.active, "playback")?;
        *active = !*active;
        if *active {
            self.cv.notify_all();
        }
        Some(*active)
    }

    pub fn try_is_active(&self) -> Option<bool> {
        try_lock_or_recover(&self.active, "playback").map(|active| *active)
    }

    pub fn is_active(&self) -> bool {
        *lock_or_recover(&self.active, "playback")
    }

    /// Marks playback active and wakes the waiter, retrying every `backoff`
    /// while the lock is busy. Gives up after `timeout` and returns `false`.
    pub fn force_wake(&self, backoff: Duration, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(mut active) = try_lock_or_recover(&self.active, "playback") {
                *active = true;
                self.cv.notify_all();
                debug!("playback condition signalled");
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            warn!(?backoff, "playback lock busy; retrying");
            thread::sleep(backoff);
        }
    }

    /// Blocks until active. Returns `false` if the wake-up came from a
    /// close request.
    pub fn wait_until_active(&self, close: &CloseFlag) -> bool {
        let mut active = lock_or_recover(&self.active, "playback");
        while !*active {
            active = match self.cv.wait(active) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        drop(active);
        !close.is_requested()
    }

    #[cfg(test)]
    pub(crate) fn lock_for_test(&self) -> MutexGuard<'_, bool> {
        lock_or_recover(&self.active, "playback")
    }
}

/// Index into the track list that the UI highlights.
#[derive(Debug, Default)]
pub struct NowPlaying {
    index: Mutex<Option<usize>>,
}

impl NowPlaying {
    pub fn set(&self, index: Option<usize>) {
        *lock_or_recover(&self.index, "now playing") = index;
    }

    pub fn try_get(&self) -> Option<Option<usize>> {
        try_lock_or_recover(&self.index, "now playing").map(|index| *index)
    }

    pub fn get(&self) -> Option<usize> {
        *lock_or_recover(&self.index, "now playing")
    }

    #[cfg(test)]
    pub(crate) fn lock_for_test(&self) -> MutexGuard<'_, Option<usize>> {
        lock_or_recover(&self.index, "now playing")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    Changed(u8),
    AtBound(u8),
}

pub const VOLUME_STEP: u8 = 10;
pub const VOLUME_MAX: u8 = 100;

/// Steps the volume up or down by [`VOLUME_STEP`], staying in `0..=100`.
/// Blocks on the config lock.
pub fn step_volume(config: &Mutex<PlayerConfig>, up: bool) -> VolumeChange {
    let mut config = lock_or_recover(config, "config");
    let volume = config.volume;
    let next = if up {
        if volume >= VOLUME_MAX {
            None
        } else {
            Some(volume.saturating_add(VOLUME_STEP).min(VOLUME_MAX))
        }
    } else if volume == 0 {
        None
    } else {
        Some(volume.saturating_sub(VOLUME_STEP))
    };

    match next {
        Some(next) => {
            config.volume = next;
            VolumeChange::Changed(next)
        }
        None => VolumeChange::AtBound(volume),
    }
}

/// Handle to every shared cell. Cheap to clone; one copy goes to the UI,
/// one to the playback thread.
#[derive(Debug, Clone)]
pub struct Coordinator {
    pub ready: Arc<ReadySignal>,
    pub close: Arc<CloseFlag>,
    pub playback: Arc<PlaybackGate>,
    pub now_playing: Arc<NowPlaying>,
    pub config: SharedConfig,
}

impl Coordinator {
    pub fn new(config: PlayerConfig) -> Self {
        Coordinator {
            ready: Arc::default(),
            close: Arc::default(),
            playback: Arc::default(),
            now_playing: Arc::default(),
            config: Arc::new(Mutex::new(config)),
        }
    }

    pub fn volume(&self) -> u8 {
        lock_or_recover(&self.config, "config").volume
    }

    pub fn try_volume(&self) -> Option<u8> {
        try_lock_or_recover(&self.config, "config").map(|config| config.volume)
    }

    pub fn config_snapshot(&self) -> PlayerConfig {
        lock_or_recover(&self.config, "config").clone()
    }
}
