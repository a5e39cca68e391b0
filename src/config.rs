//! Persisted player settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::coordination::VOLUME_MAX;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error at `{path}`: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("config at `{path}` is not valid: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// How eagerly the audio backend reacts to play/pause, volume and close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceMode {
    None,
    LowLatency,
    PowerSaving,
}

impl PerformanceMode {
    /// How often the playback device checks the shared controls.
    pub fn poll_interval(self) -> Duration {
        match self {
            PerformanceMode::LowLatency => Duration::from_millis(20),
            PerformanceMode::None => Duration::from_millis(100),
            PerformanceMode::PowerSaving => Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub performance_mode: PerformanceMode,
    pub current_track: usize,
    pub repeat: bool,
    pub shuffle: bool,
    /// Percent, `0..=100`.
    pub volume: u8,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            performance_mode: PerformanceMode::PowerSaving,
            current_track: 0,
            repeat: false,
            shuffle: false,
            volume: VOLUME_MAX,
        }
    }
}

impl PlayerConfig {
    fn sanitized(mut self) -> Self {
        self.volume = self.volume.min(VOLUME_MAX);
        self
    }

    pub fn log_dump(&self) {
        debug!(
            performance_mode = ?self.performance_mode,
            current_track = self.current_track,
            repeat = self.repeat,
            shuffle = self.shuffle,
            volume = self.volume,
            "config"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigInit {
    Created,
    Existing,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config, or writes the defaults if there is no file yet.
    pub fn init(&self) -> Result<(PlayerConfig, ConfigInit), ConfigError> {
        if self.path.exists() {
            info!(path = %self.path.display(), "config exists, reading");
            return Ok((self.read()?, ConfigInit::Existing));
        }

        info!(path = %self.path.display(), "creating config");
        let config = PlayerConfig::default();
        self.save(&config)?;
        Ok((config, ConfigInit::Created))
    }

    pub fn read(&self) -> Result<PlayerConfig, ConfigError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        let config: PlayerConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
                path: self.path.clone(),
                source,
            })?;
        Ok(config.sanitized())
    }

    pub fn save(&self, config: &PlayerConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let raw = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, raw).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ncap-config-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("ncap.json")
    }

    #[test]
    fn first_init_creates_defaults() {
        let path = scratch("create");
        let store = ConfigStore::new(&path);

        let (config, init) = store.init().unwrap();
        assert_eq!(init, ConfigInit::Created);
        assert_eq!(config, PlayerConfig::default());
        assert!(path.exists());

        let (again, init) = store.init().unwrap();
        assert_eq!(init, ConfigInit::Existing);
        assert_eq!(again, config);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn saved_changes_are_read_back() {
        let path = scratch("save");
        let store = ConfigStore::new(&path);
        let config = PlayerConfig {
            performance_mode: PerformanceMode::LowLatency,
            current_track: 4,
            repeat: true,
            shuffle: true,
            volume: 30,
        };

        store.save(&config).unwrap();
        assert_eq!(store.read().unwrap(), config);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn missing_fields_default_and_volume_is_clamped() {
        let path = scratch("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "volume": 250, "shuffle": true }"#).unwrap();

        let config = ConfigStore::new(&path).read().unwrap();
        assert_eq!(config.volume, 100);
        assert!(config.shuffle);
        assert_eq!(config.performance_mode, PerformanceMode::PowerSaving);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn lower_latency_polls_more_often() {
        let low = PerformanceMode::LowLatency.poll_interval();
        let none = PerformanceMode::None.poll_interval();
        let saving = PerformanceMode::PowerSaving.poll_interval();
        assert!(low < none && none < saving);
    }

    #[test]
    fn garbage_is_a_json_error() {
        let path = scratch("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "volume=11").unwrap();

        let err = ConfigStore::new(&path).read().unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
