use std::env;
use std::path::PathBuf;

use clap::Parser;

pub const CONFIG_FILE: &str = "ncap.json";
pub const AUDIO_CACHE_FILE: &str = "audio-cache.wav";
pub const LOG_DIR: &str = "logs";

fn default_data_dir() -> PathBuf {
    env::temp_dir().join("ncap")
}

/// Minimal touch audio player.
#[derive(Debug, Parser, Clone)]
#[command(about, version)]
pub struct Cli {
    /// Directory scanned for tracks
    #[arg(long, default_value = ".")]
    pub music_dir: PathBuf,

    /// Play this file instead of the saved position in the track list
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Where the config, the converted audio cache and logs are kept
    #[arg(long, default_value_os_t = default_data_dir())]
    pub data_dir: PathBuf,

    /// Log filter, in `RUST_LOG` syntax
    #[arg(long, default_value = "info")]
    pub log_filter: String,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(AUDIO_CACHE_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR)
    }
}
