//! Track discovery: one flat directory of audio files, named by their tag
//! title when the file carries one.

use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::error::AudioError;

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "wav", "flac", "ogg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
}

impl TrackCatalog {
    /// A one-track catalog for a file given directly.
    pub fn single(path: &Path) -> Self {
        let title = read_title(path);
        TrackCatalog {
            tracks: vec![Track {
                path: path.to_path_buf(),
                title,
            }],
        }
    }

    /// Lists the audio files directly inside `dir`, sorted by file name.
    pub fn scan(dir: &Path) -> Result<Self, AudioError> {
        let mut tracks = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(AudioError::Scan {
                        path: dir.to_path_buf(),
                        source: err,
                    })
                }
                Err(err) => {
                    warn!(%err, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                trace!(path = %entry.path().display(), "skipping: not a regular file");
                continue;
            }
            if !has_audio_extension(entry.path()) {
                trace!(path = %entry.path().display(), "skipping: not an audio file");
                continue;
            }

            let path = entry.into_path();
            let title = read_title(&path);
            debug!(path = %path.display(), %title, "found track");
            tracks.push(Track { path, title });
        }

        Ok(TrackCatalog { tracks })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Display strings in catalog order.
    pub fn titles(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.title.clone()).collect()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.tracks.iter().map(|t| t.path.clone()).collect()
    }
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Tag title if present, otherwise the file stem.
fn read_title(path: &Path) -> String {
    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => Some(tagged),
        Err(err) => {
            trace!(path = %path.display(), %err, "no readable tags");
            None
        }
    };

    tagged
        .as_ref()
        .and_then(|file| file.primary_tag().or_else(|| file.first_tag()))
        .and_then(|tag| tag.title().map(|title| title.trim().to_string()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| file_stem(path))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
