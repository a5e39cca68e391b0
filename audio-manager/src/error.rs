use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open `{path}`: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to decode `{path}`: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("failed to write `{path}`: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("audio output unavailable: {0}")]
    Device(String),

    #[error("failed to scan `{path}`: {source}")]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl AudioError {
    /// Stable code logged when the playback thread gives up.
    pub fn status_code(&self) -> i32 {
        match self {
            AudioError::Open { .. } => 1,
            AudioError::Decode { .. } => 2,
            AudioError::Write { .. } => 3,
            AudioError::Device(_) => 4,
            AudioError::Scan { .. } => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn walk_error() -> walkdir::Error {
        let missing = std::env::temp_dir().join("audio-manager-no-such-dir");
        walkdir::WalkDir::new(missing)
            .into_iter()
            .find_map(Result::err)
            .unwrap()
    }

    #[test]
    fn status_codes_are_distinct() {
        let errors = [
            AudioError::Open {
                path: "a".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
            AudioError::Decode {
                path: "a".into(),
                reason: "bad frame".into(),
            },
            AudioError::Write {
                path: "a".into(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
            AudioError::Device("no device".into()),
            AudioError::Scan {
                path: "a".into(),
                source: walk_error(),
            },
        ];
        let codes: HashSet<i32> = errors.iter().map(AudioError::status_code).collect();
        assert_eq!(codes.len(), errors.len());
        assert_eq!(codes, (1..=5).collect::<HashSet<i32>>());
    }

    #[test]
    fn messages_name_the_file() {
        let err = AudioError::Decode {
            path: "/music/song.m4a".into(),
            reason: "unsupported codec".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to decode `/music/song.m4a`: unsupported codec"
        );
    }
}
