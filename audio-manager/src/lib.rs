//! Audio side of the player: finding tracks, converting them to a playable
//! cache file and pushing that file to the output device.
//!
//! Nothing in here knows about the UI. The device reports back and takes
//! orders only through [`PlaybackControl`].

pub mod catalog;
pub mod device;
pub mod error;
pub mod transcode;

pub use catalog::{Track, TrackCatalog};
pub use device::{AudioDevice, PlayOutcome, PlaybackControl, RodioDevice};
pub use error::AudioError;
pub use transcode::{Transcoder, WavCache};
