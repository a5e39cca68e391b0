//! Converts a source track into an uncompressed 16-bit WAV cache file that
//! the device can stream without decoding on the fly.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use minimp3::{Decoder as MiniDecoder, Error as MiniError, Frame as MiniFrame};
use rodio::{Decoder, Source};
use tracing::{debug, info};

use crate::error::AudioError;

pub trait Transcoder {
    /// Converts `source` and returns the path of the playable output.
    fn convert(&self, source: &Path) -> Result<PathBuf, AudioError>;
}

/// Decodes into a single reusable WAV file.
#[derive(Debug, Clone)]
pub struct WavCache {
    output: PathBuf,
}

impl WavCache {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        WavCache {
            output: output.into(),
        }
    }
}

impl Transcoder for WavCache {
    fn convert(&self, source: &Path) -> Result<PathBuf, AudioError> {
        info!(
            source = %source.display(),
            output = %self.output.display(),
            "converting to WAV"
        );

        let pcm = if is_mp3(source) {
            decode_mp3(source)?
        } else {
            decode_any(source)?
        };
        debug!(
            channels = pcm.channels,
            sample_rate = pcm.sample_rate,
            samples = pcm.samples.len(),
            "decoded"
        );

        let file = File::create(&self.output).map_err(|source| AudioError::Write {
            path: self.output.clone(),
            source,
        })?;
        write_wav(BufWriter::new(file), &pcm).map_err(|source| AudioError::Write {
            path: self.output.clone(),
            source,
        })?;

        Ok(self.output.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pcm {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

fn open(path: &Path) -> Result<File, AudioError> {
    File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_mp3(path: &Path) -> Result<Pcm, AudioError> {
    let mut decoder = MiniDecoder::new(open(path)?);
    let mut pcm = Pcm {
        channels: 0,
        sample_rate: 0,
        samples: Vec::new(),
    };

    loop {
        match decoder.next_frame() {
            Ok(MiniFrame {
                data,
                sample_rate,
                channels,
                ..
            }) => {
                if pcm.channels == 0 {
                    pcm.channels = channels as u16;
                    pcm.sample_rate = sample_rate as u32;
                }
                pcm.samples.extend_from_slice(&data);
            }
            Err(MiniError::Eof) => break,
            Err(MiniError::SkippedData) => continue,
            Err(err) => {
                return Err(AudioError::Decode {
                    path: path.to_path_buf(),
                    reason: format!("{err:?}"),
                })
            }
        }
    }

    if pcm.channels == 0 {
        return Err(AudioError::Decode {
            path: path.to_path_buf(),
            reason: "no audio frames".to_string(),
        });
    }
    Ok(pcm)
}

fn decode_any(path: &Path) -> Result<Pcm, AudioError> {
    let decoder =
        Decoder::new(BufReader::new(open(path)?)).map_err(|err| AudioError::Decode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<i16> = decoder.collect();

    Ok(Pcm {
        channels,
        sample_rate,
        samples,
    })
}

/// Writes a canonical 44-byte-header PCM WAV.
pub fn write_wav<W: Write>(mut out: W, pcm: &Pcm) -> std::io::Result<()> {
    const BITS_PER_SAMPLE: u16 = 16;
    let block_align = pcm.channels * (BITS_PER_SAMPLE / 8);
    let byte_rate = pcm.sample_rate * u32::from(block_align);
    let data_len = (pcm.samples.len() * 2) as u32;

    out.write_all(b"RIFF")?;
    out.write_all(&(36 + data_len).to_le_bytes())?;
    out.write_all(b"WAVE")?;

    out.write_all(b"fmt ")?;
    out.write_all(&16u32.to_le_bytes())?;
    out.write_all(&1u16.to_le_bytes())?; // PCM
    out.write_all(&pcm.channels.to_le_bytes())?;
    out.write_all(&pcm.sample_rate.to_le_bytes())?;
    out.write_all(&byte_rate.to_le_bytes())?;
    out.write_all(&block_align.to_le_bytes())?;
    out.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

    out.write_all(b"data")?;
    out.write_all(&data_len.to_le_bytes())?;
    for sample in &pcm.samples {
        out.write_all(&sample.to_le_bytes())?;
    }
    out.flush()
}
