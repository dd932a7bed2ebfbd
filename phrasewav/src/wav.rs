//! WAV output.
//!
//! Raw little-endian PCM from the speech service is wrapped in a RIFF/WAVE
//! container described by [`PcmSpec::MONO_16BIT_24K`]. `hound` patches the
//! header sizes on finalize, and also on drop if a write fails halfway.

use std::io::{Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::warn;

use crate::audio::PcmSpec;
use crate::error::Result;

impl From<PcmSpec> for WavSpec {
    fn from(spec: PcmSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }
}

/// The payload truncated to whole frames.
fn whole_frames(pcm: &[u8]) -> &[u8] {
    let frame = PcmSpec::MONO_16BIT_24K.frame_width();
    let dangling = pcm.len() % frame;
    if dangling != 0 {
        warn!(
            bytes = pcm.len(),
            dropped = dangling,
            "payload ends in a partial frame; dropping trailing bytes"
        );
    }
    &pcm[..pcm.len() - dangling]
}

/// Write `pcm` as a mono 16-bit 24 kHz WAV file at `path`.
///
/// An existing file at `path` is truncated. A trailing partial frame is
/// dropped with a warning.
///
/// # Errors
///
/// Returns [`Error::Wav`](crate::Error::Wav) for filesystem or container
/// errors.
pub fn write_wav(path: impl AsRef<Path>, pcm: &[u8]) -> Result<()> {
    let writer = WavWriter::create(path, PcmSpec::MONO_16BIT_24K.into())?;
    write_frames(writer, whole_frames(pcm))
}

/// Write a WAV container into any seekable sink.
///
/// # Errors
///
/// See [`write_wav`].
pub fn write_wav_to<W: Write + Seek>(sink: W, pcm: &[u8]) -> Result<()> {
    let writer = WavWriter::new(sink, PcmSpec::MONO_16BIT_24K.into())?;
    write_frames(writer, whole_frames(pcm))
}

fn write_frames<W: Write + Seek>(mut writer: WavWriter<W>, pcm: &[u8]) -> Result<()> {
    for sample in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use hound::WavReader;
    use std::io::Cursor;

    fn pcm(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn header_declares_mono_16bit_24k() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("out.wav");
        write_wav(path.path(), &pcm(&[0, 1, -1, i16::MAX, i16::MIN])).unwrap();

        let reader = WavReader::open(path.path()).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.sample_format, SampleFormat::Int);
    }

    #[test]
    fn frame_data_matches_payload() {
        let samples = [0_i16, 1000, -1000, 32767, -32768, 42];
        let payload = pcm(&samples);
        let dir = TempDir::new().unwrap();
        let path = dir.child("out.wav");
        write_wav(path.path(), &payload).unwrap();

        let mut reader = WavReader::open(path.path()).unwrap();
        assert_eq!(reader.len() as usize * 2, payload.len());
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, samples);
    }

    #[test]
    fn file_size_is_header_plus_payload() {
        let payload = pcm(&[7; 100]);
        let dir = TempDir::new().unwrap();
        let path = dir.child("out.wav");
        write_wav(path.path(), &payload).unwrap();

        let size = std::fs::metadata(path.path()).unwrap().len();
        assert_eq!(size, 44 + payload.len() as u64);
    }

    #[test]
    fn empty_payload_is_valid() {
        let dir = TempDir::new().unwrap();
        let path = dir.child(".wav");
        write_wav(path.path(), &[]).unwrap();

        let reader = WavReader::open(path.path()).unwrap();
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("hello.wav");
        write_wav(path.path(), &pcm(&[1; 500])).unwrap();
        write_wav(path.path(), &pcm(&[2; 3])).unwrap();

        let mut reader = WavReader::open(path.path()).unwrap();
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, vec![2, 2, 2]);
    }

    #[test]
    fn trailing_partial_frame_is_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("odd.wav");
        let mut payload = pcm(&[300, -300]);
        payload.push(0x7f);
        write_wav(path.path(), &payload).unwrap();

        let mut reader = WavReader::open(path.path()).unwrap();
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, vec![300, -300]);
        let size = std::fs::metadata(path.path()).unwrap().len();
        assert_eq!(size, 44 + 4);
    }

    #[test]
    fn single_byte_payload_gives_empty_file() {
        let mut buf = Cursor::new(Vec::new());
        write_wav_to(&mut buf, &[9]).unwrap();
        assert_eq!(buf.into_inner().len(), 44);
    }

    #[test]
    fn missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = write_wav(dir.path().join("no/such/dir/x.wav"), &pcm(&[1])).unwrap_err();
        assert!(matches!(err, crate::Error::Wav(_)));
    }

    #[test]
    fn writes_into_memory() {
        let mut buf = Cursor::new(Vec::new());
        write_wav_to(&mut buf, &pcm(&[5, 6])).unwrap();

        let bytes = buf.into_inner();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(bytes.len(), 48);
    }
}
