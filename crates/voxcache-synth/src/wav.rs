//! WAV framing for PCM16 mono audio.

use std::io::Cursor;

use bytes::{BufMut, Bytes, BytesMut};
use voxcache_core::SynthesisError;

/// Size of the canonical RIFF/WAVE header written by [`encode_as_wav`].
pub const WAV_HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Frame raw PCM16 mono samples as a standalone WAV file.
pub fn encode_as_wav(pcm: &[u8], sampling_rate: u32) -> Bytes {
    let mut out = BytesMut::with_capacity(WAV_HEADER_LEN + pcm.len());
    put_header(&mut out, pcm.len(), sampling_rate);
    out.extend_from_slice(pcm);
    out.freeze()
}

fn put_header(out: &mut BytesMut, data_len: usize, sampling_rate: u32) {
    let data_len = u32::try_from(data_len).unwrap_or(u32::MAX);
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = sampling_rate.saturating_mul(u32::from(block_align));

    out.put_slice(b"RIFF");
    out.put_u32_le(data_len.saturating_add(36));
    out.put_slice(b"WAVE");

    out.put_slice(b"fmt ");
    out.put_u32_le(16);
    out.put_u16_le(1); // PCM
    out.put_u16_le(CHANNELS);
    out.put_u32_le(sampling_rate);
    out.put_u32_le(byte_rate);
    out.put_u16_le(block_align);
    out.put_u16_le(BITS_PER_SAMPLE);

    out.put_slice(b"data");
    out.put_u32_le(data_len);
}

/// A decoded WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedWav {
    /// Little-endian PCM16 samples, channels interleaved.
    pub pcm: Bytes,
    pub sampling_rate: u32,
    pub channels: u16,
}

/// Decode a 16-bit integer PCM WAV file.
pub fn decode_wav(wav: &[u8]) -> Result<DecodedWav, SynthesisError> {
    let mut reader = hound::WavReader::new(Cursor::new(wav))
        .map_err(|e| SynthesisError::InvalidAudio(e.to_string()))?;

    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(SynthesisError::Unsupported(format!(
            "{}-bit {:?} WAV, expected 16-bit PCM",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let mut pcm = BytesMut::with_capacity(reader.len() as usize * 2);
    for sample in reader.samples::<i16>() {
        let sample = sample.map_err(|e| SynthesisError::InvalidAudio(e.to_string()))?;
        pcm.put_i16_le(sample);
    }

    Ok(DecodedWav {
        pcm: pcm.freeze(),
        sampling_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let wav = encode_as_wav(&[0u8; 8], 16_000);
        assert_eq!(wav.len(), WAV_HEADER_LEN + 8);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 44);
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 16_000);
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), 32_000);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 8);
    }

    #[test]
    fn test_byte_rate_saturates_at_extreme_rates() {
        let wav = encode_as_wav(&[0u8; 2], u32::MAX);
        assert_eq!(wav.len(), WAV_HEADER_LEN + 2);
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), u32::MAX);
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), u32::MAX);
    }

    #[test]
    fn test_decode_reads_back_encoded_samples() {
        let pcm: Vec<u8> = [1i16, -2, 300, i16::MIN]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let decoded = decode_wav(&encode_as_wav(&pcm, 8_000)).unwrap();

        assert_eq!(decoded.pcm, Bytes::from(pcm));
        assert_eq!(decoded.sampling_rate, 8_000);
        assert_eq!(decoded.channels, 1);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_wav(b"definitely not a wav file").unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidAudio(_)));
    }
}
