//! Sine-tone reference backend.
//!
//! Produces deterministic LINEAR16 audio whose duration is proportional to
//! the text length, without any network or model. Useful for exercising the
//! cache end to end and as a stand-in during development.

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use futures_util::stream;
use voxcache_core::ports::cutoff_by_output_length;
use voxcache_core::{
    AudioEncoding, BackendKind, ChunkRecord, FillerAudio, FillerAudioConfig, SynthesisError,
    SynthesisRequest, SynthesisResult, Synthesizer, VoiceConfig,
};

use crate::replay::{ChunkTransform, replay};
use crate::wav::{decode_wav, encode_as_wav};

/// Speech duration per character of text.
const DEFAULT_MS_PER_CHAR: u32 = 60;

/// Peak amplitude, a third of full scale.
const AMPLITUDE: f64 = 10_922.0;

const BASE_FREQUENCY_HZ: f64 = 220.0;

const FILLER_PHRASES: &[&str] = &["Um...", "Uh...", "Let me see.", "One moment."];

/// Typing noise is a short high beep.
const TYPING_NOISE_MS: u32 = 200;
const TYPING_NOISE_HZ: f64 = 1_760.0;

// ── Rendering ──────────────────────────────────────────────────────

/// Incremental sine renderer; one call to [`next_chunk`](Self::next_chunk)
/// per pulled record.
struct ToneRender {
    frequency_hz: f64,
    sampling_rate: u32,
    next_sample: usize,
    total_samples: usize,
    chunk_samples: usize,
    wav: bool,
}

impl ToneRender {
    fn next_chunk(&mut self) -> Option<ChunkRecord> {
        if self.next_sample >= self.total_samples {
            return None;
        }
        let end = (self.next_sample + self.chunk_samples).min(self.total_samples);
        let pcm = self.render(self.next_sample..end);
        self.next_sample = end;

        let payload = if self.wav {
            encode_as_wav(&pcm, self.sampling_rate)
        } else {
            pcm
        };
        Some(ChunkRecord::new(payload, end == self.total_samples))
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn render(&self, samples: std::ops::Range<usize>) -> Bytes {
        let mut pcm = BytesMut::with_capacity(samples.len() * 2);
        let rate = f64::from(self.sampling_rate);
        for n in samples {
            let t = n as f64 / rate;
            pcm.put_i16_le((AMPLITUDE * (TAU * self.frequency_hz * t).sin()) as i16);
        }
        pcm.freeze()
    }

    fn render_all(&self) -> Bytes {
        self.render(0..self.total_samples)
    }
}

fn sample_count(chars: usize, ms_per_char: u32, sampling_rate: u32) -> usize {
    let samples = chars as u64 * u64::from(ms_per_char) * u64::from(sampling_rate) / 1_000;
    usize::try_from(samples).unwrap_or(usize::MAX)
}

/// Pitch derived from the voice name, so switching voices is audible.
fn frequency_for(config: &VoiceConfig) -> f64 {
    let offset = config
        .voice_name
        .as_deref()
        .unwrap_or_default()
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)))
        % 220;
    BASE_FREQUENCY_HZ + f64::from(offset)
}

// ── Synthesizer ────────────────────────────────────────────────────

/// Deterministic sine-tone [`Synthesizer`].
///
/// Only LINEAR16 output is supported. The voice can be switched at runtime
/// with [`set_voice`](Self::set_voice); each voice renders at its own pitch.
#[derive(Debug)]
pub struct ToneSynthesizer {
    config: RwLock<VoiceConfig>,
    ms_per_char: u32,
    speech_calls: AtomicUsize,
    fillers: Mutex<Vec<FillerAudio>>,
    typing_noise: Mutex<Option<FillerAudio>>,
}

impl ToneSynthesizer {
    pub fn new(config: VoiceConfig) -> Self {
        Self {
            config: RwLock::new(config),
            ms_per_char: DEFAULT_MS_PER_CHAR,
            speech_calls: AtomicUsize::new(0),
            fillers: Mutex::new(Vec::new()),
            typing_noise: Mutex::new(None),
        }
    }

    /// Tone backend at `sampling_rate`, unframed LINEAR16.
    pub fn with_rate(sampling_rate: u32) -> Self {
        Self::new(VoiceConfig::new(BackendKind::Tone, sampling_rate))
    }

    #[must_use]
    pub fn with_ms_per_char(mut self, ms_per_char: u32) -> Self {
        self.ms_per_char = ms_per_char.max(1);
        self
    }

    /// Switch the active voice. Requests started afterwards use it.
    pub fn set_voice(&self, voice_name: impl Into<String>) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.voice_name = Some(voice_name.into());
    }

    /// Number of `create_speech` calls served.
    pub fn speech_calls(&self) -> usize {
        self.speech_calls.load(Ordering::Relaxed)
    }

    fn renderer(&self, config: &VoiceConfig, text: &str, chunk_size: usize) -> ToneRender {
        let total_samples =
            sample_count(text.chars().count(), self.ms_per_char, config.sampling_rate);
        ToneRender {
            frequency_hz: frequency_for(config),
            sampling_rate: config.sampling_rate,
            next_sample: 0,
            total_samples,
            chunk_samples: if chunk_size == 0 {
                total_samples.max(1)
            } else {
                (chunk_size / 2).max(1)
            },
            wav: config.should_encode_as_wav,
        }
    }

    fn linear16_config(&self) -> Result<VoiceConfig, SynthesisError> {
        let config = self.synthesizer_config();
        if config.audio_encoding == AudioEncoding::Linear16 {
            Ok(config)
        } else {
            Err(SynthesisError::Unsupported(format!(
                "tone backend renders linear16 only, not {}",
                config.audio_encoding
            )))
        }
    }

    fn phrase_fillers(&self, config: &VoiceConfig) -> Vec<FillerAudio> {
        FILLER_PHRASES
            .iter()
            .map(|phrase| FillerAudio {
                text: (*phrase).to_string(),
                audio: self.renderer(config, phrase, 0).render_all(),
                is_interruptible: false,
                seconds_per_chunk: 1,
            })
            .collect()
    }
}

#[async_trait]
impl Synthesizer for ToneSynthesizer {
    fn synthesizer_config(&self) -> VoiceConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn create_speech(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, SynthesisError> {
        let config = self.linear16_config()?;
        self.speech_calls.fetch_add(1, Ordering::Relaxed);

        let render = self.renderer(&config, &request.text, request.chunk_size);
        tracing::debug!(
            samples = render.total_samples,
            frequency_hz = render.frequency_hz,
            "Rendering tone"
        );

        let total_bytes = render.total_samples * 2;
        let bytes_per_second = config.bytes_per_second();
        let text = request.text.clone();

        let chunks = stream::unfold(render, |mut render| async move {
            render
                .next_chunk()
                .map(|record| (Ok::<_, SynthesisError>(record), render))
        });

        Ok(SynthesisResult::new(
            Box::pin(chunks),
            Arc::new(move |seconds| {
                cutoff_by_output_length(&text, seconds, total_bytes, bytes_per_second)
            }),
        ))
    }

    fn create_synthesis_result_from_wav(
        &self,
        wav: Bytes,
        text: &str,
        chunk_size: usize,
    ) -> Result<SynthesisResult, SynthesisError> {
        let config = self.synthesizer_config();
        let decoded = decode_wav(&wav)?;
        if decoded.channels != 1 || decoded.sampling_rate != config.sampling_rate {
            return Err(SynthesisError::Unsupported(format!(
                "{} Hz {}-channel WAV, backend expects {} Hz mono",
                decoded.sampling_rate, decoded.channels, config.sampling_rate
            )));
        }

        let total_bytes = decoded.pcm.len();
        let bytes_per_second = config.bytes_per_second();
        let text = text.to_string();
        let chunks = replay(decoded.pcm, chunk_size, ChunkTransform::for_config(&config));

        Ok(SynthesisResult::new(
            chunks.into_stream(),
            Arc::new(move |seconds| {
                cutoff_by_output_length(&text, seconds, total_bytes, bytes_per_second)
            }),
        ))
    }

    fn filler_audios(&self) -> Vec<FillerAudio> {
        self.fillers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn set_filler_audios(&self, config: &FillerAudioConfig) -> Result<(), SynthesisError> {
        let voice = self.linear16_config()?;

        let fillers = if config.use_phrases {
            self.phrase_fillers(&voice)
        } else {
            Vec::new()
        };
        let typing_noise = config.use_typing_noise.then(|| typing_noise(&voice));

        tracing::debug!(
            phrases = fillers.len(),
            typing_noise = typing_noise.is_some(),
            "Prepared filler audio"
        );
        *self.fillers.lock().unwrap_or_else(PoisonError::into_inner) = fillers;
        *self.typing_noise.lock().unwrap_or_else(PoisonError::into_inner) = typing_noise;
        Ok(())
    }

    async fn phrase_filler_audios(&self) -> Result<Vec<FillerAudio>, SynthesisError> {
        let voice = self.linear16_config()?;
        Ok(self.phrase_fillers(&voice))
    }

    fn typing_noise_filler_audio(&self) -> Option<FillerAudio> {
        self.typing_noise
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn typing_noise(config: &VoiceConfig) -> FillerAudio {
    let total_samples = sample_count(1, TYPING_NOISE_MS, config.sampling_rate);
    let render = ToneRender {
        frequency_hz: TYPING_NOISE_HZ,
        sampling_rate: config.sampling_rate,
        next_sample: 0,
        total_samples,
        chunk_samples: total_samples.max(1),
        wav: false,
    };
    FillerAudio {
        text: String::new(),
        audio: render.render_all(),
        is_interruptible: true,
        seconds_per_chunk: 1,
    }
}
