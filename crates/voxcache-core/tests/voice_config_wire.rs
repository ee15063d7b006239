//! Wire-shape tests for `VoiceConfig`.
//!
//! Cache keys hash the canonical JSON of the voice config, so its shape is a
//! compatibility surface: entries written by one build must stay reachable
//! from the next.

use voxcache_core::{AudioEncoding, BackendKind, VoiceConfig};

#[test]
fn test_canonical_json_shape() {
    let config = VoiceConfig::new(BackendKind::Azure, 16_000)
        .with_voice_name("en-US-AriaNeural")
        .with_encoding(AudioEncoding::Mulaw);

    assert_eq!(
        config.canonical_json(),
        r#"{"type":"synthesizer_azure","voice_name":"en-US-AriaNeural","voice_id":null,"audio_encoding":"mulaw","sampling_rate":16000,"should_encode_as_wav":false,"options":{}}"#
    );
}

#[test]
fn test_minimal_json_fills_defaults() {
    let config: VoiceConfig = serde_json::from_str(
        r#"{"type":"synthesizer_eleven_labs","voice_id":"rachel","audio_encoding":"linear16","sampling_rate":24000}"#,
    )
    .unwrap();

    assert_eq!(config.backend, BackendKind::ElevenLabs);
    assert_eq!(config.voice_identity(), "rachel");
    assert!(!config.should_encode_as_wav);
    assert!(config.options.is_empty());
}
