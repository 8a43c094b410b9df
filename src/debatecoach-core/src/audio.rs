//! Audio helpers for narration: text chunking, speed adjustment, WAV
//! packaging and clip file names.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Split text into chunks that are safe for TTS synthesis.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current_chunk = String::new();

    // Split by sentence-ending punctuation
    for sentence in text.split_inclusive(&['.', '!', '?', ';'][..]) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        if current_chunk.len() + sentence.len() > max_chars {
            if !current_chunk.is_empty() {
                chunks.push(current_chunk.trim().to_string());
                current_chunk = String::new();
            }

            // If single sentence is too long, split by commas
            if sentence.len() > max_chars {
                for part in sentence.split_inclusive(',') {
                    if current_chunk.len() + part.len() > max_chars && !current_chunk.is_empty() {
                        chunks.push(current_chunk.trim().to_string());
                        current_chunk = String::new();
                    }
                    current_chunk.push_str(part);
                    current_chunk.push(' ');
                }
                continue;
            }
        }

        current_chunk.push_str(sentence);
        current_chunk.push(' ');
    }

    if !current_chunk.trim().is_empty() {
        chunks.push(current_chunk.trim().to_string());
    }

    chunks
}

/// Adjust audio playback speed using linear interpolation.
/// Rate < 1.0 = slower (e.g., 0.75 = 75% speed), Rate > 1.0 = faster.
pub fn adjust_audio_speed(samples: Vec<f32>, rate: f32) -> Vec<f32> {
    if (rate - 1.0).abs() < 0.001 || rate <= 0.0 {
        return samples;
    }

    let new_len = (samples.len() as f32 / rate) as usize;
    let mut result = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_pos = i as f32 * rate;
        let src_idx = src_pos as usize;
        let frac = src_pos - src_idx as f32;

        if src_idx + 1 < samples.len() {
            result.push(samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac);
        } else if src_idx < samples.len() {
            result.push(samples[src_idx]);
        }
    }

    result
}

/// Package mono float samples as a 16-bit PCM WAV buffer.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(scaled)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// File name for the `seq`-th narration clip of a debate.
pub fn narration_filename(topic: &str, seq: usize) -> String {
    let sanitized: String = topic
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(50)
        .collect();

    format!("DebateCoach - {} - {:02}.wav", sanitized.trim(), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narration_filename() {
        assert_eq!(
            narration_filename("Should AI be open source?", 2),
            "DebateCoach - Should AI be open source_ - 02.wav"
        );
    }

    #[test]
    fn test_narration_filename_long_and_multibyte() {
        let long_topic = "é".repeat(100);
        let filename = narration_filename(&long_topic, 1);
        assert_eq!(filename.chars().filter(|c| *c == 'é').count(), 50);
    }

    #[test]
    fn test_split_into_chunks() {
        let text = "Hello world. This is a test. Another sentence here.";
        let chunks = split_into_chunks(text, 30);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 35);
        }
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_split_long_sentence_on_commas() {
        let text = "First clause here, second clause here, third clause here.";
        let chunks = split_into_chunks(text, 25);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_adjust_audio_speed() {
        let samples = vec![0.0, 1.0, 0.0, 1.0];
        assert_eq!(adjust_audio_speed(samples.clone(), 1.0), samples);
        assert_eq!(adjust_audio_speed(samples.clone(), 2.0).len(), 2);
        assert_eq!(adjust_audio_speed(samples.clone(), 0.5).len(), 8);
    }

    #[test]
    fn test_encode_wav_header() {
        let bytes = encode_wav(&[0.0, 0.5, -0.5, 2.0], 24_000).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[3], i16::MAX);
    }
}
