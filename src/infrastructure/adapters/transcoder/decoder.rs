//! WAV 解码 - 基于 symphonia
//!
//! 推理运行时返回的 WAV 与后端产出的合成片段都经由这里解码为 f32 样本

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("No audio track found")]
    NoTrack,

    #[error("Unknown {0}")]
    MissingParameter(&'static str),

    #[error("Decoder creation failed: {0}")]
    Decoder(String),

    #[error("Packet read error: {0}")]
    Packet(String),
}

/// 解码后的交错 f32 样本
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    /// 下混为单声道
    pub fn into_mono(self) -> Vec<f32> {
        let channels = self.channels.max(1) as usize;
        if channels == 1 {
            return self.samples;
        }
        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / (self.sample_rate as u64 * self.channels as u64)
    }
}

/// 解码 WAV 字节
pub fn decode_wav(data: &[u8]) -> Result<DecodedAudio, DecodeError> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::Probe(e.to_string()))?;

    let mut format = probed.format;
    let track = format.default_track().ok_or(DecodeError::NoTrack)?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::MissingParameter("sample rate"))?;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .ok_or(DecodeError::MissingParameter("channel count"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Decoder(e.to_string()))?;

    let track_id = track.id;
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(DecodeError::Packet(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Decode error (skipping packet): {}", e);
                continue;
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let actual_samples = num_frames * spec.channels.count();
        samples.extend(&sample_buf.samples()[..actual_samples]);
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::wav;

    #[test]
    fn test_decode_pcm16_wav() {
        let wav = wav::encode_pcm16(&wav::f32_to_pcm16(&[0.5; 1600]), 16000, 1);
        let decoded = decode_wav(&wav).unwrap();

        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.duration_ms(), 100);
        let mono = decoded.into_mono();
        assert_eq!(mono.len(), 1600);
        assert!((mono[0] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_wav(b"definitely not audio").is_err());
    }
}
