//! Audio Transcoder - 长文本输出编码
//!
//! 支持：
//! - WAV 输出（裸 PCM 补头，WAV 原样返回）
//! - Opus (OGG 容器) 编码，单声道
//! - 片段解码（WAV 与裸 PCM 都经由 symphonia）

use async_trait::async_trait;
use ogg::writing::PacketWriter;
use opus::{Application, Channels, Encoder};

use super::decoder::decode_wav;
use crate::application::ports::{
    AudioDecoderPort, AudioFormat, AudioTranscoderPort, MonoAudio, TranscodeConfig, TranscodeError,
    TranscodeResult,
};
use crate::domain::audio::{resample_linear, AudioSegment, SegmentFormat};

const DEFAULT_OPUS_BITRATE: u32 = 32000;
const OPUS_MAX_PACKET: usize = 4000;
const OPUS_VENDOR: &str = "voxgate";

/// 音频转码器
#[derive(Debug, Clone, Default)]
pub struct AudioTranscoder;

impl AudioTranscoder {
    pub fn new() -> Self {
        Self
    }

    /// 单声道 f32 样本编码为 Opus (OGG 容器)
    fn encode_opus(&self, samples: &[f32], sample_rate: u32, bitrate: u32) -> Result<(Vec<u8>, u32), TranscodeError> {
        let target_rate = opus_compatible_sample_rate(sample_rate);
        let resampled;
        let samples = if target_rate != sample_rate {
            resampled = resample_linear(samples, sample_rate, target_rate);
            &resampled[..]
        } else {
            samples
        };

        let mut encoder = Encoder::new(target_rate, Channels::Mono, Application::Voip)
            .map_err(|e| TranscodeError::EncodingError(format!("Failed to create Opus encoder: {}", e)))?;
        encoder
            .set_bitrate(opus::Bitrate::Bits(bitrate as i32))
            .map_err(|e| TranscodeError::EncodingError(format!("Failed to set bitrate: {}", e)))?;

        // 编码器延迟作为 pre-skip
        let pre_skip = encoder.get_lookahead().map(|l| l as u16).unwrap_or(312);

        let pcm: Vec<i16> = samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
            .collect();

        // 20ms 帧
        let frame_size = (target_rate as usize * 20) / 1000;

        let mut ogg_data = Vec::new();
        {
            let mut writer = PacketWriter::new(&mut ogg_data);

            writer
                .write_packet(opus_head(1, target_rate, pre_skip), 0, ogg::PacketWriteEndInfo::EndPage, 0)
                .map_err(|e| TranscodeError::EncodingError(format!("Failed to write Opus head: {}", e)))?;
            writer
                .write_packet(opus_tags(), 0, ogg::PacketWriteEndInfo::EndPage, 0)
                .map_err(|e| TranscodeError::EncodingError(format!("Failed to write Opus tags: {}", e)))?;

            let mut output = vec![0u8; OPUS_MAX_PACKET];

            // granule position 以 48kHz 计
            let granule_scale = 48000.0 / target_rate as f64;
            let frame_granule = (frame_size as f64 * granule_scale) as u64;
            let mut granule_pos = (pre_skip as f64 * granule_scale) as u64;

            // 额外的静音帧把编码器缓冲区中的样本冲出来，至少一帧用于结束流
            let flush_frames = ((pre_skip as usize + frame_size - 1) / frame_size).max(1);

            for chunk in pcm.chunks(frame_size) {
                let mut frame = chunk.to_vec();
                frame.resize(frame_size, 0);

                let len = encoder
                    .encode(&frame, &mut output)
                    .map_err(|e| TranscodeError::EncodingError(format!("Opus encode failed: {}", e)))?;
                granule_pos += frame_granule;

                writer
                    .write_packet(output[..len].to_vec(), 0, ogg::PacketWriteEndInfo::NormalPacket, granule_pos)
                    .map_err(|e| TranscodeError::EncodingError(format!("Failed to write Opus packet: {}", e)))?;
            }

            let silence = vec![0i16; frame_size];
            for index in 0..flush_frames {
                let len = encoder
                    .encode(&silence, &mut output)
                    .map_err(|e| TranscodeError::EncodingError(format!("Opus flush encode failed: {}", e)))?;
                granule_pos += frame_granule;

                let end_info = if index + 1 == flush_frames {
                    ogg::PacketWriteEndInfo::EndStream
                } else {
                    ogg::PacketWriteEndInfo::NormalPacket
                };
                writer
                    .write_packet(output[..len].to_vec(), 0, end_info, granule_pos)
                    .map_err(|e| TranscodeError::EncodingError(format!("Failed to write Opus flush packet: {}", e)))?;
            }
        }

        Ok((ogg_data, target_rate))
    }
}

/// Opus 支持的采样率: 8000, 12000, 16000, 24000, 48000
fn opus_compatible_sample_rate(sample_rate: u32) -> u32 {
    match sample_rate {
        8000 | 12000 | 16000 | 24000 | 48000 => sample_rate,
        r if r <= 8000 => 8000,
        r if r <= 12000 => 12000,
        r if r <= 16000 => 16000,
        r if r <= 24000 => 24000,
        _ => 48000,
    }
}

/// Opus Head 包 (RFC 7845)
fn opus_head(channels: u8, sample_rate: u32, pre_skip: u16) -> Vec<u8> {
    let mut head = Vec::with_capacity(19);
    head.extend_from_slice(b"OpusHead");
    head.push(1);
    head.push(channels);
    head.extend_from_slice(&pre_skip.to_le_bytes());
    head.extend_from_slice(&sample_rate.to_le_bytes());
    head.extend_from_slice(&0i16.to_le_bytes());
    head.push(0);
    head
}

/// Opus Tags 包
fn opus_tags() -> Vec<u8> {
    let mut tags = Vec::new();
    tags.extend_from_slice(b"OpusTags");
    tags.extend_from_slice(&(OPUS_VENDOR.len() as u32).to_le_bytes());
    tags.extend_from_slice(OPUS_VENDOR.as_bytes());
    tags.extend_from_slice(&0u32.to_le_bytes());
    tags
}

#[async_trait]
impl AudioTranscoderPort for AudioTranscoder {
    async fn transcode(
        &self,
        segment: AudioSegment,
        config: &TranscodeConfig,
    ) -> Result<TranscodeResult, TranscodeError> {
        let duration_ms = segment.duration_ms();
        let sample_rate = segment.sample_rate;

        match config.format {
            AudioFormat::Wav => {
                let wav = segment.into_wav();
                let size = wav.len();
                Ok(TranscodeResult {
                    audio_data: wav,
                    format: AudioFormat::Wav,
                    duration_ms,
                    sample_rate,
                    original_size: size,
                    transcoded_size: size,
                })
            }
            AudioFormat::Opus => {
                let original_size = segment.data.len();
                let mono = self.decode_mono(&segment)?;
                let bitrate = config.bitrate.unwrap_or(DEFAULT_OPUS_BITRATE);
                let (opus_data, encoded_rate) = self.encode_opus(&mono.samples, mono.sample_rate, bitrate)?;

                tracing::debug!(
                    original_size = original_size,
                    opus_size = opus_data.len(),
                    bitrate = bitrate,
                    "Encoded to Opus"
                );

                let transcoded_size = opus_data.len();
                Ok(TranscodeResult {
                    audio_data: opus_data,
                    format: AudioFormat::Opus,
                    duration_ms,
                    sample_rate: encoded_rate,
                    original_size,
                    transcoded_size,
                })
            }
        }
    }

    fn supports_format(&self, format: AudioFormat) -> bool {
        matches!(format, AudioFormat::Wav | AudioFormat::Opus)
    }
}

impl AudioDecoderPort for AudioTranscoder {
    fn decode_mono(&self, segment: &AudioSegment) -> Result<MonoAudio, TranscodeError> {
        // 裸 PCM 补上头部后走同一条解码路径
        let decoded = match segment.format {
            SegmentFormat::Wav => decode_wav(&segment.data),
            SegmentFormat::RawPcm => decode_wav(&segment.clone().into_wav()),
        }
        .map_err(|e| TranscodeError::DecodingError(e.to_string()))?;

        let sample_rate = decoded.sample_rate;
        Ok(MonoAudio {
            samples: decoded.into_mono(),
            sample_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::wav;

    fn one_second_pcm(sample_rate: u32) -> AudioSegment {
        AudioSegment::pcm_from_samples(&vec![0.1; sample_rate as usize], sample_rate)
    }

    #[tokio::test]
    async fn test_wav_output_adds_header() {
        let transcoder = AudioTranscoder::new();
        let config = TranscodeConfig {
            format: AudioFormat::Wav,
            bitrate: None,
        };

        let result = transcoder.transcode(one_second_pcm(16000), &config).await.unwrap();
        assert_eq!(result.format, AudioFormat::Wav);
        assert_eq!(result.duration_ms, 1000);
        let info = wav::parse_header(&result.audio_data).unwrap();
        assert_eq!(info.sample_rate, 16000);
        assert_eq!(info.data_size, 32000);
    }

    #[tokio::test]
    async fn test_opus_output_is_ogg() {
        let transcoder = AudioTranscoder::new();
        let result = transcoder
            .transcode(one_second_pcm(16000), &TranscodeConfig::default())
            .await
            .unwrap();

        assert_eq!(result.format, AudioFormat::Opus);
        assert_eq!(&result.audio_data[0..4], b"OggS");
        assert!(result.transcoded_size < result.original_size);
    }

    #[tokio::test]
    async fn test_opus_from_wav_segment_resamples() {
        let transcoder = AudioTranscoder::new();
        let segment = AudioSegment::wav_from_samples(&vec![0.0; 22050], 22050);

        let result = transcoder
            .transcode(segment, &TranscodeConfig::default())
            .await
            .unwrap();
        assert_eq!(result.sample_rate, 24000);
        assert_eq!(result.duration_ms, 1000);
    }

    #[test]
    fn test_compatible_sample_rates() {
        assert_eq!(opus_compatible_sample_rate(16000), 16000);
        assert_eq!(opus_compatible_sample_rate(22050), 24000);
        assert_eq!(opus_compatible_sample_rate(44100), 48000);
    }

    #[test]
    fn test_decode_mono_strips_header_and_downmixes() {
        let mut pcm = Vec::new();
        for _ in 0..10 {
            pcm.extend_from_slice(&8192i16.to_le_bytes());
            pcm.extend_from_slice(&24576i16.to_le_bytes());
        }
        let segment = AudioSegment {
            data: wav::encode_pcm16(&pcm, 8000, 2),
            sample_rate: 8000,
            channels: 2,
            sample_width: 2,
            format: SegmentFormat::Wav,
        };

        let mono = AudioTranscoder::new().decode_mono(&segment).unwrap();
        assert_eq!(mono.sample_rate, 8000);
        assert_eq!(mono.samples.len(), 10);
        assert!((mono.samples[0] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decode_mono_raw_pcm() {
        let segment = AudioSegment::pcm_from_samples(&[0.25; 160], 16000);
        let mono = AudioTranscoder::new().decode_mono(&segment).unwrap();
        assert_eq!(mono.sample_rate, 16000);
        assert_eq!(mono.samples.len(), 160);
        assert!((mono.samples[0] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_decode_mono_24_bit_wav() {
        // 24 位 PCM：0x400000 = 0.5 满幅
        let mut data = Vec::new();
        for _ in 0..4 {
            data.extend_from_slice(&[0x00, 0x00, 0x40]);
        }
        let mut bytes = Vec::new();
        wav::write_header(&mut bytes, 16000, 1, 24, data.len());
        bytes.extend_from_slice(&data);
        let segment = AudioSegment {
            data: bytes,
            sample_rate: 16000,
            channels: 1,
            sample_width: 3,
            format: SegmentFormat::Wav,
        };

        let mono = AudioTranscoder::new().decode_mono(&segment).unwrap();
        assert_eq!(mono.samples.len(), 4);
        assert!((mono.samples[0] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decode_mono_rejects_garbage() {
        let segment = AudioSegment {
            data: b"not a wav file at all".to_vec(),
            sample_rate: 16000,
            channels: 1,
            sample_width: 2,
            format: SegmentFormat::Wav,
        };
        assert!(matches!(
            AudioTranscoder::new().decode_mono(&segment),
            Err(TranscodeError::DecodingError(_))
        ));
    }
}
