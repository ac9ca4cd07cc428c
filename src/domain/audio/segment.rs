//! 音频片段
//!
//! 每次请求临时产生，不持久化

use super::wav;

/// 片段的字节格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentFormat {
    /// 自描述的 WAV 容器（头 + PCM）
    Wav,
    /// 裸 PCM，采样率由外部已知
    RawPcm,
}

/// 音频片段
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    pub data: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
    /// 每个样本的字节数
    pub sample_width: u16,
    pub format: SegmentFormat,
}

impl AudioSegment {
    /// 由 f32 单声道样本生成 16 位 WAV 片段
    pub fn wav_from_samples(samples: &[f32], sample_rate: u32) -> Self {
        let pcm = wav::f32_to_pcm16(samples);
        Self {
            data: wav::encode_pcm16(&pcm, sample_rate, 1),
            sample_rate,
            channels: 1,
            sample_width: 2,
            format: SegmentFormat::Wav,
        }
    }

    /// 由 f32 单声道样本生成 16 位裸 PCM 片段
    pub fn pcm_from_samples(samples: &[f32], sample_rate: u32) -> Self {
        Self::raw_pcm16(wav::f32_to_pcm16(samples), sample_rate)
    }

    /// 16 位单声道裸 PCM
    pub fn raw_pcm16(pcm: Vec<u8>, sample_rate: u32) -> Self {
        Self {
            data: pcm,
            sample_rate,
            channels: 1,
            sample_width: 2,
            format: SegmentFormat::RawPcm,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 片段时长（毫秒）
    pub fn duration_ms(&self) -> u64 {
        let payload = match self.format {
            SegmentFormat::Wav => wav::parse_header(&self.data)
                .map(|info| info.data_size)
                .unwrap_or(0),
            SegmentFormat::RawPcm => self.data.len(),
        };
        let bytes_per_second =
            self.sample_rate as u64 * self.channels as u64 * self.sample_width as u64;
        if bytes_per_second == 0 {
            return 0;
        }
        payload as u64 * 1000 / bytes_per_second
    }

    /// 转为完整 WAV 字节（裸 PCM 会补上头部）
    pub fn into_wav(self) -> Vec<u8> {
        match self.format {
            SegmentFormat::Wav => self.data,
            SegmentFormat::RawPcm => {
                let mut out = Vec::with_capacity(44 + self.data.len());
                wav::write_header(
                    &mut out,
                    self.sample_rate,
                    self.channels,
                    self.sample_width * 8,
                    self.data.len(),
                );
                out.extend_from_slice(&self.data);
                out
            }
        }
    }
}
