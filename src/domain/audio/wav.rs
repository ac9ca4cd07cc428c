//! WAV 容器读写
//!
//! 只处理 RIFF/WAVE 的 chunk 结构，不做解码。
//! 头部长度从 chunk 中解析得到，而不是假设固定 44 字节

use thiserror::Error;

/// PCM 整数格式
pub const WAVE_FORMAT_PCM: u16 = 1;
/// 扩展格式（子格式在 fmt 扩展区）
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WavError {
    #[error("WAV data too short")]
    TooShort,

    #[error("Invalid WAV: missing RIFF header")]
    MissingRiff,

    #[error("Invalid WAV: missing WAVE identifier")]
    MissingWave,

    #[error("Invalid fmt chunk size")]
    InvalidFmt,

    #[error("Invalid WAV: missing fmt chunk")]
    MissingFmt,

    #[error("Invalid WAV: missing data chunk")]
    MissingData,
}

/// 解析后的 WAV 头信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavInfo {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// data chunk 负载的起始偏移（即头部总长度）
    pub data_start: usize,
    /// data chunk 负载长度（已截断到实际可用字节）
    pub data_size: usize,
}

impl WavInfo {
    /// PCM 负载切片
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.data_start..self.data_start + self.data_size]
    }
}

fn read_u16(data: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([data[pos], data[pos + 1]])
}

fn read_u32(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

/// 解析 WAV 文件头
pub fn parse_header(data: &[u8]) -> Result<WavInfo, WavError> {
    if data.len() < 12 {
        return Err(WavError::TooShort);
    }
    if &data[0..4] != b"RIFF" {
        return Err(WavError::MissingRiff);
    }
    if &data[8..12] != b"WAVE" {
        return Err(WavError::MissingWave);
    }

    let mut pos = 12;
    let mut fmt: Option<(u16, u16, u32, u16)> = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size = read_u32(data, pos + 4) as usize;
        let body = pos + 8;

        match chunk_id {
            b"fmt " => {
                if chunk_size < 16 || body + 16 > data.len() {
                    return Err(WavError::InvalidFmt);
                }
                let mut audio_format = read_u16(data, body);
                // WAVE_FORMAT_EXTENSIBLE: 子格式 GUID 的前两个字节即实际格式
                if audio_format == WAVE_FORMAT_EXTENSIBLE && chunk_size >= 26 && body + 26 <= data.len() {
                    audio_format = read_u16(data, body + 24);
                }
                fmt = Some((
                    audio_format,
                    read_u16(data, body + 2),
                    read_u32(data, body + 4),
                    read_u16(data, body + 14),
                ));
            }
            b"data" => {
                let (audio_format, channels, sample_rate, bits_per_sample) =
                    fmt.ok_or(WavError::MissingFmt)?;
                // 流式写出的 WAV 可能把 data 长度写成 0 或 0xFFFFFFFF
                let available = data.len() - body;
                let data_size = if chunk_size == 0 || chunk_size > available {
                    available
                } else {
                    chunk_size
                };
                return Ok(WavInfo {
                    audio_format,
                    channels,
                    sample_rate,
                    bits_per_sample,
                    data_start: body,
                    data_size,
                });
            }
            _ => {}
        }

        pos = body + chunk_size;
        // 对齐到偶数字节
        if chunk_size % 2 != 0 {
            pos += 1;
        }
    }

    if fmt.is_none() {
        Err(WavError::MissingFmt)
    } else {
        Err(WavError::MissingData)
    }
}

/// 写入 44 字节的标准 PCM 头
pub fn write_header(
    out: &mut Vec<u8>,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    data_size: usize,
) {
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = channels * (bits_per_sample / 8);

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((36 + data_size) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&WAVE_FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_size as u32).to_le_bytes());
}

/// 为 16 位 PCM 负载加上 WAV 头
pub fn encode_pcm16(pcm: &[u8], sample_rate: u32, channels: u16) -> Vec<u8> {
    let mut wav = Vec::with_capacity(44 + pcm.len());
    write_header(&mut wav, sample_rate, channels, 16, pcm.len());
    wav.extend_from_slice(pcm);
    wav
}

/// f32 样本 -> 16 位小端 PCM
pub fn f32_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &s in samples {
        let clamped = s.clamp(-1.0, 1.0);
        pcm.extend_from_slice(&((clamped * 32767.0) as i16).to_le_bytes());
    }
    pcm
}
