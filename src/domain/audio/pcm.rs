//! PCM 拼接缓冲
//!
//! 长文本合成时逐句累积音频：单声道、16 位、固定采样率

use super::AudioSegment;

/// 单声道 16 位 PCM 累积缓冲
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    sample_rate: u32,
    samples: Vec<i16>,
}

impl PcmBuffer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// 当前样本数
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 追加静音
    pub fn append_silence(&mut self, duration_ms: u32) {
        let count = silence_samples(self.sample_rate, duration_ms);
        self.samples.resize(self.samples.len() + count, 0);
    }

    /// 追加已解码的单声道样本，采样率不一致时线性重采样
    pub fn append_samples(&mut self, samples: &[f32], sample_rate: u32) -> usize {
        let resampled = resample_linear(samples, sample_rate, self.sample_rate);
        let count = resampled.len();
        self.samples
            .extend(resampled.iter().map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16));
        count
    }

    /// 输出为裸 PCM 片段
    pub fn into_segment(self) -> AudioSegment {
        let mut pcm = Vec::with_capacity(self.samples.len() * 2);
        for s in &self.samples {
            pcm.extend_from_slice(&s.to_le_bytes());
        }
        AudioSegment::raw_pcm16(pcm, self.sample_rate)
    }
}

/// 给定时长的静音样本数
pub fn silence_samples(sample_rate: u32, duration_ms: u32) -> usize {
    (sample_rate as u64 * duration_ms as u64 / 1000) as usize
}

/// 单声道线性重采样
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || from_rate == 0 || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let new_len = (samples.len() as f64 * ratio) as usize;
    let last = samples.len() - 1;

    (0..new_len)
        .map(|i| {
            let pos = i as f64 / ratio;
            let idx = (pos as usize).min(last);
            let frac = (pos - idx as f64) as f32;
            let s0 = samples[idx];
            let s1 = samples[(idx + 1).min(last)];
            s0 + (s1 - s0) * frac
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_length() {
        let mut buffer = PcmBuffer::new(16000);
        buffer.append_silence(250);
        assert_eq!(buffer.len(), 4000);
        assert!(buffer.into_segment().data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_samples_are_quantized_to_pcm16() {
        let mut buffer = PcmBuffer::new(16000);
        assert_eq!(buffer.append_samples(&[0.5, -2.0], 16000), 2);

        let out = buffer.into_segment();
        assert_eq!(i16::from_le_bytes([out.data[0], out.data[1]]), 16383);
        assert_eq!(i16::from_le_bytes([out.data[2], out.data[3]]), -32767);
    }

    #[test]
    fn test_resample_to_buffer_rate() {
        let mut buffer = PcmBuffer::new(16000);
        assert_eq!(buffer.append_samples(&[0.1; 8000], 8000), 16000);
        assert_eq!(resample_linear(&[0.0; 100], 8000, 16000).len(), 200);
        assert_eq!(resample_linear(&[0.0; 300], 24000, 16000).len(), 200);
    }
}
