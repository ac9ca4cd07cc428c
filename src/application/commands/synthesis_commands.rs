//! Synthesis Commands

/// 短文本合成（一次推理）
#[derive(Debug, Clone)]
pub struct SynthesizeShort {
    pub text: String,
    pub voice: Option<String>,
    pub lang: Option<String>,
}

/// 长文本合成（分句推理后拼接）
#[derive(Debug, Clone)]
pub struct SynthesizeLong {
    pub paragraphs: Vec<String>,
    pub voice: Option<String>,
    pub lang: Option<String>,
}
