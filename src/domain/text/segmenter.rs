//! 句子分割器
//!
//! 长文本合成时把段落切成句子，每句单独合成

/// 默认最大字符数，超过后在弱分隔符处也会切分
pub const DEFAULT_MAX_CHARS: usize = 250;

/// 句子分割配置
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// 最小字符数（短句向后合并），0 表示不合并
    pub min_chars: usize,
    /// 达到此字符数后弱分隔符也触发切分
    pub max_chars: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            min_chars: 0,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// 强分隔符（句末标点）
#[inline]
fn is_strong_delimiter(ch: char) -> bool {
    matches!(ch, '.' | '?' | '!' | '…')
}

/// 弱分隔符
#[inline]
fn is_weak_delimiter(ch: char) -> bool {
    matches!(ch, ',' | ';' | ':')
}

/// 紧跟在句末标点后、应归属前一句的闭合符号
#[inline]
fn is_closing(ch: char) -> bool {
    matches!(
        ch,
        '"' | '\'' | ')' | '»' | '\u{201D}' | '\u{2019}'
    )
}

/// 只包含引号或空白的片段
#[inline]
fn is_trivial_segment(s: &str) -> bool {
    s.chars().all(|c| {
        matches!(
            c,
            '"' | '\u{201C}' | '\u{201D}' | '\'' | '\u{2018}' | '\u{2019}' | '«' | '»' | ' ' | '\t'
        )
    })
}

/// 按分隔符切分单行（不做合并）
///
/// 句末标点只有后面是空白或行尾时才切分，`10.30`、`www.x.com` 不会被切开
fn split_by_delimiters(text: &str, config: &SegmentConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut char_count = 0;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        current.push(ch);
        char_count += 1;

        if is_strong_delimiter(ch) {
            // 连续的句末标点和闭合引号归入同一句
            while i + 1 < chars.len() && (is_strong_delimiter(chars[i + 1]) || is_closing(chars[i + 1])) {
                i += 1;
                current.push(chars[i]);
                char_count += 1;
            }
            let at_break = chars.get(i + 1).map_or(true, |c| c.is_whitespace());
            if at_break {
                flush(&mut current, &mut segments);
                char_count = 0;
            }
        } else if is_weak_delimiter(ch) && char_count >= config.max_chars {
            let at_break = chars.get(i + 1).map_or(true, |c| c.is_whitespace());
            if at_break {
                flush(&mut current, &mut segments);
                char_count = 0;
            }
        }

        i += 1;
    }

    flush(&mut current, &mut segments);
    segments
}

fn flush(current: &mut String, segments: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
    current.clear();
}

/// 合并短片段直到满足 min_chars
fn merge_until_min_chars(segments: Vec<String>, min_chars: usize) -> Vec<String> {
    if min_chars == 0 {
        return segments;
    }

    let mut result: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for seg in segments {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(&seg);

        if buffer.chars().count() >= min_chars {
            result.push(std::mem::take(&mut buffer));
        }
    }

    if !buffer.is_empty() {
        if let Some(last) = result.last_mut() {
            last.push(' ');
            last.push_str(&buffer);
        } else {
            result.push(buffer);
        }
    }

    result
}

/// 把一个段落切成句子
///
/// 1. 按行切分
/// 2. 每行按标点切分，再合并过短的句子
/// 3. 只有引号的片段并入前一句
pub fn split_sentences(paragraph: &str, config: &SegmentConfig) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();

    let lines = paragraph.lines().map(str::trim).filter(|s| !s.is_empty());
    for line in lines {
        let pieces = merge_until_min_chars(split_by_delimiters(line, config), config.min_chars);
        for piece in pieces {
            if is_trivial_segment(&piece) {
                if let Some(last) = sentences.last_mut() {
                    last.push_str(&piece);
                }
            } else {
                sentences.push(piece);
            }
        }
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_delimiter_splits() {
        let sentences = split_sentences("Hola. Ke tal? Bien!", &SegmentConfig::default());
        assert_eq!(sentences, vec!["Hola.", "Ke tal?", "Bien!"]);
    }

    #[test]
    fn test_inner_dots_do_not_split() {
        let sentences = split_sentences("A las 10.30 en www.x.com. Ya.", &SegmentConfig::default());
        assert_eq!(sentences, vec!["A las 10.30 en www.x.com.", "Ya."]);
    }

    #[test]
    fn test_closing_quote_stays_with_sentence() {
        let sentences = split_sentences("\"Ven aki.\" Dishe el.", &SegmentConfig::default());
        assert_eq!(sentences, vec!["\"Ven aki.\"", "Dishe el."]);
    }

    #[test]
    fn test_weak_delimiter_respects_max_chars() {
        let config = SegmentConfig {
            min_chars: 0,
            max_chars: 10,
        };
        let sentences = split_sentences("ab, una frase larga, fin.", &config);
        assert_eq!(sentences, vec!["ab, una frase larga,", "fin."]);
    }

    #[test]
    fn test_short_segments_merged() {
        let config = SegmentConfig {
            min_chars: 6,
            max_chars: DEFAULT_MAX_CHARS,
        };
        let sentences = split_sentences("Si. No. Una frase mas larga.", &config);
        assert_eq!(sentences, vec!["Si. No.", "Una frase mas larga."]);
    }

    #[test]
    fn test_quote_only_segment_merged() {
        let sentences = split_sentences("Una frase.\n\"", &SegmentConfig::default());
        assert_eq!(sentences, vec!["Una frase.\""]);
    }

    #[test]
    fn test_lines_are_not_merged() {
        let sentences = split_sentences("Uno\nDos", &SegmentConfig::default());
        assert_eq!(sentences, vec!["Uno", "Dos"]);
    }
}
