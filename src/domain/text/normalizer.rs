//! 通用文本规范化
//!
//! 在语言预处理之后总会执行，保证每句都以句末标点结束

use super::preprocessor::TextPreprocessor;

/// 句末标点
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '?', '!'];

#[inline]
fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation()
        || matches!(
            ch,
            '¿' | '¡' | '«' | '»' | '…' | '·' | '–' | '—' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}'
        )
}

/// 通用规范化
///
/// - 去掉首尾空白
/// - 只有标点（和空白）时返回空串
/// - 不以 `.` `?` `!` 结尾时补一个 `.`
///
/// 对已规范化的文本再次调用结果不变
pub fn universal_normalize(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(is_punctuation)
    {
        return String::new();
    }

    if trimmed.ends_with(&SENTENCE_TERMINATORS[..]) {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

/// 语言预处理 + 通用规范化
pub fn normalize_for_synthesis(text: &str, preprocessor: Option<&dyn TextPreprocessor>) -> String {
    match preprocessor {
        Some(p) => universal_normalize(&p.preprocess(text)),
        None => universal_normalize(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_terminator() {
        assert_eq!(universal_normalize("  hola  "), "hola.");
        assert_eq!(universal_normalize("hola?"), "hola?");
        assert_eq!(universal_normalize("hola!"), "hola!");
        assert_eq!(universal_normalize("hola,"), "hola,.");
    }

    #[test]
    fn test_punctuation_only_collapses() {
        assert_eq!(universal_normalize(""), "");
        assert_eq!(universal_normalize("   "), "");
        assert_eq!(universal_normalize("..."), "");
        assert_eq!(universal_normalize(" ¿ ! "), "");
    }

    #[test]
    fn test_idempotent() {
        for text in ["abc", "abc.", " x y ", "¿ke?", "...", "", "12, 13"] {
            let once = universal_normalize(text);
            assert_eq!(universal_normalize(&once), once);
        }
    }

    #[test]
    fn test_normalize_with_preprocessor() {
        let upper = |t: &str| t.to_uppercase();
        assert_eq!(normalize_for_synthesis("abc", Some(&upper)), "ABC.");
        assert_eq!(normalize_for_synthesis("abc", None), "abc.");
    }
}
