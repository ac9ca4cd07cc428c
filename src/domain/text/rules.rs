//! 规则预处理引擎
//!
//! 各语言共享同一套流程，语言差异由 [`LanguageRules`] 提供：
//! 1. `&` 替换为连词
//! 2. 按标点切分（只有处在词边界上的标点才切分）
//! 3. 逐词展开：URL、日期、时间、数字、单位、符号、缩写
//! 4. 重新拼回标点（闭合标点贴前，开启标点贴后）

use chrono::NaiveDate;

use super::numerals::{NumberSpeller, MAX_SPOKEN_NUMBER};
use super::preprocessor::TextPreprocessor;

/// 参与切分的标点
const PUNCTUATION: [char; 8] = [';', '?', '¿', ',', ':', '.', '!', '¡'];

/// 开启标点，贴到后一段
#[inline]
fn is_opening(ch: char) -> bool {
    matches!(ch, '¿' | '¡')
}

/// 词边界上可以跳过的引号/括号
#[inline]
fn is_wrapper(ch: char) -> bool {
    matches!(
        ch,
        '"' | '\'' | '(' | ')' | '«' | '»' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}'
    )
}

/// 朗读 URL 需要的词
#[derive(Debug, Clone, Copy)]
pub struct UrlWords {
    /// "www" 的读法
    pub www: &'static str,
    /// "." 的读法
    pub dot: &'static str,
}

/// 一种语言的规则表
pub trait LanguageRules: Send + Sync {
    /// 语言代码（如 "lad"）
    fn code(&self) -> &'static str;

    /// 数词表
    fn speller(&self) -> &NumberSpeller;

    /// `&` 的读法
    fn conjunction(&self) -> &'static str;

    /// 小数点的读法
    fn decimal_word(&self) -> &'static str;

    /// 负号的读法
    fn minus_word(&self) -> &'static str;

    fn url_words(&self) -> UrlWords;

    /// 日期（已校验）
    fn date(&self, day: u32, month: u32, year: i32) -> String;

    /// 时刻（已校验）
    fn time(&self, hours: u32, minutes: u32) -> String;

    /// 符号表
    fn symbols(&self) -> &'static [(&'static str, &'static str)];

    /// 单位表（只在数字后生效）
    fn units(&self) -> &'static [(&'static str, &'static str)];

    /// 缩写表
    fn acronyms(&self) -> &'static [(&'static str, &'static str)];

    /// 字母名称
    fn letter(&self, ch: char) -> Option<&'static str>;

    /// 整数
    fn number(&self, n: u64) -> String {
        self.speller().spell(n)
    }

    /// 带小数的数：小数部分乘 100 四舍五入后读出
    fn decimal(&self, value: f64) -> String {
        let abs = value.abs();
        let mut integer = abs.trunc() as u64;
        let mut cents = ((abs - abs.trunc()) * 100.0).round() as u64;
        if cents >= 100 {
            integer += 1;
            cents -= 100;
        }

        let mut words = self.number(integer);
        if cents > 9 {
            words = format!("{} {} {}", words, self.decimal_word(), self.number(cents));
        } else if cents > 0 {
            words = format!(
                "{} {} {} {}",
                words,
                self.decimal_word(),
                self.number(0),
                self.number(cents)
            );
        }

        if value < 0.0 {
            format!("{} {}", self.minus_word(), words)
        } else {
            words
        }
    }
}

/// 按标点切出的一段
#[derive(Debug, Clone, PartialEq)]
struct Piece {
    text: String,
    punct: Option<char>,
}

/// 基于 [`LanguageRules`] 的预处理器
pub struct RulePreprocessor<L> {
    rules: L,
}

impl<L: LanguageRules> RulePreprocessor<L> {
    pub fn new(rules: L) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &L {
        &self.rules
    }

    /// 完整的预处理流程
    pub fn process(&self, text: &str) -> String {
        let conjunction = format!(" {} ", self.rules.conjunction());
        let text = text.trim().replace('&', &conjunction);

        let mut out = String::new();
        for piece in split_pieces(&text) {
            let expanded = self.expand(&piece.text);
            if !expanded.is_empty() {
                if !out.is_empty() && !out.ends_with(is_opening) {
                    out.push(' ');
                }
                out.push_str(&expanded);
            }
            if let Some(p) = piece.punct {
                if is_opening(p) && !out.is_empty() && !out.ends_with(is_opening) {
                    out.push(' ');
                }
                out.push(p);
            }
        }
        out
    }

    /// 展开一段（不含切分标点）中的每个词
    fn expand(&self, segment: &str) -> String {
        let mut words: Vec<String> = Vec::new();
        let mut after_number = false;

        for token in segment.split_whitespace() {
            let (lead, core, trail) = strip_wrappers(token);
            if core.is_empty() {
                words.push(token.to_string());
                after_number = false;
                continue;
            }

            let (expanded, numeric) = self.expand_token(core, after_number);
            after_number = numeric;
            words.push(format!("{}{}{}", lead, expanded, trail));
        }

        words.join(" ")
    }

    /// 返回展开结果，以及该词是否是数字（供后续单位判断）
    fn expand_token(&self, token: &str, after_number: bool) -> (String, bool) {
        if let Some(url) = self.url(token) {
            return (url, false);
        }
        if let Some(date) = self.date(token) {
            return (date, false);
        }
        if let Some(time) = self.time(token) {
            return (time, false);
        }
        if let Some(number) = self.numeral(token) {
            return (number, true);
        }
        if let Some(with_suffix) = self.number_with_suffix(token) {
            return (with_suffix, false);
        }
        if after_number {
            if let Some(unit) = lookup(self.rules.units(), token) {
                return (unit.to_string(), false);
            }
        }
        if let Some(symbol) = lookup(self.rules.symbols(), token) {
            return (symbol.to_string(), false);
        }
        if let Some(acronym) = self.acronym(token) {
            return (acronym, false);
        }
        (token.to_string(), false)
    }

    fn url(&self, token: &str) -> Option<String> {
        let lower = token.to_lowercase();
        let rest = if let Some(rest) = lower.strip_prefix("https://") {
            rest
        } else if let Some(rest) = lower.strip_prefix("http://") {
            rest
        } else if lower.starts_with("www.") {
            lower.as_str()
        } else {
            return None;
        };

        let words = self.rules.url_words();
        let spoken: Vec<String> = rest
            .split('/')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.split('.')
                    .filter(|label| !label.is_empty())
                    .map(|label| if label == "www" { words.www } else { label })
                    .collect::<Vec<_>>()
                    .join(&format!(" {} ", words.dot))
            })
            .collect();

        if spoken.is_empty() {
            None
        } else {
            Some(spoken.join(" "))
        }
    }

    /// DD/MM/YYYY 或 DD-MM-YYYY
    fn date(&self, token: &str) -> Option<String> {
        let separator = if token.contains('/') { '/' } else { '-' };
        let parts: Vec<&str> = token.split(separator).collect();
        if parts.len() != 3 {
            return None;
        }
        let (d, m, y) = (parts[0], parts[1], parts[2]);
        let shaped = (1..=2).contains(&d.len())
            && (1..=2).contains(&m.len())
            && y.len() == 4
            && parts.iter().all(|p| is_digits(p));
        if !shaped {
            return None;
        }

        let (day, month, year) = (d.parse().ok()?, m.parse().ok()?, y.parse().ok()?);
        NaiveDate::from_ymd_opt(year, month, day)?;
        Some(self.rules.date(day, month, year))
    }

    /// HH.MM 或 HH:MM；小数只用逗号，所以点号两位分钟读作时间
    fn time(&self, token: &str) -> Option<String> {
        let (h, m) = token.split_once(|c| c == '.' || c == ':')?;
        if !(1..=2).contains(&h.len()) || m.len() != 2 || !is_digits(h) || !is_digits(m) {
            return None;
        }
        let (hours, minutes): (u32, u32) = (h.parse().ok()?, m.parse().ok()?);
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(self.rules.time(hours, minutes))
    }

    /// 整数或逗号小数，可带负号
    fn numeral(&self, token: &str) -> Option<String> {
        let (negative, body) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        if is_digits(body) {
            let words = match body.parse::<u64>() {
                Ok(n) if n <= MAX_SPOKEN_NUMBER => self.rules.number(n),
                _ => self.rules.speller().spell_digits(body),
            };
            return Some(if negative {
                format!("{} {}", self.rules.minus_word(), words)
            } else {
                words
            });
        }

        let (int, frac) = body.split_once(',')?;
        if !is_digits(int) || !is_digits(frac) {
            return None;
        }
        let value: f64 = format!("{}.{}", int, frac).parse().ok()?;
        if value.trunc() > MAX_SPOKEN_NUMBER as f64 {
            return None;
        }
        Some(self.rules.decimal(if negative { -value } else { value }))
    }

    /// 数字紧跟单位或符号，如 5km、50%
    fn number_with_suffix(&self, token: &str) -> Option<String> {
        let split = token.find(|c: char| !(c.is_ascii_digit() || c == ','))?;
        if split == 0 {
            return None;
        }
        let (number, suffix) = token.split_at(split);
        let number = self.numeral(number)?;
        let suffix = lookup(self.rules.units(), suffix).or_else(|| lookup(self.rules.symbols(), suffix))?;
        Some(format!("{} {}", number, suffix))
    }

    /// 已知缩写查表，其余全大写词逐字母读出
    fn acronym(&self, token: &str) -> Option<String> {
        if let Some(expansion) = lookup(self.rules.acronyms(), token) {
            return Some(expansion.to_string());
        }

        let count = token.chars().count();
        if !(2..=5).contains(&count) || !token.chars().all(|c| c.is_uppercase()) {
            return None;
        }
        let letters: Option<Vec<&str>> = token
            .chars()
            .flat_map(char::to_lowercase)
            .map(|c| self.rules.letter(c))
            .collect();
        letters.map(|l| l.join(" "))
    }
}

impl<L: LanguageRules> TextPreprocessor for RulePreprocessor<L> {
    fn preprocess(&self, text: &str) -> String {
        self.process(text)
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// 拆出词首尾的引号/括号
fn strip_wrappers(token: &str) -> (&str, &str, &str) {
    let start = token
        .char_indices()
        .find(|(_, c)| !is_wrapper(*c))
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| !is_wrapper(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(start)
        .max(start);
    (&token[..start], &token[start..end], &token[end..])
}

/// 按标点切分
///
/// 标点只有在词边界上（前面或后面是空白、文本端点、引号或另一个标点）
/// 才作为切分点，所以 `10.30`、`www.x.com`、`3,5` 保持完整
fn split_pieces(text: &str) -> Vec<Piece> {
    let chars: Vec<char> = text.chars().collect();
    let at_boundary = |c: Option<&char>| match c {
        None => true,
        Some(c) => c.is_whitespace() || is_wrapper(*c) || PUNCTUATION.contains(c),
    };

    let mut pieces = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        let prev = if i == 0 { None } else { chars.get(i - 1) };
        let next = chars.get(i + 1);

        if PUNCTUATION.contains(&ch) && (at_boundary(prev) || at_boundary(next)) {
            pieces.push(Piece {
                text: current.trim().to_string(),
                punct: Some(ch),
            });
            current.clear();
        } else {
            current.push(ch);
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        pieces.push(Piece {
            text: rest.to_string(),
            punct: None,
        });
    }
    pieces
}
