//! 数字读法
//!
//! 按语言的数词表把整数展开为文字：
//! 个位 / 十几 / 整十 / 百位 / 千 / 百万，
//! 以及 "一" 在 "千"、"百万" 前的省略形式

/// 可读出的最大整数（更大的数逐位读出）
pub const MAX_SPOKEN_NUMBER: u64 = 999_999_999_999;

/// 一种语言的数词表
#[derive(Debug, Clone, Copy)]
pub struct NumberSpeller {
    /// 0-9
    pub units: [&'static str; 10],
    /// 10-19
    pub teens: [&'static str; 10],
    /// 整十（下标为十位数，0 不用）
    pub tens: [&'static str; 10],
    /// 整百（下标为百位数，0 不用）
    pub hundreds: [&'static str; 10],
    /// 十位与个位的组合（如 vint-i-u / trenta i uno）
    pub compound_tens: fn(tens: &'static str, tens_digit: u64, unit: &'static str) -> String,
    /// "千"
    pub thousand: &'static str,
    /// 恰好一百万
    pub one_million: &'static str,
    /// 复数 "百万"
    pub millions: &'static str,
    /// 作为量词时 "一" 的省略形式（u -> un, uno -> un）
    pub one_before_noun: &'static str,
}

impl NumberSpeller {
    /// 整数 -> 文字
    pub fn spell(&self, n: u64) -> String {
        if n > MAX_SPOKEN_NUMBER {
            return self.spell_digits(&n.to_string());
        }
        self.below_trillion(n)
    }

    /// 逐位读出数字串
    pub fn spell_digits(&self, digits: &str) -> String {
        digits
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| self.units[d as usize])
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 0-99：只用个位、十几、整十表
    pub fn below_hundred(&self, n: u64) -> String {
        debug_assert!(n < 100);
        match n {
            0..=9 => self.units[n as usize].to_string(),
            10..=19 => self.teens[(n - 10) as usize].to_string(),
            _ => {
                let (t, u) = (n / 10, n % 10);
                if u == 0 {
                    self.tens[t as usize].to_string()
                } else {
                    (self.compound_tens)(self.tens[t as usize], t, self.units[u as usize])
                }
            }
        }
    }

    fn below_thousand(&self, n: u64) -> String {
        if n < 100 {
            return self.below_hundred(n);
        }
        let (h, rest) = (n / 100, n % 100);
        if rest == 0 {
            self.hundreds[h as usize].to_string()
        } else {
            format!("{} {}", self.hundreds[h as usize], self.below_hundred(rest))
        }
    }

    fn below_million(&self, n: u64) -> String {
        if n < 1000 {
            return self.below_thousand(n);
        }
        let (k, rest) = (n / 1000, n % 1000);
        let head = if k == 1 {
            self.thousand.to_string()
        } else {
            format!("{} {}", self.quantity(k, Self::below_thousand), self.thousand)
        };
        if rest == 0 {
            head
        } else {
            format!("{} {}", head, self.below_thousand(rest))
        }
    }

    fn below_trillion(&self, n: u64) -> String {
        if n < 1_000_000 {
            return self.below_million(n);
        }
        let (m, rest) = (n / 1_000_000, n % 1_000_000);
        let head = if m == 1 {
            self.one_million.to_string()
        } else {
            format!("{} {}", self.quantity(m, Self::below_million), self.millions)
        };
        if rest == 0 {
            head
        } else {
            format!("{} {}", head, self.below_million(rest))
        }
    }

    /// 作为 "千" / "百万" 的量词时，末尾的 "一" 改用省略形式
    fn quantity(&self, n: u64, spell: fn(&Self, u64) -> String) -> String {
        let words = spell(self, n);
        let one = self.units[1];
        if n % 10 == 1 && n % 100 != 11 && words.ends_with(one) {
            let stem = &words[..words.len() - one.len()];
            format!("{}{}", stem, self.one_before_noun)
        } else {
            words
        }
    }
}
