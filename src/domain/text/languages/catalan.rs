//! 加泰罗尼亚语 (ca)

use crate::domain::text::numerals::NumberSpeller;
use crate::domain::text::rules::{LanguageRules, UrlWords};

const MONTHS: [&str; 12] = [
    "gener", "febrer", "març", "abril", "maig", "juny", "juliol", "agost", "setembre", "octubre",
    "novembre", "desembre",
];

fn compound_tens(tens: &'static str, tens_digit: u64, unit: &'static str) -> String {
    // 20 段用 "vint-i-"，其余直接连字符
    if tens_digit == 2 {
        format!("{}-i-{}", tens, unit)
    } else {
        format!("{}-{}", tens, unit)
    }
}

pub const SPELLER: NumberSpeller = NumberSpeller {
    units: ["zero", "u", "dos", "tres", "quatre", "cinc", "sis", "set", "vuit", "nou"],
    teens: [
        "deu", "onze", "dotze", "tretze", "catorze", "quinze", "setze", "disset", "divuit", "dinou",
    ],
    tens: [
        "", "deu", "vint", "trenta", "quaranta", "cinquanta", "seixanta", "setanta", "vuitanta",
        "noranta",
    ],
    hundreds: [
        "",
        "cent",
        "dos-cents",
        "tres-cents",
        "quatre-cents",
        "cinc-cents",
        "sis-cents",
        "set-cents",
        "vuit-cents",
        "nou-cents",
    ],
    compound_tens,
    thousand: "mil",
    one_million: "un milió",
    millions: "milions",
    one_before_noun: "un",
};

const SYMBOLS: &[(&str, &str)] = &[
    ("%", "per cent"),
    ("€", "euros"),
    ("$", "dòlars"),
    ("+", "més"),
    ("=", "igual a"),
    ("@", "arrova"),
    ("#", "coixinet"),
    ("°", "graus"),
];

const UNITS: &[(&str, &str)] = &[
    ("km/h", "quilòmetres per hora"),
    ("km", "quilòmetres"),
    ("m", "metres"),
    ("cm", "centímetres"),
    ("mm", "mil·límetres"),
    ("kg", "quilos"),
    ("g", "grams"),
    ("l", "litres"),
    ("h", "hores"),
    ("min", "minuts"),
    ("s", "segons"),
];

const ACRONYMS: &[(&str, &str)] = &[
    ("UE", "unió europea"),
    ("EUA", "estats units"),
    ("ONU", "onu"),
    ("BCN", "barcelona"),
];

/// 加泰罗尼亚语规则
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalan;

impl LanguageRules for Catalan {
    fn code(&self) -> &'static str {
        "ca"
    }

    fn speller(&self) -> &NumberSpeller {
        &SPELLER
    }

    fn conjunction(&self) -> &'static str {
        "i"
    }

    fn decimal_word(&self) -> &'static str {
        "coma"
    }

    fn minus_word(&self) -> &'static str {
        "menys"
    }

    fn url_words(&self) -> UrlWords {
        UrlWords {
            www: "ve doble ve doble ve doble",
            dot: "punt",
        }
    }

    fn date(&self, day: u32, month: u32, year: i32) -> String {
        let name = MONTHS[(month - 1) as usize];
        // d'abril, d'agost, d'octubre
        let joiner = if name.starts_with(|c: char| matches!(c, 'a' | 'o')) { "d'" } else { "de " };
        format!(
            "{} {}{} de {}",
            self.number(day as u64),
            joiner,
            name,
            self.number(year.unsigned_abs() as u64)
        )
    }

    fn time(&self, hours: u32, minutes: u32) -> String {
        let hours_words = format!(
            "{} {}",
            self.number(hours as u64),
            if hours == 1 { "hora" } else { "hores" }
        );
        if minutes == 0 {
            return hours_words;
        }
        format!(
            "{} i {} {}",
            hours_words,
            self.number(minutes as u64),
            if minutes == 1 { "minut" } else { "minuts" }
        )
    }

    fn symbols(&self) -> &'static [(&'static str, &'static str)] {
        SYMBOLS
    }

    fn units(&self) -> &'static [(&'static str, &'static str)] {
        UNITS
    }

    fn acronyms(&self) -> &'static [(&'static str, &'static str)] {
        ACRONYMS
    }

    fn letter(&self, ch: char) -> Option<&'static str> {
        let name = match ch {
            'a' => "a",
            'b' => "be",
            'c' => "ce",
            'd' => "de",
            'e' => "e",
            'f' => "efa",
            'g' => "ge",
            'h' => "hac",
            'i' => "i",
            'j' => "jota",
            'k' => "ca",
            'l' => "ela",
            'm' => "ema",
            'n' => "ena",
            'o' => "o",
            'p' => "pe",
            'q' => "cu",
            'r' => "erra",
            's' => "essa",
            't' => "te",
            'u' => "u",
            'v' => "ve",
            'w' => "ve doble",
            'x' => "ics",
            'y' => "i grega",
            'z' => "zeta",
            _ => return None,
        };
        Some(name)
    }
}
