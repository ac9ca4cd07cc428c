//! 拉迪诺语 (lad)

use crate::domain::text::numerals::NumberSpeller;
use crate::domain::text::rules::{LanguageRules, UrlWords};

const MONTHS: [&str; 12] = [
    "enero", "febrero", "marso", "avril", "mayo", "junio", "julio", "agosto", "septembre",
    "oktubre", "noviembre", "desiembre",
];

fn compound_tens(tens: &'static str, _tens_digit: u64, unit: &'static str) -> String {
    format!("{} i {}", tens, unit)
}

pub const SPELLER: NumberSpeller = NumberSpeller {
    units: ["zero", "uno", "dos", "tres", "kuatro", "sinko", "sesh", "siete", "ocho", "mueve"],
    teens: [
        "diez", "onze", "doze", "treze", "katorze", "kinze", "dizisesh", "dizisiete", "diziocho",
        "dizimueve",
    ],
    tens: [
        "", "diez", "vente", "trenta", "kuarenta", "sinkuenta", "sesenta", "setenta", "ochenta",
        "noventa",
    ],
    hundreds: [
        "",
        "sien",
        "dozientos",
        "trezientos",
        "kuatrosientos",
        "kinientos",
        "seshsientos",
        "setesientos",
        "ochosientos",
        "muevesientos",
    ],
    compound_tens,
    thousand: "mil",
    one_million: "un milyon",
    millions: "milyones",
    one_before_noun: "un",
};

const SYMBOLS: &[(&str, &str)] = &[
    ("%", "por sien"),
    ("€", "evros"),
    ("$", "dolares"),
    ("+", "mas"),
    ("=", "igual a"),
    ("@", "arroba"),
    ("#", "numero"),
    ("°", "grados"),
];

const UNITS: &[(&str, &str)] = &[
    ("km/h", "kilometros por ora"),
    ("km", "kilometros"),
    ("m", "metros"),
    ("cm", "santimetros"),
    ("kg", "kilos"),
    ("g", "gramos"),
    ("l", "litros"),
    ("h", "oras"),
    ("min", "minutos"),
];

const ACRONYMS: &[(&str, &str)] = &[
    ("EEUU", "Estados Unidos"),
    ("ONU", "onu"),
    ("UE", "Unyon Evropea"),
];

/// 拉迪诺语规则
#[derive(Debug, Clone, Copy, Default)]
pub struct Ladino;

impl LanguageRules for Ladino {
    fn code(&self) -> &'static str {
        "lad"
    }

    fn speller(&self) -> &NumberSpeller {
        &SPELLER
    }

    fn conjunction(&self) -> &'static str {
        "i"
    }

    fn decimal_word(&self) -> &'static str {
        "koma"
    }

    fn minus_word(&self) -> &'static str {
        "menos"
    }

    fn url_words(&self) -> UrlWords {
        UrlWords {
            www: "dobla ve dobla ve dobla ve",
            dot: "punto",
        }
    }

    fn date(&self, day: u32, month: u32, year: i32) -> String {
        format!(
            "{} de {} de {}",
            self.number(day as u64),
            MONTHS[(month - 1) as usize],
            self.number(year.unsigned_abs() as u64)
        )
    }

    fn time(&self, hours: u32, minutes: u32) -> String {
        let hours_words = format!(
            "{} {}",
            self.number(hours as u64),
            if hours == 1 { "ora" } else { "oras" }
        );
        if minutes == 0 {
            return hours_words;
        }
        format!(
            "{} i {} {}",
            hours_words,
            self.number(minutes as u64),
            if minutes == 1 { "minuto" } else { "minutos" }
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
            'c' => "se",
            'd' => "de",
            'e' => "e",
            'f' => "efe",
            'g' => "ge",
            'h' => "ache",
            'i' => "i",
            'j' => "jota",
            'k' => "ka",
            'l' => "le",
            'm' => "me",
            'n' => "ne",
            'o' => "o",
            'p' => "pe",
            'q' => "ku",
            'r' => "re",
            's' => "se",
            't' => "te",
            'u' => "u",
            'v' => "ve",
            'w' => "dobla ve",
            'x' => "kse",
            'y' => "ye",
            'z' => "ze",
            _ => return None,
        };
        Some(name)
    }
}
