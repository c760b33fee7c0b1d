//! Text normalization ahead of viseme mapping.
//!
//! Strips marks that are never spoken, expands symbols and numerals into
//! Arabic words and tames informal repetition. The output is what the
//! sequencer walks character by character.

use fancy_regex::Regex as BacktrackRegex;
use regex::{Captures, Regex};

use crate::language::numbers::convert_number_to_words;

/// Tatweel (kashida), a justification-only elongation mark.
pub const TATWEEL: char = '\u{0640}';

/// Characters removed outright.
pub const UNSPOKEN_CHARS: &[char] = &['#', '_', '*', '"', ':', ';'];

/// Symbols spoken as words.
pub const SYMBOL_WORDS: &[(char, &str)] = &[
    ('%', "بالمائة"),
    ('€', "يورو"),
    ('&', "و"),
    ('+', "زائد"),
    ('$', "دولار"),
];

/// Spoken form of the decimal point.
pub const DECIMAL_POINT_WORD: &str = "فاصلة";

lazy_static::lazy_static! {
    static ref DECIMAL_RE: Regex = Regex::new(r"([0-9])\.([0-9])").unwrap();
    static ref DIGIT_RUN_RE: Regex = Regex::new(r"[0-9]+").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    /// Three or more of the same non-digit character.
    static ref REPEAT_RE: BacktrackRegex = BacktrackRegex::new(r"([^0-9])\1\1+").unwrap();
}

/// Map Arabic-Indic and Extended Arabic-Indic digits to ASCII.
fn fold_digit(c: char) -> char {
    match c {
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        _ => c,
    }
}

fn symbol_word(c: char) -> Option<&'static str> {
    SYMBOL_WORDS
        .iter()
        .find(|(symbol, _)| *symbol == c)
        .map(|(_, word)| *word)
}

/// Normalize raw text for the viseme sequencer.
///
/// Never fails; empty input yields an empty string.
pub fn pre_process_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut text = String::with_capacity(raw.len());
    for c in raw.chars().map(fold_digit) {
        if c == TATWEEL || UNSPOKEN_CHARS.contains(&c) {
            continue;
        }
        match symbol_word(c) {
            Some(word) => {
                text.push(' ');
                text.push_str(word);
                text.push(' ');
            }
            None => text.push(c),
        }
    }

    let replacement = format!("${{1}} {} ${{2}}", DECIMAL_POINT_WORD);
    let text = DECIMAL_RE.replace_all(&text, replacement.as_str());

    let text = DIGIT_RUN_RE.replace_all(&text, |caps: &Captures| {
        let digits = &caps[0];
        convert_number_to_words(digits).unwrap_or_else(|e| {
            log::warn!("Dropping unreadable number {}: {}", digits, e);
            String::new()
        })
    });

    let text = REPEAT_RE.replace_all(&text, "${1}${1}");
    let text = WHITESPACE_RE.replace_all(&text, " ");

    let normalized = text.trim().to_string();
    log::debug!("Normalized {:?} -> {:?}", raw, normalized);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(pre_process_text(""), "");
        assert_eq!(pre_process_text("   "), "");
    }

    #[test]
    fn test_removes_tatweel() {
        assert_eq!(pre_process_text("مـرحـبا"), "مرحبا");
    }

    #[test]
    fn test_strips_unspoken_punctuation() {
        assert_eq!(pre_process_text("#مرحبا_*"), "مرحبا");
        assert_eq!(pre_process_text("\"سلام\": نعم;"), "سلام نعم");
    }

    #[test]
    fn test_symbols_become_words() {
        assert_eq!(pre_process_text("أ&ب"), "أ و ب");
        assert_eq!(pre_process_text("€"), "يورو");
        assert_eq!(pre_process_text("س+ص"), "س زائد ص");
    }

    #[test]
    fn test_symbols_with_numbers() {
        assert_eq!(pre_process_text("50%"), "خمسون بالمائة");
        assert_eq!(pre_process_text("$5"), "دولار خمسة");
    }

    #[test]
    fn test_decimal_point() {
        assert_eq!(pre_process_text("3.5"), "ثلاثة فاصلة خمسة");
    }

    #[test]
    fn test_numbers_are_verbalized() {
        assert_eq!(pre_process_text("عندي 2 قلم"), "عندي اثنان قلم");
        assert_eq!(pre_process_text("الرمز 123"), "الرمز واحد اثنان ثلاثة");
        assert_eq!(pre_process_text("1000"), "ألف");
    }

    #[test]
    fn test_arabic_indic_digits() {
        assert_eq!(pre_process_text("٥"), "خمسة");
        assert_eq!(pre_process_text("۲۰"), "عشرون");
        assert_eq!(fold_digit('٩'), '9');
        assert_eq!(fold_digit('ب'), 'ب');
    }

    #[test]
    fn test_collapses_repeated_letters() {
        assert_eq!(pre_process_text("ههههههه"), "هه");
        assert_eq!(pre_process_text("ههه"), "هه");
        // Intentional doubling survives
        assert_eq!(pre_process_text("مم"), "مم");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(pre_process_text("  سلام \t\n  عليكم  "), "سلام عليكم");
    }

    #[test]
    fn test_deterministic() {
        let input = "السلام عليكم 2024، كيف الحال؟";
        assert_eq!(pre_process_text(input), pre_process_text(input));
    }
}
