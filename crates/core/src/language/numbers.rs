//! Arabic number verbalization.
//!
//! A best-effort cascading converter: each magnitude tier handles its own
//! singular and dual forms and hands the remainder to the tier below,
//! joined with the conjunction "و". Grammatical agreement is not modelled.

use crate::error::{LipsyncError, Result};

/// Standalone digit words, used when reading digit by digit.
pub const DIGITS: [&str; 10] = [
    "صفر", "واحد", "اثنان", "ثلاثة", "أربعة", "خمسة", "ستة", "سبعة", "ثمانية", "تسعة",
];

pub const ONES: [&str; 10] = [
    "", "واحد", "اثنان", "ثلاثة", "أربعة", "خمسة", "ستة", "سبعة", "ثمانية", "تسعة",
];

pub const TENS: [&str; 10] = [
    "", "عشرة", "عشرون", "ثلاثون", "أربعون", "خمسون", "ستون", "سبعون", "ثمانون", "تسعون",
];

/// 10 through 19.
pub const TEENS: [&str; 10] = [
    "عشرة",
    "أحد عشر",
    "اثنا عشر",
    "ثلاثة عشر",
    "أربعة عشر",
    "خمسة عشر",
    "ستة عشر",
    "سبعة عشر",
    "ثمانية عشر",
    "تسعة عشر",
];

const CONJUNCTION: &str = " و ";

/// Largest value the magnitude tiers can express.
pub const MAX_CASCADE_VALUE: u64 = 999_999_999;

/// Convert a run of ASCII digits to Arabic words.
///
/// Numbers with a leading zero, and values in the ranges (99, 1000) and
/// (10000, 1000000), are read digit by digit as they are far more often
/// codes (area codes, phone numbers) than quantities.
pub fn convert_number_to_words(num: &str) -> Result<String> {
    if num.is_empty() {
        return Err(LipsyncError::EmptyNumber);
    }
    if let Some(c) = num.chars().find(|c| !c.is_ascii_digit()) {
        return Err(LipsyncError::InvalidDigit(c));
    }

    if num == "0" {
        return Ok(DIGITS[0].to_string());
    }
    if num.starts_with('0') {
        return Ok(convert_digit_by_digit(num));
    }

    // Any run this long without a leading zero is past the millions tier.
    let value = match num.parse::<u64>() {
        Ok(v) if v <= MAX_CASCADE_VALUE => v,
        _ => {
            log::debug!("Number {} exceeds the millions tier, reading digits", num);
            return Ok(convert_digit_by_digit(num));
        }
    };

    if (100..1000).contains(&value) || (10_001..1_000_000).contains(&value) {
        return Ok(convert_digit_by_digit(num));
    }

    Ok(convert_millions(value))
}

/// Read each digit as its standalone word, space separated.
///
/// Non-digit characters are skipped.
pub fn convert_digit_by_digit(num: &str) -> String {
    num.chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// 0-99. Compound numbers put the ones before the tens.
pub fn convert_tens(num: u64) -> String {
    match num {
        0..=9 => ONES[num as usize].to_string(),
        10..=19 => TEENS[(num - 10) as usize].to_string(),
        _ => {
            let ten = ((num / 10) % 10) as usize;
            let one = (num % 10) as usize;
            if one == 0 {
                TENS[ten].to_string()
            } else {
                format!("{}{}{}", ONES[one], CONJUNCTION, TENS[ten])
            }
        }
    }
}

pub fn convert_hundreds(num: u64) -> String {
    if num < 100 {
        return convert_tens(num);
    }
    let hundred = num / 100;
    let remainder = num % 100;

    let mut result = match hundred {
        1 => "مائة".to_string(),
        2 => "مائتان".to_string(),
        n => format!("{} مائة", convert_tens(n)),
    };
    if remainder > 0 {
        result.push_str(CONJUNCTION);
        result.push_str(&convert_tens(remainder));
    }
    result
}

pub fn convert_thousands(num: u64) -> String {
    if num < 1000 {
        return convert_hundreds(num);
    }
    let thousand = num / 1000;
    let remainder = num % 1000;

    let mut result = match thousand {
        1 => "ألف".to_string(),
        2 => "ألفان".to_string(),
        3..=10 => format!("{} آلاف", convert_tens(thousand)),
        n => format!("{} ألف", convert_hundreds(n)),
    };
    if remainder > 0 {
        result.push_str(CONJUNCTION);
        result.push_str(&convert_hundreds(remainder));
    }
    result
}

pub fn convert_millions(num: u64) -> String {
    if num < 1_000_000 {
        return convert_thousands(num);
    }
    let million = num / 1_000_000;
    let remainder = num % 1_000_000;

    let mut result = match million {
        1 => "مليون".to_string(),
        2 => "مليونان".to_string(),
        3..=10 => format!("{} ملايين", convert_tens(million)),
        n => format!("{} مليون", convert_hundreds(n)),
    };
    if remainder > 0 {
        result.push_str(CONJUNCTION);
        result.push_str(&convert_thousands(remainder));
    }
    result
}
