//! Character variety rules - presence and combinations of character classes.
//!
//! Special characters are `! , @ # $ % ^ & * ? _ ~`. Compound patterns only
//! match within a single line.

use regex::Regex;
use std::sync::LazyLock;

const SPECIAL_CHARS: &str = "!,@#$%^&*?_~";

macro_rules! line_pattern {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| {
            let pattern = $pattern
                .replace("SPECIAL", r"[!,@#$%^&*?_~]")
                .replace("ANY", r"[^\n\r\x{2028}\x{2029}]");
            Regex::new(&pattern).expect("builtin variety pattern is valid")
        });
    };
}

line_pattern!(THREE_NUMBERS, "[0-9]ANY*[0-9]ANY*[0-9]");
line_pattern!(TWO_SPECIAL_CHARS, "SPECIALANY*SPECIAL");
line_pattern!(UPPER_LOWER_COMBO, "[a-z]ANY*[A-Z]|[A-Z]ANY*[a-z]");
line_pattern!(
    LETTER_NUMBER_CHAR_COMBO,
    "[A-Za-z0-9]ANY*SPECIAL|SPECIALANY*[A-Za-z0-9]"
);
line_pattern!(SPECIAL_AFTER_ANY, "ANYSPECIAL");

fn is_special(c: char) -> bool {
    SPECIAL_CHARS.contains(c)
}

pub(crate) fn has_lowercase(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
}

pub(crate) fn has_uppercase(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
}

pub(crate) fn has_number(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_digit())
}

pub(crate) fn has_three_numbers(password: &str) -> bool {
    THREE_NUMBERS.is_match(password)
}

pub(crate) fn has_special_char(password: &str) -> bool {
    password.chars().any(is_special)
}

pub(crate) fn has_two_special_chars(password: &str) -> bool {
    TWO_SPECIAL_CHARS.is_match(password)
}

pub(crate) fn has_upper_lower_combo(password: &str) -> bool {
    UPPER_LOWER_COMBO.is_match(password)
}

pub(crate) fn has_letter_number_combo(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_alphabetic()) && has_number(password)
}

pub(crate) fn has_letter_number_char_combo(password: &str) -> bool {
    LETTER_NUMBER_CHAR_COMBO.is_match(password)
}

/// Mixed case, or letters with digits, or a special character (not in first
/// position) alongside a word character.
pub(crate) fn has_two_character_classes(password: &str) -> bool {
    has_upper_lower_combo(password)
        || has_letter_number_combo(password)
        || (SPECIAL_AFTER_ANY.is_match(password)
            && password.chars().any(|c| c.is_ascii_alphanumeric() || c == '_'))
}
