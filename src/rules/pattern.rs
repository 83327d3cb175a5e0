//! Pattern rules - detects repeated characters and keyboard/alphabet runs.

/// Runs that must not appear in a password, forwards or backwards.
pub const FORBIDDEN_SEQUENCES: [&str; 6] = [
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm",
    "!@#$%^&*()_+",
];

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// True if any character (other than a line terminator) appears three or
/// more times in a row, e.g. `"aaa"`.
pub(crate) fn has_repetition(password: &str) -> bool {
    let mut previous: Option<char> = None;
    let mut repeated_count = 0;
    for c in password.chars() {
        if is_line_terminator(c) {
            previous = None;
            repeated_count = 0;
            continue;
        }
        if previous == Some(c) {
            repeated_count += 1;
            if repeated_count >= 3 {
                return true;
            }
        } else {
            previous = Some(c);
            repeated_count = 1;
        }
    }
    false
}

/// True if any three-character window of the lowercased password occurs in
/// one of [`FORBIDDEN_SEQUENCES`] or its reverse.
pub(crate) fn has_forbidden_sequence(password: &str) -> bool {
    let chars: Vec<char> = password.to_lowercase().chars().collect();
    if chars.len() < 3 {
        return false;
    }

    chars.windows(3).any(|w| {
        let forward: String = w.iter().collect();
        let backward: String = w.iter().rev().collect();
        FORBIDDEN_SEQUENCES
            .iter()
            .any(|seq| seq.contains(&forward) || seq.contains(&backward))
    })
}
