//! Common password list management
//!
//! Provides the built-in list of common passwords and loads replacement
//! lists from external files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a common password file to load.
pub const COMMON_PASSWORDS_ENV: &str = "PWSTRENGTH_COMMON_PASSWORDS";

/// Built-in list of common passwords (from SecLists, MIT License).
pub const DEFAULT_COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789", "12345", "1234", "111111",
    "1234567", "dragon", "123123", "baseball", "abc123", "football", "monkey", "letmein",
    "696969", "shadow", "master", "666666", "qwertyuiop", "123321", "mustang",
    "1234567890", "michael", "654321", "pussy", "superman", "1qaz2wsx", "7777777",
    "fuckyou", "121212", "000000", "qazwsx", "123qwe", "killer", "trustno1", "jordan",
    "jennifer", "zxcvbnm", "asdfgh", "hunter", "buster", "soccer", "harley", "batman",
    "andrew", "tigger", "sunshine", "iloveyou", "fuckme", "2000", "charlie", "robert",
    "thomas", "hockey", "ranger", "daniel", "starwars", "klaster", "112233", "george",
    "asshole", "computer", "michelle", "jessica", "pepper", "1111", "zxcvbn", "555555",
    "11111111", "131313", "freedom", "777777", "pass", "fuck", "maggie", "159753",
    "aaaaaa", "ginger", "princess", "joshua", "cheese", "amanda", "summer", "love",
    "ashley", "6969", "nicole", "chelsea", "biteme", "matthew", "access", "yankees",
    "987654321", "dallas", "austin", "thunder", "taylor", "matrix",
];

#[derive(Error, Debug)]
pub enum CommonPasswordsError {
    #[error("Common password file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read common password file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Common password file is empty")]
    EmptyFile,
}

/// Returns the built-in common password set.
pub fn default_common_passwords() -> HashSet<String> {
    DEFAULT_COMMON_PASSWORDS.iter().map(|p| p.to_string()).collect()
}

/// Returns the common password file path from `PWSTRENGTH_COMMON_PASSWORDS`,
/// or `None` if the variable is unset or empty.
pub fn common_passwords_path() -> Option<PathBuf> {
    std::env::var(COMMON_PASSWORDS_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
}

/// Loads a common password list, one password per line.
///
/// Lines are trimmed and blank lines skipped. Case is preserved: membership
/// checks against the returned set are exact.
///
/// # Errors
///
/// Returns error if:
/// - File does not exist
/// - File cannot be read
/// - File contains no passwords
pub fn load_common_passwords<P: AsRef<Path>>(
    path: P,
) -> Result<HashSet<String>, CommonPasswordsError> {
    let path = path.as_ref();

    if !path.exists() {
        #[cfg(feature = "tracing")]
        tracing::error!("Common password list not found: {}", path.display());
        return Err(CommonPasswordsError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;

    let set: HashSet<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    if set.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::error!("Common password list is empty: {}", path.display());
        return Err(CommonPasswordsError::EmptyFile);
    }

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Common password list loaded: {} passwords from {}",
        set.len(),
        path.display()
    );

    Ok(set)
}
