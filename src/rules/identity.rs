//! Identity rules - rejects passwords that look like an email address,
//! contain the username, or use forbidden characters.

use crate::config::Configuration;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([A-Za-z0-9_!#$%&'*+\-/=?^`{|}~]+\.)*[A-Za-z0-9_!#$%&'*+\-/=?^`{|}~]+",
        r"@(((([A-Za-z0-9][A-Za-z0-9\-]{0,62}[A-Za-z0-9])|[A-Za-z])\.)+[A-Za-z]{2,6}",
        r"|([0-9]{1,3}\.){3}[0-9]{1,3}(:[0-9]{1,5})?)$",
    ))
    .expect("email pattern is valid")
});

pub(crate) fn looks_like_email(password: &str) -> bool {
    EMAIL.is_match(password)
}

/// Case-insensitive substring match; an absent or empty username never matches.
pub(crate) fn contains_username(password: &str, username: Option<&str>) -> bool {
    match username {
        Some(name) if !name.is_empty() => password
            .to_lowercase()
            .contains(&name.to_lowercase()),
        _ => false,
    }
}

pub(crate) fn has_invalid_char(config: &Configuration, password: &str) -> bool {
    config.invalid_chars().is_match(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationBuilder;

    #[test]
    fn test_email_detected() {
        assert!(looks_like_email("john.doe@example.com"));
        assert!(looks_like_email("a+b@mail.Example.ORG"));
        assert!(looks_like_email("root@192.168.0.1:8080"));
        assert!(looks_like_email("x@y.io"));
    }

    #[test]
    fn test_email_rejected() {
        assert!(!looks_like_email("john.doe"));
        assert!(!looks_like_email("john@localhost"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("john..doe@example.com"));
        assert!(!looks_like_email("john@example.c"));
        assert!(!looks_like_email("P@ssw0rd!"));
    }

    #[test]
    fn test_username_similarity() {
        assert!(contains_username("myAlice99", Some("alice")));
        assert!(contains_username("alice", Some("ALICE")));
        assert!(contains_username("a.b*c", Some("A.B*C")));
        assert!(!contains_username("alic3", Some("alice")));
        assert!(!contains_username("anything", Some("")));
        assert!(!contains_username("anything", None));
    }

    #[test]
    fn test_invalid_char_default_pattern() {
        let config = ConfigurationBuilder::new().build().expect("valid configuration");
        assert!(has_invalid_char(&config, "with space"));
        assert!(has_invalid_char(&config, "comma,here"));
        assert!(has_invalid_char(&config, "quote'd"));
        assert!(has_invalid_char(&config, "dq\"x"));
        assert!(has_invalid_char(&config, "tab\there"));
        assert!(!has_invalid_char(&config, "Tr0ub4dor&3"));
    }

    #[test]
    fn test_invalid_char_custom_pattern() {
        let config = ConfigurationBuilder::new()
            .invalid_chars("[<>]")
            .build()
            .expect("valid configuration");
        assert!(has_invalid_char(&config, "a<b"));
        assert!(!has_invalid_char(&config, "with space"));
    }
}
