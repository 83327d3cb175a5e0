//! Length rules - score grows with length, with penalties outside the bounds.

use super::RuleOutcome;
use crate::config::Configuration;

/// Length measured in Unicode scalar values.
fn char_len(password: &str) -> usize {
    password.chars().count()
}

/// `len ^ raise_power`, saturated to a finite value.
pub(crate) fn length_score(config: &Configuration, len: usize) -> f64 {
    (len as f64).powf(config.raise_power()).min(f64::MAX)
}

pub(crate) fn meets_min_length(config: &Configuration, password: &str) -> bool {
    char_len(password) >= config.min_length()
}

pub(crate) fn within_max_length(config: &Configuration, password: &str) -> bool {
    char_len(password) <= config.max_length()
}

/// Scores the password by length; a password shorter than the minimum also
/// takes the rule weight.
pub(crate) fn min_length_rule(config: &Configuration, password: &str, weight: f64) -> RuleOutcome {
    let len = char_len(password);
    let score = length_score(config, len);
    if len < config.min_length() {
        return RuleOutcome::Fail(score + weight);
    }
    RuleOutcome::Pass(score)
}

/// Scores the password by length; a password longer than the maximum scores
/// the rule weight alone.
pub(crate) fn max_length_rule(config: &Configuration, password: &str, weight: f64) -> RuleOutcome {
    let len = char_len(password);
    if len > config.max_length() {
        return RuleOutcome::Fail(weight);
    }
    RuleOutcome::Pass(length_score(config, len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationBuilder;

    fn config() -> Configuration {
        ConfigurationBuilder::new()
            .min_length(6)
            .max_length(10)
            .build()
            .expect("valid configuration")
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_min_length_too_short() {
        let config = config();
        let outcome = min_length_rule(&config, "Short", -50.0);
        assert!(outcome.is_failure());
        assert_close(outcome.score(), 5f64.powf(1.4) - 50.0);
    }

    #[test]
    fn test_min_length_exactly_minimum() {
        let config = config();
        let outcome = min_length_rule(&config, "qwerty", -50.0);
        assert_eq!(outcome, RuleOutcome::Pass(6f64.powf(1.4)));
        assert!(meets_min_length(&config, "qwerty"));
    }

    #[test]
    fn test_min_length_counts_chars_not_bytes() {
        let config = config();
        assert!(!meets_min_length(&config, "ééééé"));
        assert!(meets_min_length(&config, "éééééé"));
    }

    #[test]
    fn test_max_length() {
        let config = config();
        assert_eq!(
            max_length_rule(&config, "abcdefghijk", -50.0),
            RuleOutcome::Fail(-50.0)
        );
        assert_eq!(
            max_length_rule(&config, "abcdefghij", -50.0),
            RuleOutcome::Pass(10f64.powf(1.4))
        );
        assert!(!within_max_length(&config, "abcdefghijk"));
    }

    #[test]
    fn test_empty_password_scores_zero_length() {
        let config = config();
        let outcome = min_length_rule(&config, "", -50.0);
        assert_eq!(outcome, RuleOutcome::Fail(-50.0));
    }

    #[test]
    fn test_custom_raise_power() {
        let config = ConfigurationBuilder::new()
            .raise_power(2.0)
            .build()
            .expect("valid configuration");
        assert_close(length_score(&config, 7), 49.0);
    }

    #[test]
    fn test_length_score_stays_finite() {
        let config = ConfigurationBuilder::new()
            .raise_power(-1.0)
            .build()
            .expect("valid configuration");
        assert_eq!(length_score(&config, 0), f64::MAX);
        assert!(min_length_rule(&config, "", -50.0).score().is_finite());

        let config = ConfigurationBuilder::new()
            .raise_power(100.0)
            .build()
            .expect("valid configuration");
        assert!(length_score(&config, 2000).is_finite());
    }
}
