//! Password strength evaluator - runs the configured rules and maps the
//! total onto a verdict.

use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use std::sync::Arc;
#[cfg(feature = "async")]
use std::time::Duration;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::config::Configuration;
use crate::rules::{RuleOutcome, RuleReport};
use crate::verdict::{Tier, Verdict};

/// Result of evaluating one password.
///
/// The default value is the "not evaluated" state produced for an empty
/// password: no score, no verdict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationResult {
    /// Sum of all rule contributions; `None` for an empty password.
    pub score: Option<f64>,
    /// Messages of violated rules, in rule order.
    pub violations: Vec<String>,
    pub verdict: Option<Verdict>,
    /// Outcome of every active rule, in rule order.
    pub outcomes: Vec<RuleReport>,
}

impl EvaluationResult {
    pub fn is_evaluated(&self) -> bool {
        self.score.is_some()
    }

    pub fn tier(&self) -> Option<Tier> {
        self.verdict.as_ref().map(|v| v.tier)
    }

    /// Verdict label, or an empty string when not evaluated.
    pub fn label(&self) -> &str {
        self.verdict.as_ref().map_or("", |v| v.label.as_str())
    }

    pub fn outcome(&self, rule: &str) -> Option<RuleOutcome> {
        self.outcomes
            .iter()
            .find(|report| report.name == rule)
            .map(|report| report.outcome)
    }

    /// True if the named rule ran and failed.
    pub fn failed(&self, rule: &str) -> bool {
        self.outcome(rule).is_some_and(|o| o.is_failure())
    }
}

/// Evaluates password strength against a configuration.
///
/// An empty password yields the "not evaluated" result. Otherwise every
/// active rule runs in configuration order; scores are summed and messages
/// of failed rules collected.
pub fn evaluate(config: &Configuration, password: &SecretString) -> EvaluationResult {
    evaluate_with(config, password, || false).unwrap_or_default()
}

/// Runs the rules, checking `interrupted` before each one. Returns `None`
/// if interrupted.
fn evaluate_with(
    config: &Configuration,
    password: &SecretString,
    interrupted: impl Fn() -> bool,
) -> Option<EvaluationResult> {
    let pwd = password.expose_secret();
    if pwd.is_empty() {
        return Some(EvaluationResult::default());
    }

    let mut total = 0.0;
    let mut violations = Vec::new();
    let mut outcomes = Vec::with_capacity(config.rules().len());

    for rule in config.rules().iter().filter(|r| r.is_active()) {
        if interrupted() {
            #[cfg(feature = "tracing")]
            tracing::debug!("Evaluation cancelled before rule {}", rule.name());
            return None;
        }

        let outcome = rule
            .predicate()
            .evaluate(config, pwd, rule.weight() as f64)
            .sanitized();

        total += outcome.score();
        if outcome.is_failure() {
            if let Some(message) = rule.message() {
                violations.push(message.to_string());
            }
        }
        outcomes.push(RuleReport {
            name: rule.name().to_string(),
            outcome,
        });
    }

    let verdict = config.verdict_for(total);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Password evaluated: {} rules, score {:.2}, verdict {}",
        outcomes.len(),
        total,
        verdict.tier
    );

    Some(EvaluationResult {
        score: Some(total),
        violations,
        verdict: Some(verdict),
        outcomes,
    })
}

/// Evaluates with a cancellation check before each rule.
///
/// Returns `None` if the token is cancelled before the evaluation completes.
#[cfg(feature = "async")]
pub fn evaluate_cancellable(
    config: &Configuration,
    password: &SecretString,
    token: &CancellationToken,
) -> Option<EvaluationResult> {
    evaluate_with(config, password, || token.is_cancelled())
}

/// Waits `debounce`, then evaluates and sends the result.
///
/// Nothing is sent if the token is cancelled first, so a caller that cancels
/// the previous token on each keystroke only receives the latest result.
#[cfg(feature = "async")]
pub async fn evaluate_tx(
    config: Arc<Configuration>,
    password: SecretString,
    token: CancellationToken,
    debounce: Duration,
    tx: mpsc::Sender<EvaluationResult>,
) {
    #[cfg(feature = "tracing")]
    tracing::debug!("evaluation is about to start...");

    tokio::time::sleep(debounce).await;

    let Some(evaluation) = evaluate_cancellable(&config, &password, &token) else {
        return;
    };

    if let Err(_err) = tx.send(evaluation).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password evaluation result: {}", _err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationBuilder;
    use crate::rules::{BuiltinRule, RuleDefinition};

    fn secret(pwd: &str) -> SecretString {
        SecretString::new(pwd.to_string().into())
    }

    fn default_config() -> Configuration {
        ConfigurationBuilder::new().build().expect("valid configuration")
    }

    #[test]
    fn test_evaluate_empty_password() {
        let evaluation = evaluate(&default_config(), &secret(""));
        assert_eq!(evaluation.score, None);
        assert_eq!(evaluation.tier(), None);
        assert_eq!(evaluation.label(), "");
        assert!(evaluation.violations.is_empty());
        assert!(evaluation.outcomes.is_empty());
        assert!(!evaluation.is_evaluated());
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let config = default_config();
        for pwd in ["a", "qwerty", "Tr0ub4dor&3", "john@example.com", "aaab1C"] {
            assert_eq!(evaluate(&config, &secret(pwd)), evaluate(&config, &secret(pwd)));
        }
    }

    #[test]
    fn test_evaluate_qwerty() {
        let evaluation = evaluate(&default_config(), &secret("qwerty"));

        assert!(evaluation.failed("sequences"));
        assert!(evaluation.failed("common-password"));
        assert!(!evaluation.failed("min-length"));
        assert_eq!(
            evaluation.outcome("min-length"),
            Some(RuleOutcome::Pass(6f64.powf(1.4)))
        );
        assert_eq!(
            evaluation.violations,
            vec![
                "Your password contains sequences",
                "Use different character classes",
                "Do not use a common password",
            ]
        );
        assert_eq!(evaluation.tier(), Some(Tier::VeryWeak));
        assert_eq!(evaluation.label(), "Very Weak");
    }

    #[test]
    fn test_evaluate_strong_password() {
        let evaluation = evaluate(&default_config(), &secret("Tr0ub4dor&3"));

        assert!(!evaluation.failed("sequences"));
        assert!(!evaluation.failed("common-password"));
        assert!(!evaluation.failed("repetitions"));
        assert!(evaluation.violations.is_empty());
        assert!(evaluation.tier().unwrap() >= Tier::Strong);
        assert!(evaluation.score.unwrap() >= 50.0);
    }

    #[test]
    fn test_evaluate_common_password_case_sensitive() {
        let config = default_config();
        assert!(evaluate(&config, &secret("password")).failed("common-password"));
        assert!(!evaluate(&config, &secret("Password")).failed("common-password"));
    }

    #[test]
    fn test_evaluate_sequence_length_guard() {
        let config = default_config();
        assert!(evaluate(&config, &secret("abc123xyz")).failed("sequences"));
        assert_eq!(
            evaluate(&config, &secret("ab")).outcome("sequences"),
            Some(RuleOutcome::Skip)
        );
    }

    #[test]
    fn test_evaluate_repetition() {
        let config = default_config();
        assert!(evaluate(&config, &secret("aaab1C")).failed("repetitions"));
        assert!(!evaluate(&config, &secret("aab1C")).failed("repetitions"));
    }

    #[test]
    fn test_evaluate_too_short_reports_message() {
        let evaluation = evaluate(&default_config(), &secret("Ab1!"));
        assert!(evaluation.failed("min-length"));
        assert_eq!(evaluation.violations[0], "Your password is too short");
    }

    #[test]
    fn test_evaluate_email_and_username() {
        let config = ConfigurationBuilder::new()
            .username("jdoe")
            .build()
            .unwrap();
        let evaluation = evaluate(&config, &secret("JDoe@example.com"));
        assert!(evaluation.failed("not-email"));
        assert!(evaluation.failed("similar-to-username"));
        assert_eq!(
            &evaluation.violations[..2],
            &[
                "Do not use your email as your password",
                "Your password cannot contain your username",
            ]
        );
        assert_eq!(evaluation.tier(), Some(Tier::VeryWeak));
    }

    #[test]
    fn test_evaluate_adding_uppercase_never_decreases_score() {
        let config = default_config();
        for (lower, mixed) in [
            ("mountain", "mountaiN"),
            ("plovdiv", "Plovdiv"),
            ("zebra", "zebrA"),
        ] {
            let before = evaluate(&config, &secret(lower)).score.unwrap();
            let after = evaluate(&config, &secret(mixed)).score.unwrap();
            assert!(after >= before, "{lower} -> {mixed}: {before} > {after}");
        }
    }

    #[test]
    fn test_inactive_rules_are_skipped() {
        let config = default_config();
        let evaluation = evaluate(&config, &secret("has space"));
        assert_eq!(evaluation.outcome("invalid-char"), None);
        assert_eq!(evaluation.outcome("max-length"), None);
        assert_eq!(evaluation.outcomes.len(), 16);

        let config = ConfigurationBuilder::new()
            .rule_active("invalid-char", true)
            .build()
            .unwrap();
        assert!(evaluate(&config, &secret("has space")).failed("invalid-char"));
    }

    #[test]
    fn test_custom_rule_and_non_finite_score() {
        let config = ConfigurationBuilder::empty()
            .builtin(BuiltinRule::Lowercase)
            .add_rule(
                RuleDefinition::custom("broken", 5, true, |_, _, _| RuleOutcome::Pass(f64::NAN))
                    .with_message("Broken rule"),
            )
            .add_rule(RuleDefinition::custom("bonus", 10, true, |_, pwd, weight| {
                if pwd.ends_with('!') {
                    RuleOutcome::Pass(weight)
                } else {
                    RuleOutcome::Skip
                }
            }))
            .build()
            .unwrap();

        let evaluation = evaluate(&config, &secret("hello!"));
        assert_eq!(evaluation.score, Some(11.0));
        assert_eq!(evaluation.outcome("broken"), Some(RuleOutcome::Fail(0.0)));
        assert_eq!(evaluation.violations, vec!["Broken rule"]);
        assert_eq!(evaluation.tier(), Some(Tier::Weak));
    }

    #[test]
    fn test_configured_labels() {
        let config = ConfigurationBuilder::new()
            .labels(["0", "1", "2", "3", "4", "5"].map(String::from))
            .build()
            .unwrap();
        let evaluation = evaluate(&config, &secret("qwerty"));
        assert_eq!(evaluation.label(), "0");
    }

    #[test]
    fn test_concurrent_evaluations_share_configuration() {
        let config = std::sync::Arc::new(default_config());
        let handles: Vec<_> = ["qwerty", "Tr0ub4dor&3", "aaab1C", "x"]
            .into_iter()
            .map(|pwd| {
                let config = std::sync::Arc::clone(&config);
                std::thread::spawn(move || evaluate(&config, &secret(pwd)))
            })
            .collect();

        for (handle, pwd) in handles.into_iter().zip(["qwerty", "Tr0ub4dor&3", "aaab1C", "x"]) {
            let evaluation = handle.join().expect("evaluation thread panicked");
            assert_eq!(evaluation, evaluate(&config, &secret(pwd)));
        }
    }
}
