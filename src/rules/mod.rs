//! Password scoring rules
//!
//! Each rule inspects one aspect of the password and yields a [`RuleOutcome`].
//! Builtin rules are dispatched through [`BuiltinRule`]; callers can register
//! their own predicates as [`RulePredicate::Custom`].

mod identity;
mod length;
mod pattern;
mod variety;

use std::fmt;
use std::sync::Arc;

use crate::config::Configuration;

pub use pattern::FORBIDDEN_SEQUENCES;

/// Result of evaluating a single rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleOutcome {
    /// The rule is satisfied and contributes its score.
    Pass(f64),
    /// The rule does not apply to this password.
    Skip,
    /// The rule is violated. The score (often zero or negative) is still
    /// added to the total and the rule's message is reported.
    Fail(f64),
}

impl RuleOutcome {
    /// Score added to the total.
    pub fn score(&self) -> f64 {
        match self {
            RuleOutcome::Pass(score) | RuleOutcome::Fail(score) => *score,
            RuleOutcome::Skip => 0.0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RuleOutcome::Fail(_))
    }

    /// A non-finite score counts as an unsatisfied rule with no contribution.
    pub(crate) fn sanitized(self) -> Self {
        if self.score().is_finite() {
            self
        } else {
            RuleOutcome::Fail(0.0)
        }
    }
}

/// Signature of a caller-supplied rule: `(configuration, password, weight)`.
pub type CustomPredicate = dyn Fn(&Configuration, &str, f64) -> RuleOutcome + Send + Sync;

/// How a rule computes its outcome.
#[derive(Clone)]
pub enum RulePredicate {
    Builtin(BuiltinRule),
    Custom(Arc<CustomPredicate>),
}

impl RulePredicate {
    pub fn evaluate(&self, config: &Configuration, password: &str, weight: f64) -> RuleOutcome {
        match self {
            RulePredicate::Builtin(rule) => rule.evaluate(config, password, weight),
            RulePredicate::Custom(predicate) => predicate(config, password, weight),
        }
    }
}

impl fmt::Debug for RulePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulePredicate::Builtin(rule) => f.debug_tuple("Builtin").field(rule).finish(),
            RulePredicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named, weighted rule as held by a [`Configuration`].
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    pub(crate) name: String,
    pub(crate) weight: i64,
    pub(crate) active: bool,
    pub(crate) message: Option<String>,
    pub(crate) predicate: RulePredicate,
}

impl RuleDefinition {
    /// A builtin rule with its default weight, activation and message.
    pub fn builtin(rule: BuiltinRule) -> Self {
        Self {
            name: rule.name().to_string(),
            weight: rule.default_weight(),
            active: rule.active_by_default(),
            message: rule.default_message().map(str::to_string),
            predicate: RulePredicate::Builtin(rule),
        }
    }

    pub fn custom<F>(name: impl Into<String>, weight: i64, active: bool, predicate: F) -> Self
    where
        F: Fn(&Configuration, &str, f64) -> RuleOutcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            weight,
            active,
            message: None,
            predicate: RulePredicate::Custom(Arc::new(predicate)),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Violation message, if one is configured and non-empty.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    pub fn predicate(&self) -> &RulePredicate {
        &self.predicate
    }
}

/// Per-rule outcome recorded in an evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleReport {
    pub name: String,
    pub outcome: RuleOutcome,
}

/// The builtin rule catalog, in default evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinRule {
    NotEmail,
    MinLength,
    MaxLength,
    InvalidChar,
    SimilarToUsername,
    Sequences,
    TwoCharacterClasses,
    Repetitions,
    Lowercase,
    Uppercase,
    OneNumber,
    ThreeNumbers,
    OneSpecialChar,
    TwoSpecialChars,
    UpperLowerCombo,
    LetterNumberCombo,
    LetterNumberCharCombo,
    CommonPassword,
}

impl BuiltinRule {
    pub const ALL: [BuiltinRule; 18] = [
        BuiltinRule::NotEmail,
        BuiltinRule::MinLength,
        BuiltinRule::MaxLength,
        BuiltinRule::InvalidChar,
        BuiltinRule::SimilarToUsername,
        BuiltinRule::Sequences,
        BuiltinRule::TwoCharacterClasses,
        BuiltinRule::Repetitions,
        BuiltinRule::Lowercase,
        BuiltinRule::Uppercase,
        BuiltinRule::OneNumber,
        BuiltinRule::ThreeNumbers,
        BuiltinRule::OneSpecialChar,
        BuiltinRule::TwoSpecialChars,
        BuiltinRule::UpperLowerCombo,
        BuiltinRule::LetterNumberCombo,
        BuiltinRule::LetterNumberCharCombo,
        BuiltinRule::CommonPassword,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinRule::NotEmail => "not-email",
            BuiltinRule::MinLength => "min-length",
            BuiltinRule::MaxLength => "max-length",
            BuiltinRule::InvalidChar => "invalid-char",
            BuiltinRule::SimilarToUsername => "similar-to-username",
            BuiltinRule::Sequences => "sequences",
            BuiltinRule::TwoCharacterClasses => "two-character-classes",
            BuiltinRule::Repetitions => "repetitions",
            BuiltinRule::Lowercase => "lowercase",
            BuiltinRule::Uppercase => "uppercase",
            BuiltinRule::OneNumber => "one-number",
            BuiltinRule::ThreeNumbers => "three-numbers",
            BuiltinRule::OneSpecialChar => "one-special-char",
            BuiltinRule::TwoSpecialChars => "two-special-chars",
            BuiltinRule::UpperLowerCombo => "upper-lower-combo",
            BuiltinRule::LetterNumberCombo => "letter-number-combo",
            BuiltinRule::LetterNumberCharCombo => "letter-number-char-combo",
            BuiltinRule::CommonPassword => "common-password",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.name() == name)
    }

    pub fn default_weight(self) -> i64 {
        match self {
            BuiltinRule::NotEmail => -100,
            BuiltinRule::MinLength => -50,
            BuiltinRule::MaxLength => -50,
            BuiltinRule::InvalidChar => -100,
            BuiltinRule::SimilarToUsername => -100,
            BuiltinRule::Sequences => -20,
            BuiltinRule::TwoCharacterClasses => 2,
            BuiltinRule::Repetitions => -25,
            BuiltinRule::Lowercase => 1,
            BuiltinRule::Uppercase => 3,
            BuiltinRule::OneNumber => 3,
            BuiltinRule::ThreeNumbers => 5,
            BuiltinRule::OneSpecialChar => 3,
            BuiltinRule::TwoSpecialChars => 5,
            BuiltinRule::UpperLowerCombo => 2,
            BuiltinRule::LetterNumberCombo => 2,
            BuiltinRule::LetterNumberCharCombo => 2,
            BuiltinRule::CommonPassword => -100,
        }
    }

    pub fn active_by_default(self) -> bool {
        !matches!(self, BuiltinRule::MaxLength | BuiltinRule::InvalidChar)
    }

    pub fn default_message(self) -> Option<&'static str> {
        match self {
            BuiltinRule::NotEmail => Some("Do not use your email as your password"),
            BuiltinRule::MinLength => Some("Your password is too short"),
            BuiltinRule::MaxLength => Some("Your password is too long"),
            BuiltinRule::InvalidChar => Some("Your password contains an invalid character"),
            BuiltinRule::SimilarToUsername => Some("Your password cannot contain your username"),
            BuiltinRule::Sequences => Some("Your password contains sequences"),
            BuiltinRule::TwoCharacterClasses => Some("Use different character classes"),
            BuiltinRule::Repetitions => Some("Too many repetitions"),
            BuiltinRule::CommonPassword => Some("Do not use a common password"),
            _ => None,
        }
    }

    /// Penalty rules fail when their condition holds and are skipped otherwise.
    pub fn is_penalty(self) -> bool {
        matches!(
            self,
            BuiltinRule::NotEmail
                | BuiltinRule::InvalidChar
                | BuiltinRule::SimilarToUsername
                | BuiltinRule::Sequences
                | BuiltinRule::Repetitions
                | BuiltinRule::CommonPassword
        )
    }

    /// Whether the rule's condition holds, independent of its weight.
    ///
    /// Length rules report whether the length requirement is satisfied;
    /// every other rule reports whether its pattern matched.
    pub fn is_met(self, config: &Configuration, password: &str) -> bool {
        match self {
            BuiltinRule::NotEmail => identity::looks_like_email(password),
            BuiltinRule::MinLength => length::meets_min_length(config, password),
            BuiltinRule::MaxLength => length::within_max_length(config, password),
            BuiltinRule::InvalidChar => identity::has_invalid_char(config, password),
            BuiltinRule::SimilarToUsername => {
                identity::contains_username(password, config.username())
            }
            BuiltinRule::Sequences => pattern::has_forbidden_sequence(password),
            BuiltinRule::TwoCharacterClasses => variety::has_two_character_classes(password),
            BuiltinRule::Repetitions => pattern::has_repetition(password),
            BuiltinRule::Lowercase => variety::has_lowercase(password),
            BuiltinRule::Uppercase => variety::has_uppercase(password),
            BuiltinRule::OneNumber => variety::has_number(password),
            BuiltinRule::ThreeNumbers => variety::has_three_numbers(password),
            BuiltinRule::OneSpecialChar => variety::has_special_char(password),
            BuiltinRule::TwoSpecialChars => variety::has_two_special_chars(password),
            BuiltinRule::UpperLowerCombo => variety::has_upper_lower_combo(password),
            BuiltinRule::LetterNumberCombo => variety::has_letter_number_combo(password),
            BuiltinRule::LetterNumberCharCombo => {
                variety::has_letter_number_char_combo(password)
            }
            BuiltinRule::CommonPassword => config.is_common_password(password),
        }
    }

    pub fn evaluate(self, config: &Configuration, password: &str, weight: f64) -> RuleOutcome {
        match self {
            BuiltinRule::MinLength => length::min_length_rule(config, password, weight),
            BuiltinRule::MaxLength => length::max_length_rule(config, password, weight),
            rule if rule.is_penalty() => {
                if rule.is_met(config, password) {
                    RuleOutcome::Fail(weight)
                } else {
                    RuleOutcome::Skip
                }
            }
            rule => {
                if rule.is_met(config, password) {
                    RuleOutcome::Pass(weight)
                } else {
                    RuleOutcome::Fail(0.0)
                }
            }
        }
    }
}

impl fmt::Display for BuiltinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
