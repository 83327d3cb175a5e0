//! Scoring configuration.
//!
//! A [`Configuration`] is built once, validated, and then only read. It can
//! be assembled with [`ConfigurationBuilder`] or deserialized from an
//! [`Options`] tree (for example a TOML document).
//!
//! ```
//! use pwstrength::Configuration;
//!
//! let config = Configuration::from_toml_str(r#"
//!     min_length = 8
//!     username = "alice"
//!     thresholds = [0, 10, 20, 30, 40]
//!
//!     [[rules]]
//!     name = "max-length"
//!     active = true
//!
//!     [[rules]]
//!     name = "sequences"
//!     weight = -40
//! "#).unwrap();
//!
//! assert_eq!(config.min_length(), 8);
//! assert_eq!(config.rule("sequences").map(|r| r.weight()), Some(-40));
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::common_passwords::{
    common_passwords_path, default_common_passwords, load_common_passwords, CommonPasswordsError,
};
use crate::evaluator::{self, EvaluationResult};
use crate::rules::{BuiltinRule, RuleDefinition, RuleOutcome, RulePredicate};
use crate::verdict::{self, Tier, Verdict};

pub const DEFAULT_MIN_LENGTH: usize = 6;
pub const DEFAULT_MAX_LENGTH: usize = 20;
pub const DEFAULT_RAISE_POWER: f64 = 1.4;
pub const DEFAULT_INVALID_CHARS: &str = r#"[\s,'"]"#;
pub const DEFAULT_THRESHOLDS: [i64; 5] = [0, 14, 26, 38, 50];

/// Smallest password length for which `len ^ raise_power` must stay finite.
const LENGTH_SCORE_CAP: usize = 1024;

/// Configuration error, raised when a configuration is constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Thresholds must be strictly ascending: {0:?}")]
    ThresholdsNotAscending([i64; 5]),

    #[error("Expected 5 thresholds, got {0}")]
    ThresholdCount(usize),

    #[error("Expected 6 verdict labels, got {0}")]
    LabelCount(usize),

    #[error("Rule set is empty")]
    EmptyRules,

    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("Maximum length {max} is below minimum length {min}")]
    LengthBounds { min: usize, max: usize },

    #[error("Raise power must keep the length score finite, got {0}")]
    InvalidRaisePower(f64),

    #[error("Invalid character pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(transparent)]
    CommonPasswords(#[from] CommonPasswordsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Validated, read-only scoring configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    min_length: usize,
    max_length: usize,
    raise_power: f64,
    invalid_chars: Regex,
    username: Option<String>,
    common_passwords: HashSet<String>,
    rules: Vec<RuleDefinition>,
    thresholds: [i64; 5],
    labels: [String; 6],
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Builds a configuration from an options tree.
    ///
    /// Rule entries override builtin rules of the same name; when
    /// `include_default_rules` is false, only the listed builtin rules are
    /// used.
    ///
    /// # Errors
    ///
    /// Returns error for unknown rule names, wrong threshold or label counts,
    /// an unreadable common password file, or any failed validation of
    /// [`ConfigurationBuilder::build`].
    pub fn from_options(options: Options) -> Result<Self, ConfigError> {
        let mut builder = if options.include_default_rules {
            ConfigurationBuilder::new()
        } else {
            ConfigurationBuilder::empty()
        };

        if let Some(min) = options.min_length {
            builder = builder.min_length(min);
        }
        if let Some(max) = options.max_length {
            builder = builder.max_length(max);
        }
        if let Some(power) = options.raise_power {
            builder = builder.raise_power(power);
        }
        if let Some(pattern) = options.invalid_chars {
            builder = builder.invalid_chars(pattern);
        }
        if let Some(username) = options.username {
            builder = builder.username(username);
        }

        match (options.common_passwords, options.common_passwords_path) {
            (Some(list), Some(path)) => {
                let mut set = load_common_passwords(&path)?;
                set.extend(list);
                builder = builder.common_passwords(set);
            }
            (Some(list), None) => builder = builder.common_passwords(list),
            (None, Some(path)) => builder = builder.common_passwords_from_path(&path)?,
            (None, None) => {}
        }

        if let Some(thresholds) = options.thresholds {
            let count = thresholds.len();
            let thresholds: [i64; 5] = thresholds
                .try_into()
                .map_err(|_| ConfigError::ThresholdCount(count))?;
            builder = builder.thresholds(thresholds);
        }
        if let Some(labels) = options.labels {
            let count = labels.len();
            let labels: [String; 6] = labels
                .try_into()
                .map_err(|_| ConfigError::LabelCount(count))?;
            builder = builder.labels(labels);
        }

        for entry in options.rules {
            if !builder.has_rule(&entry.name) {
                let rule = BuiltinRule::from_name(&entry.name)
                    .ok_or_else(|| ConfigError::UnknownRule(entry.name.clone()))?;
                builder = builder.builtin(rule);
            }
            if let Some(weight) = entry.weight {
                builder = builder.rule_weight(&entry.name, weight);
            }
            if let Some(active) = entry.active {
                builder = builder.rule_active(&entry.name, active);
            }
            if let Some(message) = entry.message {
                builder = builder.rule_message(&entry.name, message);
            }
        }

        builder.build()
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let options: Options = toml::from_str(s)?;
        Self::from_options(options)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Evaluates a password against this configuration.
    pub fn evaluate(&self, password: &SecretString) -> EvaluationResult {
        evaluator::evaluate(self, password)
    }

    /// Whether the named rule's condition holds for the password.
    ///
    /// Length rules report whether the length bound is respected. Custom
    /// rules are met when they pass. Returns `None` for an unknown rule.
    pub fn rule_is_met(&self, name: &str, password: &SecretString) -> Option<bool> {
        let rule = self.rule(name)?;
        let pwd = password.expose_secret();
        let met = match rule.predicate() {
            RulePredicate::Builtin(builtin) => builtin.is_met(self, pwd),
            RulePredicate::Custom(predicate) => matches!(
                predicate(self, pwd, rule.weight() as f64).sanitized(),
                RuleOutcome::Pass(_)
            ),
        };
        Some(met)
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn raise_power(&self) -> f64 {
        self.raise_power
    }

    pub fn invalid_chars(&self) -> &Regex {
        &self.invalid_chars
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Exact, case-sensitive membership in the common password list.
    pub fn is_common_password(&self, password: &str) -> bool {
        self.common_passwords.contains(password)
    }

    pub fn common_passwords(&self) -> &HashSet<String> {
        &self.common_passwords
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[RuleDefinition] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.iter().find(|r| r.name() == name)
    }

    pub fn thresholds(&self) -> &[i64; 5] {
        &self.thresholds
    }

    pub fn label(&self, tier: Tier) -> &str {
        &self.labels[tier.index()]
    }

    pub fn verdict_for(&self, score: f64) -> Verdict {
        let tier = verdict::map_tier(score, &self.thresholds);
        Verdict {
            tier,
            label: self.label(tier).to_string(),
        }
    }

    /// Progress bar fill for a score, relative to the highest threshold.
    pub fn progress_percentage(&self, score: Option<f64>) -> u8 {
        verdict::progress_percentage(score, &self.thresholds)
    }
}

/// Builder for [`Configuration`], starting from the builtin rule catalog.
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    min_length: usize,
    max_length: usize,
    raise_power: f64,
    invalid_chars: String,
    username: Option<String>,
    common_passwords: HashSet<String>,
    rules: Vec<RuleDefinition>,
    thresholds: [i64; 5],
    labels: [String; 6],
    unknown_rules: Vec<String>,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationBuilder {
    /// Defaults with every builtin rule.
    pub fn new() -> Self {
        let mut builder = Self::empty();
        builder.rules = BuiltinRule::ALL
            .into_iter()
            .map(RuleDefinition::builtin)
            .collect();
        builder
    }

    /// Defaults with no rules; add them with [`builtin`](Self::builtin) or
    /// [`add_rule`](Self::add_rule).
    pub fn empty() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            raise_power: DEFAULT_RAISE_POWER,
            invalid_chars: DEFAULT_INVALID_CHARS.to_string(),
            username: None,
            common_passwords: default_common_passwords(),
            rules: Vec::new(),
            thresholds: DEFAULT_THRESHOLDS,
            labels: Tier::ALL.map(|tier| tier.default_label().to_string()),
            unknown_rules: Vec::new(),
        }
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Exponent of the length score `len ^ raise_power`.
    pub fn raise_power(mut self, raise_power: f64) -> Self {
        self.raise_power = raise_power;
        self
    }

    /// Regex matched by the `invalid-char` rule.
    pub fn invalid_chars(mut self, pattern: impl Into<String>) -> Self {
        self.invalid_chars = pattern.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Replaces the common password list.
    pub fn common_passwords<I, S>(mut self, passwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_passwords = passwords.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the common password list with the contents of a file.
    pub fn common_passwords_from_path(
        self,
        path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let set = load_common_passwords(path)?;
        Ok(self.common_passwords(set))
    }

    /// Loads the common password list named by `PWSTRENGTH_COMMON_PASSWORDS`,
    /// keeping the current list when the variable is unset.
    pub fn common_passwords_from_env(self) -> Result<Self, ConfigError> {
        match common_passwords_path() {
            Some(path) => self.common_passwords_from_path(path),
            None => Ok(self),
        }
    }

    pub fn thresholds(mut self, thresholds: [i64; 5]) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Verdict labels, from weakest to strongest.
    pub fn labels(mut self, labels: [String; 6]) -> Self {
        self.labels = labels;
        self
    }

    /// Appends a builtin rule with its defaults, or resets it if present.
    pub fn builtin(self, rule: BuiltinRule) -> Self {
        self.add_rule(RuleDefinition::builtin(rule))
    }

    /// Appends a rule, or replaces the rule with the same name in place.
    pub fn add_rule(mut self, rule: RuleDefinition) -> Self {
        match self.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    pub fn rule_weight(self, name: &str, weight: i64) -> Self {
        self.update_rule(name, |rule| rule.weight = weight)
    }

    pub fn rule_active(self, name: &str, active: bool) -> Self {
        self.update_rule(name, |rule| rule.active = active)
    }

    /// Sets the violation message; an empty message silences the rule.
    pub fn rule_message(self, name: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        self.update_rule(name, |rule| rule.message = Some(message))
    }

    fn has_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name == name)
    }

    fn update_rule(mut self, name: &str, update: impl FnOnce(&mut RuleDefinition)) -> Self {
        match self.rules.iter_mut().find(|r| r.name == name) {
            Some(rule) => update(rule),
            None => self.unknown_rules.push(name.to_string()),
        }
        self
    }

    /// Validates and freezes the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if a rule setter named an unknown rule, the rule set is
    /// empty, the thresholds are not strictly ascending, the length bounds
    /// are inverted, the raise power is not finite, or the invalid character
    /// pattern does not compile.
    pub fn build(self) -> Result<Configuration, ConfigError> {
        if let Some(name) = self.unknown_rules.into_iter().next() {
            return Err(ConfigError::UnknownRule(name));
        }
        if self.rules.is_empty() {
            return Err(ConfigError::EmptyRules);
        }
        if !self.thresholds.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::ThresholdsNotAscending(self.thresholds));
        }
        if self.max_length < self.min_length {
            return Err(ConfigError::LengthBounds {
                min: self.min_length,
                max: self.max_length,
            });
        }
        let longest = self.max_length.max(LENGTH_SCORE_CAP) as f64;
        if !self.raise_power.is_finite() || !longest.powf(self.raise_power).is_finite() {
            return Err(ConfigError::InvalidRaisePower(self.raise_power));
        }
        let invalid_chars = Regex::new(&self.invalid_chars)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Password strength configuration built: {} rules ({} active), {} common passwords",
            self.rules.len(),
            self.rules.iter().filter(|r| r.active).count(),
            self.common_passwords.len()
        );

        Ok(Configuration {
            min_length: self.min_length,
            max_length: self.max_length,
            raise_power: self.raise_power,
            invalid_chars,
            username: self.username,
            common_passwords: self.common_passwords,
            rules: self.rules,
            thresholds: self.thresholds,
            labels: self.labels,
        })
    }
}

/// Deserializable options tree. Every key is optional and unknown keys are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub raise_power: Option<f64>,
    pub invalid_chars: Option<String>,
    pub username: Option<String>,
    /// Replaces the builtin common password list.
    pub common_passwords: Option<Vec<String>>,
    /// File with one common password per line; merged with
    /// `common_passwords` when both are given.
    pub common_passwords_path: Option<PathBuf>,
    pub thresholds: Option<Vec<i64>>,
    pub labels: Option<Vec<String>>,
    pub include_default_rules: bool,
    pub rules: Vec<RuleOptions>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            raise_power: None,
            invalid_chars: None,
            username: None,
            common_passwords: None,
            common_passwords_path: None,
            thresholds: None,
            labels: None,
            include_default_rules: true,
            rules: Vec::new(),
        }
    }
}

/// Override for a single rule, keyed by rule name.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleOptions {
    pub name: String,
    #[serde(default)]
    pub weight: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}
