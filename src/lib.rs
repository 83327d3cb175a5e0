//! Rule-based password strength scoring
//!
//! This library scores a password against a configurable table of weighted
//! rules, collects the messages of the rules it violates and maps the total
//! onto one of six verdict tiers.
//!
//! # Features
//!
//! - `async` (default): Enables cancellable and debounced evaluation
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWSTRENGTH_COMMON_PASSWORDS`: Path to a common password file, read by
//!   [`ConfigurationBuilder::common_passwords_from_env`]
//!
//! # Example
//!
//! ```rust
//! use pwstrength::{Configuration, Tier};
//! use secrecy::SecretString;
//!
//! // Build the configuration once at startup
//! let config = Configuration::builder()
//!     .username("alice")
//!     .build()
//!     .expect("valid configuration");
//!
//! let password = SecretString::new("Tr0ub4dor&3".to_string().into());
//! let evaluation = config.evaluate(&password);
//!
//! println!("Score: {:?}", evaluation.score);
//! println!("Verdict: {}", evaluation.label());
//! assert!(evaluation.tier() >= Some(Tier::Strong));
//! ```

// Internal modules
mod common_passwords;
mod config;
mod evaluator;
mod rules;
mod verdict;

// Public API
pub use common_passwords::{
    common_passwords_path, default_common_passwords, load_common_passwords,
    CommonPasswordsError, COMMON_PASSWORDS_ENV, DEFAULT_COMMON_PASSWORDS,
};
pub use config::{
    ConfigError, Configuration, ConfigurationBuilder, Options, RuleOptions, DEFAULT_INVALID_CHARS,
    DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH, DEFAULT_RAISE_POWER, DEFAULT_THRESHOLDS,
};
pub use evaluator::{evaluate, EvaluationResult};
pub use rules::{
    BuiltinRule, CustomPredicate, RuleDefinition, RuleOutcome, RulePredicate, RuleReport,
    FORBIDDEN_SEQUENCES,
};
pub use verdict::{map_tier, progress_percentage, Tier, Verdict};

#[cfg(feature = "async")]
pub use evaluator::{evaluate_cancellable, evaluate_tx};
