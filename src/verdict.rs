//! Verdict tiers - maps a score onto six strength levels.

use std::fmt;

/// Strength tier, from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    VeryWeak,
    Weak,
    Normal,
    Medium,
    Strong,
    VeryStrong,
}

impl Tier {
    pub const ALL: [Tier; 6] = [
        Tier::VeryWeak,
        Tier::Weak,
        Tier::Normal,
        Tier::Medium,
        Tier::Strong,
        Tier::VeryStrong,
    ];

    /// Position in `0..=5`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn default_label(self) -> &'static str {
        match self {
            Tier::VeryWeak => "Very Weak",
            Tier::Weak => "Weak",
            Tier::Normal => "Normal",
            Tier::Medium => "Medium",
            Tier::Strong => "Strong",
            Tier::VeryStrong => "Very Strong",
        }
    }

    /// Color class for progress bars and verdict badges.
    pub fn color_class(self) -> &'static str {
        match self {
            Tier::VeryWeak | Tier::Weak | Tier::Normal => "danger",
            Tier::Medium | Tier::Strong => "warning",
            Tier::VeryStrong => "success",
        }
    }

    /// Status class for the enclosing form field.
    pub fn status_class(self) -> &'static str {
        match self.index() / 2 {
            0 => "error",
            1 => "warning",
            _ => "success",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_label())
    }
}

/// Tier plus its configured label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub tier: Tier,
    pub label: String,
}

/// Maps a score onto a tier.
///
/// `score <= t[0]` is tier 0, `score < t[k]` is tier `k` for `k` in `1..=4`,
/// anything higher is tier 5. A NaN score maps to tier 0.
pub fn map_tier(score: f64, thresholds: &[i64; 5]) -> Tier {
    if score.is_nan() || score <= thresholds[0] as f64 {
        return Tier::VeryWeak;
    }
    thresholds[1..]
        .iter()
        .position(|&t| score < t as f64)
        .and_then(|i| Tier::from_index(i + 1))
        .unwrap_or(Tier::VeryStrong)
}

const EMPTY_PERCENTAGE: u8 = 1;
const MIN_PERCENTAGE: u8 = 1;

/// Progress bar fill: `floor(100 * score / t[4])` clamped to `1..=100`.
///
/// No score gives the empty fill. A non-positive top threshold fills the bar
/// for any positive score.
pub fn progress_percentage(score: Option<f64>, thresholds: &[i64; 5]) -> u8 {
    let Some(score) = score else {
        return EMPTY_PERCENTAGE;
    };
    let max = thresholds[4] as f64;
    let raw = if max > 0.0 {
        (100.0 * score / max).floor()
    } else if score > 0.0 {
        100.0
    } else {
        0.0
    };
    if raw.is_nan() || raw <= MIN_PERCENTAGE as f64 {
        MIN_PERCENTAGE
    } else if raw > 100.0 {
        100
    } else {
        raw as u8
    }
}
