use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Tunables for one reconciliation run. Every field defaults, so an empty
/// TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    /// Match acceptance floor, in `[0, 1]`.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default)]
    pub strategy: MatchStrategy,
    #[serde(default)]
    pub weights: ScoringConfig,
    #[serde(default)]
    pub price: PriceTolerance,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            strategy: MatchStrategy::default(),
            weights: ScoringConfig::default(),
            price: PriceTolerance::default(),
        }
    }
}

fn default_min_score() -> f64 {
    0.5
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Highest score first, one-to-one.
    #[default]
    Greedy,
    /// Maximum total score over all eligible pairs (Hungarian assignment).
    Optimal,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::Optimal => write!(f, "optimal"),
        }
    }
}

impl std::str::FromStr for MatchStrategy {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(Self::Greedy),
            "optimal" => Ok(Self::Optimal),
            other => Err(ReconError::config(
                "strategy",
                format!("unknown strategy \"{other}\" (expected \"greedy\" or \"optimal\")"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring weights + price tolerance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default = "default_brand_weight")]
    pub brand: f64,
    #[serde(default = "default_title_weight")]
    pub title: f64,
    /// Added when the catalog brand shows up in the web snippet.
    #[serde(default = "default_snippet_bonus")]
    pub snippet_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            brand: default_brand_weight(),
            title: default_title_weight(),
            snippet_bonus: default_snippet_bonus(),
        }
    }
}

fn default_brand_weight() -> f64 {
    0.4
}

fn default_title_weight() -> f64 {
    0.6
}

fn default_snippet_bonus() -> f64 {
    0.2
}

/// A matched pair is in conflict when either threshold is exceeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceTolerance {
    /// Fraction of the catalog price.
    #[serde(default = "default_relative_threshold")]
    pub relative_threshold: f64,
    /// Currency units.
    #[serde(default = "default_absolute_threshold")]
    pub absolute_threshold: f64,
}

impl Default for PriceTolerance {
    fn default() -> Self {
        Self {
            relative_threshold: default_relative_threshold(),
            absolute_threshold: default_absolute_threshold(),
        }
    }
}

fn default_relative_threshold() -> f64 {
    0.20
}

fn default_absolute_threshold() -> f64 {
    5.00
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if !self.min_score.is_finite() || !(0.0..=1.0).contains(&self.min_score) {
            return Err(ReconError::config(
                "min_score",
                format!("must be within [0, 1], got {}", self.min_score),
            ));
        }

        let non_negative = [
            ("weights.brand", self.weights.brand),
            ("weights.title", self.weights.title),
            ("weights.snippet_bonus", self.weights.snippet_bonus),
            ("price.relative_threshold", self.price.relative_threshold),
            ("price.absolute_threshold", self.price.absolute_threshold),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ReconError::config(
                    key,
                    format!("must be a non-negative number, got {value}"),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
