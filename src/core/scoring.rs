use thiserror::Error;

use crate::models::{
    OpportunityFactors, OpportunityTier, ScoringWeights, DEFAULT_WEIGHTS, MAX_SUB_SCORE,
    MIN_SUB_SCORE, NEUTRAL_SUB_SCORE,
};

/// Errors raised by the scoring core
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("{field} must be within [1, 10], got {value}")]
    SubScoreOutOfRange { field: &'static str, value: f64 },

    #[error("Invalid score pattern: {0}")]
    InvalidPattern(String),
}

impl OpportunityFactors {
    /// Check every supplied sub-score lies within [1, 10]
    pub fn validate(&self) -> Result<(), ScoringError> {
        let fields = [
            ("trend_score", self.trend_score),
            ("profit_potential", self.profit_potential),
            ("market_demand", self.market_demand),
        ];

        for (field, value) in fields {
            if let Some(value) = value {
                if !(MIN_SUB_SCORE..=MAX_SUB_SCORE).contains(&value) {
                    return Err(ScoringError::SubScoreOutOfRange { field, value });
                }
            }
        }

        Ok(())
    }
}

/// Blends the four opportunity signals into one ranking number.
///
/// Scoring formula:
/// score = (
///     trend_score * 0.25 +
///     profit_potential * 0.30 +
///     market_demand * 0.30 +
///     competition_proxy * 0.15     # Lower competition = higher proxy
/// )
///
/// The result is rounded to two decimals and never clamped: with inputs in
/// [1, 10] and weights summing to one it already lies in [1, 10].
#[derive(Debug, Clone, Copy)]
pub struct OpportunityScorer {
    weights: ScoringWeights,
}

impl OpportunityScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        debug_assert!(
            (weights.sum() - 1.0).abs() < 1e-9,
            "scoring weights must sum to 1.0, got {}",
            weights.sum()
        );
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self::new(DEFAULT_WEIGHTS)
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Compute the opportunity score for a set of factors
    pub fn score(&self, factors: &OpportunityFactors) -> f64 {
        let trend = validated_sub_score("trend_score", factors.trend_score);
        let profit = validated_sub_score("profit_potential", factors.profit_potential);
        let demand = validated_sub_score("market_demand", factors.market_demand);
        let competition = factors.competition().proxy_score();

        let total = trend * self.weights.trend
            + profit * self.weights.profit
            + demand * self.weights.demand
            + competition * self.weights.competition;

        round_to_cents(total)
    }

    /// Score and bucket in one step
    pub fn score_with_tier(&self, factors: &OpportunityFactors) -> (f64, OpportunityTier) {
        let score = self.score(factors);
        (score, OpportunityTier::from_score(score))
    }
}

impl Default for OpportunityScorer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Resolve a sub-score: missing or NaN becomes neutral, out of range
/// (infinities included) is a contract violation (panics in debug builds,
/// clamped otherwise).
fn validated_sub_score(field: &'static str, value: Option<f64>) -> f64 {
    let Some(value) = value else {
        return NEUTRAL_SUB_SCORE;
    };

    if value.is_nan() {
        tracing::warn!("NaN {}, using neutral score", field);
        return NEUTRAL_SUB_SCORE;
    }

    debug_assert!(
        (MIN_SUB_SCORE..=MAX_SUB_SCORE).contains(&value),
        "{} out of range [1, 10]: {}",
        field,
        value
    );

    if !(MIN_SUB_SCORE..=MAX_SUB_SCORE).contains(&value) {
        tracing::warn!("{} out of range ({}), clamping", field, value);
    }

    value.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE)
}

/// Round to two decimals, half away from zero
#[inline]
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
