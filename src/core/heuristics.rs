//! Caller-side derivation of sub-scores from raw listing data.
//!
//! These are threshold tables, kept as named constants so they can be
//! tested and tuned in one place.

use serde::{Deserialize, Serialize};

use crate::models::{CompetitionLevel, Platform, MAX_SUB_SCORE, MIN_SUB_SCORE};

/// Competitor-count upper bounds (exclusive) for Low, Medium and High
pub const COMPETITION_BUCKETS: [(usize, CompetitionLevel); 3] = [
    (10, CompetitionLevel::Low),
    (50, CompetitionLevel::Medium),
    (200, CompetitionLevel::High),
];

/// Margin assumed for platforms without a dedicated estimate
pub const DEFAULT_MARGIN: f64 = 0.25;

/// Estimated-profit breakpoints (exclusive lower bound, score)
pub const PROFIT_BREAKPOINTS: [(f64, f64); 4] = [(50.0, 9.0), (25.0, 7.0), (10.0, 5.0), (5.0, 3.0)];

/// Profit score when no breakpoint is exceeded
pub const PROFIT_FLOOR_SCORE: f64 = 2.0;

/// Sales-volume bonuses for profit potential (exclusive threshold, bonus);
/// only the first matching tier applies
pub const PROFIT_SALES_BONUSES: [(i64, f64); 2] = [(100, 1.5), (50, 1.0)];

/// Sales-volume bonuses for demand (exclusive threshold, bonus);
/// only the first matching tier applies
pub const DEMAND_SALES_BONUSES: [(i64, f64); 2] = [(1000, 1.5), (100, 1.0)];

/// Review-count threshold (exclusive) and its demand bonus
pub const DEMAND_REVIEW_BONUS: (i64, f64) = (500, 1.0);

/// Bucket a raw competitor count into a competition level
pub fn competition_level_for_count(competitor_count: usize) -> CompetitionLevel {
    COMPETITION_BUCKETS
        .iter()
        .find(|(bound, _)| competitor_count < *bound)
        .map(|(_, level)| *level)
        .unwrap_or(CompetitionLevel::VeryHigh)
}

/// Estimated margin after platform fees
pub fn platform_margin(platform: &Platform) -> f64 {
    match platform {
        Platform::Ebay => 0.25,
        Platform::Amazon => 0.15,
        Platform::Etsy => 0.35,
        Platform::Shopify => 0.45,
        Platform::Other(_) => DEFAULT_MARGIN,
    }
}

/// Profit potential with the figures it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitEstimate {
    pub score: f64,
    pub estimated_profit: f64,
    pub estimated_margin: f64,
}

/// Score profit potential from price, platform margin and sales volume
pub fn profit_potential(price: f64, sales_count: i64, platform: &Platform) -> ProfitEstimate {
    let estimated_margin = platform_margin(platform);
    let estimated_profit = price * estimated_margin;

    let base = PROFIT_BREAKPOINTS
        .iter()
        .find(|(bound, _)| estimated_profit > *bound)
        .map(|(_, score)| *score)
        .unwrap_or(PROFIT_FLOOR_SCORE);

    let bonus = first_bonus(&PROFIT_SALES_BONUSES, sales_count);

    ProfitEstimate {
        score: (base + bonus).min(MAX_SUB_SCORE),
        estimated_profit,
        estimated_margin,
    }
}

/// Adjust an AI-derived demand score with observed sales and reviews.
/// Bonuses accumulate, then the total is capped into [1, 10].
pub fn adjust_demand(base_score: f64, sales_count: i64, review_count: i64) -> f64 {
    let mut score = base_score + first_bonus(&DEMAND_SALES_BONUSES, sales_count);

    let (review_threshold, review_bonus) = DEMAND_REVIEW_BONUS;
    if review_count > review_threshold {
        score += review_bonus;
    }

    score.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE)
}

#[inline]
fn first_bonus(table: &[(i64, f64)], count: i64) -> f64 {
    table
        .iter()
        .find(|(threshold, _)| count > *threshold)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competition_buckets() {
        assert_eq!(competition_level_for_count(0), CompetitionLevel::Low);
        assert_eq!(competition_level_for_count(9), CompetitionLevel::Low);
        assert_eq!(competition_level_for_count(10), CompetitionLevel::Medium);
        assert_eq!(competition_level_for_count(49), CompetitionLevel::Medium);
        assert_eq!(competition_level_for_count(50), CompetitionLevel::High);
        assert_eq!(competition_level_for_count(199), CompetitionLevel::High);
        assert_eq!(competition_level_for_count(200), CompetitionLevel::VeryHigh);
        assert_eq!(competition_level_for_count(10_000), CompetitionLevel::VeryHigh);
    }

    #[test]
    fn test_platform_margins() {
        assert_eq!(platform_margin(&Platform::Ebay), 0.25);
        assert_eq!(platform_margin(&Platform::Amazon), 0.15);
        assert_eq!(platform_margin(&Platform::Etsy), 0.35);
        assert_eq!(platform_margin(&Platform::Shopify), 0.45);
        assert_eq!(platform_margin(&Platform::Other("walmart".into())), DEFAULT_MARGIN);
    }

    #[test]
    fn test_profit_breakpoints() {
        // shopify margin 0.45
        assert_eq!(profit_potential(200.0, 0, &Platform::Shopify).score, 9.0); // 90
        assert_eq!(profit_potential(100.0, 0, &Platform::Shopify).score, 7.0); // 45
        assert_eq!(profit_potential(40.0, 0, &Platform::Shopify).score, 5.0); // 18
        assert_eq!(profit_potential(20.0, 0, &Platform::Shopify).score, 3.0); // 9
        assert_eq!(profit_potential(10.0, 0, &Platform::Shopify).score, 2.0); // 4.5
    }

    #[test]
    fn test_profit_breakpoint_is_exclusive() {
        // ebay: 200 * 0.25 = 50, not > 50
        let estimate = profit_potential(200.0, 0, &Platform::Ebay);
        assert_eq!(estimate.estimated_profit, 50.0);
        assert_eq!(estimate.estimated_margin, 0.25);
        assert_eq!(estimate.score, 7.0);
    }

    #[test]
    fn test_profit_sales_bonus() {
        assert_eq!(profit_potential(40.0, 101, &Platform::Shopify).score, 6.5);
        assert_eq!(profit_potential(40.0, 100, &Platform::Shopify).score, 6.0);
        assert_eq!(profit_potential(40.0, 51, &Platform::Shopify).score, 6.0);
        assert_eq!(profit_potential(40.0, 50, &Platform::Shopify).score, 5.0);
    }

    #[test]
    fn test_profit_bonus_capped() {
        assert_eq!(profit_potential(1000.0, 5000, &Platform::Etsy).score, 10.0);
    }

    #[test]
    fn test_demand_adjustments() {
        assert_eq!(adjust_demand(5.0, 0, 0), 5.0);
        assert_eq!(adjust_demand(5.0, 101, 0), 6.0);
        assert_eq!(adjust_demand(5.0, 1001, 0), 6.5);
        assert_eq!(adjust_demand(5.0, 1001, 501), 7.5);
        assert_eq!(adjust_demand(5.0, 0, 500), 5.0);
    }

    #[test]
    fn test_demand_capped_cumulatively() {
        assert_eq!(adjust_demand(9.0, 5000, 5000), 10.0);
        assert_eq!(adjust_demand(10.0, 0, 0), 10.0);
    }

    #[test]
    fn test_demand_floor() {
        // an unclamped default below range is lifted into [1, 10]
        assert_eq!(adjust_demand(-2.0, 0, 0), 1.0);
    }
}
