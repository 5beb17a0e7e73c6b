use serde::{Deserialize, Serialize};
use std::fmt;

/// Neutral midpoint used for any sub-score that was not supplied
pub const NEUTRAL_SUB_SCORE: f64 = 5.0;

/// Lowest value a sub-score may take
pub const MIN_SUB_SCORE: f64 = 1.0;

/// Highest value a sub-score may take
pub const MAX_SUB_SCORE: f64 = 10.0;

/// Score at or above which a product is a high opportunity
pub const HIGH_TIER_THRESHOLD: f64 = 7.5;

/// Score at or above which a product is a medium opportunity
pub const MEDIUM_TIER_THRESHOLD: f64 = 5.5;

/// Marketplace a product was collected from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Ebay,
    Amazon,
    Etsy,
    Shopify,
    Other(String),
}

impl Platform {
    /// Parse a platform name, case-insensitively. Never fails.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "ebay" => Platform::Ebay,
            "amazon" => Platform::Amazon,
            "etsy" => Platform::Etsy,
            "shopify" => Platform::Shopify,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Ebay => "ebay",
            Platform::Amazon => "amazon",
            Platform::Etsy => "etsy",
            Platform::Shopify => "shopify",
            Platform::Other(name) => name,
        }
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Platform::from_name(&value)
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical competition level for a product's market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    #[default]
    Unknown,
}

impl CompetitionLevel {
    /// Parse a competition label. Unrecognised labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" => CompetitionLevel::Low,
            "medium" => CompetitionLevel::Medium,
            "high" => CompetitionLevel::High,
            "very high" | "very_high" | "veryhigh" => CompetitionLevel::VeryHigh,
            _ => CompetitionLevel::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompetitionLevel::Low => "Low",
            CompetitionLevel::Medium => "Medium",
            CompetitionLevel::High => "High",
            CompetitionLevel::VeryHigh => "Very High",
            CompetitionLevel::Unknown => "Unknown",
        }
    }

    /// Numeric stand-in used inside the weighted sum.
    /// Lower competition yields a higher proxy.
    pub fn proxy_score(&self) -> f64 {
        match self {
            CompetitionLevel::Low => 9.0,
            CompetitionLevel::Medium => 6.0,
            CompetitionLevel::High => 4.0,
            CompetitionLevel::VeryHigh => 2.0,
            CompetitionLevel::Unknown => 5.0,
        }
    }
}

impl From<String> for CompetitionLevel {
    fn from(value: String) -> Self {
        CompetitionLevel::from_label(&value)
    }
}

impl From<CompetitionLevel> for String {
    fn from(value: CompetitionLevel) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four signals blended into an opportunity score.
///
/// Absent numeric factors count as [`NEUTRAL_SUB_SCORE`]; an absent
/// competition level is the same as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunityFactors {
    #[serde(rename = "trendScore", alias = "trend_score", default)]
    pub trend_score: Option<f64>,
    #[serde(rename = "profitPotential", alias = "profit_potential", default)]
    pub profit_potential: Option<f64>,
    #[serde(rename = "marketDemand", alias = "market_demand", default)]
    pub market_demand: Option<f64>,
    #[serde(rename = "competitionLevel", alias = "competition_level", default)]
    pub competition_level: Option<CompetitionLevel>,
}

impl OpportunityFactors {
    pub fn new(
        trend_score: f64,
        profit_potential: f64,
        market_demand: f64,
        competition_level: CompetitionLevel,
    ) -> Self {
        Self {
            trend_score: Some(trend_score),
            profit_potential: Some(profit_potential),
            market_demand: Some(market_demand),
            competition_level: Some(competition_level),
        }
    }

    /// Competition level, treating a missing value as `Unknown`
    pub fn competition(&self) -> CompetitionLevel {
        self.competition_level.unwrap_or_default()
    }
}

/// Reporting bucket derived from an opportunity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityTier {
    High,
    Medium,
    Low,
}

impl OpportunityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_TIER_THRESHOLD {
            OpportunityTier::High
        } else if score >= MEDIUM_TIER_THRESHOLD {
            OpportunityTier::Medium
        } else {
            OpportunityTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityTier::High => "high",
            OpportunityTier::Medium => "medium",
            OpportunityTier::Low => "low",
        }
    }
}

/// Weights applied to each sub-score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub trend: f64,
    pub profit: f64,
    pub demand: f64,
    pub competition: f64,
}

/// Default weighting: profit and demand dominate, competition matters least
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    trend: 0.25,
    profit: 0.30,
    demand: 0.30,
    competition: 0.15,
};

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.trend + self.profit + self.demand + self.competition
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

/// Product listing collected from a marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub platform: Platform,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(rename = "salesCount", alias = "sales_count", default)]
    pub sales_count: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "reviewCount", alias = "review_count", default)]
    pub review_count: Option<i64>,
    #[serde(rename = "sellerInfo", alias = "seller_info", default)]
    pub seller_info: Option<String>,
    #[serde(rename = "productUrl", alias = "product_url", default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_currency() -> String { "USD".to_string() }

impl Product {
    pub fn sales(&self) -> i64 {
        self.sales_count.unwrap_or(0)
    }

    pub fn reviews(&self) -> i64 {
        self.review_count.unwrap_or(0)
    }

    pub fn category_or_na(&self) -> &str {
        self.category.as_deref().filter(|c| !c.is_empty()).unwrap_or("N/A")
    }
}

/// Full result of analysing one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAnalysis {
    pub trend_score: f64,
    pub competition_level: CompetitionLevel,
    pub competitor_count: usize,
    pub profit_potential: f64,
    pub estimated_profit: f64,
    pub estimated_margin: f64,
    pub market_demand: f64,
    pub opportunity_score: f64,
    pub tier: OpportunityTier,
    pub ai_recommendation: String,
}

impl ProductAnalysis {
    pub fn factors(&self) -> OpportunityFactors {
        OpportunityFactors::new(
            self.trend_score,
            self.profit_potential,
            self.market_demand,
            self.competition_level,
        )
    }
}

/// Keyword research derived from generated text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysis {
    pub primary_keywords: Vec<String>,
    pub secondary_keywords: Vec<String>,
    pub long_tail_keywords: Vec<String>,
    pub keyword_analysis: String,
    pub commercial_value: f64,
}

/// High-tier product surfaced by a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product_id: i64,
    pub product: String,
    pub platform: Platform,
    pub score: f64,
    pub recommendation: String,
}

/// Tally of one batch analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub run_id: uuid::Uuid,
    pub total_analyzed: usize,
    pub high_opportunity: usize,
    pub medium_opportunity: usize,
    pub low_opportunity: usize,
    pub failed: usize,
    pub recommendations: Vec<Recommendation>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            total_analyzed: 0,
            high_opportunity: 0,
            medium_opportunity: 0,
            low_opportunity: 0,
            failed: 0,
            recommendations: Vec::new(),
        }
    }

    /// Count a finished analysis in its tier bucket
    pub fn record(&mut self, product: &Product, analysis: &ProductAnalysis) {
        self.total_analyzed += 1;

        match OpportunityTier::from_score(analysis.opportunity_score) {
            OpportunityTier::High => {
                self.high_opportunity += 1;
                self.recommendations.push(Recommendation {
                    product_id: product.id,
                    product: product.title.clone(),
                    platform: product.platform.clone(),
                    score: analysis.opportunity_score,
                    recommendation: analysis.ai_recommendation.clone(),
                });
            }
            OpportunityTier::Medium => self.medium_opportunity += 1,
            OpportunityTier::Low => self.low_opportunity += 1,
        }
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of storing a set of collected listings
///
/// Listings already present (same title and platform) are skipped rather
/// than updated; they count as handled, not as errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub products_stored: usize,
    pub duplicates: usize,
    pub errors: usize,
    /// Percentage of listings handled without error; 0 when nothing was handled
    pub success_rate: f64,
}

impl StoreSummary {
    pub fn record_stored(&mut self) {
        self.products_stored += 1;
        self.refresh_rate();
    }

    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
        self.refresh_rate();
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
        self.refresh_rate();
    }

    pub fn total(&self) -> usize {
        self.products_stored + self.duplicates + self.errors
    }

    fn refresh_rate(&mut self) {
        let handled = self.products_stored + self.duplicates;
        self.success_rate = match self.total() {
            0 => 0.0,
            total => handled as f64 / total as f64 * 100.0,
        };
    }
}

/// Row of the top-opportunities report section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopOpportunity {
    pub title: String,
    pub platform: Platform,
    pub category: Option<String>,
    pub price: f64,
    pub opportunity_score: f64,
    pub ai_recommendation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformPerformance {
    pub platform: Platform,
    pub total_products: i64,
    pub avg_opportunity_score: f64,
    pub high_opportunity_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingCategory {
    pub category: String,
    pub product_count: i64,
    pub avg_trend_score: f64,
    pub avg_opportunity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_high_opportunities: usize,
    pub best_performing_platform: String,
    pub top_trending_category: String,
}

/// Market overview assembled from stored metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    pub report_generated: chrono::DateTime<chrono::Utc>,
    pub top_opportunities: Vec<TopOpportunity>,
    pub platform_performance: Vec<PlatformPerformance>,
    pub trending_categories: Vec<TrendingCategory>,
    pub summary: ReportSummary,
}

impl MarketReport {
    pub fn assemble(
        top_opportunities: Vec<TopOpportunity>,
        platform_performance: Vec<PlatformPerformance>,
        trending_categories: Vec<TrendingCategory>,
    ) -> Self {
        let summary = ReportSummary {
            total_high_opportunities: top_opportunities.len(),
            best_performing_platform: platform_performance
                .first()
                .map(|p| p.platform.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            top_trending_category: trending_categories
                .first()
                .map(|c| c.category.clone())
                .unwrap_or_else(|| "N/A".to_string()),
        };

        Self {
            report_generated: chrono::Utc::now(),
            top_opportunities,
            platform_performance,
            trending_categories,
            summary,
        }
    }
}
