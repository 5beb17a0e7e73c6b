// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BatchSummary, CompetitionLevel, KeywordAnalysis, MarketReport, OpportunityFactors,
    OpportunityTier, Platform, PlatformPerformance, Product, ProductAnalysis, Recommendation,
    ReportSummary, ScoringWeights, StoreSummary, TopOpportunity, TrendingCategory, DEFAULT_WEIGHTS,
    HIGH_TIER_THRESHOLD, MAX_SUB_SCORE, MEDIUM_TIER_THRESHOLD, MIN_SUB_SCORE, NEUTRAL_SUB_SCORE,
};
pub use requests::{AnalyzeProductRequest, BatchRequest, ExtractRequest, ExtractionDomain, ScoreRequest, StoreProductsRequest, TierQuery};
pub use responses::{ErrorResponse, ExtractResponse, HealthResponse, ScoreResponse, TierResponse};
