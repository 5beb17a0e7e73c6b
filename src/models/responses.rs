use serde::{Deserialize, Serialize};
use crate::models::domain::OpportunityTier;

/// Response for the score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    #[serde(rename = "opportunityScore")]
    pub opportunity_score: f64,
    pub tier: OpportunityTier,
}

/// Response for the extract endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub score: f64,
    pub matched: bool,
    #[serde(rename = "patternIndex")]
    pub pattern_index: Option<usize>,
}

/// Response for the tier endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierResponse {
    pub score: f64,
    pub tier: OpportunityTier,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
