use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{CompetitionLevel, OpportunityFactors, Product};

/// Request to compute an opportunity score
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate(range(min = 1.0, max = 10.0))]
    #[serde(alias = "trend_score", rename = "trendScore", default)]
    pub trend_score: Option<f64>,
    #[validate(range(min = 1.0, max = 10.0))]
    #[serde(alias = "profit_potential", rename = "profitPotential", default)]
    pub profit_potential: Option<f64>,
    #[validate(range(min = 1.0, max = 10.0))]
    #[serde(alias = "market_demand", rename = "marketDemand", default)]
    pub market_demand: Option<f64>,
    #[serde(alias = "competition_level", rename = "competitionLevel", default)]
    pub competition_level: Option<CompetitionLevel>,
}

impl From<ScoreRequest> for OpportunityFactors {
    fn from(req: ScoreRequest) -> Self {
        OpportunityFactors {
            trend_score: req.trend_score,
            profit_potential: req.profit_potential,
            market_demand: req.market_demand,
            competition_level: req.competition_level,
        }
    }
}

/// Which labelled vocabulary to extract a score with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionDomain {
    #[default]
    Rating,
    CommercialValue,
}

/// Request to pull a numeric score out of free text
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExtractRequest {
    #[validate(length(max = 20000))]
    pub text: String,
    #[serde(default = "default_extract_fallback")]
    pub default: f64,
    #[serde(default)]
    pub domain: ExtractionDomain,
}

fn default_extract_fallback() -> f64 {
    crate::models::domain::NEUTRAL_SUB_SCORE
}

/// Query string for the tier lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierQuery {
    pub score: f64,
}

/// Request to analyse a single product
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeProductRequest {
    #[serde(flatten)]
    #[validate(custom(function = "validate_product"))]
    pub product: Product,
    #[serde(alias = "competitor_count", rename = "competitorCount", default)]
    pub competitor_count: Option<usize>,
}

fn validate_product(product: &Product) -> Result<(), ValidationError> {
    if product.title.trim().is_empty() {
        return Err(ValidationError::new("empty_title"));
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(ValidationError::new("invalid_price"));
    }
    Ok(())
}

/// Collected listings to store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreProductsRequest {
    #[validate(length(min = 1, max = 1000))]
    pub products: Vec<Product>,
}

/// Request to run a batch analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BatchRequest {
    #[validate(range(min = 1, max = 500))]
    #[serde(default)]
    pub limit: Option<u32>,
}
