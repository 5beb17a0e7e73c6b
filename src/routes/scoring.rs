use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{OpportunityScorer, ScoreExtractor};
use crate::models::{
    ErrorResponse, ExtractRequest, ExtractResponse, ExtractionDomain, HealthResponse,
    OpportunityFactors, OpportunityTier, ScoreRequest, ScoreResponse, TierQuery, TierResponse,
};
use crate::routes::analysis::AnalysisState;

/// Configure the pure scoring routes. Needs only `web::Data<OpportunityScorer>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/score", web::post().to(score))
        .route("/extract", web::post().to(extract))
        .route("/tier", web::get().to(tier));
}

/// Health check endpoint
///
/// Reports "degraded" when a database is configured but unreachable.
async fn health_check(analysis: Option<web::Data<AnalysisState>>) -> impl Responder {
    let status = match analysis {
        Some(state) => match state.engine.postgres().health_check().await {
            Ok(true) => "healthy",
            _ => "degraded",
        },
        None => "healthy",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score endpoint
///
/// POST /api/v1/score
///
/// Request body:
/// ```json
/// {
///   "trendScore": 7.0,
///   "profitPotential": 6.5,
///   "marketDemand": 8.0,
///   "competitionLevel": "Medium"
/// }
/// ```
/// Any field may be omitted; missing factors count as neutral.
async fn score(
    scorer: web::Data<OpportunityScorer>,
    req: web::Json<ScoreRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let factors: OpportunityFactors = req.into_inner().into();
    let (opportunity_score, tier) = scorer.score_with_tier(&factors);

    tracing::debug!("Scored {:?} -> {} ({})", factors, opportunity_score, tier.as_str());

    HttpResponse::Ok().json(ScoreResponse {
        opportunity_score,
        tier,
    })
}

/// Extract endpoint
///
/// POST /api/v1/extract
///
/// Request body:
/// ```json
/// { "text": "Trend score: 7", "default": 5.0, "domain": "rating" }
/// ```
async fn extract(req: web::Json<ExtractRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let extractor = match req.domain {
        ExtractionDomain::Rating => ScoreExtractor::rating(),
        ExtractionDomain::CommercialValue => ScoreExtractor::commercial_value(),
    };

    let response = match extractor.extract_match(&req.text) {
        Some(found) => ExtractResponse {
            score: found.value,
            matched: true,
            pattern_index: Some(found.pattern_index),
        },
        None => ExtractResponse {
            score: req.default,
            matched: false,
            pattern_index: None,
        },
    };

    HttpResponse::Ok().json(response)
}

/// Tier endpoint
///
/// GET /api/v1/tier?score={score}
async fn tier(query: web::Query<TierQuery>) -> impl Responder {
    HttpResponse::Ok().json(TierResponse {
        score: query.score,
        tier: OpportunityTier::from_score(query.score),
    })
}
