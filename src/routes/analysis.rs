use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::models::{
    AnalyzeProductRequest, BatchRequest, ErrorResponse, Product, StoreProductsRequest,
};
use crate::services::{AnalysisEngine, KeywordAnalyzer, DEFAULT_RETENTION_DAYS};

/// State shared by the analysis handlers
#[derive(Clone)]
pub struct AnalysisState {
    pub engine: Arc<AnalysisEngine>,
    pub keywords: KeywordAnalyzer,
}

/// Configure analysis and reporting routes. Needs `web::Data<AnalysisState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/products", web::post().to(store_products))
        .route("/analysis/product", web::post().to(analyze_product))
        .route("/analysis/keywords", web::post().to(analyze_keywords))
        .route("/analysis/batch", web::post().to(run_batch))
        .route("/analysis/alerts", web::get().to(alerts))
        .route("/analysis/cleanup", web::post().to(cleanup))
        .route("/report", web::get().to(market_report));
}

#[derive(Debug, Deserialize, Validate)]
struct AlertsQuery {
    #[validate(range(min = 1, max = 8760))]
    #[serde(rename = "withinHours", default = "default_alert_window")]
    within_hours: u32,
}

fn default_alert_window() -> u32 { 1 }

#[derive(Debug, Deserialize, Validate)]
struct CleanupRequest {
    #[validate(range(min = 1, max = 3650))]
    #[serde(rename = "daysToKeep", default = "default_days_to_keep")]
    days_to_keep: u32,
}

fn default_days_to_keep() -> u32 { DEFAULT_RETENTION_DAYS }

fn validation_error(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

fn internal_error(error: &str, message: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 500,
    })
}

/// Store collected listings
///
/// POST /api/v1/products
///
/// Request body:
/// ```json
/// { "products": [{ "title": "Desk Lamp", "platform": "amazon", "price": 24.99 }] }
/// ```
/// Listings already stored under the same title and platform are skipped.
async fn store_products(
    state: web::Data<AnalysisState>,
    req: web::Json<StoreProductsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    match state.engine.store_products(&req.products).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            tracing::error!("Failed to store products: {}", e);
            internal_error("Failed to store products", e.to_string())
        }
    }
}

/// Analyse a single product
///
/// POST /api/v1/analysis/product
///
/// Request body: a product plus optional `competitorCount`. When the count
/// is missing, similar products are counted in the database.
async fn analyze_product(
    state: web::Data<AnalysisState>,
    req: web::Json<AnalyzeProductRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    let req = req.into_inner();

    match state.engine.analyze_product(&req.product, req.competitor_count).await {
        Ok(analysis) => HttpResponse::Ok().json(analysis),
        Err(e) => {
            tracing::error!("Failed to analyze '{}': {}", req.product.title, e);
            internal_error("Failed to analyze product", e.to_string())
        }
    }
}

/// Keyword research for a product
///
/// POST /api/v1/analysis/keywords
async fn analyze_keywords(
    state: web::Data<AnalysisState>,
    product: web::Json<Product>,
) -> impl Responder {
    let analysis = state.keywords.analyze(&product).await;
    HttpResponse::Ok().json(analysis)
}

/// Run a batch analysis
///
/// POST /api/v1/analysis/batch
///
/// Request body:
/// ```json
/// { "limit": 50 }
/// ```
async fn run_batch(
    state: web::Data<AnalysisState>,
    req: Option<web::Json<BatchRequest>>,
) -> impl Responder {
    let req = req.map(|r| r.into_inner()).unwrap_or_default();

    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    match state.engine.run_batch(req.limit).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            tracing::error!("Batch analysis failed: {}", e);
            internal_error("Batch analysis failed", e.to_string())
        }
    }
}

/// Recently collected high-opportunity products
///
/// GET /api/v1/analysis/alerts?withinHours={hours}
async fn alerts(
    state: web::Data<AnalysisState>,
    query: web::Query<AlertsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors.to_string());
    }

    match state.engine.recent_high_opportunities(query.within_hours).await {
        Ok(products) => HttpResponse::Ok().json(serde_json::json!({
            "withinHours": query.within_hours,
            "opportunitiesFound": products.len(),
            "products": products,
        })),
        Err(e) => {
            tracing::error!("Failed to fetch recent opportunities: {}", e);
            internal_error("Failed to fetch recent opportunities", e.to_string())
        }
    }
}

/// Delete stale low-scoring products
///
/// POST /api/v1/analysis/cleanup
async fn cleanup(
    state: web::Data<AnalysisState>,
    req: Option<web::Json<CleanupRequest>>,
) -> impl Responder {
    let req = req.map(|r| r.into_inner()).unwrap_or_else(|| CleanupRequest {
        days_to_keep: default_days_to_keep(),
    });

    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }
    let days_to_keep = req.days_to_keep;

    match state.engine.cleanup(days_to_keep).await {
        Ok(deleted) => HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })),
        Err(e) => {
            tracing::error!("Cleanup failed: {}", e);
            internal_error("Cleanup failed", e.to_string())
        }
    }
}

/// Market report
///
/// GET /api/v1/report
async fn market_report(state: web::Data<AnalysisState>) -> impl Responder {
    match state.engine.market_report().await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            tracing::error!("Failed to generate market report: {}", e);
            internal_error("Failed to generate market report", e.to_string())
        }
    }
}
