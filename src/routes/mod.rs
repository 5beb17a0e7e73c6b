// Route exports
pub mod analysis;
pub mod scoring;

use actix_web::web;

/// Mount every route. Requires both `OpportunityScorer` and `AnalysisState` data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(scoring::configure)
            .configure(analysis::configure),
    );
}

/// Mount only the database-free scoring routes
pub fn configure_scoring_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1").configure(scoring::configure));
}
