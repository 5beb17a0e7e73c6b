use std::sync::Arc;
use thiserror::Error;

use crate::config::AnalysisSettings;
use crate::models::{
    BatchSummary, MarketReport, Product, ProductAnalysis, StoreSummary, TopOpportunity,
};
use crate::services::analysis::ProductAnalyzer;
use crate::services::postgres::{PostgresClient, PostgresError};

/// Score at which a freshly collected product is worth an alert
pub const ALERT_MIN_SCORE: f64 = 8.0;

/// Default retention for products that never scored well
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Errors that abort a whole engine operation
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] PostgresError),
}

/// Ties analysis and persistence together for batch runs and reporting
pub struct AnalysisEngine {
    postgres: Arc<PostgresClient>,
    analyzer: ProductAnalyzer,
    settings: AnalysisSettings,
}

impl AnalysisEngine {
    pub fn new(
        postgres: Arc<PostgresClient>,
        analyzer: ProductAnalyzer,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            postgres,
            analyzer,
            settings,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn postgres(&self) -> &PostgresClient {
        &self.postgres
    }

    /// Store freshly collected listings so later batches pick them up
    pub async fn store_products(&self, products: &[Product]) -> Result<StoreSummary, EngineError> {
        Ok(self.postgres.store_products(products).await?)
    }

    /// Analyse one product, looking up its competitor count when not given
    pub async fn analyze_product(
        &self,
        product: &Product,
        competitor_count: Option<usize>,
    ) -> Result<ProductAnalysis, EngineError> {
        let competitor_count = match competitor_count {
            Some(count) => count,
            None => self.postgres.count_similar_products(product).await?,
        };

        Ok(self.analyzer.analyze(product, competitor_count).await)
    }

    /// Analyse and store up to `limit` products that lack fresh metrics.
    ///
    /// A failure on one product is logged and counted; the run continues.
    pub async fn run_batch(&self, limit: Option<u32>) -> Result<BatchSummary, EngineError> {
        let limit = limit.unwrap_or(self.settings.batch_limit);
        let products = self
            .postgres
            .products_pending_analysis(limit, self.settings.stale_after_days)
            .await?;

        let mut summary = BatchSummary::new();

        tracing::info!(
            "Batch {} starting: {} products pending (limit {})",
            summary.run_id,
            products.len(),
            limit
        );

        for product in &products {
            tracing::debug!("Analyzing: {}", truncate_title(&product.title));

            match self.analyze_and_save(product).await {
                Ok(analysis) => summary.record(product, &analysis),
                Err(e) => {
                    tracing::warn!("Error analyzing product {}: {}", product.id, e);
                    summary.record_failure();
                }
            }
        }

        tracing::info!(
            "Batch {} finished: {} analyzed ({} high, {} medium, {} low), {} failed",
            summary.run_id,
            summary.total_analyzed,
            summary.high_opportunity,
            summary.medium_opportunity,
            summary.low_opportunity,
            summary.failed
        );

        Ok(summary)
    }

    async fn analyze_and_save(&self, product: &Product) -> Result<ProductAnalysis, EngineError> {
        let analysis = self.analyze_product(product, None).await?;
        self.postgres.save_analysis(product.id, &analysis).await?;
        Ok(analysis)
    }

    /// Build the market overview from stored metrics
    pub async fn market_report(&self) -> Result<MarketReport, EngineError> {
        let min_score = self.settings.report_min_score;

        let top_opportunities = self.postgres.top_opportunities(min_score).await?;
        let platform_performance = self.postgres.platform_performance(min_score).await?;
        let trending_categories = self.postgres.trending_categories().await?;

        let report = MarketReport::assemble(top_opportunities, platform_performance, trending_categories);

        tracing::info!(
            "Market report: {} top opportunities, best platform {}, top category {}",
            report.summary.total_high_opportunities,
            report.summary.best_performing_platform,
            report.summary.top_trending_category
        );

        Ok(report)
    }

    /// Products collected within the last `within_hours` that scored at or
    /// above [`ALERT_MIN_SCORE`]
    pub async fn recent_high_opportunities(
        &self,
        within_hours: u32,
    ) -> Result<Vec<TopOpportunity>, EngineError> {
        let found = self
            .postgres
            .recent_high_opportunities(ALERT_MIN_SCORE, within_hours)
            .await?;

        if !found.is_empty() {
            tracing::info!("{} high opportunities in the last {}h", found.len(), within_hours);
        }

        Ok(found)
    }

    /// Drop products older than `days_to_keep` unless they ever reached the
    /// report threshold
    pub async fn cleanup(&self, days_to_keep: u32) -> Result<u64, EngineError> {
        Ok(self
            .postgres
            .cleanup_old_products(days_to_keep, self.settings.report_min_score)
            .await?)
    }
}

fn truncate_title(title: &str) -> String {
    let mut short: String = title.chars().take(50).collect();
    if title.chars().count() > 50 {
        short.push_str("...");
    }
    short
}
