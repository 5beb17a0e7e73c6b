use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::core::extract_key_terms;
use crate::models::{
    Platform, PlatformPerformance, Product, ProductAnalysis, StoreSummary, TopOpportunity,
    TrendingCategory,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Upper bound on rows inspected when counting similar products
const SIMILAR_PRODUCTS_LIMIT: i64 = 100;

/// Row cap for the top-opportunities report section
const TOP_OPPORTUNITIES_LIMIT: i64 = 20;

/// Row cap for the trending-categories report section
const TRENDING_CATEGORIES_LIMIT: i64 = 15;

/// Minimum products a category needs to appear in the trending section
const TRENDING_CATEGORY_MIN_PRODUCTS: i64 = 3;

/// PostgreSQL store for product listings and their opportunity metrics
///
/// Metrics are keyed by product and analysis date; re-analysing a product
/// on the same day overwrites that day's row.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        settings: &crate::config::DatabaseSettings,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Count listings that look like the same product on other platforms
    ///
    /// Similarity is a title match on the product's key terms within the
    /// same category. At most 100 rows are counted.
    pub async fn count_similar_products(&self, product: &Product) -> Result<usize, PostgresError> {
        let Some((sql, params)) = similar_products_query(product) else {
            return Ok(0);
        };

        let mut query = sqlx::query(&sql);
        for param in &params {
            query = query.bind(param.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;

        tracing::debug!("Found {} similar products for '{}'", rows.len(), product.title);

        Ok(rows.len())
    }

    /// Insert collected listings, skipping ones already stored
    ///
    /// Each row is inserted on its own, so a bad listing is counted in
    /// `errors` and the rest still go in. Only a failure to reach the
    /// database at all aborts the call.
    pub async fn store_products(&self, products: &[Product]) -> Result<StoreSummary, PostgresError> {
        let query = r#"
            INSERT INTO products
                (title, platform, category, price, currency, sales_count,
                 rating, review_count, seller_info, product_url, description, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (title, platform) DO NOTHING
        "#;

        // Fail fast when the pool itself is unusable
        self.health_check().await?;

        let mut summary = StoreSummary::default();

        for product in products {
            if let Err(e) = check_insertable(product) {
                tracing::warn!("Skipping product '{}': {}", product.title, e);
                summary.record_error();
                continue;
            }

            let result = sqlx::query(query)
                .bind(product.title.trim())
                .bind(product.platform.as_str())
                .bind(product.category.as_deref())
                .bind(product.price)
                .bind(&product.currency)
                .bind(product.sales_count)
                .bind(product.rating)
                .bind(product.review_count)
                .bind(product.seller_info.as_deref())
                .bind(product.product_url.as_deref())
                .bind(product.description.as_deref())
                .bind(&product.tags)
                .execute(&self.pool)
                .await;

            match result {
                Ok(done) if done.rows_affected() == 0 => summary.record_duplicate(),
                Ok(_) => summary.record_stored(),
                Err(e) => {
                    tracing::warn!("Error storing product '{}': {}", product.title, e);
                    summary.record_error();
                }
            }
        }

        tracing::info!(
            "Stored {} products ({} duplicates, {} errors)",
            summary.products_stored,
            summary.duplicates,
            summary.errors
        );

        Ok(summary)
    }

    /// Store analysis results for a product
    ///
    /// Uses INSERT ... ON CONFLICT so a same-day re-analysis replaces the
    /// earlier metrics.
    pub async fn save_analysis(
        &self,
        product_id: i64,
        analysis: &ProductAnalysis,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO product_metrics
                (product_id, date_analyzed, trend_score, competition_level, profit_potential,
                 market_demand, opportunity_score, ai_recommendation)
            VALUES ($1, CURRENT_DATE, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (product_id, date_analyzed)
            DO UPDATE SET
                trend_score = EXCLUDED.trend_score,
                competition_level = EXCLUDED.competition_level,
                profit_potential = EXCLUDED.profit_potential,
                market_demand = EXCLUDED.market_demand,
                opportunity_score = EXCLUDED.opportunity_score,
                ai_recommendation = EXCLUDED.ai_recommendation,
                created_at = NOW()
        "#;

        sqlx::query(query)
            .bind(product_id)
            .bind(analysis.trend_score)
            .bind(analysis.competition_level.label())
            .bind(analysis.profit_potential)
            .bind(analysis.market_demand)
            .bind(analysis.opportunity_score)
            .bind(&analysis.ai_recommendation)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Saved metrics for product {} (score {})",
            product_id,
            analysis.opportunity_score
        );

        Ok(())
    }

    /// Products with no metrics yet, or whose latest metrics are stale
    pub async fn products_pending_analysis(
        &self,
        limit: u32,
        stale_after_days: u32,
    ) -> Result<Vec<Product>, PostgresError> {
        let query = r#"
            SELECT p.id, p.title, p.platform, p.category, p.price, p.currency, p.sales_count,
                   p.rating, p.review_count, p.seller_info, p.product_url, p.description,
                   p.tags, p.created_at
            FROM products p
            WHERE NOT EXISTS (
                SELECT 1 FROM product_metrics pm
                WHERE pm.product_id = p.id
                  AND pm.created_at >= NOW() - make_interval(days => $2)
            )
            ORDER BY p.created_at DESC
            LIMIT $1
        "#;

        let stale_after_days = interval_arg("stale_after_days", stale_after_days)?;

        let rows = sqlx::query(query)
            .bind(i64::from(limit))
            .bind(stale_after_days)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(product_from_row).collect()
    }

    /// Best-scoring products at or above `min_score`
    pub async fn top_opportunities(&self, min_score: f64) -> Result<Vec<TopOpportunity>, PostgresError> {
        let query = r#"
            SELECT p.title, p.platform, p.category, p.price, pm.opportunity_score, pm.ai_recommendation
            FROM products p
            JOIN product_metrics pm ON p.id = pm.product_id
            WHERE pm.opportunity_score >= $1
            ORDER BY pm.opportunity_score DESC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(min_score)
            .bind(TOP_OPPORTUNITIES_LIMIT)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(top_opportunity_from_row).collect()
    }

    /// Average opportunity per platform, best first
    pub async fn platform_performance(
        &self,
        high_score: f64,
    ) -> Result<Vec<PlatformPerformance>, PostgresError> {
        let query = r#"
            SELECT
                p.platform,
                COUNT(*) AS total_products,
                AVG(pm.opportunity_score) AS avg_opportunity_score,
                COUNT(*) FILTER (WHERE pm.opportunity_score >= $1) AS high_opportunity_count
            FROM products p
            JOIN product_metrics pm ON p.id = pm.product_id
            GROUP BY p.platform
            ORDER BY avg_opportunity_score DESC
        "#;

        let rows = sqlx::query(query).bind(high_score).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<PlatformPerformance, PostgresError> {
                Ok(PlatformPerformance {
                    platform: Platform::from_name(row.try_get::<String, _>("platform")?.as_str()),
                    total_products: row.try_get("total_products")?,
                    avg_opportunity_score: row
                        .try_get::<Option<f64>, _>("avg_opportunity_score")?
                        .unwrap_or(0.0),
                    high_opportunity_count: row.try_get("high_opportunity_count")?,
                })
            })
            .collect()
    }

    /// Categories with the strongest average trend
    pub async fn trending_categories(&self) -> Result<Vec<TrendingCategory>, PostgresError> {
        let query = r#"
            SELECT
                p.category,
                COUNT(*) AS product_count,
                AVG(pm.trend_score) AS avg_trend_score,
                AVG(pm.opportunity_score) AS avg_opportunity_score
            FROM products p
            JOIN product_metrics pm ON p.id = pm.product_id
            WHERE p.category IS NOT NULL AND p.category != ''
            GROUP BY p.category
            HAVING COUNT(*) >= $1
            ORDER BY avg_trend_score DESC, avg_opportunity_score DESC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(TRENDING_CATEGORY_MIN_PRODUCTS)
            .bind(TRENDING_CATEGORIES_LIMIT)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<TrendingCategory, PostgresError> {
                Ok(TrendingCategory {
                    category: row.try_get("category")?,
                    product_count: row.try_get("product_count")?,
                    avg_trend_score: row.try_get::<Option<f64>, _>("avg_trend_score")?.unwrap_or(0.0),
                    avg_opportunity_score: row
                        .try_get::<Option<f64>, _>("avg_opportunity_score")?
                        .unwrap_or(0.0),
                })
            })
            .collect()
    }

    /// Recently collected products that already scored highly
    pub async fn recent_high_opportunities(
        &self,
        min_score: f64,
        within_hours: u32,
    ) -> Result<Vec<TopOpportunity>, PostgresError> {
        let query = r#"
            SELECT p.title, p.platform, p.category, p.price, pm.opportunity_score, pm.ai_recommendation
            FROM products p
            JOIN product_metrics pm ON p.id = pm.product_id
            WHERE p.created_at >= NOW() - make_interval(hours => $2)
              AND pm.opportunity_score >= $1
            ORDER BY pm.opportunity_score DESC
            LIMIT 10
        "#;

        let within_hours = interval_arg("within_hours", within_hours)?;

        let rows = sqlx::query(query)
            .bind(min_score)
            .bind(within_hours)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(top_opportunity_from_row).collect()
    }

    /// Delete old products that never reached `keep_min_score`
    pub async fn cleanup_old_products(
        &self,
        days_to_keep: u32,
        keep_min_score: f64,
    ) -> Result<u64, PostgresError> {
        if days_to_keep == 0 {
            return Err(PostgresError::InvalidInput("days_to_keep must be positive".into()));
        }

        let query = r#"
            DELETE FROM products
            WHERE created_at < NOW() - make_interval(days => $1)
              AND id NOT IN (
                  SELECT DISTINCT product_id
                  FROM product_metrics
                  WHERE opportunity_score >= $2
              )
        "#;

        let days_to_keep = interval_arg("days_to_keep", days_to_keep)?;

        let result = sqlx::query(query)
            .bind(days_to_keep)
            .bind(keep_min_score)
            .execute(&self.pool)
            .await?;

        tracing::info!("Cleaned up {} old products", result.rows_affected());

        Ok(result.rows_affected())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Reject listings the products table cannot meaningfully hold
fn check_insertable(product: &Product) -> Result<(), PostgresError> {
    if product.title.trim().is_empty() {
        return Err(PostgresError::InvalidInput("title is empty".into()));
    }
    if product.platform.as_str().is_empty() {
        return Err(PostgresError::InvalidInput("platform is empty".into()));
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(PostgresError::InvalidInput(format!("invalid price: {}", product.price)));
    }
    Ok(())
}

/// `make_interval` takes a signed 32-bit count
fn interval_arg(name: &str, value: u32) -> Result<i32, PostgresError> {
    i32::try_from(value)
        .map_err(|_| PostgresError::InvalidInput(format!("{} is too large: {}", name, value)))
}

/// Build the similar-products query and its text parameters.
/// Returns `None` when the product offers nothing to match on.
fn similar_products_query(product: &Product) -> Option<(String, Vec<String>)> {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    let key_terms = extract_key_terms(&product.title);
    if !key_terms.is_empty() {
        params.push(format!("%{}%", key_terms.join("%")));
        conditions.push(format!("LOWER(title) SIMILAR TO ${}", params.len()));
    }

    if let Some(category) = product.category.as_deref().filter(|c| !c.is_empty()) {
        params.push(category.to_lowercase());
        conditions.push(format!("LOWER(category) = ${}", params.len()));
    }

    let platform = product.platform.as_str();
    if !platform.is_empty() {
        params.push(platform.to_lowercase());
        conditions.push(format!("LOWER(platform) != ${}", params.len()));
    }

    if conditions.is_empty() {
        return None;
    }

    let sql = format!(
        "SELECT id FROM products WHERE {} LIMIT {}",
        conditions.join(" AND "),
        SIMILAR_PRODUCTS_LIMIT
    );

    Some((sql, params))
}

fn product_from_row(row: &PgRow) -> Result<Product, PostgresError> {
    Ok(Product {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        platform: Platform::from_name(row.try_get::<String, _>("platform")?.as_str()),
        category: row.try_get("category")?,
        price: row.try_get("price")?,
        currency: row
            .try_get::<Option<String>, _>("currency")?
            .unwrap_or_else(|| "USD".to_string()),
        sales_count: row.try_get("sales_count")?,
        rating: row.try_get("rating")?,
        review_count: row.try_get("review_count")?,
        seller_info: row.try_get("seller_info")?,
        product_url: row.try_get("product_url")?,
        description: row.try_get("description")?,
        tags: row.try_get::<Option<Vec<String>>, _>("tags")?.unwrap_or_default(),
        created_at: row.try_get("created_at")?,
    })
}

fn top_opportunity_from_row(row: &PgRow) -> Result<TopOpportunity, PostgresError> {
    Ok(TopOpportunity {
        title: row.try_get("title")?,
        platform: Platform::from_name(row.try_get::<String, _>("platform")?.as_str()),
        category: row.try_get("category")?,
        price: row.try_get("price")?,
        opportunity_score: row.try_get("opportunity_score")?,
        ai_recommendation: row.try_get("ai_recommendation")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str, category: Option<&str>, platform: Platform) -> Product {
        Product {
            id: 1,
            title: title.to_string(),
            platform,
            price: 20.0,
            currency: "USD".to_string(),
            sales_count: None,
            rating: None,
            review_count: None,
            seller_info: None,
            product_url: None,
            description: None,
            category: category.map(str::to_string),
            tags: vec![],
            created_at: None,
        }
    }

    #[test]
    fn test_similar_query_uses_all_conditions() {
        let (sql, params) = similar_products_query(&product(
            "Bamboo Cutting Board Set",
            Some("Kitchen"),
            Platform::Etsy,
        ))
        .unwrap();

        assert!(sql.contains("LOWER(title) SIMILAR TO $1"));
        assert!(sql.contains("LOWER(category) = $2"));
        assert!(sql.contains("LOWER(platform) != $3"));
        assert!(sql.ends_with("LIMIT 100"));
        assert_eq!(params, vec!["%bamboo%cutting%board%set%", "kitchen", "etsy"]);
    }

    #[test]
    fn test_similar_query_renumbers_without_terms() {
        let (sql, params) =
            similar_products_query(&product("4K TV", Some("Electronics"), Platform::Amazon)).unwrap();

        assert!(sql.contains("LOWER(category) = $1"));
        assert!(sql.contains("LOWER(platform) != $2"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_interval_arg_rejects_overflow() {
        assert_eq!(interval_arg("within_hours", 24).unwrap(), 24);
        assert_eq!(interval_arg("within_hours", i32::MAX as u32).unwrap(), i32::MAX);
        assert!(matches!(
            interval_arg("within_hours", u32::MAX),
            Err(PostgresError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_check_insertable() {
        assert!(check_insertable(&product("Desk Lamp", None, Platform::Amazon)).is_ok());
        assert!(check_insertable(&product("   ", None, Platform::Amazon)).is_err());
        assert!(check_insertable(&product("Desk Lamp", None, Platform::Other(String::new()))).is_err());

        let mut negative = product("Desk Lamp", None, Platform::Ebay);
        negative.price = -1.0;
        assert!(check_insertable(&negative).is_err());

        let mut nan = product("Desk Lamp", None, Platform::Ebay);
        nan.price = f64::NAN;
        assert!(check_insertable(&nan).is_err());
    }

    #[test]
    fn test_similar_query_none_without_conditions() {
        let empty = product("", None, Platform::Other(String::new()));
        assert!(similar_products_query(&empty).is_none());
    }
}
