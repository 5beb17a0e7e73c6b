use std::sync::Arc;

use crate::core::{
    adjust_demand, competition_level_for_count, extract_keyword_section, profit_potential,
    OpportunityScorer, ScoreExtractor,
};
use crate::models::{
    KeywordAnalysis, OpportunityFactors, OpportunityTier, Product, ProductAnalysis,
    MAX_SUB_SCORE, MIN_SUB_SCORE, NEUTRAL_SUB_SCORE,
};
use crate::services::generator::GeneratorClient;

const TREND_SYSTEM_PROMPT: &str = "You are a market trend analyst. Analyze the product and \
determine if it's trending upward, stable, or declining. Consider product category trends, \
seasonal patterns, technology adoption and consumer behavior shifts. Return your analysis as a \
trend score from 1-10 where 10 is highly trending.";

const DEMAND_SYSTEM_PROMPT: &str = "You are a market demand analyst. Assess the market demand \
for this product based on popularity indicators, market size for the category, consumer \
interest trends and sales performance. Rate demand from 1-10 where 10 indicates very high demand.";

const RECOMMENDATION_SYSTEM_PROMPT: &str = "You are an expert ecommerce consultant. Based on the \
product data and analysis scores, say whether this product is a good business opportunity. \
Include an overall recommendation (Highly Recommended/Recommended/Caution/Avoid), key strengths \
and weaknesses, specific action items and risk mitigation strategies. Keep it concise but \
actionable.";

const KEYWORD_SYSTEM_PROMPT: &str = "You are a keyword research expert. Extract the most \
important keywords for SEO and marketing, identify the search intent behind them, suggest \
related keywords with high commercial value and rate keyword difficulty on a 1-10 scale. Focus \
on keywords buyers would actually use when searching for this product.";

/// Longest description excerpt sent to the generator
const DESCRIPTION_EXCERPT_CHARS: usize = 500;

/// Turns a product listing into scored opportunity metrics
#[derive(Clone)]
pub struct ProductAnalyzer {
    generator: Arc<GeneratorClient>,
    scorer: OpportunityScorer,
}

impl ProductAnalyzer {
    pub fn new(generator: Arc<GeneratorClient>, scorer: OpportunityScorer) -> Self {
        Self { generator, scorer }
    }

    pub fn scorer(&self) -> &OpportunityScorer {
        &self.scorer
    }

    /// Run the full analysis for one product
    ///
    /// # Pipeline
    /// 1. Trend score from generated commentary
    /// 2. Competition level from the competitor count
    /// 3. Profit potential from price, platform and sales
    /// 4. Demand from generated commentary, adjusted by sales and reviews
    /// 5. Free-text recommendation
    /// 6. Weighted opportunity score and tier
    pub async fn analyze(&self, product: &Product, competitor_count: usize) -> ProductAnalysis {
        let trend_score = self.trend_score(product).await;
        let competition_level = competition_level_for_count(competitor_count);
        let profit = profit_potential(product.price, product.sales(), &product.platform);
        let market_demand = self.market_demand(product).await;

        let factors = OpportunityFactors::new(
            trend_score,
            profit.score,
            market_demand,
            competition_level,
        );

        let ai_recommendation = self.recommendation(product, &factors).await;
        let opportunity_score = self.scorer.score(&factors);

        tracing::debug!(
            "Analyzed '{}': trend={}, competition={}, profit={}, demand={} -> {}",
            product.title,
            trend_score,
            competition_level,
            profit.score,
            market_demand,
            opportunity_score
        );

        ProductAnalysis {
            trend_score,
            competition_level,
            competitor_count,
            profit_potential: profit.score,
            estimated_profit: profit.estimated_profit,
            estimated_margin: profit.estimated_margin,
            market_demand,
            opportunity_score,
            tier: OpportunityTier::from_score(opportunity_score),
            ai_recommendation,
        }
    }

    async fn trend_score(&self, product: &Product) -> f64 {
        let prompt = format!(
            "Analyze this product for market trends:\n\
             Title: {}\n\
             Category: {}\n\
             Platform: {}\n\
             Price: ${:.2}\n\n\
             Provide a trend score (1-10) and brief explanation.",
            product.title,
            product.category_or_na(),
            product.platform,
            product.price
        );

        let text = self.generator.generate_or_empty(&prompt, TREND_SYSTEM_PROMPT).await;

        ScoreExtractor::rating()
            .extract(&text, NEUTRAL_SUB_SCORE)
            .clamp(MIN_SUB_SCORE, MAX_SUB_SCORE)
    }

    async fn market_demand(&self, product: &Product) -> f64 {
        let prompt = format!(
            "Assess market demand for this product:\n\
             Title: {}\n\
             Category: {}\n\
             Sales Count: {}\n\
             Review Count: {}\n\n\
             Consider current market trends and consumer behavior.\n\
             Provide a demand score (1-10) and reasoning.",
            product.title,
            product.category_or_na(),
            product.sales(),
            product.reviews()
        );

        let text = self.generator.generate_or_empty(&prompt, DEMAND_SYSTEM_PROMPT).await;
        let base = ScoreExtractor::rating().extract(&text, NEUTRAL_SUB_SCORE);

        adjust_demand(base, product.sales(), product.reviews())
    }

    async fn recommendation(&self, product: &Product, factors: &OpportunityFactors) -> String {
        let prompt = format!(
            "Product Analysis Summary:\n\
             - Product: {}\n\
             - Platform: {}\n\
             - Price: ${:.2}\n\
             - Category: {}\n\n\
             Analysis Scores:\n\
             - Trend Score: {}/10\n\
             - Competition Level: {}\n\
             - Profit Potential: {}/10\n\
             - Market Demand: {}/10\n\n\
             Provide your expert recommendation and strategy.",
            product.title,
            product.platform,
            product.price,
            product.category_or_na(),
            factors.trend_score.unwrap_or(NEUTRAL_SUB_SCORE),
            factors.competition(),
            factors.profit_potential.unwrap_or(NEUTRAL_SUB_SCORE),
            factors.market_demand.unwrap_or(NEUTRAL_SUB_SCORE),
        );

        self.generator
            .generate_or_empty(&prompt, RECOMMENDATION_SYSTEM_PROMPT)
            .await
    }
}

/// Keyword research over a product's listing text
#[derive(Clone)]
pub struct KeywordAnalyzer {
    generator: Arc<GeneratorClient>,
}

impl KeywordAnalyzer {
    pub fn new(generator: Arc<GeneratorClient>) -> Self {
        Self { generator }
    }

    pub async fn analyze(&self, product: &Product) -> KeywordAnalysis {
        let description: String = product
            .description
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(DESCRIPTION_EXCERPT_CHARS)
            .collect();

        let tags = if product.tags.is_empty() {
            "None".to_string()
        } else {
            product.tags.join(", ")
        };

        let prompt = format!(
            "Analyze keywords for this product:\n\
             Title: {}\n\
             Description: {}...\n\
             Tags: {}\n\n\
             Extract primary keywords, secondary keywords, and long-tail opportunities.\n\
             Rate the commercial value and competition level for each keyword group.",
            product.title, description, tags
        );

        let text = self.generator.generate_or_empty(&prompt, KEYWORD_SYSTEM_PROMPT).await;

        KeywordAnalysis {
            primary_keywords: extract_keyword_section(&text, "primary"),
            secondary_keywords: extract_keyword_section(&text, "secondary"),
            long_tail_keywords: extract_keyword_section(&text, "long-tail"),
            commercial_value: ScoreExtractor::commercial_value().extract(&text, NEUTRAL_SUB_SCORE),
            keyword_analysis: text,
        }
    }
}
