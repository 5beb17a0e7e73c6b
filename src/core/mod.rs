// Core algorithm exports
pub mod extractor;
pub mod heuristics;
pub mod keywords;
pub mod scoring;

pub use extractor::{ExtractedScore, ScoreExtractor, COMMERCIAL_VALUE_PATTERNS, RATING_PATTERNS};
pub use heuristics::{adjust_demand, competition_level_for_count, platform_margin, profit_potential, ProfitEstimate};
pub use keywords::{extract_key_terms, extract_keyword_section};
pub use scoring::{round_to_cents, OpportunityScorer, ScoringError};
