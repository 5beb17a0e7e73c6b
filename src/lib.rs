//! Product Scout - opportunity scoring for e-commerce product research
//!
//! The core of the crate is pure: a weighted opportunity score over four
//! sub-scores, and a regex-based extractor that pulls a 1-10 number out of
//! free-form generated text. Around it sit the services that gather those
//! sub-scores for a product (a local text generator and PostgreSQL) and an
//! HTTP API that exposes both.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{OpportunityScorer, ScoreExtractor, ScoringError};
pub use models::{
    CompetitionLevel, OpportunityFactors, OpportunityTier, Product, ProductAnalysis, ScoringWeights,
};
