// Service exports
pub mod analysis;
pub mod engine;
pub mod generator;
pub mod postgres;

pub use analysis::{KeywordAnalyzer, ProductAnalyzer};
pub use engine::{AnalysisEngine, EngineError, ALERT_MIN_SCORE, DEFAULT_RETENTION_DAYS};
pub use generator::{GeneratorClient, GeneratorError};
pub use postgres::{PostgresClient, PostgresError};
