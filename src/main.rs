use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use product_scout::config::{LogFormat, LoggingSettings, Settings};
use product_scout::core::OpportunityScorer;
use product_scout::routes::{self, analysis::AnalysisState};
use product_scout::services::{
    AnalysisEngine, GeneratorClient, KeywordAnalyzer, PostgresClient, ProductAnalyzer,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// LOG_LEVEL / LOG_FORMAT win over the `[logging]` section
fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|name| LogFormat::from_name(&name))
        .unwrap_or(logging.format);

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match log_format {
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Full => subscriber.init(),
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging);

    info!("Starting Product Scout opportunity service...");

    let generator = Arc::new(
        GeneratorClient::new(&settings.generator)
            .map_err(|e| startup_error("Failed to build generator client", e))?,
    );

    info!(
        "Generator client initialized ({} at {})",
        generator.model(),
        settings.generator.base_url
    );

    let postgres = Arc::new(
        PostgresClient::from_settings(&settings.database)
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?,
    );

    info!(
        "PostgreSQL client initialized (max: {} connections)",
        settings.database.max_connections.unwrap_or(10)
    );

    let scorer = OpportunityScorer::with_default_weights();

    info!("Scorer initialized with weights: {:?}", scorer.weights());

    let analyzer = ProductAnalyzer::new(generator.clone(), scorer);
    let engine = Arc::new(AnalysisEngine::new(postgres, analyzer, settings.analysis.clone()));

    // Build application state
    let analysis_state = AnalysisState {
        engine,
        keywords: KeywordAnalyzer::new(generator),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(scorer))
            .app_data(web::Data::new(analysis_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
