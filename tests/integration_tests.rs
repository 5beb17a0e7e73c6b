// Integration tests for Product Scout

use actix_web::{test, web, App};
use product_scout::config::GeneratorSettings;
use product_scout::core::OpportunityScorer;
use product_scout::models::{
    CompetitionLevel, ExtractResponse, HealthResponse, OpportunityTier, Platform, Product,
    ScoreResponse, TierResponse,
};
use product_scout::routes;
use product_scout::services::{GeneratorClient, GeneratorError, KeywordAnalyzer, ProductAnalyzer};
use std::sync::Arc;

fn create_test_product(title: &str, platform: Platform, price: f64) -> Product {
    Product {
        id: 1,
        title: title.to_string(),
        platform,
        price,
        currency: "USD".to_string(),
        sales_count: None,
        rating: None,
        review_count: None,
        seller_info: None,
        product_url: None,
        description: Some("Noise cancelling earbuds with a charging case".to_string()),
        category: Some("Electronics".to_string()),
        tags: vec!["audio".to_string(), "wireless".to_string()],
        created_at: None,
    }
}

fn generator_for(url: String) -> Arc<GeneratorClient> {
    let settings = GeneratorSettings {
        base_url: url,
        timeout_secs: 5,
        ..GeneratorSettings::default()
    };
    Arc::new(GeneratorClient::new(&settings).unwrap())
}

#[tokio::test]
async fn test_generator_returns_response_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"model": "llama3", "stream": false}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"model": "llama3", "response": "Score: 7", "done": true}"#)
        .create_async()
        .await;

    let generator = generator_for(server.url());
    let text = generator.generate("hello", "be brief").await.unwrap();

    assert_eq!(text, "Score: 7");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generator_non_success_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(503)
        .create_async()
        .await;

    let generator = generator_for(server.url());
    let result = generator.generate("hello", "").await;

    assert!(matches!(result, Err(GeneratorError::Status(503))));
    assert_eq!(generator.generate_or_empty("hello", "").await, "");
}

#[tokio::test]
async fn test_generator_missing_response_field() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"done": true}"#)
        .create_async()
        .await;

    let generator = generator_for(server.url());
    assert_eq!(generator.generate("hello", "").await.unwrap(), "");
}

#[tokio::test]
async fn test_product_analysis_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    // trend, demand and recommendation prompts all see the same reply
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response": "Trend score: 8. Looks promising."}"#)
        .expect(3)
        .create_async()
        .await;

    let analyzer = ProductAnalyzer::new(generator_for(server.url()), OpportunityScorer::default());
    let product = create_test_product("Wireless Earbuds", Platform::Shopify, 100.0);

    let analysis = analyzer.analyze(&product, 5).await;

    assert_eq!(analysis.trend_score, 8.0);
    assert_eq!(analysis.competition_level, CompetitionLevel::Low);
    // 100 * 0.45 = 45 -> 7
    assert_eq!(analysis.profit_potential, 7.0);
    assert_eq!(analysis.market_demand, 8.0);
    // 8*0.25 + 7*0.30 + 8*0.30 + 9*0.15
    assert_eq!(analysis.opportunity_score, 7.85);
    assert_eq!(analysis.tier, OpportunityTier::High);
    assert!(analysis.ai_recommendation.contains("promising"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_product_analysis_survives_generator_outage() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(500)
        .create_async()
        .await;

    let analyzer = ProductAnalyzer::new(generator_for(server.url()), OpportunityScorer::default());
    let product = create_test_product("Wireless Earbuds", Platform::Shopify, 100.0);

    let analysis = analyzer.analyze(&product, 5).await;

    assert_eq!(analysis.trend_score, 5.0);
    assert_eq!(analysis.market_demand, 5.0);
    // 5*0.25 + 7*0.30 + 5*0.30 + 9*0.15
    assert_eq!(analysis.opportunity_score, 6.2);
    assert_eq!(analysis.tier, OpportunityTier::Medium);
    assert!(analysis.ai_recommendation.is_empty());
}

#[tokio::test]
async fn test_keyword_analysis() {
    let mut server = mockito::Server::new_async().await;
    let body = serde_json::json!({
        "response": "Primary keywords:\nwireless earbuds, bluetooth headphones\n\nCommercial value: 7"
    });
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let analyzer = KeywordAnalyzer::new(generator_for(server.url()));
    let product = create_test_product("Wireless Earbuds", Platform::Amazon, 40.0);

    let analysis = analyzer.analyze(&product).await;

    assert_eq!(analysis.primary_keywords[0], "wireless earbuds");
    assert_eq!(analysis.primary_keywords[1], "bluetooth headphones");
    assert!(analysis.long_tail_keywords.is_empty());
    assert_eq!(analysis.commercial_value, 7.0);
    assert!(analysis.keyword_analysis.starts_with("Primary keywords"));
}

#[actix_web::test]
async fn test_score_route() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(OpportunityScorer::default()))
            .configure(routes::configure_scoring_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/score")
        .set_json(serde_json::json!({
            "trendScore": 10.0,
            "profitPotential": 10.0,
            "marketDemand": 10.0,
            "competitionLevel": "Low"
        }))
        .to_request();
    let resp: ScoreResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.opportunity_score, 9.85);
    assert_eq!(resp.tier, OpportunityTier::High);

    let req = test::TestRequest::post()
        .uri("/api/v1/score")
        .set_json(serde_json::json!({}))
        .to_request();
    let resp: ScoreResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.opportunity_score, 5.0);
    assert_eq!(resp.tier, OpportunityTier::Low);
}

#[actix_web::test]
async fn test_score_route_rejects_out_of_range() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(OpportunityScorer::default()))
            .configure(routes::configure_scoring_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/score")
        .set_json(serde_json::json!({ "trendScore": 11.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_extract_route() {
    let app = test::init_service(App::new().configure(routes::configure_scoring_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/extract")
        .set_json(serde_json::json!({ "text": "I'd rate this 7 out of 10" }))
        .to_request();
    let resp: ExtractResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.score, 7.0);
    assert!(resp.matched);
    assert_eq!(resp.pattern_index, Some(1));

    let req = test::TestRequest::post()
        .uri("/api/v1/extract")
        .set_json(serde_json::json!({ "text": "nothing to see", "default": 4.0 }))
        .to_request();
    let resp: ExtractResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.score, 4.0);
    assert!(!resp.matched);
    assert_eq!(resp.pattern_index, None);

    let req = test::TestRequest::post()
        .uri("/api/v1/extract")
        .set_json(serde_json::json!({ "text": "Commercial value: 9", "domain": "commercialValue" }))
        .to_request();
    let resp: ExtractResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.score, 9.0);
    assert_eq!(resp.pattern_index, Some(0));
}

#[actix_web::test]
async fn test_tier_and_health_routes() {
    let app = test::init_service(App::new().configure(routes::configure_scoring_routes)).await;

    let req = test::TestRequest::get().uri("/api/v1/tier?score=7.5").to_request();
    let resp: TierResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp.tier, OpportunityTier::High);

    let req = test::TestRequest::get().uri("/api/v1/tier?score=5.49").to_request();
    let resp: TierResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp.tier, OpportunityTier::Low);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp.status, "healthy");
}
