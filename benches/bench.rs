// Criterion benchmarks for Product Scout

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use product_scout::core::{extract_key_terms, OpportunityScorer, ScoreExtractor};
use product_scout::models::{CompetitionLevel, OpportunityFactors};

const SAMPLE_REPLY: &str = "This product shows steady growth in the outdoor category. \
Seasonal demand peaks in spring. Overall I'd put it at 7 out of 10, with a trend score: 7.5 \
and moderate risk from established sellers.";

fn create_factors(i: usize) -> OpportunityFactors {
    let level = match i % 5 {
        0 => CompetitionLevel::Low,
        1 => CompetitionLevel::Medium,
        2 => CompetitionLevel::High,
        3 => CompetitionLevel::VeryHigh,
        _ => CompetitionLevel::Unknown,
    };
    OpportunityFactors::new(
        1.0 + (i % 10) as f64,
        1.0 + ((i * 3) % 10) as f64,
        1.0 + ((i * 7) % 10) as f64,
        level,
    )
}

fn bench_score(c: &mut Criterion) {
    let scorer = OpportunityScorer::default();
    let factors = create_factors(3);

    c.bench_function("opportunity_score", |b| {
        b.iter(|| scorer.score_with_tier(black_box(&factors)));
    });
}

fn bench_extract(c: &mut Criterion) {
    let extractor = ScoreExtractor::rating();

    let mut group = c.benchmark_group("extract");

    for repeat in [1, 10, 50].iter() {
        // Padding before the match makes later patterns scan further
        let text = format!("{} {}", "filler commentary without numbers.".repeat(*repeat), SAMPLE_REPLY);

        group.bench_with_input(BenchmarkId::new("rating", repeat), &text, |b, text| {
            b.iter(|| extractor.extract(black_box(text), 5.0));
        });
    }

    group.bench_function("no_match", |b| {
        b.iter(|| extractor.extract(black_box("nothing numeric here at all"), 5.0));
    });

    group.finish();
}

fn bench_scoring_pipeline(c: &mut Criterion) {
    let scorer = OpportunityScorer::default();
    let replies: Vec<String> = (0..100)
        .map(|i| format!("Demand score: {}. {}", 1 + i % 10, SAMPLE_REPLY))
        .collect();

    c.bench_function("extract_and_score_100_replies", |b| {
        b.iter(|| {
            let scored: Vec<f64> = replies
                .iter()
                .enumerate()
                .map(|(i, reply)| {
                    let mut factors = create_factors(i);
                    factors.market_demand = Some(ScoreExtractor::rating().extract(reply, 5.0));
                    scorer.score(&factors)
                })
                .collect();

            black_box(scored)
        });
    });
}

fn bench_key_terms(c: &mut Criterion) {
    c.bench_function("extract_key_terms", |b| {
        b.iter(|| extract_key_terms(black_box("Vintage Handmade Leather Journal with Brass Clasp, A5")));
    });
}

criterion_group!(
    benches,
    bench_score,
    bench_extract,
    bench_scoring_pipeline,
    bench_key_terms
);

criterion_main!(benches);
