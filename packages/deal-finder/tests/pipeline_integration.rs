//! End-to-end pipeline runs against a mock extractor and a temp output dir.

use std::fs;

use deal_finder::report::RunSummary;
use deal_finder::testing::MockExtractor;
use deal_finder::{
    filter_matched, write_reports, Candidate, Deal, DealTypeDetailed, ExtractionCache,
    OutputLayout, Pipeline, PipelineConfig, RunTimestamp,
};
use rust_decimal::Decimal;
use serde_json::json;

fn candidates(value: serde_json::Value) -> Vec<Candidate> {
    serde_json::from_value(value).unwrap()
}

fn timestamp() -> RunTimestamp {
    "20251118_184341".parse().unwrap()
}

/// Deals with the per-run timestamp cleared so two passes can be compared.
fn comparable(deals: &[Deal]) -> Vec<Deal> {
    deals
        .iter()
        .cloned()
        .map(|mut deal| {
            deal.timestamp_utc = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;
            deal
        })
        .collect()
}

#[tokio::test]
async fn test_empty_extraction_falls_back_to_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let raw = candidates(json!([
        {"candidate_id": "c1", "name": "Acme Bio", "match_status": "matched", "url": "https://x.com"}
    ]));
    let (matched, _) = filter_matched(&raw);

    let cache = ExtractionCache::create(dir.path(), timestamp());
    let mut pipeline = Pipeline::new(MockExtractor::new(), cache, PipelineConfig::default());
    let outcome = pipeline.process(&matched).await.unwrap();

    assert_eq!(outcome.deals.len(), 1);
    let deal = &outcome.deals[0];
    assert_eq!(deal.target, "Acme Bio");
    assert_eq!(deal.acquirer, "Partner");
    assert_eq!(deal.stage, "unknown");
    assert_eq!(deal.deal_type_detailed, DealTypeDetailed::Partnership);
    assert_eq!(deal.source_url, "https://x.com");
    assert_eq!(deal.upfront_value_usd, None);
}

#[tokio::test]
async fn test_option_to_license_keeps_exact_upfront() {
    let dir = tempfile::tempdir().unwrap();
    let mock = MockExtractor::new().with_response(
        "c1",
        json!({"deal_type": "Option to License", "upfront_value_usd": 15}),
    );
    let cache = ExtractionCache::create(dir.path(), timestamp());
    let mut pipeline = Pipeline::new(mock, cache, PipelineConfig::default());

    let outcome = pipeline
        .process(&[Candidate::matched("c1", "Beta Therapeutics")])
        .await
        .unwrap();

    let deal = &outcome.deals[0];
    assert_eq!(deal.deal_type_detailed, DealTypeDetailed::OptionToLicense);
    assert_eq!(deal.upfront_value_usd, Some(Decimal::new(15, 0)));
}

#[tokio::test]
async fn test_failures_are_listed_and_outputs_still_written() {
    let dir = tempfile::tempdir().unwrap();
    let raw = candidates(json!([
        {"candidate_id": "c1", "name": "Good Bio", "match_status": "matched", "url": "https://good.example"},
        {"candidate_id": "c2", "name": "Broken Bio", "match_status": "matched", "url": "ftp://broken.example"},
        {"candidate_id": "c3", "name": "Skipped Bio", "match_status": "unmatched"},
        {"candidate_id": "c4", "name": "Other Bio", "match_status": "matched"}
    ]));
    let (matched, summary) = filter_matched(&raw);
    assert_eq!(summary.matched, 3);

    let cache = ExtractionCache::create(dir.path(), timestamp());
    let mut pipeline = Pipeline::new(MockExtractor::new(), cache, PipelineConfig::default());
    let outcome = pipeline.process(&matched).await.unwrap();

    assert_eq!(outcome.deals.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].index, 1);
    assert_eq!(outcome.failed[0].name.as_deref(), Some("Broken Bio"));
    assert!(outcome.deals.iter().all(|d| d.target != "Broken Bio"));

    let layout = OutputLayout::new(dir.path(), timestamp());
    let files = write_reports(&layout, &outcome).unwrap();
    assert!(files.spreadsheet.as_ref().unwrap().exists());

    let written: RunSummary =
        serde_json::from_str(&fs::read_to_string(&files.summary).unwrap()).unwrap();
    assert_eq!(written.timestamp, "20251118_184341");
    assert_eq!(written.total_deals, 2);
    assert_eq!(written.failed_parses.len(), 1);
    assert_eq!(written.deals[0].target, "Good Bio");
}

#[tokio::test]
async fn test_no_deals_writes_summary_only() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ExtractionCache::create(dir.path(), timestamp());
    let mut pipeline = Pipeline::new(MockExtractor::new(), cache, PipelineConfig::default());
    let outcome = pipeline.process(&[]).await.unwrap();

    let layout = OutputLayout::new(dir.path(), timestamp());
    let files = write_reports(&layout, &outcome).unwrap();

    assert!(files.summary.exists());
    assert!(files.spreadsheet.is_none());
    assert!(!layout.spreadsheet().exists());
}

#[tokio::test]
async fn test_rerun_with_discovered_cache_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let matched = vec![
        Candidate::matched("c1", "Acme Bio").with_url("https://acme.example"),
        Candidate::matched("c2", "Beta Bio").with_description("Beta licensed its lead asset."),
        Candidate {
            candidate_id: None,
            ..Candidate::matched("unused", "Anon Bio")
        },
    ];

    let first_mock = MockExtractor::new()
        .with_response(
            "c1",
            json!({
                "date_announced": "2023-06-01",
                "acquirer_company": "Big Pharma",
                "deal_type": "Acquisition",
                "total_deal_value_usd": "1250.5"
            }),
        )
        .with_response("c2", json!({"deal_type": "licensing agreement"}));
    let cache = ExtractionCache::create(dir.path(), timestamp());
    let mut first = Pipeline::new(first_mock.clone(), cache, PipelineConfig::default());
    let first_outcome = first.process(&matched).await.unwrap();
    assert_eq!(first_mock.call_count(), 3);
    assert!(first.into_cache().path().exists());

    let second_mock = MockExtractor::new();
    let cache = ExtractionCache::discover(dir.path()).unwrap();
    assert_eq!(cache.timestamp(), &timestamp());
    assert_eq!(cache.len(), 3);

    let mut second = Pipeline::new(second_mock.clone(), cache, PipelineConfig::default());
    let second_outcome = second.process(&matched).await.unwrap();

    assert_eq!(second_mock.call_count(), 0);
    assert_eq!(second_outcome.cache_hits, 3);
    assert_eq!(comparable(&first_outcome.deals), comparable(&second_outcome.deals));
    assert_eq!(
        second_outcome.deals[0].total_deal_value_usd,
        Some(Decimal::new(12505, 1))
    );
}

#[test]
fn test_filter_never_grows_input() {
    let raw = candidates(json!([
        {"candidate_id": "a", "match_status": "matched"},
        {"candidate_id": "b", "match_status": "unmatched"},
        {"candidate_id": "c"},
        {"candidate_id": "d", "match_status": "MATCHED"},
        {"candidate_id": "e", "match_status": "matched"}
    ]));

    let (matched, summary) = filter_matched(&raw);
    assert!(matched.len() <= raw.len());
    assert!(matched.iter().all(Candidate::is_matched));
    assert_eq!(summary.total, 5);
    assert_eq!(summary.matched + summary.excluded, summary.total);
    let ids: Vec<_> = matched.iter().filter_map(|c| c.candidate_id.as_deref()).collect();
    assert_eq!(ids, vec!["a", "e"]);
}
