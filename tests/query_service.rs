use chrono::NaiveDate;
use precedent_core::case::Case;
use precedent_core::graph::GraphError;
use precedent_core::service::{CitationRecord, QueryError, QueryService};
use precedent_core::types::{CaseFilter, CaseId};
use tempfile::tempdir;

fn id(s: &str) -> CaseId {
    CaseId::new(s).unwrap()
}

fn date(y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, 1, 15).unwrap()
}

fn record(citer: &str, cited: &str, y: i32) -> CitationRecord {
    CitationRecord {
        citer_id: id(citer),
        cited_id: id(cited),
        citer_decided_at: date(y),
        jurisdiction: "us-fed".to_string(),
    }
}

/// A(2000); B(2010) cites A; C(2020) cites A and B.
fn scenario_service() -> QueryService {
    let service = QueryService::default().with_as_of(date(2024));
    service
        .add_case(Case::new(id("a"), date(2000), "Supreme Court", "us-fed"))
        .unwrap();
    service
        .add_case(Case::new(id("b"), date(2010), "Supreme Court", "us-fed"))
        .unwrap();
    service
        .add_case(Case::new(id("c"), date(2020), "Supreme Court", "us-fed"))
        .unwrap();
    service.ingest(record("b", "a", 2010)).unwrap();
    service.ingest(record("c", "a", 2020)).unwrap();
    service.ingest(record("c", "b", 2020)).unwrap();
    service
}

#[test]
fn end_to_end_scenario_ranks_the_foundational_case_first() {
    let service = scenario_service();

    let response = service.rank_top_k(2, None);
    assert!(response.warnings.is_empty());
    assert_eq!(response.cases_considered, 3);
    let ids: Vec<_> = response.rankings.iter().map(|r| r.case_id.clone()).collect();
    assert_eq!(ids, vec![id("a"), id("b")]);

    let a = service.get_case_score(&id("a")).unwrap();
    let b = service.get_case_score(&id("b")).unwrap();
    let c = service.get_case_score(&id("c")).unwrap();
    assert_eq!(a.in_degree, 2);
    assert_eq!(b.in_degree, 1);
    assert_eq!(c.in_degree, 0);
    assert!(a.pagerank > b.pagerank);
    assert!(b.pagerank > c.pagerank);
    assert!(a.composite > b.composite);
}

#[test]
fn repeated_ranking_calls_are_deterministic() {
    let service = scenario_service();
    let first = service.rank_top_k(3, None);
    let second = service.rank_top_k(3, None);
    assert_eq!(first.rankings, second.rankings);
}

#[test]
fn unknown_case_lookup_is_not_found() {
    let service = scenario_service();
    let err = service.get_case_score(&id("ghost")).unwrap_err();
    assert!(matches!(err, QueryError::CaseNotFound(_)));

    let err = service.predict_link(&id("a"), &id("ghost"), None).unwrap_err();
    assert!(matches!(err, QueryError::CaseNotFound(_)));
}

#[test]
fn ingest_surfaces_validation_errors_synchronously() {
    let service = scenario_service();

    // Time-inverted: a 1995 decision cannot cite a 2010 one.
    let err = service.ingest(record("early", "b", 1995)).unwrap_err();
    assert!(matches!(err, GraphError::TimeInverted { .. }));

    let err = service.ingest(record("b", "b", 2010)).unwrap_err();
    assert!(matches!(err, GraphError::SelfCitation(_)));

    // Nothing was committed; rankings still see three cases.
    assert_eq!(service.rank_top_k(10, None).cases_considered, 3);
}

#[test]
fn filtered_ranking_considers_only_the_subset() {
    let service = scenario_service();
    service
        .add_case(Case::new(id("state"), date(2005), "State Supreme", "us-cal"))
        .unwrap();

    let filter = CaseFilter::jurisdiction("us-cal");
    let response = service.rank_top_k(10, Some(&filter));
    assert_eq!(response.cases_considered, 1);
    assert_eq!(response.rankings.len(), 1);
    assert_eq!(response.rankings[0].case_id, id("state"));
}

#[test]
fn background_ranking_matches_the_foreground() {
    let service = scenario_service();
    let handle = service.rank_top_k_in_background(3, None);

    // Ingestion is free to continue; the in-flight ranking works on its
    // own snapshot and does not see the new edge.
    service
        .add_case(Case::new(id("d"), date(2023), "Supreme Court", "us-fed"))
        .unwrap();
    service.ingest(record("d", "a", 2023)).unwrap();

    let background = handle.join().unwrap();
    assert_eq!(background.cases_considered, 3);

    let foreground = service.rank_top_k(10, None);
    assert_eq!(foreground.cases_considered, 4);
}

#[test]
fn predict_link_blends_external_embedding_similarity() {
    let service = scenario_service();

    let structural = service.predict_link(&id("a"), &id("b"), None).unwrap();
    let blended = service.predict_link(&id("a"), &id("b"), Some(0.95)).unwrap();
    assert!(blended.probability > structural.probability);
    assert_eq!(structural.breakdown.len() + 1, blended.breakdown.len());
}

#[test]
fn service_round_trips_through_a_snapshot_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("service.snapshot.json");

    let service = scenario_service();
    let document = service.save_to(&path).unwrap();
    assert_eq!(document.case_count, 3);

    let restored = QueryService::from_snapshot(&path)
        .unwrap()
        .with_as_of(date(2024));
    assert_eq!(
        restored.rank_top_k(3, None).rankings,
        service.rank_top_k(3, None).rankings
    );
}

#[test]
fn scores_are_derived_not_persisted() {
    // Mutating the graph changes the next score lookup with no explicit
    // invalidation step; scores are recomputed from the snapshot each call.
    let service = scenario_service();
    let before = service.get_case_score(&id("b")).unwrap();

    service
        .add_case(Case::new(id("d"), date(2022), "Supreme Court", "us-fed"))
        .unwrap();
    service.ingest(record("d", "b", 2022)).unwrap();

    let after = service.get_case_score(&id("b")).unwrap();
    assert_eq!(after.in_degree, before.in_degree + 1);
}
