use chrono::NaiveDate;
use precedent_core::analysis::ranking::{
    ImportanceRanker, WEIGHT_HITS_AUTHORITY, WEIGHT_IN_DEGREE, WEIGHT_PAGERANK,
    WEIGHT_TEMPORAL_INFLUENCE,
};
use precedent_core::case::Case;
use precedent_core::graph::CitationGraph;
use precedent_core::types::{CaseFilter, CaseId};

fn id(s: &str) -> CaseId {
    CaseId::new(s).unwrap()
}

fn date(y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, 1, 15).unwrap()
}

fn scenario_graph() -> CitationGraph {
    let mut graph = CitationGraph::new();
    graph
        .add_case(Case::new(id("a"), date(2000), "Supreme Court", "us-fed"))
        .unwrap();
    graph
        .add_case(Case::new(id("b"), date(2010), "Supreme Court", "us-fed"))
        .unwrap();
    graph
        .add_case(Case::new(id("c"), date(2020), "Supreme Court", "us-fed"))
        .unwrap();
    graph.add_citation(id("b"), id("a"), date(2010), "us-fed").unwrap();
    graph.add_citation(id("c"), id("a"), date(2020), "us-fed").unwrap();
    graph.add_citation(id("c"), id("b"), date(2020), "us-fed").unwrap();
    graph
}

#[test]
fn composite_weights_sum_to_one() {
    let total =
        WEIGHT_PAGERANK + WEIGHT_HITS_AUTHORITY + WEIGHT_TEMPORAL_INFLUENCE + WEIGHT_IN_DEGREE;
    assert!((total - 1.0).abs() < f64::EPSILON);
}

#[test]
fn rank_top_k_returns_at_most_k_descending() {
    let snapshot = scenario_graph().snapshot();
    let ranker = ImportanceRanker::default();

    let (top2, warnings) = ranker.rank_top_k(&snapshot, date(2024), 2);
    assert!(warnings.is_empty());
    assert_eq!(top2.len(), 2);
    assert_eq!(top2[0].case_id, id("a"));
    assert_eq!(top2[1].case_id, id("b"));
    assert!(top2[0].score >= top2[1].score);

    let (all, _) = ranker.rank_top_k(&snapshot, date(2024), 10);
    assert_eq!(all.len(), 3, "k larger than the graph returns everything");
    for pair in all.windows(2) {
        assert!(pair[0].score >= pair[1].score, "ranking must be descending");
    }

    let (none, _) = ranker.rank_top_k(&snapshot, date(2024), 0);
    assert!(none.is_empty());
}

#[test]
fn scenario_in_degrees_and_top_two() {
    let graph = scenario_graph();
    assert_eq!(graph.in_degree(&id("a")), 2);
    assert_eq!(graph.in_degree(&id("b")), 1);
    assert_eq!(graph.in_degree(&id("c")), 0);

    let ranker = ImportanceRanker::default();
    let (top2, _) = ranker.rank_top_k(&graph.snapshot(), date(2024), 2);
    let ids: Vec<_> = top2.iter().map(|r| r.case_id.clone()).collect();
    assert_eq!(ids, vec![id("a"), id("b")]);
}

#[test]
fn structural_ties_break_lexicographically_by_id() {
    // Two disconnected, perfectly symmetric pairs: citer-1 cites left,
    // citer-2 cites right. left and right end up metric-identical, so the
    // tie must break on case id, deterministically.
    let mut graph = CitationGraph::new();
    graph
        .add_case(Case::new(id("left"), date(2000), "Supreme Court", "us-fed"))
        .unwrap();
    graph
        .add_case(Case::new(id("right"), date(2000), "Supreme Court", "us-fed"))
        .unwrap();
    graph.add_citation(id("citer-1"), id("left"), date(2010), "us-fed").unwrap();
    graph.add_citation(id("citer-2"), id("right"), date(2010), "us-fed").unwrap();

    let ranker = ImportanceRanker::default();
    let (first, _) = ranker.rank_top_k(&graph.snapshot(), date(2024), 4);
    let (second, _) = ranker.rank_top_k(&graph.snapshot(), date(2024), 4);
    assert_eq!(first, second, "repeated calls must be identical");

    assert_eq!(first[0].case_id, id("left"));
    assert_eq!(first[1].case_id, id("right"));
    assert_eq!(first[0].score, first[1].score);
}

#[test]
fn filter_is_applied_before_scoring() {
    let mut graph = scenario_graph();
    // A state-court island, weakly cited compared to the federal cluster.
    graph
        .add_case(Case::new(id("state-old"), date(1995), "State Supreme", "us-cal"))
        .unwrap();
    graph
        .add_citation(id("state-new"), id("state-old"), date(2015), "us-cal")
        .unwrap();

    let ranker = ImportanceRanker::default();
    let snapshot = graph.snapshot();

    let filter = CaseFilter::jurisdiction("us-cal");
    let scoped = snapshot.filtered(&filter);
    assert_eq!(scoped.len(), 2);
    assert_eq!(scoped.edge_count(), 1);

    let (ranked, _) = ranker.rank_top_k(&scoped, date(2024), 10);
    assert_eq!(ranked.len(), 2);
    // Within its jurisdiction the weakly cited case ranks first; rank is
    // relative to the filtered subset, not the whole corpus.
    assert_eq!(ranked[0].case_id, id("state-old"));
    for r in &ranked {
        assert!(r.case_id == id("state-old") || r.case_id == id("state-new"));
    }
}

#[test]
fn date_range_filter_is_inclusive() {
    let snapshot = scenario_graph().snapshot();
    let filter = CaseFilter::decided_between(date(2000), date(2010));
    let scoped = snapshot.filtered(&filter);
    assert_eq!(scoped.len(), 2, "bounds are inclusive on both ends");
}

#[test]
fn score_table_carries_convergence_warnings() {
    use precedent_core::analysis::centrality::CentralityConfig;
    use precedent_core::analysis::temporal::TemporalConfig;

    let starved = CentralityConfig {
        max_iterations: 1,
        ..CentralityConfig::default()
    };
    let ranker = ImportanceRanker::new(starved, TemporalConfig::default());
    let table = ranker.score_table(&scenario_graph().snapshot(), date(2024));

    assert_eq!(table.scores.len(), 3);
    let algorithms: Vec<_> = table.warnings.iter().map(|w| w.algorithm.as_str()).collect();
    assert!(algorithms.contains(&"pagerank"));
    assert!(algorithms.contains(&"hits"));
}

#[test]
fn normalization_is_relative_to_the_scored_set() {
    let snapshot = scenario_graph().snapshot();
    let ranker = ImportanceRanker::default();
    let table = ranker.score_table(&snapshot, date(2024));

    // Min-max over the set puts the best case's normalized metrics at 1.0,
    // so its composite equals the weight sum for metrics it leads on.
    let composites: Vec<f64> = table.scores.iter().map(|s| s.composite).collect();
    let max = composites.iter().copied().fold(f64::MIN, f64::max);
    let min = composites.iter().copied().fold(f64::MAX, f64::min);
    assert!(max <= 1.0 + 1e-12);
    assert!(min >= 0.0);
}
