use chrono::{TimeZone, Utc};
use tradegraph::graph::query::{var, TriplePattern};
use tradegraph::graph::vocab::{class, prop, rdf_type, trade};
use tradegraph::graph::{Filter, Graph, Literal, Projection, Query, QueryError, Term};

fn pairs_graph() -> Graph {
    let mut graph = Graph::new();
    for (pair, price) in [("WLD_USDT", 3.5), ("BTC_USDT", 60_000.0), ("ETH_USDT", 900.0)] {
        graph.add(trade(pair), rdf_type(), trade(class::MARKET_PAIR));
        graph.add(trade(pair), trade(prop::CURRENT_PRICE), Literal::decimal(price));
    }
    // No price for this one.
    graph.add(trade("SOL_USDT"), rdf_type(), trade(class::MARKET_PAIR));
    graph
}

#[test]
fn test_basic_pattern_binds_all_matches() {
    let graph = pairs_graph();
    let rows = Query::new()
        .select(&["pair", "price"])
        .pattern(var("pair"), trade(prop::CURRENT_PRICE), var("price"))
        .evaluate(&graph)
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.is_bound("price")));
}

#[test]
fn test_optional_keeps_rows_without_match() {
    let graph = pairs_graph();
    let rows = Query::new()
        .select(&["pair", "price"])
        .pattern(var("pair"), rdf_type(), trade(class::MARKET_PAIR))
        .optional(vec![TriplePattern::new(
            var("pair"),
            trade(prop::CURRENT_PRICE),
            var("price"),
        )])
        .evaluate(&graph)
        .unwrap();
    assert_eq!(rows.len(), 4);
    let sol = rows
        .iter()
        .find(|r| r.iri("pair") == Some(&trade("SOL_USDT")))
        .unwrap();
    assert!(!sol.is_bound("price"));
    assert_eq!(sol.f64("price"), None);
}

#[test]
fn test_order_by_numeric_value_not_lexical() {
    let graph = pairs_graph();
    let rows = Query::new()
        .select(&["pair", "price"])
        .pattern(var("pair"), trade(prop::CURRENT_PRICE), var("price"))
        .order_by_desc("price")
        .evaluate(&graph)
        .unwrap();
    let order: Vec<&str> = rows
        .iter()
        .map(|r| r.iri("pair").unwrap().local_name())
        .collect();
    assert_eq!(order, vec!["BTC_USDT", "ETH_USDT", "WLD_USDT"]);
}

#[test]
fn test_order_by_date_time_and_limit() {
    let mut graph = Graph::new();
    for (id, day) in [("a", 3), ("b", 1), ("c", 2)] {
        graph.add(
            trade(id),
            trade(prop::VALUE_TIMESTAMP),
            Literal::date_time(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
        );
    }
    let rows = Query::new()
        .select(&["v", "ts"])
        .pattern(var("v"), trade(prop::VALUE_TIMESTAMP), var("ts"))
        .order_by_desc("ts")
        .limit(1)
        .evaluate(&graph)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].iri("v"), Some(&trade("a")));
}

#[test]
fn test_filter_in_restricts_values() {
    let graph = pairs_graph();
    let rows = Query::new()
        .select(&["pair"])
        .pattern(var("pair"), rdf_type(), trade(class::MARKET_PAIR))
        .filter(Filter::In(
            "pair".to_string(),
            vec![Term::Iri(trade("WLD_USDT")), Term::Iri(trade("SOL_USDT"))],
        ))
        .evaluate(&graph)
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_group_concat_aggregates_per_group() {
    let mut graph = Graph::new();
    graph.add(trade("S1"), trade(prop::USES_INDICATOR_CONFIG), trade("CfgA"));
    graph.add(trade("S1"), trade(prop::USES_INDICATOR_CONFIG), trade("CfgB"));
    graph.add(trade("S2"), trade(prop::USES_INDICATOR_CONFIG), trade("CfgA"));
    graph.add(trade("CfgA"), trade(prop::CONFIG_NAME), Literal::string("A"));
    graph.add(trade("CfgB"), trade(prop::CONFIG_NAME), Literal::string("B"));

    let rows = Query::new()
        .select(&["s"])
        .project(Projection::group_concat("name", "names", ", "))
        .pattern(var("s"), trade(prop::USES_INDICATOR_CONFIG), var("cfg"))
        .pattern(var("cfg"), trade(prop::CONFIG_NAME), var("name"))
        .group_by("s")
        .order_by("s")
        .evaluate(&graph)
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text("names"), Some("A, B"));
    assert_eq!(rows[1].text("names"), Some("A"));
}

#[test]
fn test_group_concat_distinct_drops_duplicates() {
    let mut graph = Graph::new();
    graph.add(trade("R"), trade(prop::BASED_ON_SIGNAL), trade("Sig1"));
    graph.add(trade("R"), trade(prop::BASED_ON_SIGNAL), trade("Sig2"));
    graph.add(trade("Sig1"), trade(prop::SIGNAL_DESCRIPTION), Literal::string("same"));
    graph.add(trade("Sig2"), trade(prop::SIGNAL_DESCRIPTION), Literal::string("same"));

    let rows = Query::new()
        .select(&["r"])
        .project(Projection::group_concat("d", "ds", "; ").distinct())
        .pattern(var("r"), trade(prop::BASED_ON_SIGNAL), var("sig"))
        .pattern(var("sig"), trade(prop::SIGNAL_DESCRIPTION), var("d"))
        .group_by("r")
        .evaluate(&graph)
        .unwrap();
    assert_eq!(rows[0].text("ds"), Some("same"));
}

#[test]
fn test_zero_solutions_yield_zero_rows_even_when_grouping() {
    let graph = Graph::new();
    let rows = Query::new()
        .select(&["s"])
        .project(Projection::group_concat("o", "all", ","))
        .pattern(var("s"), trade(prop::CONFIG_NAME), var("o"))
        .group_by("s")
        .evaluate(&graph)
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_malformed_queries_are_rejected() {
    let graph = pairs_graph();
    let cases = vec![
        Query::new().pattern(var("s"), rdf_type(), var("o")),
        Query::new().select(&["s"]),
        Query::new()
            .select(&["missing"])
            .pattern(var("s"), rdf_type(), var("o")),
        Query::new()
            .select(&["s", "o"])
            .project(Projection::group_concat("o", "all", ","))
            .pattern(var("s"), rdf_type(), var("o"))
            .group_by("s"),
        Query::new()
            .select(&["s"])
            .pattern(var("s"), rdf_type(), var("o"))
            .order_by("o"),
        Query::new()
            .select(&["s", "s"])
            .pattern(var("s"), rdf_type(), var("o")),
        Query::new()
            .select(&["s"])
            .pattern(Literal::string("x"), rdf_type(), var("s")),
    ];
    for query in cases {
        assert!(matches!(query.evaluate(&graph), Err(QueryError::Malformed(_))));
    }
}
