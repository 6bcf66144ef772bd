use chrono::{TimeZone, Utc};
use tradegraph::graph::turtle::{parse, serialize};
use tradegraph::graph::vocab::{class, prop, rdf_type, trade};
use tradegraph::graph::{Datatype, Graph, Iri, Literal, PersistenceError, Term};

fn sample_graph() -> Graph {
    let mut graph = Graph::new();
    let pair = trade("WLD_USDT");
    graph.add(pair.clone(), rdf_type(), trade(class::MARKET_PAIR));
    graph.add(pair.clone(), trade(prop::CURRENT_PRICE), Literal::decimal(3.4512));
    graph.add(
        pair.clone(),
        trade(prop::PRICE_UPDATED_AT),
        Literal::date_time(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
    );
    graph.add(trade("ConfigRSI14"), trade(prop::PERIOD), Literal::integer(14));
    graph.add(
        trade("ConfigRSI14"),
        trade(prop::CONFIG_NAME),
        Literal::string("RSI \"fast\"\nline two"),
    );
    graph.add(
        Iri::new("http://other.example/items/1.5"),
        trade(prop::ASSET_SYMBOL),
        Literal::lang_string("Bitcoin", "en"),
    );
    graph
}

#[test]
fn test_serialize_then_parse_reproduces_graph() {
    let graph = sample_graph();
    let text = serialize(&graph);

    let mut reloaded = Graph::new();
    reloaded.extend(parse(&text).unwrap());
    assert_eq!(reloaded, graph);
}

#[test]
fn test_serialize_is_deterministic_and_uses_prefixes() {
    let graph = sample_graph();
    let text = serialize(&graph);
    assert_eq!(text, serialize(&graph.clone()));
    assert!(text.starts_with("@prefix rdf:"));
    assert!(text.contains("trade:WLD_USDT a trade:MarketPair ;"));
    assert!(text.contains("\"14\"^^xsd:integer"));
}

#[test]
fn test_parse_hand_written_forms() {
    let input = r#"
        PREFIX trade: <http://www.example.org/trading#>
        # comment line
        trade:ConfigBB20_2 a trade:IndicatorConfig ;
            trade:period 20 ;
            trade:stdDevMultiplier 2.0 ;
            trade:configName "Bands", "Bandas"@es .
        trade:Flag trade:enabled true .
    "#;
    let facts = parse(input).unwrap();
    assert_eq!(facts.len(), 6);

    let mut graph = Graph::new();
    graph.extend(facts);
    let period = graph.object(&trade("ConfigBB20_2"), &trade(prop::PERIOD)).unwrap();
    assert_eq!(period.as_literal().unwrap().datatype, Datatype::Integer);
    let multiplier = graph
        .object(&trade("ConfigBB20_2"), &trade(prop::STD_DEV_MULTIPLIER))
        .unwrap();
    assert_eq!(multiplier.as_f64(), Some(2.0));
    assert!(graph.contains(
        &trade("Flag"),
        &trade("enabled"),
        &Term::Literal(Literal::boolean(true))
    ));
}

#[test]
fn test_parse_errors_report_line() {
    let input =
        "@prefix trade: <http://www.example.org/trading#> .\n\ntrade:a trade:b [ trade:c 1 ] .\n";
    match parse(input) {
        Err(PersistenceError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_prefix() {
    assert!(parse("nope:a nope:b nope:c .").is_err());
}
