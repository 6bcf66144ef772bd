//! Runs a single analysis cycle for one strategy and prints the outcome.
//!
//! Usage: `tradegraph [STRATEGY_ID]` (defaults to `DEFAULT_STRATEGY`).

use dotenvy::dotenv;
use tradegraph::config::AppConfig;
use tradegraph::core::bootstrap::{build_orchestrator, open_knowledge_base};
use tradegraph::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = AppConfig::from_env();
    let strategy = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.default_strategy.clone());

    let kb = open_knowledge_base(&config)?;
    let orchestrator = build_orchestrator(&config, kb, None);
    let report = orchestrator.run_cycle(&strategy)?;

    println!("Strategy: {} ({})", report.strategy, report.pair_label);
    println!("Price: {:.4} at {}", report.current_price, report.price_timestamp);
    println!("Indicators:");
    for indicator in &report.indicators {
        println!("  {} [{}]: {:?}", indicator.config_id, indicator.kind, indicator.reading);
    }
    for skipped in &report.skipped_indicators {
        println!("  {skipped}: skipped");
    }
    println!("Signals:");
    for signal in &report.signals {
        println!("  {}: {}", signal.signal_type, signal.description);
    }
    let rec = &report.recommendation;
    println!(
        "Recommendation: {} (confidence {:.2})",
        rec.action, rec.confidence
    );
    println!("  {}", rec.justification);
    match (&report.persist_error, report.persisted) {
        (Some(e), _) => println!("Knowledge base not saved: {e}"),
        (None, true) => println!("Knowledge base saved to {}", config.store_path.display()),
        (None, false) => {}
    }

    Ok(())
}
