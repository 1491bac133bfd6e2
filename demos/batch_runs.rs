//! Batch aggregation — N independent runs, CSV table, mean summary.
//!
//! Run with:
//!   cargo run --example batch_runs -- 100 results.csv

use repricer::{CsvRunSink, MarketHistory, SimConfig, Simulator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), repricer::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let n_runs: usize = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(100);
    let out = args.next().unwrap_or_else(|| "simulation_results.csv".into());

    let history = MarketHistory::synthetic(10.0, 20, 1)?;
    let sim = Simulator::new(history, SimConfig::default())?;

    let mut sink = CsvRunSink::new(&out);
    let agg = sim.run_and_aggregate(n_runs, &mut sink)?;

    println!("per-run table written to {out}");
    println!("{}", serde_json::to_string_pretty(&agg).unwrap());
    Ok(())
}
