//! Pricing quickstart — one full episode, step by step.
//!
//! Runs against a synthetic single-row market history by default; pass a
//! dataset path and product code to simulate against real cleaned rows:
//!
//!   cargo run --example pricing_quickstart
//!   cargo run --example pricing_quickstart -- online_retail_II.csv 85048

use std::path::Path;

use repricer::{load_observations, MarketHistory, SimConfig, Simulator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), repricer::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let history = match (args.next(), args.next()) {
        (Some(path), Some(code)) => {
            let rows = load_observations(Path::new(&path), &code)?;
            println!("loaded {} cleaned rows for product {code}", rows.len());
            MarketHistory::new(rows)?
        }
        _ => MarketHistory::synthetic(10.0, 20, 1)?,
    };

    let sim = Simulator::new(history, SimConfig::default())?;
    let run = sim.run_episode(sim.config().seed)?;

    println!(
        "episode: {} warm-up + {} recorded steps",
        run.warmup_steps,
        run.steps.len()
    );
    for rec in &run.steps {
        println!(
            "  step {:>2}: {:<5} price={:>6.2} qty={:>3} reward={:>8.2} stock={:>3}",
            rec.step,
            format!("{:?}", rec.action),
            rec.price,
            rec.quantity,
            rec.reward,
            rec.stock
        );
    }
    println!("total reward: {:.2}", run.total_reward);

    println!("\nas JSON:\n{}", serde_json::to_string_pretty(&run).unwrap());
    Ok(())
}
