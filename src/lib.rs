//! `repricer`: deterministic contextual-bandit pricing simulation.
//!
//! A sequential price-adjustment policy for a single retail product is
//! learned by a linear contextual bandit ([`LinUcb`]) and exercised by a
//! bounded-horizon episode simulator ([`Simulator`]), then aggregated over
//! many independent runs ([`Simulator::run_and_aggregate`]).
//!
//! The pieces, leaves first:
//!
//! - [`ContextSpec`]: turns per-step observations (month, remaining stock,
//!   optionally a recent-demand estimate) into a fixed-length feature vector.
//!   The price itself is never a feature.
//! - [`reward`]: deterministic scalar score — profit, minus a price-change
//!   penalty, plus a long-term-value proxy and an optional stability bonus.
//! - [`simulated_quantity`]: deterministic demand response per
//!   [`PriceAction`], with asymmetric elasticity (raises hurt more than cuts
//!   help) and a 1-unit floor.
//! - [`LinUcb`]: per-arm `(A, b)` ridge statistics, UCB selection, rank-1
//!   updates.  Selection is a pure function; `update` is the sole mutator.
//! - [`Simulator`]: one episode = forced warm-up over every arm, then a
//!   budgeted main loop threading stock/price/month between steps.
//! - [`Simulator::run_and_aggregate`]: N fresh episodes, per-run table to a
//!   [`RunSink`], arithmetic means back to the caller.
//!
//! **Goals:**
//! - **Deterministic by default**: same config + seed → same runs, same
//!   aggregate.  Selection ties break to the lowest arm index.
//! - **No I/O in the hot loop**: sinks and the dataset adapter run strictly
//!   before/after simulation.
//! - **Per-episode ownership**: every episode constructs its own agent and
//!   state; batches are embarrassingly parallel with no shared state.
//!
//! **Non-goals:**
//! - Not a production pricing engine: the demand response is a fixed
//!   multiplier model, learned parameters do not persist across episodes,
//!   and no significance testing is done on aggregates.
//! - No HTTP surface; [`RunSummary`] and [`AggregateSummary`] serialize with
//!   `serde` so any adapter layer can pass them through.
//!
//! # Example
//!
//! ```rust
//! use repricer::{MarketHistory, MemorySink, SimConfig, Simulator};
//!
//! let history = MarketHistory::synthetic(10.0, 20, 1).unwrap();
//! let sim = Simulator::new(history, SimConfig::default()).unwrap();
//!
//! let run = sim.run_episode(0).unwrap();
//! let sum: f64 = run.steps.iter().map(|s| s.reward).sum();
//! assert!((run.total_reward - sum).abs() < 1e-9);
//!
//! let mut sink = MemorySink::default();
//! let agg = sim.run_and_aggregate(10, &mut sink).unwrap();
//! assert_eq!(agg.total_runs, 10);
//! assert_eq!(sink.rows.len(), 10);
//! ```

#![forbid(unsafe_code)]

mod error;
pub use error::Error;

mod linucb;
pub use linucb::{ArmScore, LinUcb, LinUcbConfig};

mod context;
pub use context::ContextSpec;

mod reward;
pub use reward::{reward, RewardConfig};

mod demand;
pub use demand::{simulated_quantity, DemandConfig, PriceAction, ACTIONS};

mod market;
pub use market::{MarketHistory, Observation};

mod episode;
pub use episode::{RunSummary, SimConfig, Simulator, StepRecord};

mod aggregate;
pub use aggregate::{AggregateSummary, MemorySink, RunOutcome, RunSink};

mod dataset;
pub use dataset::{load_observations, parse_observations};

mod sink;
pub use sink::CsvRunSink;

pub const REPRICER_VERSION: &str = env!("CARGO_PKG_VERSION");
