//! Multi-run aggregation.
//!
//! Runs N independent episodes (fresh agent and state per run, per-run seed
//! derived from the base seed), persists the full per-run table to a
//! [`RunSink`] collaborator, and returns only the aggregate summary.
//!
//! Error policy: the first failing run or sink error aborts the whole batch.
//! Runs are independent, so a corrupted run signals a configuration bug that
//! would affect every run; skipping it would only mask the bug.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, PriceAction, RunSummary, Simulator};

/// Per-run row of the result table, one per episode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunOutcome {
    /// 1-based run index.
    pub run: usize,
    pub total_reward: f64,
    /// Steps taken, forced warm-up steps included.
    pub steps_taken: usize,
    /// Recorded steps that cut the price.
    pub cut_count: usize,
    /// Recorded steps that held the price.
    pub hold_count: usize,
    /// Recorded steps that raised the price.
    pub raise_count: usize,
}

impl RunOutcome {
    /// Build the row for run `run` from an episode summary.
    pub fn from_summary(run: usize, summary: &RunSummary) -> Self {
        Self {
            run,
            total_reward: summary.total_reward,
            steps_taken: summary.steps_taken(),
            cut_count: summary.action_count(PriceAction::Cut),
            hold_count: summary.action_count(PriceAction::Hold),
            raise_count: summary.action_count(PriceAction::Raise),
        }
    }
}

/// Arithmetic means across a batch of runs.  Derived read-only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub total_runs: usize,
    pub average_reward: f64,
    pub average_steps: f64,
    pub average_cut: f64,
    pub average_hold: f64,
    pub average_raise: f64,
}

impl AggregateSummary {
    /// Mean the per-run table.  An empty table yields zeroed means.
    pub fn from_outcomes(outcomes: &[RunOutcome]) -> Self {
        let n = outcomes.len();
        let denom = n.max(1) as f64;
        let mut reward = 0.0;
        let mut steps = 0.0;
        let mut cut = 0.0;
        let mut hold = 0.0;
        let mut raise = 0.0;
        for o in outcomes {
            reward += o.total_reward;
            steps += o.steps_taken as f64;
            cut += o.cut_count as f64;
            hold += o.hold_count as f64;
            raise += o.raise_count as f64;
        }
        Self {
            total_runs: n,
            average_reward: reward / denom,
            average_steps: steps / denom,
            average_cut: cut / denom,
            average_hold: hold / denom,
            average_raise: raise / denom,
        }
    }
}

/// Sink for the per-run result table.  Accepts rows, returns nothing.
pub trait RunSink {
    fn persist(&mut self, rows: &[RunOutcome]) -> Result<(), Error>;
}

/// In-memory sink, mostly for tests and demos.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub rows: Vec<RunOutcome>,
}

impl RunSink for MemorySink {
    fn persist(&mut self, rows: &[RunOutcome]) -> Result<(), Error> {
        self.rows.extend_from_slice(rows);
        Ok(())
    }
}

impl Simulator {
    /// Run `n_runs` independent episodes, persist the per-run table, and
    /// return the aggregate summary.
    ///
    /// Run `i` (1-based) uses seed `base_seed + i - 1`, so a batch is fully
    /// reproducible from the config.  Persistence happens once, after all
    /// runs complete — no I/O inside the simulation loop.
    pub fn run_and_aggregate<S: RunSink>(
        &self,
        n_runs: usize,
        sink: &mut S,
    ) -> Result<AggregateSummary, Error> {
        let base_seed = self.config().seed;
        let mut outcomes = Vec::with_capacity(n_runs);
        for run in 1..=n_runs {
            let summary = self.run_episode(base_seed.wrapping_add(run as u64 - 1))?;
            let outcome = RunOutcome::from_summary(run, &summary);
            info!(
                run,
                total_reward = outcome.total_reward,
                steps_taken = outcome.steps_taken,
                "run complete"
            );
            outcomes.push(outcome);
        }
        sink.persist(&outcomes)?;
        Ok(AggregateSummary::from_outcomes(&outcomes))
    }
}
