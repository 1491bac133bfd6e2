//! Single-episode simulation: warm-up, bounded main loop, termination.
//!
//! The episode is a small state machine, `WarmUp -> Running -> Terminated`:
//!
//! - **WarmUp** forces each arm once in index order.  A fresh agent scores
//!   every arm identically (identity `A`, zero `b`), so without the forced
//!   pass the left-to-right tie-break would starve arms 1..n permanently.
//!   Warm-up steps run the full pipeline (context, price, demand, reward,
//!   update, state advance) but are excluded from the visible result sequence
//!   and from total-reward accounting.
//! - **Running** repeats select -> price -> demand -> reward -> update ->
//!   advance until the stock is exhausted or the step budget (which covers
//!   warm-up) runs out, recording one `StepRecord` per step.
//!
//! Each episode owns a fresh agent and a fresh state; nothing is shared
//! across runs, so batches of episodes are embarrassingly parallel.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    reward, simulated_quantity, ContextSpec, DemandConfig, Error, LinUcb, LinUcbConfig,
    MarketHistory, PriceAction, RewardConfig, ACTIONS,
};

/// Full simulation configuration: agent hyperparameters plus episode shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimConfig {
    /// Exploration coefficient for the LinUCB agent (> 0).
    pub alpha: f64,
    /// Feature scheme; fixes the agent's context dimension.
    pub context: ContextSpec,
    pub demand: DemandConfig,
    pub reward: RewardConfig,
    /// Units in stock at episode start.
    pub initial_stock: u64,
    /// Total step budget per episode, warm-up included.
    pub step_budget: usize,
    /// Sample size for the recent-demand estimate.
    pub recent_sample: usize,
    /// Base seed for the per-step market sampling.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            context: ContextSpec::default(),
            demand: DemandConfig::default(),
            reward: RewardConfig::default(),
            initial_stock: 100,
            step_budget: 50,
            recent_sample: 5,
            seed: 0,
        }
    }
}

/// One recorded simulation step.  Immutable once produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based index over recorded (post-warm-up) steps.
    pub step: usize,
    pub action: PriceAction,
    /// Price after applying the action's delta.
    pub price: f64,
    /// Units sold this step.
    pub quantity: u64,
    pub reward: f64,
    /// Units remaining after this step.
    pub stock: u64,
}

/// Outcome of one episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Exact sum of `reward` over `steps` (warm-up excluded).
    pub total_reward: f64,
    /// Forced warm-up steps executed before recording began.
    pub warmup_steps: usize,
    /// Recorded steps, in order.
    pub steps: Vec<StepRecord>,
}

impl RunSummary {
    /// Steps taken including the forced warm-up pass.
    pub fn steps_taken(&self) -> usize {
        self.warmup_steps + self.steps.len()
    }

    /// How many recorded steps chose `action`.
    pub fn action_count(&self, action: PriceAction) -> usize {
        self.steps.iter().filter(|s| s.action == action).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    WarmUp,
    Running,
    Terminated,
}

/// Mutable per-episode state, created at episode start and discarded at end.
#[derive(Debug, Clone, Copy)]
struct EpisodeState {
    stock: u64,
    price: f64,
    avg_prev_price: f64,
    month: u32,
}

/// Episode simulator over a fixed market history.
///
/// `run_episode` is a one-shot computation: it builds a fresh agent and a
/// fresh episode state, threads them through the state machine, and returns
/// the run summary.  The simulator itself is immutable and reusable.
#[derive(Debug, Clone)]
pub struct Simulator {
    history: MarketHistory,
    cfg: SimConfig,
}

impl Simulator {
    /// Validate the configuration against the history and build a simulator.
    pub fn new(history: MarketHistory, cfg: SimConfig) -> Result<Self, Error> {
        // Agent construction re-validates alpha/dim; do it once up front so a
        // bad configuration fails before any simulation starts.
        LinUcb::new(LinUcbConfig {
            n_arms: ACTIONS.len(),
            dim: cfg.context.dim(),
            alpha: cfg.alpha,
        })?;
        if cfg.step_budget == 0 {
            return Err(Error::Configuration("step_budget must be >= 1"));
        }
        Ok(Self { history, cfg })
    }

    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    /// Run one full episode with a fresh agent, seeded by `seed`.
    pub fn run_episode(&self, seed: u64) -> Result<RunSummary, Error> {
        let cfg = &self.cfg;
        let mut agent = LinUcb::new(LinUcbConfig {
            n_arms: ACTIONS.len(),
            dim: cfg.context.dim(),
            alpha: cfg.alpha,
        })?;
        let mut rng = StdRng::seed_from_u64(seed);

        let base_price = self.history.base_price();
        let mut state = EpisodeState {
            stock: cfg.initial_stock,
            price: base_price,
            avg_prev_price: base_price,
            month: self.history.sample(&mut rng).month,
        };

        let mut phase = if state.stock == 0 {
            Phase::Terminated
        } else {
            Phase::WarmUp
        };
        let mut forced = 0usize; // next arm to force during warm-up
        let mut total_steps = 0usize;
        let mut steps: Vec<StepRecord> = Vec::new();
        let mut total_reward = 0.0;
        let warmup_budget = ACTIONS.len();
        let mut warmup_steps = 0usize;

        while phase != Phase::Terminated {
            if total_steps >= cfg.step_budget {
                break;
            }

            let recent = self.history.recent_demand(&mut rng, cfg.recent_sample);
            let context = cfg.context.build(state.month, state.stock, recent);

            let arm = match phase {
                Phase::WarmUp => {
                    let a = forced;
                    forced += 1;
                    a
                }
                Phase::Running => agent.select_arm(&context)?,
                Phase::Terminated => unreachable!(),
            };
            let action = PriceAction::from_arm(arm).ok_or(Error::InvalidArm(arm))?;
            debug!(arm, ?action, ?phase, "arm selected");

            let new_price = state.price * (1.0 + action.delta());
            let baseline = self.history.sample(&mut rng).quantity as f64;
            let quantity = simulated_quantity(cfg.demand, action, baseline);
            let r = reward(
                cfg.reward,
                new_price,
                quantity,
                action.delta(),
                state.avg_prev_price,
            );
            agent.update(arm, &context, r)?;

            state.price = new_price;
            state.avg_prev_price = new_price;
            state.stock = state.stock.saturating_sub(quantity);
            state.month = state.month % 12 + 1;
            total_steps += 1;

            match phase {
                Phase::WarmUp => {
                    warmup_steps += 1;
                    if state.stock == 0 {
                        phase = Phase::Terminated;
                    } else if forced == warmup_budget {
                        phase = Phase::Running;
                    }
                }
                Phase::Running => {
                    let step = steps.len() + 1;
                    total_reward += r;
                    steps.push(StepRecord {
                        step,
                        action,
                        price: new_price,
                        quantity,
                        reward: r,
                        stock: state.stock,
                    });
                    debug!(
                        step,
                        price = new_price,
                        quantity,
                        reward = r,
                        stock = state.stock,
                        "step complete"
                    );
                    if state.stock == 0 {
                        phase = Phase::Terminated;
                    }
                }
                Phase::Terminated => unreachable!(),
            }
        }

        Ok(RunSummary {
            total_reward,
            warmup_steps,
            steps,
        })
    }
}
