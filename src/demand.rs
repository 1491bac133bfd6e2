//! Price-change actions and the deterministic demand response.
//!
//! Demand elasticity is intentionally asymmetric: a 10% raise contracts
//! demand by more (x0.85) than a 10% cut expands it (x1.08).  The simulated
//! quantity is floored at 1 unit so the reward stays well-defined even when
//! the baseline collapses.

use serde::{Deserialize, Serialize};

/// One of the fixed price-change actions, identified by arm index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceAction {
    /// -10% price cut (arm 0).
    Cut,
    /// Maintain the current price (arm 1).
    Hold,
    /// +10% price raise (arm 2).
    Raise,
}

/// All actions in arm-index order.
pub const ACTIONS: [PriceAction; 3] = [PriceAction::Cut, PriceAction::Hold, PriceAction::Raise];

impl PriceAction {
    /// Multiplicative price delta: new price = reference price * (1 + delta).
    pub fn delta(self) -> f64 {
        match self {
            PriceAction::Cut => -0.10,
            PriceAction::Hold => 0.0,
            PriceAction::Raise => 0.10,
        }
    }

    /// Arm index of this action.
    pub fn arm(self) -> usize {
        match self {
            PriceAction::Cut => 0,
            PriceAction::Hold => 1,
            PriceAction::Raise => 2,
        }
    }

    /// Action for an agent-produced arm index.
    pub fn from_arm(arm: usize) -> Option<Self> {
        ACTIONS.get(arm).copied()
    }
}

/// Demand-response multipliers, tunable per deployment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DemandConfig {
    /// Quantity multiplier applied on a price raise (< 1).
    pub raise_multiplier: f64,
    /// Quantity multiplier applied on a price cut (> 1).
    pub cut_multiplier: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            raise_multiplier: 0.85,
            cut_multiplier: 1.08,
        }
    }
}

impl DemandConfig {
    fn multiplier(&self, action: PriceAction) -> f64 {
        match action {
            PriceAction::Cut => self.cut_multiplier,
            PriceAction::Hold => 1.0,
            PriceAction::Raise => self.raise_multiplier,
        }
    }
}

/// Quantity sold for a baseline demand estimate under `action`.
///
/// Truncates toward zero and floors at 1 unit — never zero.
pub fn simulated_quantity(cfg: DemandConfig, action: PriceAction, baseline: f64) -> u64 {
    let q = (baseline.max(0.0) * cfg.multiplier(action)) as u64;
    q.max(1)
}
