//! Context vector construction.
//!
//! Features are external factors only — the current price is deliberately
//! never a feature, otherwise the learner could trivially encode the answer.
//! One scheme is fixed per deployment: mixing schemes across runs invalidates
//! the learned statistics because dimension and scale must match.

use serde::{Deserialize, Serialize};

/// Fixed feature scheme for a deployment.
///
/// Month and remaining stock are always included (normalized); the
/// recent-demand estimate is optional and included verbatim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContextSpec {
    /// Nominal stock capacity used to normalize the stock feature.
    pub nominal_capacity: f64,
    /// Include the recent-demand estimate as a third coordinate.
    pub include_demand: bool,
}

impl Default for ContextSpec {
    fn default() -> Self {
        Self {
            nominal_capacity: 100.0,
            include_demand: true,
        }
    }
}

impl ContextSpec {
    /// Context dimension under this scheme; the agent's `dim` must equal it.
    pub fn dim(&self) -> usize {
        if self.include_demand {
            3
        } else {
            2
        }
    }

    /// Build the context vector.  Pure function.
    ///
    /// - `month` is 1..=12, normalized by 12;
    /// - `stock` is the remaining units, normalized by the nominal capacity;
    /// - `recent_demand` is included verbatim when enabled.
    pub fn build(&self, month: u32, stock: u64, recent_demand: f64) -> Vec<f64> {
        let mut ctx = Vec::with_capacity(self.dim());
        ctx.push(month as f64 / 12.0);
        ctx.push(stock as f64 / self.nominal_capacity.max(1.0));
        if self.include_demand {
            ctx.push(recent_demand);
        }
        ctx
    }
}
