//! Deterministic per-step reward.
//!
//! `reward = profit - instability_penalty + ltv_weight * proxy_ltv + bonus`
//! where `profit = price * quantity`, the penalty charges movement away from
//! the running reference price, `proxy_ltv = profit / 100` stands in for
//! long-term customer value, and the bonus (if configured) rewards choosing
//! the maintain-price action.  All three constants materially shape the
//! learned policy and are configuration, not magic numbers.

use serde::{Deserialize, Serialize};

/// Tunable reward constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Weight on `|price - avg_prev_price|` (price-change aversion).
    pub penalty_coefficient: f64,
    /// Weight on the long-term-value proxy (`profit / 100`).
    pub ltv_weight: f64,
    /// Flat bonus paid when the chosen action holds the price.
    pub stability_bonus: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            penalty_coefficient: 0.5,
            ltv_weight: 0.1,
            stability_bonus: 0.0,
        }
    }
}

/// Score one step.  Pure and deterministic.
///
/// `price_change` is the chosen action's multiplicative delta; a zero delta
/// earns the stability bonus.
pub fn reward(
    cfg: RewardConfig,
    price: f64,
    quantity: u64,
    price_change: f64,
    avg_prev_price: f64,
) -> f64 {
    let profit = price * quantity as f64;
    let instability_penalty = (price - avg_prev_price).abs() * cfg.penalty_coefficient;
    let proxy_ltv = profit / 100.0;
    let bonus = if price_change == 0.0 {
        cfg.stability_bonus
    } else {
        0.0
    };
    profit - instability_penalty + cfg.ltv_weight * proxy_ltv + bonus
}
