//! Cleaned per-product market history used to drive simulation.
//!
//! The simulator draws a baseline observation per step (price, quantity,
//! month) and a small sample of quantities for the recent-demand estimate.
//! Rows arrive already filtered to a single product with non-positive values
//! excluded upstream (the dataset adapter does that filtering).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Error;

/// One cleaned historical row for the product under simulation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Observation {
    /// Unit price (> 0).
    pub price: f64,
    /// Units sold (> 0).
    pub quantity: u64,
    /// Month of the sale, 1..=12.
    pub month: u32,
}

/// Owned set of observations with seeded sampling helpers.
#[derive(Debug, Clone)]
pub struct MarketHistory {
    rows: Vec<Observation>,
}

impl MarketHistory {
    /// Wrap cleaned rows.  Fails on an empty set — the simulator needs at
    /// least one row to anchor the base price and demand.
    pub fn new(rows: Vec<Observation>) -> Result<Self, Error> {
        if rows.is_empty() {
            return Err(Error::Configuration("market history must be non-empty"));
        }
        Ok(Self { rows })
    }

    /// Single-row history for dataset-free runs (scenarios, demos).
    pub fn synthetic(base_price: f64, base_demand: u64, month: u32) -> Result<Self, Error> {
        if !base_price.is_finite() || base_price <= 0.0 {
            return Err(Error::Configuration("base_price must be > 0"));
        }
        if base_demand == 0 {
            return Err(Error::Configuration("base_demand must be >= 1"));
        }
        Self::new(vec![Observation {
            price: base_price,
            quantity: base_demand,
            month: month.clamp(1, 12),
        }])
    }

    /// First row's price, used as the episode's starting reference price.
    pub fn base_price(&self) -> f64 {
        self.rows[0].price
    }

    /// Draw one row uniformly at random.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Observation {
        self.rows[rng.random_range(0..self.rows.len())]
    }

    /// Mean quantity over `k` uniformly drawn rows (with replacement) — the
    /// recent-demand estimate fed to the context builder.
    pub fn recent_demand<R: Rng>(&self, rng: &mut R, k: usize) -> f64 {
        let k = k.max(1);
        let mut sum = 0.0;
        for _ in 0..k {
            sum += self.sample(rng).quantity as f64;
        }
        sum / k as f64
    }
}
