//! Linear contextual bandit (LinUCB) with per-arm ridge-regression state.
//!
//! The agent keeps, for each arm, the sufficient statistics `(A, b)` of a
//! ridge regression: `A` starts as the `d x d` identity and accumulates
//! rank-1 outer products `x xᵀ`, `b` accumulates `reward * x`.  Since `A` is
//! the identity plus a sum of PSD terms it stays symmetric positive definite,
//! hence invertible, under any update sequence.
//!
//! Selection scores each arm with the classic UCB rule
//!
//! ```text
//!   p_a = theta_aᵀ x + alpha * sqrt(xᵀ A_a⁻¹ x),   theta_a = A_a⁻¹ b_a
//! ```
//!
//! where `alpha` trades exploration (the uncertainty bonus under that arm's
//! covariance) against exploitation.  Ties break to the lowest arm index — a
//! left-to-right maximum scan with strict `>` — so selection is a pure
//! function of `(state, context)` with no RNG involved.
//!
//! `A⁻¹` is recomputed per selection per arm.  `dim` and `n_arms` are small
//! here (≤5 and ≤3 in practice), so a Sherman–Morrison incremental inverse
//! would not change observable behavior and is not worth the extra state.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Per-arm score tuple: `(ucb, mean, bonus)`.
pub type ArmScore = (f64, f64, f64);

/// Configuration for the LinUCB agent.  Fixed for the agent's lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinUcbConfig {
    /// Number of arms (must be >= 1).
    pub n_arms: usize,
    /// Context vector dimension (must be >= 1).
    pub dim: usize,
    /// Exploration strength (must be finite and > 0).
    pub alpha: f64,
}

impl Default for LinUcbConfig {
    fn default() -> Self {
        Self {
            n_arms: 3,
            dim: 3,
            alpha: 1.0,
        }
    }
}

/// Ridge-regression sufficient statistics for one arm.
#[derive(Debug, Clone)]
struct ArmState {
    /// Design matrix A (d x d, row-major), identity at init.
    a: Vec<f64>,
    /// Reward-weighted feature sum (d), zero at init.
    b: Vec<f64>,
}

impl ArmState {
    fn new(dim: usize) -> Self {
        let mut a = vec![0.0; dim * dim];
        for i in 0..dim {
            a[i * dim + i] = 1.0;
        }
        Self {
            a,
            b: vec![0.0; dim],
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    let mut s = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        s += x * y;
    }
    s
}

fn mat_vec(a: &[f64], dim: usize, x: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; dim];
    for i in 0..dim {
        out[i] = dot(&a[i * dim..(i + 1) * dim], x);
    }
    out
}

/// Invert a symmetric positive-definite matrix via Gauss–Jordan elimination
/// with partial pivoting.  Positive definiteness guarantees nonzero pivots.
fn invert(a: &[f64], dim: usize) -> Vec<f64> {
    let mut m = a.to_vec();
    let mut inv = vec![0.0; dim * dim];
    for i in 0..dim {
        inv[i * dim + i] = 1.0;
    }

    for col in 0..dim {
        let mut pivot = col;
        for row in (col + 1)..dim {
            if m[row * dim + col].abs() > m[pivot * dim + col].abs() {
                pivot = row;
            }
        }
        if pivot != col {
            for j in 0..dim {
                m.swap(col * dim + j, pivot * dim + j);
                inv.swap(col * dim + j, pivot * dim + j);
            }
        }

        let diag = m[col * dim + col];
        debug_assert!(diag.abs() > 0.0, "SPD matrix has nonzero pivots");
        for j in 0..dim {
            m[col * dim + j] /= diag;
            inv[col * dim + j] /= diag;
        }
        for row in 0..dim {
            if row == col {
                continue;
            }
            let factor = m[row * dim + col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..dim {
                m[row * dim + j] -= factor * m[col * dim + j];
                inv[row * dim + j] -= factor * inv[col * dim + j];
            }
        }
    }
    inv
}

/// LinUCB agent over a fixed set of index-addressed arms.
///
/// Usage:
/// - `select_arm(context)` to pick the argmax-UCB arm (read-only),
/// - `update(arm, context, reward)` after observing the realized reward.
///
/// Each episode constructs its own agent; statistics are never shared across
/// episodes and `update` is the sole mutator.
#[derive(Debug, Clone)]
pub struct LinUcb {
    cfg: LinUcbConfig,
    arms: Vec<ArmState>,
}

impl LinUcb {
    /// Create a new agent, validating hyperparameters.
    pub fn new(cfg: LinUcbConfig) -> Result<Self, Error> {
        if cfg.n_arms == 0 {
            return Err(Error::Configuration("n_arms must be >= 1"));
        }
        if cfg.dim == 0 {
            return Err(Error::Configuration("dim must be >= 1"));
        }
        if !cfg.alpha.is_finite() || cfg.alpha <= 0.0 {
            return Err(Error::Configuration("alpha must be finite and > 0"));
        }
        let arms = (0..cfg.n_arms).map(|_| ArmState::new(cfg.dim)).collect();
        Ok(Self { cfg, arms })
    }

    pub fn config(&self) -> LinUcbConfig {
        self.cfg
    }

    fn check_context(&self, context: &[f64]) -> Result<(), Error> {
        if context.len() != self.cfg.dim {
            return Err(Error::DimensionMismatch {
                expected: self.cfg.dim,
                actual: context.len(),
            });
        }
        Ok(())
    }

    /// Per-arm `(ucb, mean, bonus)` scores for a context.
    pub fn scores(&self, context: &[f64]) -> Result<Vec<ArmScore>, Error> {
        self.check_context(context)?;
        let d = self.cfg.dim;
        let mut out = Vec::with_capacity(self.arms.len());
        for st in &self.arms {
            let a_inv = invert(&st.a, d);
            let theta = mat_vec(&a_inv, d, &st.b);
            let mean = dot(&theta, context);
            let ax = mat_vec(&a_inv, d, context);
            let var = dot(context, &ax).max(0.0);
            let bonus = self.cfg.alpha * var.sqrt();
            out.push((mean + bonus, mean, bonus));
        }
        Ok(out)
    }

    /// Pick the arm with the maximum UCB score.
    ///
    /// Ties break to the lowest arm index (strict `>` scan), so identical
    /// `(state, context)` inputs always yield the identical arm.
    pub fn select_arm(&self, context: &[f64]) -> Result<usize, Error> {
        let scores = self.scores(context)?;
        let mut best = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for (arm, (ucb, _, _)) in scores.iter().enumerate() {
            if *ucb > best_score {
                best = arm;
                best_score = *ucb;
            }
        }
        Ok(best)
    }

    /// Fold one observation into `arm`'s statistics:
    /// `A += x xᵀ`, `b += reward * x`.
    pub fn update(&mut self, arm: usize, context: &[f64], reward: f64) -> Result<(), Error> {
        self.check_context(context)?;
        let d = self.cfg.dim;
        let st = self
            .arms
            .get_mut(arm)
            .ok_or(Error::InvalidArm(arm))?;
        for i in 0..d {
            for j in 0..d {
                st.a[i * d + j] += context[i] * context[j];
            }
        }
        for (bi, xi) in st.b.iter_mut().zip(context.iter()) {
            *bi += reward * xi;
        }
        Ok(())
    }

    /// Per-arm theta vectors (`A⁻¹ b`), the learned linear response functions.
    pub fn theta_vectors(&self) -> Vec<Vec<f64>> {
        let d = self.cfg.dim;
        self.arms
            .iter()
            .map(|st| mat_vec(&invert(&st.a, d), d, &st.b))
            .collect()
    }

    #[cfg(test)]
    fn raw_a(&self, arm: usize) -> &[f64] {
        &self.arms[arm].a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(n_arms: usize, dim: usize, alpha: f64) -> LinUcb {
        LinUcb::new(LinUcbConfig { n_arms, dim, alpha }).unwrap()
    }

    #[test]
    fn new_rejects_bad_hyperparameters() {
        for cfg in [
            LinUcbConfig {
                n_arms: 0,
                dim: 2,
                alpha: 1.0,
            },
            LinUcbConfig {
                n_arms: 3,
                dim: 0,
                alpha: 1.0,
            },
            LinUcbConfig {
                n_arms: 3,
                dim: 2,
                alpha: 0.0,
            },
            LinUcbConfig {
                n_arms: 3,
                dim: 2,
                alpha: -1.0,
            },
            LinUcbConfig {
                n_arms: 3,
                dim: 2,
                alpha: f64::NAN,
            },
        ] {
            assert!(matches!(LinUcb::new(cfg), Err(Error::Configuration(_))));
        }
    }

    #[test]
    fn select_arm_rejects_wrong_dimension() {
        let p = agent(3, 2, 1.0);
        let err = p.select_arm(&[0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn update_rejects_out_of_range_arm() {
        let mut p = agent(3, 2, 1.0);
        let err = p.update(3, &[0.1, 0.2], 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidArm(3)));
    }

    #[test]
    fn fresh_agent_ties_break_to_arm_zero() {
        // All arms are identity/zero, so every score is equal; the
        // left-to-right scan must return arm 0.
        let p = agent(3, 2, 1.0);
        assert_eq!(p.select_arm(&[0.4, 0.6]).unwrap(), 0);
    }

    #[test]
    fn select_arm_is_pure() {
        let mut p = agent(3, 2, 1.0);
        p.update(1, &[1.0, 0.2], 2.5).unwrap();
        p.update(2, &[0.3, 0.9], -1.0).unwrap();
        let ctx = [0.5, 0.5];
        let first = p.select_arm(&ctx).unwrap();
        for _ in 0..10 {
            assert_eq!(p.select_arm(&ctx).unwrap(), first);
        }
    }

    #[test]
    fn alpha_zero_limit_is_pure_exploitation() {
        // alpha must be > 0 by contract, so approximate the degenerate case
        // with a vanishing bonus: the argmax must match argmax of theta^T x.
        let mut p = agent(2, 2, 1e-12);
        let ctx = [1.0, 0.5];
        p.update(0, &ctx, 0.1).unwrap();
        p.update(1, &ctx, 5.0).unwrap();
        let scores = p.scores(&ctx).unwrap();
        assert!(scores[1].1 > scores[0].1, "arm 1 has the higher mean");
        assert_eq!(p.select_arm(&ctx).unwrap(), 1);
    }

    #[test]
    fn single_arm_identity_scores_theta_dot_context() {
        // One arm, A = I, b accumulated from a single unit update:
        // theta = x / (1 + |x|^2) per Sherman-Morrison; just check the mean
        // term drives selection once the bonus is negligible.
        let mut p = agent(1, 2, 1e-9);
        p.update(0, &[1.0, 0.0], 1.0).unwrap();
        let (_, mean, bonus) = p.scores(&[1.0, 0.0]).unwrap()[0];
        assert!((mean - 0.5).abs() < 1e-9, "theta^T x = 0.5, got {mean}");
        assert!(bonus < 1e-6);
    }

    #[test]
    fn a_stays_symmetric_after_updates() {
        let mut p = agent(2, 3, 1.0);
        let ctxs = [[0.1, 0.9, 0.4], [1.0, -0.5, 0.2], [0.0, 0.0, 1.0]];
        for (i, ctx) in ctxs.iter().cycle().take(30).enumerate() {
            p.update(i % 2, ctx, (i as f64) * 0.1 - 1.0).unwrap();
        }
        for arm in 0..2 {
            let a = p.raw_a(arm);
            for i in 0..3 {
                for j in 0..3 {
                    assert!((a[i * 3 + j] - a[j * 3 + i]).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn invert_round_trips_on_spd_matrix() {
        // A = I + x x^T for x = (1, 2): A = [[2, 2], [2, 5]], det = 6.
        let a = [2.0, 2.0, 2.0, 5.0];
        let inv = invert(&a, 2);
        let expected = [5.0 / 6.0, -2.0 / 6.0, -2.0 / 6.0, 2.0 / 6.0];
        for (got, want) in inv.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12, "{got} vs {want}");
        }
    }
}
