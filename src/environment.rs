//! Stochastic environment that scores the automaton's current action.
//!
//! The environment is stateless between calls: the adaptive threshold is
//! passed in and handed back, so the caller (a trial) owns it.

use rand::distr::weighted::WeightedIndex;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::automaton::{Action, Feedback, State};
use crate::error::{KrinskyError, Result};
use crate::model::ProbabilityModel;
use crate::ACTIONS;

/// Gaussian noise added to every delay.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoiseConfig {
    pub mean: f64,
    /// Must be finite and `>= 0`.
    pub std_dev: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            mean: 2.0,
            std_dev: 0.5,
        }
    }
}

/// Source of reward/penalty feedback for a trial.
pub trait Environment {
    /// Score `state` against `threshold`.
    ///
    /// Returns the feedback and the threshold to carry into the next step.
    fn evaluate<R: Rng + ?Sized>(
        &self,
        state: State,
        threshold: f64,
        rng: &mut R,
    ) -> (Feedback, f64);
}

/// Delay for outcome `i` (1-based) plus noise `h`:
/// `0.8*i + 0.4*ceil(i/2) + h`.
#[inline]
pub fn delay_for(outcome: usize, noise: f64) -> f64 {
    let i = outcome as f64;
    0.8 * i + 0.4 * (i / 2.0).ceil() + noise
}

/// Reward iff `delay <= threshold`; a reward lowers the threshold to `delay`.
#[inline]
pub fn judge(delay: f64, threshold: f64) -> (Feedback, f64) {
    if delay > threshold {
        (Feedback::Penalize, threshold)
    } else {
        (Feedback::Reward, delay)
    }
}

/// The production environment: categorical outcome per action plus
/// Gaussian noise.
#[derive(Debug, Clone)]
pub struct StochasticEnvironment {
    normal: Normal<f64>,
    // One sampler per action, indexed by `Action::index`.
    outcomes: Vec<WeightedIndex<f64>>,
}

impl StochasticEnvironment {
    pub fn new(model: ProbabilityModel, noise: NoiseConfig) -> Result<Self> {
        if !noise.mean.is_finite() || !noise.std_dev.is_finite() || noise.std_dev < 0.0 {
            return Err(KrinskyError::InvalidConfiguration(format!(
                "noise must have a finite mean and a finite non-negative std_dev (got {}, {})",
                noise.mean, noise.std_dev
            )));
        }
        let normal = Normal::new(noise.mean, noise.std_dev)
            .map_err(|e| KrinskyError::InvalidConfiguration(format!("noise: {e}")))?;
        let mut outcomes = Vec::with_capacity(ACTIONS);
        for a in Action::ALL {
            let w = WeightedIndex::<f64>::new(model.weights(a)).map_err(|e| {
                KrinskyError::InvalidModel {
                    action: a.get(),
                    reason: e.to_string(),
                }
            })?;
            outcomes.push(w);
        }
        Ok(Self { normal, outcomes })
    }

    /// Reference table with the default noise.
    pub fn reference() -> Result<Self> {
        Self::new(ProbabilityModel::reference(), NoiseConfig::default())
    }

    /// Draw one delay for `action`: the noise first, then the outcome.
    pub fn sample_delay<R: Rng + ?Sized>(&self, action: Action, rng: &mut R) -> f64 {
        let h = self.normal.sample(rng);
        let i = self.outcomes[action.index()].sample(rng) + 1;
        delay_for(i, h)
    }
}

impl Environment for StochasticEnvironment {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        state: State,
        threshold: f64,
        rng: &mut R,
    ) -> (Feedback, f64) {
        let delay = self.sample_delay(state.action(), rng);
        judge(delay, threshold)
    }
}
