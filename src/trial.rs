//! A single fixed-length trial of the automaton against an environment.
//!
//! A trial runs `batch_size - 1` steps. At step `batch_size - cutoff` the
//! action visited most often so far becomes the *learned* action; every later
//! step that still commits to it counts towards the trial's accuracy.

use rand::Rng;
use tracing::trace;

use crate::automaton::{transition, Action, State};
use crate::environment::Environment;
use crate::error::{KrinskyError, Result};
use crate::{ACTIONS, TRIAL_THRESHOLD};

/// Length of a trial and of its measured tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTrialConfig"))]
pub struct TrialConfig {
    pub batch_size: u64,
    /// Trailing steps used to measure stability. Must satisfy
    /// `1 <= cutoff < batch_size`.
    pub cutoff: u64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            batch_size: 10_000,
            cutoff: 1_000,
        }
    }
}

/// Unvalidated wire form of [`TrialConfig`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTrialConfig {
    batch_size: u64,
    cutoff: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTrialConfig> for TrialConfig {
    type Error = KrinskyError;

    fn try_from(raw: RawTrialConfig) -> Result<Self> {
        Self::new(raw.batch_size, raw.cutoff)
    }
}

impl TrialConfig {
    pub fn new(batch_size: u64, cutoff: u64) -> Result<Self> {
        let cfg = Self { batch_size, cutoff };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cutoff == 0 {
            return Err(KrinskyError::InvalidConfiguration(
                "cutoff must be at least 1".to_string(),
            ));
        }
        if self.cutoff >= self.batch_size {
            return Err(KrinskyError::InvalidConfiguration(format!(
                "cutoff {} must be smaller than batch_size {}",
                self.cutoff, self.batch_size
            )));
        }
        Ok(())
    }

    /// Step at which the learned action is fixed.
    #[inline]
    pub fn decision_step(&self) -> u64 {
        self.batch_size - self.cutoff
    }
}

/// Outcome of one trial.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialResult {
    /// Share of post-decision steps spent on the learned action, in `[0, 100]`.
    pub accuracy: f64,
    /// The threshold at the end of the trial (lowest rewarded delay).
    pub final_delay: f64,
    pub learned_action: Action,
    pub initial_action: Action,
    /// Steps spent in each action's group over the whole trial.
    pub visit_counts: [u64; ACTIONS],
}

/// First action with the strictly largest count (earliest maximum wins).
///
/// Returns `None` only when every count is zero.
pub fn argmax_first(counts: &[u64; ACTIONS]) -> Option<Action> {
    let mut best = 0u64;
    let mut idx = None;
    for (j, &v) in counts.iter().enumerate() {
        if v > best {
            best = v;
            idx = Some(j);
        }
    }
    idx.map(Action::from_index)
}

/// Runs trials against a borrowed environment.
#[derive(Debug, Clone, Copy)]
pub struct TrialRunner<'a, E> {
    env: &'a E,
    cfg: TrialConfig,
}

impl<'a, E: Environment> TrialRunner<'a, E> {
    pub fn new(env: &'a E, cfg: TrialConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { env, cfg })
    }

    /// Run one trial from a uniformly random initial action.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> TrialResult {
        let initial = Action::from_index(rng.random_range(0..ACTIONS));
        self.run_from(initial, rng)
    }

    /// Run one trial starting in `initial`'s trailing state.
    pub fn run_from<R: Rng + ?Sized>(&self, initial: Action, rng: &mut R) -> TrialResult {
        let decision_step = self.cfg.decision_step();
        let mut state = State::trailing(initial);
        let mut threshold = TRIAL_THRESHOLD;
        let mut visit_counts = [0u64; ACTIONS];
        let mut learned: Option<Action> = None;
        let mut matches = 0u64;

        for i in 1..self.cfg.batch_size {
            let (feedback, next_threshold) = self.env.evaluate(state, threshold, rng);
            threshold = next_threshold;
            state = transition(state, feedback);
            let action = state.action();
            visit_counts[action.index()] += 1;

            if i == decision_step {
                // Every earlier step incremented some count, so this is `Some`.
                learned = argmax_first(&visit_counts);
                trace!(step = i, ?visit_counts, ?learned, "learned action fixed");
            } else if i > decision_step && Some(action) == learned {
                matches += 1;
            }
        }

        let Some(learned_action) = learned else {
            unreachable!("validated config reaches the decision step");
        };

        TrialResult {
            accuracy: matches as f64 * 100.0 / self.cfg.cutoff as f64,
            final_delay: threshold,
            learned_action,
            initial_action: initial,
            visit_counts,
        }
    }
}

/// Run one trial with a freshly validated configuration.
pub fn run_trial<E: Environment, R: Rng + ?Sized>(
    env: &E,
    cfg: TrialConfig,
    rng: &mut R,
) -> Result<TrialResult> {
    Ok(TrialRunner::new(env, cfg)?.run(rng))
}
