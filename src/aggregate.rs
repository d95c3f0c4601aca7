//! Monte-Carlo aggregation over many independent trials.
//!
//! Averages exclude non-positive samples from the denominator only: the sum
//! still includes every trial, but the count is of trials whose value was
//! strictly positive. When that count is zero the average is undefined
//! (`None`), never NaN or a panic.

use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::automaton::Action;
use crate::environment::Environment;
use crate::error::{KrinskyError, Result};
use crate::seed::trial_seed;
use crate::trial::{TrialConfig, TrialResult, TrialRunner};
use crate::ACTIONS;

/// Parameters for a full Monte-Carlo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMonteCarloConfig"))]
pub struct MonteCarloConfig {
    pub trials: u64,
    pub trial: TrialConfig,
    /// Run seed; trial `t` uses `trial_seed(seed, t)`.
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            trial: TrialConfig::default(),
            seed: 0,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMonteCarloConfig {
    trials: u64,
    trial: TrialConfig,
    seed: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMonteCarloConfig> for MonteCarloConfig {
    type Error = KrinskyError;

    fn try_from(raw: RawMonteCarloConfig) -> Result<Self> {
        let cfg = Self {
            trials: raw.trials,
            trial: raw.trial,
            seed: raw.seed,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

impl MonteCarloConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(KrinskyError::InvalidConfiguration(
                "trials must be positive".to_string(),
            ));
        }
        self.trial.validate()
    }
}

/// Running totals over trial results.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aggregate {
    pub trials: u64,
    pub accuracy_sum: f64,
    pub accuracy_positive: u64,
    pub delay_sum: f64,
    pub delay_positive: u64,
    /// Learned-action counts, indexed by `Action::index`.
    pub learned: [u64; ACTIONS],
}

impl Aggregate {
    pub fn record(&mut self, r: &TrialResult) {
        self.trials += 1;
        self.accuracy_sum += r.accuracy;
        if r.accuracy > 0.0 {
            self.accuracy_positive += 1;
        }
        self.delay_sum += r.final_delay;
        if r.final_delay > 0.0 {
            self.delay_positive += 1;
        }
        self.learned[r.learned_action.index()] += 1;
    }

    /// Fold another partial aggregate into this one.
    pub fn merge(&mut self, other: &Aggregate) {
        self.trials += other.trials;
        self.accuracy_sum += other.accuracy_sum;
        self.accuracy_positive += other.accuracy_positive;
        self.delay_sum += other.delay_sum;
        self.delay_positive += other.delay_positive;
        for (a, b) in self.learned.iter_mut().zip(other.learned) {
            *a += b;
        }
    }

    /// `accuracy_sum / accuracy_positive`, or `None` if no trial had positive accuracy.
    pub fn average_accuracy(&self) -> Option<f64> {
        ratio(self.accuracy_sum, self.accuracy_positive)
    }

    /// `delay_sum / delay_positive`, or `None` if no trial had a positive delay.
    pub fn average_delay(&self) -> Option<f64> {
        ratio(self.delay_sum, self.delay_positive)
    }

    pub fn learned_count(&self, action: Action) -> u64 {
        self.learned[action.index()]
    }

    /// `(action, count)` pairs in action order.
    pub fn histogram(&self) -> impl Iterator<Item = (Action, u64)> + '_ {
        Action::ALL.into_iter().map(|a| (a, self.learned_count(a)))
    }

    /// Most frequently learned action (earliest wins ties).
    pub fn mode(&self) -> Option<Action> {
        crate::trial::argmax_first(&self.learned)
    }
}

impl FromIterator<TrialResult> for Aggregate {
    fn from_iter<I: IntoIterator<Item = TrialResult>>(iter: I) -> Self {
        let mut agg = Aggregate::default();
        for r in iter {
            agg.record(&r);
        }
        agg
    }
}

fn ratio(sum: f64, count: u64) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Aggregate plus run metadata, printable as the console report.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub config: MonteCarloConfig,
    pub aggregate: Aggregate,
    pub elapsed: Duration,
}

impl Summary {
    pub fn average_accuracy(&self) -> Option<f64> {
        self.aggregate.average_accuracy()
    }

    pub fn average_delay(&self) -> Option<f64> {
        self.aggregate.average_delay()
    }
}

struct Avg(Option<f64>);

impl fmt::Display for Avg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("undefined (no positive samples)"),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Krinsky")?;
        writeln!(f, "==========")?;
        writeln!(f, "Time taken: {:?}", self.elapsed)?;
        writeln!(
            f,
            "Average accuracy: {} %  Average delay: {} seconds",
            Avg(self.average_accuracy()),
            Avg(self.average_delay())
        )?;
        writeln!(f, "Learned action counts:")?;
        for (a, n) in self.aggregate.histogram() {
            writeln!(f, "{a}: {n}")?;
        }
        Ok(())
    }
}

/// Monte-Carlo driver bound to one environment.
#[derive(Debug)]
pub struct MonteCarlo<'a, E> {
    runner: TrialRunner<'a, E>,
    cfg: MonteCarloConfig,
}

impl<'a, E: Environment> MonteCarlo<'a, E> {
    pub fn new(env: &'a E, cfg: MonteCarloConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            runner: TrialRunner::new(env, cfg.trial)?,
            cfg,
        })
    }

    /// Result of trial `index`. Depends only on the run seed and `index`.
    pub fn trial(&self, index: u64) -> TrialResult {
        let mut rng = StdRng::seed_from_u64(trial_seed(self.cfg.seed, index));
        self.runner.run(&mut rng)
    }

    /// Aggregate trials `range` (used to split a run into partial aggregates).
    pub fn aggregate_range(&self, range: std::ops::Range<u64>) -> Aggregate {
        let mut agg = Aggregate::default();
        for t in range {
            let r = self.trial(t);
            debug!(
                trial = t,
                learned = %r.learned_action,
                accuracy = r.accuracy,
                delay = r.final_delay,
                "trial finished"
            );
            agg.record(&r);
        }
        agg
    }

    pub fn run(&self) -> Summary {
        info!(
            trials = self.cfg.trials,
            batch_size = self.cfg.trial.batch_size,
            cutoff = self.cfg.trial.cutoff,
            seed = self.cfg.seed,
            "starting Monte-Carlo run"
        );
        let start = Instant::now();
        let aggregate = self.aggregate_range(0..self.cfg.trials);
        let elapsed = start.elapsed();

        if aggregate.average_accuracy().is_none() {
            warn!("no trial had positive accuracy; average accuracy is undefined");
        }
        if aggregate.average_delay().is_none() {
            warn!("no trial had a positive delay; average delay is undefined");
        }
        info!(
            ?elapsed,
            average_accuracy = ?aggregate.average_accuracy(),
            average_delay = ?aggregate.average_delay(),
            mode = ?aggregate.mode(),
            "Monte-Carlo run finished"
        );
        Summary {
            config: self.cfg,
            aggregate,
            elapsed,
        }
    }
}

/// Validate `cfg` and run it against `env`.
pub fn run_monte_carlo<E: Environment>(env: &E, cfg: MonteCarloConfig) -> Result<Summary> {
    Ok(MonteCarlo::new(env, cfg)?.run())
}
