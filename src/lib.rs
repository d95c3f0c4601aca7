//! `krinsky`: a seedable Krinsky learning automaton and a Monte-Carlo harness
//! that measures how reliably it converges.
//!
//! The automaton chooses among [`ACTIONS`] discrete actions. Each action owns
//! a group of [`DEPTH`] states; the automaton commits to the action whose group
//! it currently sits in. A stochastic environment draws a delay for that
//! action and compares it to an adaptive threshold (the best delay seen so
//! far in the trial):
//!
//! - delay at or below the threshold: **reward**, the automaton jumps to its
//!   group's leader state and the threshold drops to the new delay;
//! - otherwise: **penalty**, the automaton walks deeper and eventually
//!   crosses into another action's group.
//!
//! A trial runs a fixed number of steps. Near the end, the action visited most
//! often becomes the *learned* action, and the share of the remaining steps
//! spent on it is the trial's *accuracy*. [`MonteCarlo`] repeats trials and
//! aggregates accuracy, the best delay, and how often each action was learned.
//!
//! **Goals:**
//! - **Deterministic given a seed**: every trial derives its own RNG seed from
//!   the run seed and its index ([`trial_seed`]), so results do not depend on
//!   the order trials are executed or folded.
//! - **No hidden state**: the threshold is threaded through the trial loop as
//!   a value; environments are immutable and shareable.
//! - **Injectable feedback**: trials are generic over [`Environment`], so
//!   scripted environments can replace the stochastic one in tests.
//!
//! **Non-goals:**
//! - Not a general automaton framework: one topology, `6 x 6` states.
//!
//! ```rust
//! use krinsky::{run_monte_carlo, MonteCarloConfig, StochasticEnvironment, TrialConfig};
//!
//! let env = StochasticEnvironment::reference().unwrap();
//! let cfg = MonteCarloConfig {
//!     trials: 4,
//!     trial: TrialConfig::new(500, 100).unwrap(),
//!     seed: 7,
//! };
//! let summary = run_monte_carlo(&env, cfg).unwrap();
//! assert_eq!(summary.aggregate.trials, 4);
//! assert_eq!(summary.aggregate.histogram().map(|(_, n)| n).sum::<u64>(), 4);
//! ```

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod automaton;
pub mod environment;
pub mod error;
pub mod model;
pub mod seed;
pub mod trial;

pub use aggregate::{run_monte_carlo, Aggregate, MonteCarlo, MonteCarloConfig, Summary};
pub use automaton::{action_of, penalize, reward, transition, Action, Feedback, State};
pub use environment::{delay_for, judge, Environment, NoiseConfig, StochasticEnvironment};
pub use error::{KrinskyError, Result};
pub use model::ProbabilityModel;
pub use seed::trial_seed;
pub use trial::{argmax_first, run_trial, TrialConfig, TrialResult, TrialRunner};

/// Number of actions (`k`).
pub const ACTIONS: usize = 6;

/// States per action group (`n`).
pub const DEPTH: usize = 6;

/// Size of the state space (`n * k`).
pub const STATES: usize = DEPTH * ACTIONS;

/// Outcome values `1..=OUTCOMES` drawn by the environment.
pub const OUTCOMES: usize = 6;

/// Threshold every trial starts from.
pub const TRIAL_THRESHOLD: f64 = 10_000.0;
