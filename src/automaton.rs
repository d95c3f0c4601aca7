//! Krinsky automaton state space and transitions.
//!
//! The automaton has `ACTIONS` groups of `DEPTH` states each, numbered
//! `1..=STATES`. Group `g` owns states `(g-1)*DEPTH + 1 ..= g*DEPTH`; the
//! lowest state of a group is its *leader*, the highest its *trailing* state.
//!
//! - A reward collapses the automaton onto the leader of its current group.
//! - A penalty walks one state deeper; from a trailing state it jumps to the
//!   trailing state of the next group, which is how the committed action
//!   changes.
//!
//! Both transitions are total over the state space: every valid state maps
//! to a valid state.

use crate::error::{KrinskyError, Result};
use crate::{ACTIONS, DEPTH, STATES};

/// One of the `ACTIONS` discrete choices, numbered `1..=ACTIONS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Action(u8);

impl Action {
    /// All actions in ascending order.
    pub const ALL: [Action; ACTIONS] = [
        Action(1),
        Action(2),
        Action(3),
        Action(4),
        Action(5),
        Action(6),
    ];

    /// Validate a 1-based action identifier.
    pub fn new(id: u8) -> Result<Self> {
        if (1..=ACTIONS as u8).contains(&id) {
            Ok(Self(id))
        } else {
            Err(KrinskyError::InvalidAction(id))
        }
    }

    /// Action for a 0-based index. Callers guarantee `idx < ACTIONS`.
    pub(crate) fn from_index(idx: usize) -> Self {
        debug_assert!(idx < ACTIONS);
        Self(idx as u8 + 1)
    }

    /// The 1-based identifier.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The 0-based index, for per-action arrays.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for Action {
    type Error = KrinskyError;

    fn try_from(id: u8) -> Result<Self> {
        Self::new(id)
    }
}

impl From<Action> for u8 {
    fn from(a: Action) -> u8 {
        a.0
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state of the automaton, numbered `1..=STATES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State(u8);

impl State {
    /// Validate a 1-based state identifier.
    pub fn new(id: u8) -> Result<Self> {
        if (1..=STATES as u8).contains(&id) {
            Ok(Self(id))
        } else {
            Err(KrinskyError::InvalidState(id))
        }
    }

    /// Lowest state of `action`'s group.
    pub fn leader(action: Action) -> Self {
        Self((action.get() - 1) * DEPTH as u8 + 1)
    }

    /// Highest state of `action`'s group. Trials start here.
    pub fn trailing(action: Action) -> Self {
        Self(action.get() * DEPTH as u8)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The action this state commits to: `floor((state - 1) / DEPTH) + 1`.
    #[inline]
    pub fn action(self) -> Action {
        Action((self.0 - 1) / DEPTH as u8 + 1)
    }

    /// True for the lowest state of a group (where a reward lands).
    pub fn is_leader(self) -> bool {
        self.0 % DEPTH as u8 == 1
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Environment response to the automaton's current action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Feedback {
    Reward,
    Penalize,
}

/// Action committed to by `state`.
#[inline]
pub fn action_of(state: State) -> Action {
    state.action()
}

/// Move to the leader of `state`'s group.
pub fn reward(state: State) -> State {
    let n = DEPTH as u8;
    let s = state.get();
    if s % n == 0 {
        State(s - (n - 1))
    } else {
        State(s - s % n + 1)
    }
}

/// Advance one state; from a trailing state, hop `DEPTH` states forward
/// modulo `STATES` (a zero remainder lands on state `DEPTH`).
pub fn penalize(state: State) -> State {
    let n = DEPTH as u8;
    let s = state.get();
    if s % n == 0 {
        let next = (s + n) % STATES as u8;
        if next == 0 {
            State(n)
        } else {
            State(next)
        }
    } else {
        State(s + 1)
    }
}

/// Apply the transition selected by `feedback`.
#[inline]
pub fn transition(state: State, feedback: Feedback) -> State {
    match feedback {
        Feedback::Reward => reward(state),
        Feedback::Penalize => penalize(state),
    }
}
