//! Per-action outcome distributions.
//!
//! Each action owns a categorical distribution over the outcome values
//! `1..=OUTCOMES`. Rows are validated once at construction so sampling never
//! has to re-check them.

use crate::automaton::Action;
use crate::error::{KrinskyError, Result};
use crate::{ACTIONS, OUTCOMES};

/// Row sums must land within this distance of 1.0.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Weights over outcomes `1..=OUTCOMES` for one action.
pub type Weights = [f64; OUTCOMES];

/// One row of weights per action, in action order.
pub type Rows = [Weights; ACTIONS];

/// Read-only table mapping each [`Action`] to its outcome distribution.
///
/// With the `serde` feature it (de)serializes as its bare rows, and
/// deserialization runs the same validation as [`ProbabilityModel::new`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Rows", into = "Rows"))]
pub struct ProbabilityModel {
    rows: Rows,
}

impl ProbabilityModel {
    /// Build a model, rejecting negative, non-finite, or unnormalized rows.
    pub fn new(rows: Rows) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            validate_row(Action::from_index(idx), row)?;
        }
        Ok(Self { rows })
    }

    /// The table the simulator ships with. Low outcomes are most likely for
    /// the high-numbered actions, so actions 5 and 6 yield the shortest delays.
    pub fn reference() -> Self {
        Self {
            rows: [
                [0.0, 0.1, 0.2, 0.2, 0.2, 0.3],
                [0.2, 0.0, 0.1, 0.2, 0.2, 0.3],
                [0.3, 0.1, 0.0, 0.1, 0.2, 0.3],
                [0.3, 0.2, 0.1, 0.0, 0.1, 0.3],
                [0.4, 0.2, 0.2, 0.1, 0.0, 0.1],
                [0.4, 0.2, 0.2, 0.1, 0.1, 0.0],
            ],
        }
    }

    /// Distribution for a raw 1-based action id.
    pub fn distribution(&self, action: u8) -> Result<&Weights> {
        Ok(self.weights(Action::new(action)?))
    }

    /// Distribution for a validated action.
    #[inline]
    pub fn weights(&self, action: Action) -> &Weights {
        &self.rows[action.index()]
    }

    /// Mean outcome value under `action`'s distribution.
    pub fn expected_outcome(&self, action: Action) -> f64 {
        self.weights(action)
            .iter()
            .enumerate()
            .map(|(i, w)| (i + 1) as f64 * w)
            .sum()
    }
}

impl TryFrom<Rows> for ProbabilityModel {
    type Error = KrinskyError;

    fn try_from(rows: Rows) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<ProbabilityModel> for Rows {
    fn from(m: ProbabilityModel) -> Rows {
        m.rows
    }
}

impl Default for ProbabilityModel {
    fn default() -> Self {
        Self::reference()
    }
}

fn validate_row(action: Action, row: &Weights) -> Result<()> {
    let invalid = |reason: String| KrinskyError::InvalidModel {
        action: action.get(),
        reason,
    };
    if let Some(w) = row.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(invalid(format!("weight {w} is not a finite non-negative number")));
    }
    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(invalid(format!("weights sum to {sum}, expected 1.0")));
    }
    Ok(())
}
