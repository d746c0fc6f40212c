//! Steady-state success rate under the "bonus after a failed hit" rule
//!
//! A hit that follows a failure succeeds more often (×1.25, or ×1.30 with
//! the persistent skill). Writing `an` for the chance that the n-th hit
//! lands and `a` for the chance after a success, the probability tree gives
//!
//! ```text
//! an+1 = an * (m + a - m * an)
//! ```
//!
//! The routine below iterates that sequence from `a0 = a` to its limit.
//! For a = 0.60 it settles around the 8th or 9th hit.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PredictError, Result};

/// Update count of the historical fixed loop (`0..=1000`).
pub const REFERENCE_ITERATIONS: u32 = 1001;

/// Default stopping distance between two successive terms.
pub const DEFAULT_EPSILON: f64 = 1e-12;

/// Failure bonus of the base game rule.
pub const FAILURE_BONUS: f64 = 1.25;

/// Failure bonus granted by the persistent skill.
pub const PERSISTENT_FAILURE_BONUS: f64 = 1.30;

/// How long to iterate the recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConvergenceMode {
    /// Apply exactly `iterations` updates. Matches the historical figures bit for bit
    /// when left at [`REFERENCE_ITERATIONS`].
    Reference {
        #[serde(default = "default_iterations")]
        iterations: u32,
    },
    /// Stop once two terms differ by less than `epsilon`, or after
    /// `max_iterations` updates.
    Tolerance {
        #[serde(default = "default_epsilon")]
        epsilon: f64,
        #[serde(default = "default_iterations")]
        max_iterations: u32,
    },
}

fn default_iterations() -> u32 {
    REFERENCE_ITERATIONS
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl ConvergenceMode {
    pub const fn reference() -> Self {
        ConvergenceMode::Reference {
            iterations: REFERENCE_ITERATIONS,
        }
    }
}

impl Default for ConvergenceMode {
    fn default() -> Self {
        ConvergenceMode::Tolerance {
            epsilon: DEFAULT_EPSILON,
            max_iterations: REFERENCE_ITERATIONS,
        }
    }
}

#[inline(always)]
fn step(m: f64, a: f64, an: f64) -> f64 {
    an * (m + a - m * an)
}

/// Iterate the recurrence for failure bonus `m` and nominal rate `a`.
///
/// Returns [`PredictError::NumericInstability`] when the limit is not a
/// probability. Out-of-range values are reported, never clamped.
pub fn converge_success(m: f64, a: f64, mode: ConvergenceMode) -> Result<f64> {
    let mut an = a;
    match mode {
        ConvergenceMode::Reference { iterations } => {
            for _ in 0..iterations {
                an = step(m, a, an);
            }
        }
        ConvergenceMode::Tolerance {
            epsilon,
            max_iterations,
        } => {
            let mut settled = false;
            for _ in 0..max_iterations {
                let next = step(m, a, an);
                let delta = (next - an).abs();
                an = next;
                if delta < epsilon {
                    settled = true;
                    break;
                }
            }
            if !settled && an.is_finite() {
                warn!(
                    multiplier = m,
                    start = a,
                    value = an,
                    max_iterations,
                    "success recurrence did not settle, keeping last term"
                );
            }
        }
    }

    if !an.is_finite() || !(0.0..=1.0).contains(&an) {
        return Err(PredictError::NumericInstability {
            multiplier: m,
            start: a,
            value: an,
        });
    }
    Ok(an)
}

/// Closed-form non-zero fixed point of the recurrence, `(m + a - 1) / m`.
///
/// Only meaningful when the iteration is stable, i.e. `|2 - m - a| < 1`.
pub fn steady_state(m: f64, a: f64) -> f64 {
    (m + a - 1.0) / m
}
