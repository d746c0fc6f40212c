//! Assault predictor: expected hits, expected damage and kill probability
//! for a melee/ranged assault given action points, skills and weapons.

pub mod binomial;
pub mod combinatorics;
pub mod config;
pub mod convergence;
pub mod error;
pub mod predictor;
pub mod skills;
pub mod stats;
pub mod sweep;
pub mod weapons;

#[cfg(feature = "python")]
mod python;

pub use config::AssaultConfig;
pub use error::{PredictError, Result};
pub use predictor::predict;
pub use stats::{Prediction, SweepAxis, SweepRow};
