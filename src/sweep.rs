//! Tabulate predictions across a range of target HP or action points

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::ops::RangeInclusive;
use tracing::info;

use crate::config::AssaultConfig;
use crate::error::Result;
use crate::predictor::predict;
use crate::stats::{SweepAxis, SweepRow};

fn config_for(base: &AssaultConfig, axis: SweepAxis, value: u32) -> AssaultConfig {
    match axis {
        SweepAxis::TargetHp => base.with_target_hp(value),
        SweepAxis::ActionPoints => base.with_action_points(value),
    }
}

fn row(base: &AssaultConfig, axis: SweepAxis, value: u32) -> Result<SweepRow> {
    let prediction = predict(&config_for(base, axis, value))?;
    Ok(SweepRow { value, prediction })
}

/// Run sweep rows in parallel
pub fn sweep_parallel(base: &AssaultConfig, axis: SweepAxis, values: RangeInclusive<u32>) -> Result<Vec<SweepRow>> {
    values
        .into_par_iter()
        .map(|value| row(base, axis, value))
        .collect()
}

/// Run sweep rows sequentially
pub fn sweep_sequential(base: &AssaultConfig, axis: SweepAxis, values: RangeInclusive<u32>) -> Result<Vec<SweepRow>> {
    values.map(|value| row(base, axis, value)).collect()
}

/// Predict once per value of `axis`. Rows come back in ascending order and
/// the first failing value aborts the sweep.
pub fn sweep(base: &AssaultConfig, axis: SweepAxis, values: RangeInclusive<u32>, parallel: bool) -> Result<Vec<SweepRow>> {
    info!(axis = axis.label(), start = *values.start(), end = *values.end(), parallel, "running sweep");
    if parallel {
        sweep_parallel(base, axis, values)
    } else {
        sweep_sequential(base, axis, values)
    }
}

/// Parallel sweep on a dedicated pool of `threads` workers (all cores when `None`).
pub fn sweep_with_threads(
    base: &AssaultConfig,
    axis: SweepAxis,
    values: RangeInclusive<u32>,
    threads: Option<usize>,
) -> Result<Vec<SweepRow>> {
    let num_threads = threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
    info!(num_threads, "sweep thread pool ready");
    pool.install(|| sweep(base, axis, values, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictError;

    #[test]
    fn test_hp_sweep_is_ordered_and_monotone() {
        let base = AssaultConfig::new(10, 1);
        let rows = sweep(&base, SweepAxis::TargetHp, 1..=20, false).unwrap();
        assert_eq!(rows.len(), 20);
        assert!(rows.iter().map(|r| r.value).eq(1..=20));
        for pair in rows.windows(2) {
            assert!(pair[1].prediction.kill_probability <= pair[0].prediction.kill_probability + 1e-12);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut base = AssaultConfig::new(12, 10);
        base.skills.expert = true;
        base.weapons.blaster = Some(2);
        base.shooter_action_points = 1;
        let seq = sweep(&base, SweepAxis::ActionPoints, 2..=30, false).unwrap();
        let par = sweep(&base, SweepAxis::ActionPoints, 2..=30, true).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_dedicated_pool() {
        let base = AssaultConfig::new(8, 1);
        let rows = sweep_with_threads(&base, SweepAxis::TargetHp, 1..=6, Some(2)).unwrap();
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn test_invalid_value_aborts() {
        let mut base = AssaultConfig::new(10, 5);
        base.weapons.grenades = 3;
        // 0..=2 action points cannot pay for 3 grenades
        let err = sweep(&base, SweepAxis::ActionPoints, 0..=5, false).unwrap_err();
        assert!(matches!(err, PredictError::InvalidInput(_)));
    }
}
