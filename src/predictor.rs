//! Validation boundary and the prediction itself

use tracing::debug;

use crate::binomial::probability_of_at_least;
use crate::combinatorics::MAX_FACTORIAL_INPUT;
use crate::config::{AssaultConfig, Target};
use crate::error::{PredictError, Result};
use crate::skills::apply_skills;
use crate::stats::Prediction;
use crate::weapons::{base_damage, blend_damage};

/// Largest action point budget the binomial math can represent.
pub const MAX_ACTION_POINTS: u32 = MAX_FACTORIAL_INPUT;

/// Reject configs the math cannot handle and return the resolved target.
pub fn validate(config: &AssaultConfig) -> Result<Target> {
    let target = config
        .get_target()
        .ok_or_else(|| PredictError::invalid("target hit points are missing"))?;
    if target.hp == 0 {
        return Err(PredictError::invalid("target hit points must be positive"));
    }

    let p = config.base_success_rate;
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(PredictError::invalid(format!(
            "base success rate must be within [0, 1], got {p}"
        )));
    }
    if !config.bare_hands_damage.is_finite() {
        return Err(PredictError::invalid("bare hands damage must be a finite number"));
    }

    let n = config.action_points;
    if n > MAX_ACTION_POINTS {
        return Err(PredictError::invalid(format!(
            "at most {MAX_ACTION_POINTS} action points are supported, got {n}"
        )));
    }

    let charges = config.weapons.total_charges();
    if charges > n as u64 {
        return Err(PredictError::invalid(format!(
            "weapons need {charges} charges but only {n} action points are available"
        )));
    }

    Ok(target)
}

/// Expected hits, expected damage and kill probability for one assault.
pub fn predict(config: &AssaultConfig) -> Result<Prediction> {
    let target = validate(config)?;
    let n = config.action_points;

    let success_rate = apply_skills(config.base_success_rate, &config.skills, config.convergence)?;

    let base = base_damage(&config.melee, &config.penalties, config.bare_hands_damage);
    let profile = blend_damage(
        base,
        &config.weapons,
        &target,
        n,
        config.shooter_action_points,
    );
    if !(profile.damage > 0.0) {
        return Err(PredictError::NonPositiveDamage(profile.damage));
    }

    // validate() guarantees charges <= n
    let adjusted_attempts = n - profile.charges_used;
    let expected_hits = (adjusted_attempts as f64 * success_rate).floor() as u32;
    let expected_damage = (expected_hits as f64 * profile.damage).floor() as u64;

    let needed = (target.hp as f64 / profile.damage).ceil();
    let needed_hits = if needed > u32::MAX as f64 {
        u32::MAX
    } else {
        needed as u32
    };
    let kill_probability = probability_of_at_least(adjusted_attempts, success_rate, needed_hits);

    debug!(
        success_rate,
        damage = profile.damage,
        adjusted_attempts,
        needed_hits,
        kill_probability,
        "prediction complete"
    );

    Ok(Prediction {
        expected_hits,
        expected_damage,
        kill_probability,
        success_rate,
        damage_per_hit: profile.damage,
        charges_used: profile.charges_used,
        adjusted_attempts,
        needed_hits,
    })
}
