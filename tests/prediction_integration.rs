use assault_odds::binomial::probability_of_at_least;
use assault_odds::config::{AssaultConfig, Target};
use assault_odds::convergence::{steady_state, ConvergenceMode, FAILURE_BONUS};
use assault_odds::stats::SweepAxis;
use assault_odds::sweep::sweep;
use assault_odds::weapons::{blend_capped, blend_thrown};
use assault_odds::{predict, PredictError};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_bare_hands_fixture() {
    let config = AssaultConfig::from_file(fixture("bare_hands.yaml")).unwrap();
    assert_eq!(config.convergence, ConvergenceMode::reference());

    let prediction = predict(&config).unwrap();
    assert_eq!(prediction.expected_hits, 6);
    assert_eq!(prediction.expected_damage, 9);
    assert_eq!(prediction.needed_hits, 13);
    assert_eq!(prediction.kill_probability, 0.0);
    assert_eq!(prediction.kill_percent(), "0.00");
}

#[test]
fn test_unreachable_kill_reports_positive_zero() {
    let config = AssaultConfig::from_file(fixture("bare_hands.yaml")).unwrap();
    let prediction = predict(&config).unwrap();
    assert!(prediction.needed_hits > config.action_points);
    assert!(prediction.kill_probability.is_sign_positive());
    assert_eq!(prediction.kill_percent(), "0.00");
    assert!(prediction.summary().contains("You have a 0.00% chance"));

    let json = serde_json::to_value(&prediction).unwrap();
    assert_eq!(json["kill_probability"].as_f64().map(f64::is_sign_positive), Some(true));
}

#[test]
fn test_armed_fixture_matches_hand_computation() {
    let config = AssaultConfig::from_file(fixture("armed_squad.yaml")).unwrap();
    assert_eq!(config.get_target(), Some(Target { hp: 12, mush: true }));

    let prediction = predict(&config).unwrap();

    // knife 2.25, armor -1
    let mut damage = 1.25;
    damage = blend_capped(damage, 14, 3, 2, 2.7);
    damage = blend_thrown(damage, 14, 1, 5.0);
    damage = blend_capped(damage, 14, 3, 2, 8.0);
    assert!((prediction.damage_per_hit - damage).abs() < 1e-12);
    assert_eq!(prediction.charges_used, 5);
    assert_eq!(prediction.adjusted_attempts, 9);

    let after_expert = steady_state(FAILURE_BONUS, 0.72);
    let after_persistent = steady_state(1.30, after_expert);
    let p = steady_state(FAILURE_BONUS, after_persistent);
    assert!((prediction.success_rate - p).abs() < 1e-9);

    let needed = (12.0 / damage).ceil() as u32;
    assert_eq!(prediction.needed_hits, needed);
    let kill = probability_of_at_least(9, prediction.success_rate, needed);
    assert_eq!(prediction.kill_probability, kill);
    assert!(prediction.kill_probability > 0.0 && prediction.kill_probability <= 1.0);
}

#[test]
fn test_flat_json_fixture() {
    let config = AssaultConfig::from_file(fixture("flat_gui.json")).unwrap();
    assert_eq!(config.action_points, 9);
    assert_eq!(config.get_target(), Some(Target { hp: 8, mush: false }));

    let prediction = predict(&config).unwrap();
    assert_eq!(prediction.charges_used, 2);
    assert_eq!(prediction.adjusted_attempts, 7);
    // wrestler 3.65 blended with a rocket (4.5) then a machine gun (2.7)
    let damage = blend_capped(blend_capped(3.65, 9, 2, 1, 4.5), 9, 2, 1, 2.7);
    assert!((prediction.damage_per_hit - damage).abs() < 1e-12);
}

#[test]
fn test_reference_and_tolerance_agree_for_every_skill_set() {
    for bits in 0u8..16 {
        let mut config = AssaultConfig::new(12, 9);
        config.skills.expert = bits & 1 != 0;
        config.skills.elusive = bits & 2 != 0;
        config.skills.creative = bits & 4 != 0;
        config.skills.persistent = bits & 8 != 0;

        config.convergence = ConvergenceMode::reference();
        let reference = predict(&config).unwrap();
        config.convergence = ConvergenceMode::default();
        let tolerance = predict(&config).unwrap();

        assert!(
            (reference.success_rate - tolerance.success_rate).abs() < 1e-9,
            "skills {bits:04b}"
        );
        assert!((reference.kill_probability - tolerance.kill_probability).abs() < 1e-9);
    }
}

#[test]
fn test_overcommitted_charges_are_rejected() {
    let mut config = AssaultConfig::new(4, 10);
    config.weapons.blaster = Some(3);
    config.weapons.machine_gun = Some(2);
    let err = predict(&config).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("5 charges"));
}

#[test]
fn test_unstable_skill_chain_is_reported() {
    let mut config = AssaultConfig::new(10, 5);
    config.base_success_rate = 1.0;
    config.skills.expert = true;
    assert!(matches!(
        predict(&config),
        Err(PredictError::NumericInstability { .. })
    ));
}

#[test]
fn test_missing_config_file() {
    let err = AssaultConfig::from_file(fixture("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, PredictError::Io(_)));
}

#[test]
fn test_action_point_sweep_grows_kill_chance() {
    let base = AssaultConfig::new(1, 6);
    let rows = sweep(&base, SweepAxis::ActionPoints, 1..=25, true).unwrap();
    assert_eq!(rows.first().map(|r| r.prediction.kill_probability), Some(0.0));
    for pair in rows.windows(2) {
        assert!(pair[1].prediction.kill_probability >= pair[0].prediction.kill_probability - 1e-12);
    }
    assert!(rows.last().unwrap().prediction.kill_probability > 0.99);
}
