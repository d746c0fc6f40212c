use assault_odds::binomial::probability_of_at_least;
use assault_odds::config::{Target, Weapons};
use assault_odds::weapons::blend_damage;
use proptest::prelude::*;

proptest! {
    #[test]
    fn tail_is_a_probability(n in 0u32..60, p in 0.0f64..=1.0, threshold in 0u32..70) {
        let tail = probability_of_at_least(n, p, threshold);
        prop_assert!(tail >= -1e-9 && tail <= 1.0 + 1e-9, "tail={}", tail);
    }

    #[test]
    fn tail_shrinks_as_threshold_grows(n in 0u32..60, p in 0.0f64..=1.0, threshold in 0u32..60) {
        let lower = probability_of_at_least(n, p, threshold);
        let higher = probability_of_at_least(n, p, threshold + 1);
        prop_assert!(higher <= lower + 1e-9);
    }

    #[test]
    fn threshold_zero_sums_to_one(n in 0u32..60, p in 0.0f64..=1.0) {
        prop_assert!((probability_of_at_least(n, p, 0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn no_weapon_keeps_base_damage(base in 0.1f64..10.0, n in 0u32..100, shooter in 0u32..20) {
        let target = Target { hp: 10, mush: false };
        let profile = blend_damage(base, &Weapons::default(), &target, n, shooter);
        prop_assert_eq!(profile.damage, base);
        prop_assert_eq!(profile.charges_used, 0);
    }
}
