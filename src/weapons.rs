//! Damage per hit: melee base, flat penalties and weapon blending
//!
//! Weapons do not add hits, they replace some of them. Each weapon's damage
//! is blended into the running average in proportion to the slots its
//! charges take, so the result stays a per-hit figure.

use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

use crate::config::{Melee, Penalties, Target, Weapons};
use crate::error::PredictError;

/// How a weapon's charges enter the blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendRule {
    /// Charges are spread over the shooter's own action points, see [`blend_capped`].
    ShooterCapped,
    /// Thrown weapons simply replace `charges` of the `N` attempts.
    Thrown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Weapon {
    Blaster,
    LizaroJungle,
    Grenade,
    Natamy,
    RocketLauncher,
    MachineGun,
}

impl Weapon {
    /// Blend order, independent of which weapons are selected.
    pub const ORDER: [Weapon; 6] = [
        Weapon::Blaster,
        Weapon::LizaroJungle,
        Weapon::Grenade,
        Weapon::Natamy,
        Weapon::RocketLauncher,
        Weapon::MachineGun,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weapon::Blaster => "blaster",
            Weapon::LizaroJungle => "lizaro_jungle",
            Weapon::Grenade => "grenades",
            Weapon::Natamy => "natamy",
            Weapon::RocketLauncher => "rocket_launcher",
            Weapon::MachineGun => "machine_gun",
        }
    }

    /// Damage of one charge against `target`.
    pub fn damage(self, target_is_mush: bool) -> f64 {
        match self {
            Weapon::Blaster => 2.7,
            Weapon::LizaroJungle => 3.65,
            Weapon::Grenade => 5.0,
            Weapon::Natamy if target_is_mush => 8.0,
            Weapon::Natamy => 2.65,
            Weapon::RocketLauncher => 4.5,
            Weapon::MachineGun => 2.7,
        }
    }

    pub fn rule(self) -> BlendRule {
        match self {
            Weapon::Grenade => BlendRule::Thrown,
            _ => BlendRule::ShooterCapped,
        }
    }
}

impl FromStr for Weapon {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "blaster" => Ok(Weapon::Blaster),
            "lizaro" | "lizaro_jungle" => Ok(Weapon::LizaroJungle),
            "grenade" | "grenades" => Ok(Weapon::Grenade),
            "natamy" => Ok(Weapon::Natamy),
            "rocket_launcher" => Ok(Weapon::RocketLauncher),
            "machine_gun" => Ok(Weapon::MachineGun),
            _ => Err(PredictError::invalid(format!("unknown weapon '{s}'"))),
        }
    }
}

impl Weapons {
    /// Commit `charges` to `weapon`. For grenades the count itself is the selection.
    pub fn set(&mut self, weapon: Weapon, charges: u32) {
        match weapon {
            Weapon::Blaster => self.blaster = Some(charges),
            Weapon::LizaroJungle => self.lizaro_jungle = Some(charges),
            Weapon::Grenade => self.grenades = charges,
            Weapon::Natamy => self.natamy = Some(charges),
            Weapon::RocketLauncher => self.rocket_launcher = Some(charges),
            Weapon::MachineGun => self.machine_gun = Some(charges),
        }
    }

    /// Charges committed to `weapon`, `None` when it is not selected.
    pub fn charges(&self, weapon: Weapon) -> Option<u32> {
        match weapon {
            Weapon::Blaster => self.blaster,
            Weapon::LizaroJungle => self.lizaro_jungle,
            Weapon::Grenade => (self.grenades > 0).then_some(self.grenades),
            Weapon::Natamy => self.natamy,
            Weapon::RocketLauncher => self.rocket_launcher,
            Weapon::MachineGun => self.machine_gun,
        }
    }

    /// Selected weapons with their charges, in blend order.
    pub fn selected(&self) -> impl Iterator<Item = (Weapon, u32)> + '_ {
        Weapon::ORDER
            .into_iter()
            .filter_map(move |w| self.charges(w).map(|c| (w, c)))
    }

    /// Sum of all committed charges.
    pub fn total_charges(&self) -> u64 {
        self.selected().map(|(_, c)| c as u64).sum()
    }
}

/// Damage before weapons: the first active melee override, or `bare_hands`,
/// minus one point per active penalty.
pub fn base_damage(melee: &Melee, penalties: &Penalties, bare_hands: f64) -> f64 {
    let mut damage = if melee.solid {
        2.65
    } else if melee.wrestler {
        3.65
    } else if melee.knife {
        2.25
    } else {
        bare_hands
    };

    for active in [penalties.armor, penalties.roughneck, penalties.berserker] {
        if active {
            damage -= 1.0;
        }
    }
    damage
}

/// Blend a shooter-capped weapon into `damage`.
///
/// `used = min(shooter_ap, charges)` only enters the denominator and the
/// retained share; the weapon's own share uses the full `charges`. The
/// asymmetry is kept as the game tool computes it.
#[inline]
pub fn blend_capped(damage: f64, n: u32, shooter_ap: u32, charges: u32, weapon_damage: f64) -> f64 {
    let n = n as f64;
    let charges_f = charges as f64;
    let used = shooter_ap.min(charges) as f64;
    damage * (n + used - charges_f) / (n + used) + weapon_damage * charges_f / (n + used)
}

/// Blend a thrown weapon into `damage`: `charges` of the `n` slots switch
/// to `weapon_damage`.
#[inline]
pub fn blend_thrown(damage: f64, n: u32, charges: u32, weapon_damage: f64) -> f64 {
    let n = n as f64;
    let charges = charges as f64;
    damage * (n - charges) / n + weapon_damage * charges / n
}

/// Average damage per hit and the attempts spent on weapon charges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageProfile {
    pub damage: f64,
    pub charges_used: u32,
}

/// One weapon's contribution, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageStep {
    pub weapon: Weapon,
    pub charges: u32,
    pub damage: f64,
}

/// Blend every selected weapon and keep each intermediate value.
///
/// A selected weapon with zero charges leaves the damage unchanged, which is
/// what the blend formula gives for `n > 0`.
pub fn trace_damage(
    base: f64,
    weapons: &Weapons,
    target: &Target,
    n: u32,
    shooter_ap: u32,
) -> (DamageProfile, Vec<DamageStep>) {
    let mut damage = base;
    let mut charges_used = 0u32;
    let mut steps = Vec::new();

    for (weapon, charges) in weapons.selected() {
        if charges == 0 {
            continue;
        }
        let weapon_damage = weapon.damage(target.mush);
        damage = match weapon.rule() {
            BlendRule::ShooterCapped => blend_capped(damage, n, shooter_ap, charges, weapon_damage),
            BlendRule::Thrown => blend_thrown(damage, n, charges, weapon_damage),
        };
        charges_used = charges_used.saturating_add(charges);
        debug!(weapon = weapon.name(), charges, damage, "blended weapon");
        steps.push(DamageStep {
            weapon,
            charges,
            damage,
        });
    }

    (
        DamageProfile {
            damage,
            charges_used,
        },
        steps,
    )
}

/// Blend every selected weapon into `base`.
pub fn blend_damage(base: f64, weapons: &Weapons, target: &Target, n: u32, shooter_ap: u32) -> DamageProfile {
    trace_damage(base, weapons, target, n, shooter_ap).0
}
