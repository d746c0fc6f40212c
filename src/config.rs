//! Assault configuration: the single input record of a prediction

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::convergence::ConvergenceMode;
use crate::error::Result;

/// Success rate of a bare-handed hit before any skill.
pub const BARE_HANDS_SUCCESS: f64 = 0.60;

/// Damage of a bare-handed hit before any skill or weapon.
pub const BARE_HANDS_DAMAGE: f64 = 1.65;

/// Skills that reshape the success rate.
///
/// Reads either as flags (`expert: true`) or as a list of names
/// (`[expert, persistent]`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "crate::skills::SkillsRepr")]
pub struct Skills {
    pub expert: bool,
    pub elusive: bool,
    pub creative: bool,
    pub persistent: bool,
}

/// Melee overrides of the base damage. Only the first active one counts,
/// checked in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Melee {
    pub solid: bool,
    pub wrestler: bool,
    pub knife: bool,
}

/// Flat penalties, one damage point each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Penalties {
    pub armor: bool,
    pub roughneck: bool,
    pub berserker: bool,
}

/// Charges committed to each weapon. `None` means the weapon is not used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weapons {
    pub blaster: Option<u32>,
    #[serde(alias = "lizaro")]
    pub lizaro_jungle: Option<u32>,
    pub grenades: u32,
    pub natamy: Option<u32>,
    pub rocket_launcher: Option<u32>,
    pub machine_gun: Option<u32>,
}

/// The character being attacked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub hp: u32,
    /// Mush targets take the natamy rifle's boosted damage.
    #[serde(default)]
    pub mush: bool,
}

/// Full assault configuration loaded from YAML/JSON
/// Supports both formats:
/// 1. { "action_points": 10, "target": { "hp": 20, "mush": true }, ... }
/// 2. { "action_points": 10, "hp": 20, "mush": true, ... }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssaultConfig {
    #[serde(alias = "pa")]
    pub action_points: u32,
    #[serde(default, alias = "shooter_pa")]
    pub shooter_action_points: u32,

    // Nested target or flat fields
    #[serde(default)]
    pub target: Option<Target>,
    #[serde(default)]
    pub hp: Option<u32>,
    #[serde(default)]
    pub mush: bool,

    #[serde(default = "default_success_rate")]
    pub base_success_rate: f64,
    #[serde(default = "default_damage")]
    pub bare_hands_damage: f64,

    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub melee: Melee,
    #[serde(default)]
    pub penalties: Penalties,
    #[serde(default)]
    pub weapons: Weapons,
    #[serde(default)]
    pub convergence: ConvergenceMode,
}

fn default_success_rate() -> f64 {
    BARE_HANDS_SUCCESS
}

fn default_damage() -> f64 {
    BARE_HANDS_DAMAGE
}

impl AssaultConfig {
    /// Bare-handed assault with no skill, weapon or penalty.
    pub fn new(action_points: u32, target_hp: u32) -> Self {
        Self {
            action_points,
            shooter_action_points: 0,
            target: Some(Target {
                hp: target_hp,
                mush: false,
            }),
            hp: None,
            mush: false,
            base_success_rate: BARE_HANDS_SUCCESS,
            bare_hands_damage: BARE_HANDS_DAMAGE,
            skills: Skills::default(),
            melee: Melee::default(),
            penalties: Penalties::default(),
            weapons: Weapons::default(),
            convergence: ConvergenceMode::default(),
        }
    }

    /// Get the target (from the nested table or the flat fields)
    pub fn get_target(&self) -> Option<Target> {
        if let Some(target) = self.target {
            Some(target)
        } else {
            self.hp.map(|hp| Target {
                hp,
                mush: self.mush,
            })
        }
    }

    /// Copy of this config aimed at a target with `hp` hit points.
    pub fn with_target_hp(&self, hp: u32) -> Self {
        let mush = self.get_target().map(|t| t.mush).unwrap_or(self.mush);
        Self {
            target: Some(Target { hp, mush }),
            hp: None,
            ..self.clone()
        }
    }

    /// Copy of this config with a different action point budget.
    pub fn with_action_points(&self, action_points: u32) -> Self {
        Self {
            action_points,
            ..self.clone()
        }
    }

    /// Load a config from a YAML file, or JSON when the extension is `.json`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let path_str = path.as_ref().to_string_lossy().to_lowercase();

        if path_str.ends_with(".json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_yaml() {
        let yaml = r#"
action_points: 12
shooter_action_points: 3
target:
  hp: 14
  mush: true
skills:
  expert: true
melee:
  knife: true
weapons:
  blaster: 2
  grenades: 1
"#;
        let config = AssaultConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.action_points, 12);
        assert_eq!(config.shooter_action_points, 3);
        assert_eq!(config.get_target(), Some(Target { hp: 14, mush: true }));
        assert!(config.skills.expert);
        assert!(!config.skills.creative);
        assert!(config.melee.knife);
        assert_eq!(config.weapons.blaster, Some(2));
        assert_eq!(config.weapons.grenades, 1);
        assert_eq!(config.weapons.natamy, None);
        assert_eq!(config.base_success_rate, BARE_HANDS_SUCCESS);
        assert_eq!(config.convergence, ConvergenceMode::default());
    }

    #[test]
    fn test_flat_json() {
        let json = r#"{"pa": 8, "hp": 9, "mush": true, "shooter_pa": 1,
            "weapons": {"lizaro": 1}, "convergence": {"mode": "reference"}}"#;
        let config = AssaultConfig::from_json(json).unwrap();
        assert_eq!(config.action_points, 8);
        assert_eq!(config.shooter_action_points, 1);
        assert_eq!(config.get_target(), Some(Target { hp: 9, mush: true }));
        assert_eq!(config.weapons.lizaro_jungle, Some(1));
        assert_eq!(config.convergence, ConvergenceMode::reference());
    }

    #[test]
    fn test_missing_target_is_none() {
        let config = AssaultConfig::from_json(r#"{"action_points": 4}"#).unwrap();
        assert_eq!(config.get_target(), None);
    }

    #[test]
    fn test_missing_action_points_is_rejected() {
        assert!(AssaultConfig::from_json(r#"{"hp": 4}"#).is_err());
    }

    #[test]
    fn test_skills_as_name_list() {
        let yaml = r#"
action_points: 10
hp: 12
skills: [expert, Persistent]
"#;
        let config = AssaultConfig::from_yaml(yaml).unwrap();
        assert!(config.skills.expert);
        assert!(config.skills.persistent);
        assert!(!config.skills.elusive);
        assert!(!config.skills.creative);

        let json = r#"{"pa": 10, "hp": 12, "skills": ["CREATIVE"]}"#;
        let config = AssaultConfig::from_json(json).unwrap();
        assert_eq!(
            config.skills,
            Skills {
                creative: true,
                ..Skills::default()
            }
        );

        let json = r#"{"pa": 10, "hp": 12, "skills": {"elusive": true}}"#;
        let config = AssaultConfig::from_json(json).unwrap();
        assert!(config.skills.elusive);
        assert!(!config.skills.expert);

        let json = r#"{"pa": 10, "hp": 12, "skills": ["sniper"]}"#;
        assert!(AssaultConfig::from_json(json).is_err());
    }

    #[test]
    fn test_with_target_hp_keeps_mush() {
        let mut config = AssaultConfig::new(10, 20);
        config.target = None;
        config.hp = Some(20);
        config.mush = true;
        let retargeted = config.with_target_hp(35);
        assert_eq!(retargeted.get_target(), Some(Target { hp: 35, mush: true }));
    }
}
