//! Skill pipeline over the per-hit success rate
//!
//! Each active skill rewrites the rate and re-runs the failure-bonus
//! recurrence on the result. The steps always run in the order of
//! [`Skill::ORDER`], and a final base-rule convergence closes the chain.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::config::Skills;
use crate::convergence::{converge_success, ConvergenceMode, FAILURE_BONUS, PERSISTENT_FAILURE_BONUS};
use crate::error::{PredictError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Skill {
    Expert,
    Elusive,
    Creative,
    Persistent,
}

impl FromStr for Skill {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "expert" => Ok(Skill::Expert),
            "elusive" => Ok(Skill::Elusive),
            "creative" => Ok(Skill::Creative),
            "persistent" => Ok(Skill::Persistent),
            _ => Err(PredictError::invalid(format!("unknown skill '{s}'"))),
        }
    }
}

// Custom deserializer for case-insensitive matching
impl<'de> Deserialize<'de> for Skill {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::unknown_variant(&s, &["expert", "elusive", "creative", "persistent"])
        })
    }
}

impl Skill {
    /// Application order, independent of which skills are active.
    pub const ORDER: [Skill; 4] = [
        Skill::Expert,
        Skill::Elusive,
        Skill::Creative,
        Skill::Persistent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Skill::Expert => "expert",
            Skill::Elusive => "elusive",
            Skill::Creative => "creative",
            Skill::Persistent => "persistent",
        }
    }

    /// Rate rewrite performed before convergence.
    fn reshape(self, p: f64) -> f64 {
        match self {
            Skill::Expert => p * 1.20,
            Skill::Elusive => p * 0.75,
            // Repeating the action until no more PA is recovered
            Skill::Creative => 2.0 * p / (1.0 + p),
            Skill::Persistent => p,
        }
    }

    fn failure_bonus(self) -> f64 {
        match self {
            Skill::Persistent => PERSISTENT_FAILURE_BONUS,
            _ => FAILURE_BONUS,
        }
    }
}

impl Skills {
    pub fn has(&self, skill: Skill) -> bool {
        match skill {
            Skill::Expert => self.expert,
            Skill::Elusive => self.elusive,
            Skill::Creative => self.creative,
            Skill::Persistent => self.persistent,
        }
    }

    pub fn set(&mut self, skill: Skill, active: bool) {
        match skill {
            Skill::Expert => self.expert = active,
            Skill::Elusive => self.elusive = active,
            Skill::Creative => self.creative = active,
            Skill::Persistent => self.persistent = active,
        }
    }

    /// Active skills in application order.
    pub fn active(&self) -> impl Iterator<Item = Skill> + '_ {
        Skill::ORDER.into_iter().filter(move |s| self.has(*s))
    }
}

impl FromIterator<Skill> for Skills {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        let mut skills = Skills::default();
        for skill in iter {
            skills.set(skill, true);
        }
        skills
    }
}

/// Accepted config shapes for [`Skills`].
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum SkillsRepr {
    List(Vec<Skill>),
    Flags(SkillFlags),
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub(crate) struct SkillFlags {
    expert: bool,
    elusive: bool,
    creative: bool,
    persistent: bool,
}

impl From<SkillsRepr> for Skills {
    fn from(repr: SkillsRepr) -> Self {
        match repr {
            SkillsRepr::List(names) => names.into_iter().collect(),
            SkillsRepr::Flags(flags) => Skills {
                expert: flags.expert,
                elusive: flags.elusive,
                creative: flags.creative,
                persistent: flags.persistent,
            },
        }
    }
}

/// One stage of the pipeline, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillStep {
    /// `None` for the closing base-rule convergence.
    pub skill: Option<Skill>,
    pub success_rate: f64,
}

/// Run the pipeline and keep every intermediate rate.
pub fn trace_skills(base_p: f64, skills: &Skills, mode: ConvergenceMode) -> Result<Vec<SkillStep>> {
    let mut steps = Vec::with_capacity(Skill::ORDER.len() + 1);
    let mut p = base_p;

    for skill in skills.active() {
        p = converge_success(skill.failure_bonus(), skill.reshape(p), mode)?;
        debug!(skill = skill.name(), success_rate = p, "applied skill");
        steps.push(SkillStep {
            skill: Some(skill),
            success_rate: p,
        });
    }

    p = converge_success(FAILURE_BONUS, p, mode)?;
    debug!(success_rate = p, "converged base rule");
    steps.push(SkillStep {
        skill: None,
        success_rate: p,
    });

    Ok(steps)
}

/// Steady-state per-hit success rate after all active skills.
pub fn apply_skills(base_p: f64, skills: &Skills, mode: ConvergenceMode) -> Result<f64> {
    let steps = trace_skills(base_p, skills, mode)?;
    Ok(steps.last().map(|s| s.success_rate).unwrap_or(base_p))
}
