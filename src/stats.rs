//! Prediction results and their text rendering

use serde::Serialize;

/// Outcome of one assault prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub expected_hits: u32,
    pub expected_damage: u64,
    /// Probability in [0, 1].
    pub kill_probability: f64,

    // Intermediate values, useful when comparing builds
    pub success_rate: f64,
    pub damage_per_hit: f64,
    pub charges_used: u32,
    pub adjusted_attempts: u32,
    pub needed_hits: u32,
}

impl Prediction {
    /// Kill probability as a percentage with two decimals, e.g. `"37.50"`.
    pub fn kill_percent(&self) -> String {
        format!("{:.2}", self.kill_probability * 100.0)
    }

    /// The two-sentence report shown to players.
    pub fn summary(&self) -> String {
        format!(
            "You can expect to succeed in {} hits and inflict {} damage points on average!\n\
             You have a {}% chance of killing your target!",
            self.expected_hits,
            self.expected_damage,
            self.kill_percent()
        )
    }
}

/// Which input a sweep varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    TargetHp,
    ActionPoints,
}

impl SweepAxis {
    pub fn label(self) -> &'static str {
        match self {
            SweepAxis::TargetHp => "HP",
            SweepAxis::ActionPoints => "PA",
        }
    }
}

/// One line of a sweep table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRow {
    pub value: u32,
    pub prediction: Prediction,
}

/// Fixed-width table of sweep rows.
pub fn format_sweep_table(axis: SweepAxis, rows: &[SweepRow]) -> String {
    let mut out = format!(
        "{:>5}  {:>5}  {:>7}  {:>7}  {:>8}\n",
        axis.label(),
        "Hits",
        "Damage",
        "Needed",
        "Kill %"
    );
    for row in rows {
        let p = &row.prediction;
        out.push_str(&format!(
            "{:>5}  {:>5}  {:>7}  {:>7}  {:>8}\n",
            row.value,
            p.expected_hits,
            p.expected_damage,
            p.needed_hits,
            p.kill_percent()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Prediction {
        Prediction {
            expected_hits: 6,
            expected_damage: 9,
            kill_probability: 0.375,
            success_rate: 0.68,
            damage_per_hit: 1.65,
            charges_used: 0,
            adjusted_attempts: 10,
            needed_hits: 7,
        }
    }

    #[test]
    fn test_summary_wording() {
        assert_eq!(
            sample().summary(),
            "You can expect to succeed in 6 hits and inflict 9 damage points on average!\n\
             You have a 37.50% chance of killing your target!"
        );
    }

    #[test]
    fn test_sweep_table_has_one_line_per_row() {
        let rows = vec![
            SweepRow {
                value: 5,
                prediction: sample(),
            },
            SweepRow {
                value: 6,
                prediction: sample(),
            },
        ];
        let table = format_sweep_table(SweepAxis::TargetHp, &rows);
        assert_eq!(table.lines().count(), 3);
        assert!(table.lines().next().unwrap().trim_start().starts_with("HP"));
    }
}
