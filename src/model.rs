use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SAVE_VERSION: u32 = 1;

pub const STAT_MAX: u8 = 100;
pub const DEFAULT_STAT: u8 = 50;
pub const NAME_MAX: usize = 18;
pub const DEFAULT_NAME: &str = "Capy";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Food,
    Drink,
    Happiness,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Food, StatKind::Drink, StatKind::Happiness];

    pub fn label(self) -> &'static str {
        match self {
            StatKind::Food => "food",
            StatKind::Drink => "drink",
            StatKind::Happiness => "happiness",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Feed,
    Water,
    Pet,
}

impl ActionKind {
    /// Stat raised by this action.
    pub fn target(self) -> StatKind {
        match self {
            ActionKind::Feed => StatKind::Food,
            ActionKind::Water => StatKind::Drink,
            ActionKind::Pet => StatKind::Happiness,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PetPhase {
    Active,
    RanAway,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PetState {
    #[serde(default = "default_name")]
    pub name: String,
    pub food: u8,
    pub drink: u8,
    pub happiness: u8,
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub has_run_away: bool,
    #[serde(default)]
    pub currency: u32,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl PetState {
    pub fn new(now: DateTime<Utc>, currency: u32) -> Self {
        Self {
            name: default_name(),
            food: DEFAULT_STAT,
            drink: DEFAULT_STAT,
            happiness: DEFAULT_STAT,
            last_update: now,
            has_run_away: false,
            currency,
        }
    }

    pub fn phase(&self) -> PetPhase {
        if self.has_run_away {
            PetPhase::RanAway
        } else {
            PetPhase::Active
        }
    }

    pub fn stat(&self, kind: StatKind) -> u8 {
        match kind {
            StatKind::Food => self.food,
            StatKind::Drink => self.drink,
            StatKind::Happiness => self.happiness,
        }
    }

    pub fn stat_mut(&mut self, kind: StatKind) -> &mut u8 {
        match kind {
            StatKind::Food => &mut self.food,
            StatKind::Drink => &mut self.drink,
            StatKind::Happiness => &mut self.happiness,
        }
    }

    pub fn all_depleted(&self) -> bool {
        StatKind::ALL.iter().all(|&k| self.stat(k) == 0)
    }

    /// Pulls hand-edited or corrupt values back into range after a load.
    pub fn sanitized(mut self) -> Self {
        for kind in StatKind::ALL {
            let v = self.stat_mut(kind);
            *v = (*v).min(STAT_MAX);
        }
        self.name = clean_name(&self.name).unwrap_or_else(default_name);
        self
    }
}

/// Trimmed name capped at [`NAME_MAX`] chars, or `None` if nothing is left.
pub fn clean_name(raw: &str) -> Option<String> {
    let trimmed: String = raw.trim().chars().take(NAME_MAX).collect();
    let trimmed = trimmed.trim_end().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Stat is about to drop below 80.
    Notice,
    /// Stat is about to drop below 50.
    Warning,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledAlert {
    pub stat: StatKind,
    pub offset_hours: u32,
    pub severity: Severity,
}

/// Something observed during a reconciliation that is reported right away.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PetEvent {
    DroppedBelow { stat: StatKind, threshold: u8 },
    RanAway,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub hours_applied: u32,
    pub clock_regressed: bool,
    pub events: Vec<PetEvent>,
}

impl ReconcileOutcome {
    pub fn changed(&self) -> bool {
        self.hours_applied > 0 || self.clock_regressed
    }
}
