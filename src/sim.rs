use crate::alerts::WARNING_LEVEL;
use crate::config::Rules;
use crate::error::{ActionError, ResetError};
use crate::model::{
    clean_name, ActionKind, PetEvent, PetState, ReconcileOutcome, StatKind, DEFAULT_STAT,
    STAT_MAX,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};

const SECS_PER_HOUR: i64 = 3600;

impl PetState {
    /// Applies one point of decay per whole hour elapsed since the anchor.
    ///
    /// The anchor moves forward by whole hours only, so a partial hour is
    /// carried into the next call. A `now` earlier than the anchor re-anchors
    /// at `now` without decay.
    pub fn reconcile(&mut self, now: DateTime<Utc>) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        let elapsed = now - self.last_update;
        if elapsed < ChronoDuration::zero() {
            self.last_update = now;
            outcome.clock_regressed = true;
            return outcome;
        }

        let whole_hours = elapsed.num_seconds() / SECS_PER_HOUR;
        if whole_hours == 0 {
            return outcome;
        }

        let step = whole_hours.min(STAT_MAX as i64) as u8;
        for kind in StatKind::ALL {
            let v = self.stat_mut(kind);
            let before = *v;
            *v = before.saturating_sub(step);
            if before >= WARNING_LEVEL && *v < WARNING_LEVEL {
                outcome.events.push(PetEvent::DroppedBelow {
                    stat: kind,
                    threshold: WARNING_LEVEL,
                });
            }
        }

        self.last_update += ChronoDuration::seconds(whole_hours * SECS_PER_HOUR);
        outcome.hours_applied = u32::try_from(whole_hours).unwrap_or(u32::MAX);

        if !self.has_run_away && self.all_depleted() {
            self.has_run_away = true;
            outcome.events.push(PetEvent::RanAway);
        }

        outcome
    }

    /// Raises the stat behind `kind` by `magnitude`, charging the shop price.
    /// Nothing changes when an error is returned. Feed and water are refused
    /// on a full stat; petting a happy pet just leaves it at the cap.
    pub fn apply_action(
        &mut self,
        kind: ActionKind,
        magnitude: u8,
        rules: &Rules,
    ) -> Result<u8, ActionError> {
        if self.has_run_away {
            return Err(ActionError::RanAway);
        }
        let stat = kind.target();
        if kind != ActionKind::Pet && self.stat(stat) >= STAT_MAX {
            return Err(ActionError::StatAlreadyMaxed(stat));
        }
        let price = rules.price(kind);
        if self.currency < price {
            return Err(ActionError::InsufficientCurrency {
                price,
                balance: self.currency,
            });
        }

        self.currency -= price;
        let v = self.stat_mut(stat);
        *v = v.saturating_add(magnitude).min(STAT_MAX);
        Ok(*v)
    }

    pub fn credit(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Returns true when the name changed.
    pub fn rename(&mut self, raw: &str) -> bool {
        match clean_name(raw) {
            Some(name) if name != self.name => {
                self.name = name;
                true
            }
            _ => false,
        }
    }

    /// Brings a runaway back with fresh stats, keeping its name and coins.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Result<(), ResetError> {
        if !self.has_run_away {
            return Err(ResetError::StillActive);
        }
        self.food = DEFAULT_STAT;
        self.drink = DEFAULT_STAT;
        self.happiness = DEFAULT_STAT;
        self.has_run_away = false;
        self.last_update = now;
        Ok(())
    }
}
