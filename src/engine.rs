use crate::alerts::compute_schedule;
use crate::config::Rules;
use crate::error::{ActionError, ResetError};
use crate::model::{ActionKind, PetPhase, PetState, ReconcileOutcome, ScheduledAlert};
use crate::notify::AlertScheduler;
use crate::storage::PetStore;
use chrono::{DateTime, Utc};

/// Owns the pet and keeps its store and alert scheduler in step with it.
///
/// The in-memory state is authoritative: a failed save or a failed schedule
/// update is logged and the mutation stands.
pub struct PetEngine<S: PetStore, N: AlertScheduler> {
    state: PetState,
    rules: Rules,
    store: S,
    scheduler: N,
}

impl<S: PetStore, N: AlertScheduler> PetEngine<S, N> {
    /// Loads the saved pet (or adopts a new one) and catches up on the time
    /// spent closed.
    pub fn open(
        mut store: S,
        scheduler: N,
        rules: Rules,
        now: DateTime<Utc>,
    ) -> (Self, ReconcileOutcome) {
        let state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::info!("no saved pet, adopting a new one");
                PetState::new(now, rules.starting_currency)
            }
            Err(e) => {
                tracing::warn!("could not load saved pet, starting fresh: {e:#}");
                PetState::new(now, rules.starting_currency)
            }
        };
        let mut engine = Self {
            state,
            rules,
            store,
            scheduler,
        };
        let outcome = engine.reconcile(now);
        if !outcome.changed() {
            engine.persist();
            engine.refresh_alerts(now);
        }
        (engine, outcome)
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn phase(&self) -> PetPhase {
        self.state.phase()
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn scheduler(&self) -> &N {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut N {
        &mut self.scheduler
    }

    pub fn reconcile(&mut self, now: DateTime<Utc>) -> ReconcileOutcome {
        let outcome = self.state.reconcile(now);
        if outcome.clock_regressed {
            tracing::warn!(
                %now,
                "clock moved behind the decay anchor, re-anchoring without decay"
            );
        }
        if !outcome.changed() {
            return outcome;
        }
        tracing::debug!(
            hours = outcome.hours_applied,
            food = self.state.food,
            drink = self.state.drink,
            happiness = self.state.happiness,
            "decay applied"
        );
        for event in &outcome.events {
            tracing::info!(?event, "pet event");
            if let Err(e) = self.scheduler.deliver_now(now, &self.state, event) {
                tracing::warn!("could not deliver notification: {e:#}");
            }
        }
        self.persist();
        self.refresh_alerts(now);
        outcome
    }

    /// Uses the magnitude configured for `kind`.
    pub fn act(&mut self, kind: ActionKind, now: DateTime<Utc>) -> Result<u8, ActionError> {
        let magnitude = self.rules.magnitude(kind);
        self.apply_action(kind, magnitude, now)
    }

    pub fn apply_action(
        &mut self,
        kind: ActionKind,
        magnitude: u8,
        now: DateTime<Utc>,
    ) -> Result<u8, ActionError> {
        match self.state.apply_action(kind, magnitude, &self.rules) {
            Ok(value) => {
                tracing::info!(?kind, magnitude, value, coins = self.state.currency, "action applied");
                self.persist();
                self.refresh_alerts(now);
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(?kind, error = %e, "action refused");
                Err(e)
            }
        }
    }

    /// Alerts only depend on stats, so no schedule refresh here.
    pub fn credit(&mut self, amount: u32) {
        self.state.credit(amount);
        tracing::info!(amount, coins = self.state.currency, "coins credited");
        self.persist();
    }

    pub fn rename(&mut self, name: &str, now: DateTime<Utc>) -> bool {
        if !self.state.rename(name) {
            return false;
        }
        tracing::info!(name = %self.state.name, "pet renamed");
        self.persist();
        // notification texts carry the name
        self.refresh_alerts(now);
        true
    }

    pub fn reset(&mut self, now: DateTime<Utc>) -> Result<(), ResetError> {
        self.state.reset(now)?;
        tracing::info!("pet came back");
        self.persist();
        self.refresh_alerts(now);
        Ok(())
    }

    pub fn alert_schedule(&self) -> Vec<ScheduledAlert> {
        compute_schedule(&self.state)
    }

    fn refresh_alerts(&mut self, now: DateTime<Utc>) {
        let schedule = compute_schedule(&self.state);
        if let Err(e) = self.scheduler.replace_all(now, &self.state, &schedule) {
            tracing::warn!("could not update alert schedule: {e:#}");
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.state) {
            tracing::warn!("could not save pet: {e:#}");
        }
    }
}
