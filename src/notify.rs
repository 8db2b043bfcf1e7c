use crate::alerts::alert_text;
use crate::config::write_json_atomic;
use crate::model::{PetEvent, PetState, ScheduledAlert, Severity, StatKind};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

const DELIVERED_KEEP: usize = 20;

/// Timer service that fires alerts while the game is not running.
pub trait AlertScheduler {
    /// Drops every pending alert and registers `schedule` in its place.
    fn replace_all(
        &mut self,
        now: DateTime<Utc>,
        pet: &PetState,
        schedule: &[ScheduledAlert],
    ) -> Result<()>;

    /// Reports an event immediately.
    fn deliver_now(&mut self, now: DateTime<Utc>, pet: &PetState, event: &PetEvent) -> Result<()>;
}

pub fn event_text(pet_name: &str, event: &PetEvent) -> (String, String) {
    match event {
        PetEvent::DroppedBelow { stat, threshold } => (
            format!("{pet_name} needs you"),
            format!("{stat} is below {threshold}."),
        ),
        PetEvent::RanAway => (
            format!("{pet_name} ran away"),
            "Food, drink and happiness all hit zero.".to_string(),
        ),
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingAlert {
    pub stat: StatKind,
    pub severity: Severity,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveredEvent {
    pub at: DateTime<Utc>,
    pub event: PetEvent,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlertsFile {
    pub generated_at: Option<DateTime<Utc>>,
    pub pending: Vec<PendingAlert>,
    #[serde(default)]
    pub delivered: Vec<DeliveredEvent>,
}

/// Writes the pending schedule to a JSON file that an OS timer (cron, a
/// systemd timer, a desktop notifier) can pick up.
pub struct PendingAlertsFile {
    path: PathBuf,
    contents: AlertsFile,
}

impl PendingAlertsFile {
    /// Keeps the delivered history of an existing file; pending alerts are
    /// rebuilt on the next `replace_all`. An unreadable file is replaced.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let contents = match load_alerts(&path) {
            Ok(contents) => contents.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("could not read alert history, starting empty: {e:#}");
                AlertsFile::default()
            }
        };
        Self { path, contents }
    }

    pub fn contents(&self) -> &AlertsFile {
        &self.contents
    }

    fn flush(&self) -> Result<()> {
        write_json_atomic(&self.path, &self.contents)
    }
}

/// `Ok(None)` when the file does not exist yet.
pub fn load_alerts(path: &Path) -> Result<Option<AlertsFile>> {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    let file = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(file))
}

impl AlertScheduler for PendingAlertsFile {
    fn replace_all(
        &mut self,
        now: DateTime<Utc>,
        pet: &PetState,
        schedule: &[ScheduledAlert],
    ) -> Result<()> {
        self.contents.generated_at = Some(now);
        self.contents.pending = schedule
            .iter()
            .map(|a| {
                let (title, body) = alert_text(&pet.name, a);
                PendingAlert {
                    stat: a.stat,
                    severity: a.severity,
                    fire_at: now + ChronoDuration::hours(i64::from(a.offset_hours)),
                    title,
                    body,
                }
            })
            .collect();
        self.contents.pending.sort_by_key(|p| p.fire_at);
        self.flush()
    }

    fn deliver_now(&mut self, now: DateTime<Utc>, pet: &PetState, event: &PetEvent) -> Result<()> {
        let (title, body) = event_text(&pet.name, event);
        tracing::info!(%title, %body, "notification");
        self.contents.delivered.push(DeliveredEvent {
            at: now,
            event: event.clone(),
            title,
            body,
        });
        let excess = self.contents.delivered.len().saturating_sub(DELIVERED_KEEP);
        self.contents.delivered.drain(..excess);
        self.flush()
    }
}

/// Remembers what it was handed; nothing leaves the process.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    pub schedule: Vec<ScheduledAlert>,
    pub replaced: usize,
    pub delivered: Vec<PetEvent>,
    pub fail: bool,
}

impl AlertScheduler for RecordingScheduler {
    fn replace_all(
        &mut self,
        _now: DateTime<Utc>,
        _pet: &PetState,
        schedule: &[ScheduledAlert],
    ) -> Result<()> {
        if self.fail {
            anyhow::bail!("scheduler unavailable");
        }
        self.schedule = schedule.to_vec();
        self.replaced += 1;
        Ok(())
    }

    fn deliver_now(&mut self, _now: DateTime<Utc>, _pet: &PetState, event: &PetEvent) -> Result<()> {
        if self.fail {
            anyhow::bail!("scheduler unavailable");
        }
        self.delivered.push(event.clone());
        Ok(())
    }
}
