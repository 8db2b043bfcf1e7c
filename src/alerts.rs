//! Projection of future threshold crossings.
//!
//! Each stat loses one point per hour, so the number of hours until a stat
//! drops below a threshold is known exactly from its current value. The host
//! may be suspended at any time, so alerts are handed to an external timer
//! service ahead of time instead of being polled for.

use crate::model::{PetState, ScheduledAlert, Severity, StatKind};

pub const NOTICE_LEVEL: u8 = 80;
pub const WARNING_LEVEL: u8 = 50;

/// Next alert for a single stat value, if any.
pub fn next_alert(stat: StatKind, value: u8) -> Option<ScheduledAlert> {
    let (threshold, severity) = if value >= NOTICE_LEVEL {
        (NOTICE_LEVEL, Severity::Notice)
    } else if value >= WARNING_LEVEL {
        (WARNING_LEVEL, Severity::Warning)
    } else {
        return None;
    };
    Some(ScheduledAlert {
        stat,
        offset_hours: u32::from(value - threshold) + 1,
        severity,
    })
}

/// At most one alert per stat. Empty once the pet has run away.
pub fn compute_schedule(state: &PetState) -> Vec<ScheduledAlert> {
    if state.has_run_away {
        return Vec::new();
    }
    StatKind::ALL
        .iter()
        .filter_map(|&k| next_alert(k, state.stat(k)))
        .collect()
}

/// Title and body for a notification.
pub fn alert_text(pet_name: &str, alert: &ScheduledAlert) -> (String, String) {
    let need = match alert.stat {
        StatKind::Food => "hungry",
        StatKind::Drink => "thirsty",
        StatKind::Happiness => "lonely",
    };
    match alert.severity {
        Severity::Notice => (
            format!("{pet_name} is getting {need}"),
            format!("{} dropped below {NOTICE_LEVEL}.", alert.stat),
        ),
        Severity::Warning => (
            format!("{pet_name} is very {need}!"),
            format!(
                "{} dropped below {WARNING_LEVEL}. Check in before it runs away.",
                alert.stat
            ),
        ),
    }
}
