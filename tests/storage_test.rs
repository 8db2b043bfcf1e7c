use capygotchi::config::{load_settings, save_settings_atomic, Settings};
use capygotchi::notify::{load_alerts, AlertScheduler, PendingAlertsFile};
use capygotchi::storage::{JsonFileStore, PetStore};
use capygotchi::{PetEngine, PetEvent, PetState, Severity, StatKind};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fs;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

#[test]
fn missing_save_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("save.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    let mut st = PetState::new(t0(), 42);
    st.food = 91;
    st.name = "Butter".to_string();

    JsonFileStore::new(&path).save(&st).unwrap();
    assert!(!path.with_extension("json.tmp").exists());

    let loaded = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(loaded, st);
}

#[test]
fn out_of_range_values_are_clamped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    fs::write(
        &path,
        r#"{
            "version": 1,
            "saved_at": "2024-06-01T08:00:00Z",
            "pet": {
                "name": "   ",
                "food": 250,
                "drink": 101,
                "happiness": 7,
                "last_update": "2024-06-01T08:00:00Z"
            }
        }"#,
    )
    .unwrap();

    let st = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!((st.food, st.drink, st.happiness), (100, 100, 7));
    assert_eq!(st.name, "Capy");
    assert!(!st.has_run_away);
    assert_eq!(st.currency, 0);
}

#[test]
fn corrupt_or_future_saves_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    fs::write(&path, "{ not json").unwrap();
    assert!(JsonFileStore::new(&path).load().is_err());

    let future = serde_json::json!({
        "version": 99,
        "saved_at": "2024-06-01T08:00:00Z",
        "pet": PetState::new(t0(), 0),
    });
    fs::write(&path, future.to_string()).unwrap();
    assert!(JsonFileStore::new(&path).load().is_err());
}

#[test]
fn saving_is_repeatable_and_keeps_the_version_on_the_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    let st = PetState::new(t0(), 7);
    let mut store = JsonFileStore::new(&path);

    store.save(&st).unwrap();
    let first = fs::read(&path).unwrap();
    store.save(&st).unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);

    let json: serde_json::Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(json["version"], 1);
    assert!(json.get("saved_at").is_none());
    assert!(json["pet"].get("version").is_none());
}

#[test]
fn older_saves_with_extra_fields_still_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    fs::write(
        &path,
        r#"{
            "version": 1,
            "saved_at": "2024-06-01T09:30:00Z",
            "pet": {
                "version": 1,
                "name": "Butter",
                "food": 40,
                "drink": 41,
                "happiness": 42,
                "last_update": "2024-06-01T08:00:00Z",
                "has_run_away": false,
                "currency": 3
            }
        }"#,
    )
    .unwrap();

    let st = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(st.name, "Butter");
    assert_eq!((st.food, st.drink, st.happiness), (40, 41, 42));
    assert_eq!(st.last_update, t0());
}

#[test]
fn corrupt_alerts_file_starts_an_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alerts.json");
    fs::write(&path, "{ \"pending\": [ truncated").unwrap();
    assert!(load_alerts(&path).is_err());

    let mut sched = PendingAlertsFile::open(&path);
    assert!(sched.contents().delivered.is_empty());
    assert!(sched.contents().generated_at.is_none());

    let st = PetState::new(t0(), 0);
    sched.deliver_now(t0(), &st, &PetEvent::RanAway).unwrap();
    let file = load_alerts(&path).unwrap().unwrap();
    assert_eq!(file.delivered.len(), 1);
}

#[test]
fn missing_alerts_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_alerts(&dir.path().join("alerts.json")).unwrap().is_none());
}

#[test]
fn pending_alerts_are_replaced_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alerts.json");
    let mut sched = PendingAlertsFile::open(&path);

    let mut st = PetState::new(t0(), 0);
    st.food = 85;
    st.drink = 60;
    st.happiness = 10;
    let schedule = capygotchi::alerts::compute_schedule(&st);
    sched.replace_all(t0(), &st, &schedule).unwrap();

    let file = load_alerts(&path).unwrap().unwrap();
    assert_eq!(file.generated_at, Some(t0()));
    assert_eq!(file.pending.len(), 2);
    assert_eq!(file.pending[0].stat, StatKind::Food);
    assert_eq!(file.pending[0].fire_at, t0() + Duration::hours(6));
    assert_eq!(file.pending[0].severity, Severity::Notice);
    assert_eq!(file.pending[1].fire_at, t0() + Duration::hours(11));

    sched.replace_all(t0() + Duration::hours(1), &st, &[]).unwrap();
    assert!(load_alerts(&path).unwrap().unwrap().pending.is_empty());
}

#[test]
fn delivered_history_is_capped_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alerts.json");
    let st = PetState::new(t0(), 0);
    {
        let mut sched = PendingAlertsFile::open(&path);
        for i in 0..25 {
            sched
                .deliver_now(t0() + Duration::hours(i), &st, &PetEvent::RanAway)
                .unwrap();
        }
        assert_eq!(sched.contents().delivered.len(), 20);
        assert_eq!(sched.contents().delivered[0].at, t0() + Duration::hours(5));
    }
    let reopened = PendingAlertsFile::open(&path);
    assert_eq!(reopened.contents().delivered.len(), 20);
    assert_eq!(reopened.contents().delivered[19].title, "Capy ran away");
}

#[test]
fn file_backed_engine_resumes_where_it_left_off() {
    let dir = tempfile::tempdir().unwrap();
    let save = dir.path().join("save.json");
    let alerts = dir.path().join("alerts.json");

    {
        let (mut engine, _) = PetEngine::open(
            JsonFileStore::new(&save),
            PendingAlertsFile::open(&alerts),
            Default::default(),
            t0(),
        );
        engine.act(capygotchi::ActionKind::Feed, t0()).unwrap();
    }

    let (engine, outcome) = PetEngine::open(
        JsonFileStore::new(&save),
        PendingAlertsFile::open(&alerts),
        Default::default(),
        t0() + Duration::hours(4) + Duration::minutes(20),
    );
    assert_eq!(outcome.hours_applied, 4);
    assert_eq!(engine.state().food, 66);
    assert_eq!(engine.state().drink, 46);
    assert_eq!(engine.state().last_update, t0() + Duration::hours(4));
    let delivered = &engine.scheduler().contents().delivered;
    assert_eq!(delivered.len(), 2);
}

#[test]
fn settings_round_trip_and_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    assert_eq!(load_settings(&path).reconcile_interval_secs, 3600);

    let mut s = Settings::default();
    s.rules.food_price = 1;
    s.enable_color = false;
    save_settings_atomic(&path, &s).unwrap();
    let back = load_settings(&path);
    assert_eq!(back.rules.food_price, 1);
    assert!(!back.enable_color);

    fs::write(&path, "garbage").unwrap();
    assert_eq!(load_settings(&path).rules.food_price, 10);
}
