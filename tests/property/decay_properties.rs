use capygotchi::alerts::compute_schedule;
use capygotchi::config::Rules;
use capygotchi::{ActionKind, PetState};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn arb_pet() -> impl Strategy<Value = PetState> {
    (0u8..=100, 0u8..=100, 0u8..=100, 0u32..500).prop_map(|(food, drink, happiness, coins)| {
        let mut st = PetState::new(t0(), coins);
        st.food = food;
        st.drink = drink;
        st.happiness = happiness;
        st
    })
}

fn arb_action() -> impl Strategy<Value = ActionKind> {
    prop_oneof![
        Just(ActionKind::Feed),
        Just(ActionKind::Water),
        Just(ActionKind::Pet),
    ]
}

proptest! {
    #[test]
    fn decay_matches_closed_form(st in arb_pet(), secs in 0i64..(60 * 24 * 3600)) {
        let mut after = st.clone();
        after.reconcile(t0() + Duration::seconds(secs));
        let hours = secs / 3600;
        let expect = |v: u8| (i64::from(v) - hours).max(0) as u8;
        prop_assert_eq!(after.food, expect(st.food));
        prop_assert_eq!(after.drink, expect(st.drink));
        prop_assert_eq!(after.happiness, expect(st.happiness));
    }

    #[test]
    fn reconcile_is_idempotent_for_same_now(st in arb_pet(), secs in 0i64..(60 * 24 * 3600)) {
        let now = t0() + Duration::seconds(secs);
        let mut once = st.clone();
        once.reconcile(now);
        let mut twice = once.clone();
        let out = twice.reconcile(now);
        prop_assert_eq!(once, twice);
        prop_assert!(!out.changed());
    }

    #[test]
    fn anchor_is_monotonic_and_never_ahead(st in arb_pet(), secs in 0i64..(60 * 24 * 3600)) {
        let now = t0() + Duration::seconds(secs);
        let mut after = st.clone();
        after.reconcile(now);
        prop_assert!(after.last_update >= st.last_update);
        prop_assert!(after.last_update <= now);
        prop_assert!(now - after.last_update < Duration::hours(1));
    }

    #[test]
    fn run_away_is_sticky(
        st in arb_pet(),
        steps in prop::collection::vec((arb_action(), any::<u8>(), -5i64..48), 1..30),
    ) {
        let rules = Rules::default();
        let mut st = st;
        st.food = 0;
        st.drink = 0;
        st.happiness = 0;
        st.reconcile(t0() + Duration::hours(1));
        prop_assert!(st.has_run_away);

        let mut now = t0() + Duration::hours(1);
        for (kind, magnitude, hours) in steps {
            now += Duration::hours(hours);
            st.reconcile(now);
            let _ = st.apply_action(kind, magnitude, &rules);
            prop_assert!(st.has_run_away);
        }
    }

    #[test]
    fn actions_stay_in_range(
        st in arb_pet(),
        steps in prop::collection::vec((arb_action(), any::<u8>()), 1..40),
    ) {
        let rules = Rules::default();
        let mut st = st;
        for (kind, magnitude) in steps {
            let before = st.clone();
            match st.apply_action(kind, magnitude, &rules) {
                Ok(v) => {
                    prop_assert!(v <= 100);
                    prop_assert_eq!(st.last_update, before.last_update);
                }
                Err(_) => {
                    prop_assert_eq!(&st, &before);
                }
            }
            prop_assert!(st.food <= 100 && st.drink <= 100 && st.happiness <= 100);
        }
    }

    #[test]
    fn schedule_has_at_most_one_entry_per_stat(st in arb_pet()) {
        let schedule = compute_schedule(&st);
        prop_assert!(schedule.len() <= 3);
        for (i, a) in schedule.iter().enumerate() {
            prop_assert!(a.offset_hours >= 1);
            prop_assert!(schedule[i + 1..].iter().all(|b| b.stat != a.stat));
        }
    }
}
