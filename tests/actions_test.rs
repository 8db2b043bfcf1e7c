use capygotchi::config::Rules;
use capygotchi::{ActionError, ActionKind, PetState, ResetError, StatKind};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

#[test]
fn feeding_a_full_pet_is_refused() {
    let rules = Rules::default();
    let mut st = PetState::new(t0(), 100);
    st.food = 100;
    let before = st.clone();
    assert_eq!(
        st.apply_action(ActionKind::Feed, 10, &rules),
        Err(ActionError::StatAlreadyMaxed(StatKind::Food))
    );
    assert_eq!(st, before);
}

#[test]
fn feed_and_water_need_coins() {
    let rules = Rules::default();
    let mut st = PetState::new(t0(), rules.drink_price - 1);
    let before = st.clone();
    assert_eq!(
        st.apply_action(ActionKind::Water, 10, &rules),
        Err(ActionError::InsufficientCurrency {
            price: rules.drink_price,
            balance: rules.drink_price - 1
        })
    );
    assert!(st.apply_action(ActionKind::Feed, 10, &rules).is_err());
    assert_eq!(st, before);
}

#[test]
fn petting_is_free() {
    let rules = Rules::default();
    let mut st = PetState::new(t0(), 0);
    assert_eq!(st.apply_action(ActionKind::Pet, 15, &rules), Ok(65));
    assert_eq!(st.currency, 0);
}

#[test]
fn petting_a_full_pet_changes_nothing() {
    let rules = Rules::default();
    let mut st = PetState::new(t0(), 0);
    st.happiness = 100;
    let before = st.clone();
    assert_eq!(st.apply_action(ActionKind::Pet, 10, &rules), Ok(100));
    assert_eq!(st, before);
}

#[test]
fn big_magnitudes_clamp_to_full() {
    let rules = Rules::default();
    let mut st = PetState::new(t0(), 1_000);
    assert_eq!(st.apply_action(ActionKind::Feed, u8::MAX, &rules), Ok(100));
    assert_eq!(st.apply_action(ActionKind::Water, 60, &rules), Ok(100));
    assert_eq!(st.food, 100);
    assert_eq!(st.drink, 100);
}

#[test]
fn actions_leave_the_anchor_alone() {
    let rules = Rules::default();
    let mut st = PetState::new(t0(), 100);
    st.apply_action(ActionKind::Feed, 5, &rules).unwrap();
    st.apply_action(ActionKind::Pet, 5, &rules).unwrap();
    assert_eq!(st.last_update, t0());
}

#[test]
fn runaway_blocks_actions_until_reset() {
    let rules = Rules::default();
    let mut st = PetState::new(t0(), 100);
    st.food = 1;
    st.drink = 1;
    st.happiness = 1;
    st.reconcile(t0() + Duration::hours(2));
    assert!(st.has_run_away);

    for kind in [ActionKind::Feed, ActionKind::Water, ActionKind::Pet] {
        assert_eq!(st.apply_action(kind, 50, &rules), Err(ActionError::RanAway));
    }
    assert!(st.has_run_away);

    let later = t0() + Duration::hours(5);
    st.reset(later).unwrap();
    assert!(!st.has_run_away);
    assert_eq!((st.food, st.drink, st.happiness), (50, 50, 50));
    assert_eq!(st.last_update, later);
    assert_eq!(st.currency, 100);
    assert_eq!(st.reset(later), Err(ResetError::StillActive));
}
