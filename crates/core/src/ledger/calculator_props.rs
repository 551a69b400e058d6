//! Property tests for the replay calculator.

use chrono::Days;
use proptest::prelude::*;
use rust_decimal::Decimal;

use gazstock_shared::types::MovementType;

use super::calculator::{all_states, consolidated_state, theoretical_stock};
use super::fixtures;
use super::movement::Movement;

/// One generated log event: days to advance, the event itself.
#[derive(Debug, Clone)]
enum Event {
    Entree(Decimal),
    Sortie(Decimal),
    Inventaire(Decimal),
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    // Three decimal places, up to 1000.000 - enough to surface drift bugs.
    (0i64..1_000_000).prop_map(|n| Decimal::new(n, 3))
}

fn event_strategy() -> impl Strategy<Value = (u64, Event)> {
    (
        0u64..3,
        prop_oneof![
            amount_strategy().prop_map(Event::Entree),
            amount_strategy().prop_map(Event::Sortie),
            amount_strategy().prop_map(Event::Inventaire),
        ],
    )
}

fn log_strategy(max_len: usize) -> impl Strategy<Value = Vec<(u64, Event)>> {
    prop::collection::vec(event_strategy(), 0..=max_len)
}

/// Builds movements with nondecreasing dates and increasing creation order,
/// so generation order and replay order coincide.
fn build_log(events: &[(u64, Event)]) -> Vec<Movement> {
    let mut day = fixtures::date("2024-01-01");
    let mut movements = Vec::with_capacity(events.len());

    for (step, event) in events {
        day = day.checked_add_days(Days::new(*step)).unwrap();
        let date = day.format("%Y-%m-%d").to_string();
        movements.push(match event {
            Event::Entree(quantity) => fixtures::entree(&date, *quantity),
            Event::Sortie(quantity) => fixtures::sortie(&date, *quantity),
            Event::Inventaire(stock_reel) => fixtures::inventaire(&date, *stock_reel),
        });
    }

    movements
}

/// Reference result: baseline of the latest count plus flows since it.
fn expected_balance(movements: &[Movement]) -> Decimal {
    let mut base = Decimal::ZERO;
    let mut entrees = Decimal::ZERO;
    let mut sorties = Decimal::ZERO;

    for movement in movements {
        match movement.movement_type {
            MovementType::Entree => entrees += movement.quantity,
            MovementType::Sortie => sorties += movement.quantity,
            MovementType::Inventaire => {
                base = movement.stock_reel.unwrap_or(Decimal::ZERO);
                entrees = Decimal::ZERO;
                sorties = Decimal::ZERO;
            }
        }
    }

    base + entrees - sorties
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The replay equals baseline-plus-flows since the latest count, for any
    /// log restricted to one partition.
    #[test]
    fn prop_balance_is_baseline_plus_flows(events in log_strategy(30)) {
        let movements = build_log(&events);
        let key = fixtures::default_key();

        prop_assert_eq!(
            theoretical_stock(&movements, &key, None),
            expected_balance(&movements)
        );
    }

    /// Replaying an unchanged log twice gives identical results.
    #[test]
    fn prop_replay_is_pure(events in log_strategy(30)) {
        let movements = build_log(&events);
        let key = fixtures::default_key();

        let first = theoretical_stock(&movements, &key, None);
        let second = theoretical_stock(&movements, &key, None);
        prop_assert_eq!(first, second);
    }

    /// Input slice order never matters - the deterministic sort decides.
    #[test]
    fn prop_replay_ignores_input_order(events in log_strategy(20)) {
        let movements = build_log(&events);
        let key = fixtures::default_key();
        let reference = theoretical_stock(&movements, &key, None);

        let mut reversed = movements.clone();
        reversed.reverse();
        prop_assert_eq!(theoretical_stock(&reversed, &key, None), reference);
    }

    /// A count makes everything before it irrelevant.
    #[test]
    fn prop_count_discards_history(
        before in log_strategy(15),
        stock_reel in amount_strategy(),
    ) {
        let mut movements = build_log(&before);
        movements.push(fixtures::inventaire("2024-06-01", stock_reel));
        let key = fixtures::default_key();

        prop_assert_eq!(theoretical_stock(&movements, &key, None), stock_reel);
    }

    /// The consolidated state is internally consistent and agrees with the
    /// accumulator identity.
    #[test]
    fn prop_state_identity_holds(events in log_strategy(30)) {
        let movements = build_log(&events);
        let key = fixtures::default_key();
        let state = consolidated_state(&movements, &key);

        prop_assert_eq!(
            state.stock_theorique,
            state.stock_initial + state.cumul_entrees - state.cumul_sorties
        );
    }

    /// Every partition present in the log gets exactly one state.
    #[test]
    fn prop_all_states_covers_each_partition_once(events in log_strategy(20)) {
        let movements = build_log(&events);
        let states = all_states(&movements);

        let distinct: std::collections::BTreeSet<_> =
            movements.iter().map(Movement::key).collect();
        prop_assert_eq!(states.len(), distinct.len());

        let state_keys: std::collections::BTreeSet<_> =
            states.iter().map(super::types::StockState::key).collect();
        prop_assert_eq!(state_keys, distinct);
    }
}
