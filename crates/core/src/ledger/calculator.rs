//! Theoretical stock replay.
//!
//! Balances are never stored: they are recomputed on every query by
//! replaying the movement log for one partition in deterministic order,
//! using exact decimal arithmetic throughout. An inventaire is ground
//! truth - it resets the baseline and discards whatever drift accumulated
//! before it.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use gazstock_shared::types::MovementType;

use super::movement::{LedgerKey, Movement};
use super::types::StockState;

/// Deterministic replay order: date, then insertion order.
///
/// `created_at` breaks same-day ties; the time-ordered id breaks the
/// (unlikely) remaining ones. Two inventaires sharing a date therefore
/// always replay in the same order.
fn replay_order(a: &Movement, b: &Movement) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Filters a partition's movements and sorts them for replay.
fn relevant_sorted<'a>(
    movements: &'a [Movement],
    key: &LedgerKey,
    as_of: Option<NaiveDate>,
) -> Vec<&'a Movement> {
    let mut relevant: Vec<&Movement> = movements
        .iter()
        .filter(|m| key.matches(m))
        .filter(|m| as_of.is_none_or(|limit| m.date <= limit))
        .collect();
    relevant.sort_by(|a, b| replay_order(a, b));
    relevant
}

/// Computes the theoretical stock of one partition.
///
/// Replays the partition's movements in order: entrees accumulate, sorties
/// accumulate, and an inventaire with a counted quantity becomes the new
/// baseline, zeroing both accumulators. Returns
/// `stock_initial + entrees - sorties`.
///
/// The function is total: an inventaire missing its count is treated as
/// carrying no baseline, never as an error.
#[must_use]
pub fn theoretical_stock(
    movements: &[Movement],
    key: &LedgerKey,
    as_of: Option<NaiveDate>,
) -> Decimal {
    let mut stock_initial = Decimal::ZERO;
    let mut entrees = Decimal::ZERO;
    let mut sorties = Decimal::ZERO;

    for movement in relevant_sorted(movements, key, as_of) {
        match movement.movement_type {
            MovementType::Entree => entrees += movement.quantity,
            MovementType::Sortie => sorties += movement.quantity,
            MovementType::Inventaire => {
                if let Some(stock_reel) = movement.stock_reel {
                    stock_initial = stock_reel;
                    entrees = Decimal::ZERO;
                    sorties = Decimal::ZERO;
                }
            }
        }
    }

    stock_initial + entrees - sorties
}

/// Computes the consolidated state of one partition.
///
/// The latest inventaire supplies the baseline, and its counted quantity,
/// ecart, and date are read through verbatim (the ecart is whatever was
/// captured at count time, never recomputed). Movements strictly after the
/// count's date feed the accumulators. Without any inventaire, the baseline
/// is zero and every movement contributes.
#[must_use]
pub fn consolidated_state(movements: &[Movement], key: &LedgerKey) -> StockState {
    let relevant = relevant_sorted(movements, key, None);

    let last_inventory = relevant
        .iter()
        .rev()
        .find(|m| m.movement_type == MovementType::Inventaire && m.stock_reel.is_some());

    let mut stock_initial = Decimal::ZERO;
    let mut cumul_entrees = Decimal::ZERO;
    let mut cumul_sorties = Decimal::ZERO;
    let mut stock_reel = None;
    let mut ecart = None;
    let mut last_inventory_date = None;

    if let Some(inventory) = last_inventory {
        stock_initial = inventory.stock_reel.unwrap_or(Decimal::ZERO);
        stock_reel = inventory.stock_reel;
        ecart = inventory.ecart;
        last_inventory_date = Some(inventory.date);

        for movement in relevant.iter().filter(|m| m.date > inventory.date) {
            match movement.movement_type {
                MovementType::Entree => cumul_entrees += movement.quantity,
                MovementType::Sortie => cumul_sorties += movement.quantity,
                MovementType::Inventaire => {}
            }
        }
    } else {
        for movement in &relevant {
            match movement.movement_type {
                MovementType::Entree => cumul_entrees += movement.quantity,
                MovementType::Sortie => cumul_sorties += movement.quantity,
                MovementType::Inventaire => {}
            }
        }
    }

    StockState {
        category: key.category,
        site: key.site,
        bottle_type: key.bottle_type,
        client: key.client,
        stock_initial,
        cumul_entrees,
        cumul_sorties,
        stock_theorique: stock_initial + cumul_entrees - cumul_sorties,
        stock_reel,
        ecart,
        last_inventory_date,
    }
}

/// Computes one consolidated state per distinct partition in the log.
///
/// Keys are taken from the rows as stored (client included, absent meaning
/// the unattributed partition) and results come back in stable key order.
#[must_use]
pub fn all_states(movements: &[Movement]) -> Vec<StockState> {
    let keys: BTreeSet<LedgerKey> = movements.iter().map(Movement::key).collect();

    keys.iter()
        .map(|key| consolidated_state(movements, key))
        .collect()
}
