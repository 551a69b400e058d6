//! Shared builders for ledger tests.

use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use gazstock_shared::types::{
    BottleType, MovementId, MovementType, StockCategory, StockClient, StockSite,
};

use super::movement::{LedgerKey, Movement};

static SEQ: AtomicI64 = AtomicI64::new(0);

/// Monotonic creation timestamp so fixtures replay in build order.
fn next_created_at() -> DateTime<Utc> {
    let offset = SEQ.fetch_add(1, Ordering::Relaxed);
    DateTime::from_timestamp(1_700_000_000 + offset, 0).unwrap()
}

/// Parses a `YYYY-MM-DD` date.
pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

/// Default test partition: unattributed B12 at the bulk depot.
pub(crate) const fn default_key() -> LedgerKey {
    LedgerKey::new(StockCategory::DepotVrac, StockSite::DepotVrac, BottleType::B12)
}

fn base(movement_type: MovementType, day: &str) -> Movement {
    let key = default_key();
    Movement {
        id: MovementId::new(),
        date: date(day),
        category: key.category,
        site: key.site,
        bottle_type: key.bottle_type,
        client: None,
        movement_type,
        quantity: Decimal::ZERO,
        stock_reel: None,
        ecart: None,
        stock_theorique: None,
        source_warehouse: None,
        destination_warehouse: None,
        linked_movement_id: None,
        bon_numero: None,
        justification_ecart: None,
        last_modified_by: None,
        last_modified_at: None,
        created_at: next_created_at(),
    }
}

/// An inflow on the default partition.
pub(crate) fn entree(day: &str, quantity: Decimal) -> Movement {
    let mut movement = base(MovementType::Entree, day);
    movement.quantity = quantity;
    movement
}

/// An outflow on the default partition.
pub(crate) fn sortie(day: &str, quantity: Decimal) -> Movement {
    let mut movement = base(MovementType::Sortie, day);
    movement.quantity = quantity;
    movement
}

/// A physical count on the default partition.
pub(crate) fn inventaire(day: &str, stock_reel: Decimal) -> Movement {
    let mut movement = base(MovementType::Inventaire, day);
    movement.stock_reel = Some(stock_reel);
    movement
}

/// An attributed inflow.
pub(crate) fn entree_for(day: &str, quantity: Decimal, client: StockClient) -> Movement {
    let mut movement = entree(day, quantity);
    movement.client = Some(client);
    movement
}
