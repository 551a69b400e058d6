//! Pre-write validation of new movements.
//!
//! Every rule here rejects before anything is persisted, so a failed save
//! leaves no partial state behind.

use rust_decimal::Decimal;

use gazstock_shared::types::MovementType;

use super::error::LedgerError;
use super::mirror::is_tracked_warehouse;
use super::types::NewMovement;

/// Validates a movement before persistence.
///
/// # Errors
///
/// Returns a [`LedgerError`] when:
/// - the quantity is negative, or zero on an entree/sortie
/// - an inventaire is missing its counted quantity
/// - a named transfer warehouse is outside the tracked allow-list
/// - a transfer names the movement's own category as counterpart
pub fn validate_new_movement(movement: &NewMovement) -> Result<(), LedgerError> {
    if movement.quantity < Decimal::ZERO {
        return Err(LedgerError::NegativeQuantity);
    }

    match movement.movement_type {
        MovementType::Entree | MovementType::Sortie => {
            if movement.quantity == Decimal::ZERO {
                return Err(LedgerError::ZeroQuantity);
            }
        }
        MovementType::Inventaire => {
            if movement.stock_reel.is_none() {
                return Err(LedgerError::MissingStockReel);
            }
        }
    }

    for warehouse in [movement.source_warehouse, movement.destination_warehouse]
        .into_iter()
        .flatten()
    {
        if !is_tracked_warehouse(warehouse) {
            return Err(LedgerError::UnrecognizedWarehouse(warehouse));
        }
        if warehouse == movement.category {
            return Err(LedgerError::TransferToSelf);
        }
    }

    Ok(())
}
