//! Mirror construction for inter-warehouse transfers.
//!
//! A sortie towards a tracked warehouse (or an entree from one) gets a
//! paired opposite-direction record in that warehouse, so both sides of the
//! transfer stay accounted for. Only the closed allow-list below is ever
//! mirrored; transfers touching any other category are not.

use gazstock_shared::types::{MovementType, StockCategory};

use super::movement::Movement;
use super::types::NewMovement;

/// Closed allow-list of categories that behave as tracked warehouses.
///
/// `parc_ce` is the bottle fleet in circulation, a balance bucket rather
/// than a warehouse with a gate, so it never takes part in mirrored
/// transfers.
pub const TRACKED_WAREHOUSES: [StockCategory; 7] = [
    StockCategory::BouteillesNeuves,
    StockCategory::Consignes,
    StockCategory::StockOutils,
    StockCategory::BouteillesHs,
    StockCategory::Reconfiguration,
    StockCategory::DepotVrac,
    StockCategory::CentreEmplisseur,
];

/// Whether a category is in the tracked warehouse allow-list.
#[must_use]
pub fn is_tracked_warehouse(category: StockCategory) -> bool {
    TRACKED_WAREHOUSES.contains(&category)
}

/// Returns the tracked warehouse a movement transfers to or from, when the
/// movement calls for a mirror.
///
/// Only a sortie with a tracked destination or an entree with a tracked
/// source is mirrored; inventaires never are.
#[must_use]
pub fn transfer_counterpart(movement: &Movement) -> Option<StockCategory> {
    let warehouse = match movement.movement_type {
        MovementType::Sortie => movement.destination_warehouse,
        MovementType::Entree => movement.source_warehouse,
        MovementType::Inventaire => None,
    }?;

    is_tracked_warehouse(warehouse).then_some(warehouse)
}

/// Builds the mirror record for a transfer movement, if it needs one.
///
/// The mirror flips the flow direction, lives in the counterpart warehouse's
/// category, and copies date, site, bottle type, quantity, client, and
/// delivery note verbatim. Its own warehouse field points back at the
/// primary's category.
#[must_use]
pub fn mirror_of(primary: &Movement) -> Option<NewMovement> {
    let warehouse = transfer_counterpart(primary)?;
    let movement_type = primary.movement_type.inverted()?;

    let (source_warehouse, destination_warehouse) = match primary.movement_type {
        // Primary sent stock to the warehouse; the mirror receives it from
        // the primary's category.
        MovementType::Sortie => (Some(primary.category), None),
        // Primary received stock from the warehouse; the mirror sends it to
        // the primary's category.
        MovementType::Entree => (None, Some(primary.category)),
        MovementType::Inventaire => return None,
    };

    Some(NewMovement {
        date: primary.date,
        category: warehouse,
        site: primary.site,
        bottle_type: primary.bottle_type,
        client: primary.client,
        movement_type,
        quantity: primary.quantity,
        stock_reel: None,
        source_warehouse,
        destination_warehouse,
        bon_numero: primary.bon_numero.clone(),
        justification_ecart: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::fixtures;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parc_ce_is_not_a_tracked_warehouse() {
        assert!(!is_tracked_warehouse(StockCategory::ParcCe));
        for warehouse in TRACKED_WAREHOUSES {
            assert!(is_tracked_warehouse(warehouse));
        }
    }

    #[test]
    fn test_sortie_to_tracked_warehouse_is_mirrored() {
        let mut sortie = fixtures::sortie("2024-01-10", dec!(30));
        sortie.category = StockCategory::DepotVrac;
        sortie.destination_warehouse = Some(StockCategory::CentreEmplisseur);
        sortie.bon_numero = Some("BL-2024-0042".to_string());

        let mirror = mirror_of(&sortie).unwrap();
        assert_eq!(mirror.movement_type, gazstock_shared::types::MovementType::Entree);
        assert_eq!(mirror.category, StockCategory::CentreEmplisseur);
        assert_eq!(mirror.date, sortie.date);
        assert_eq!(mirror.site, sortie.site);
        assert_eq!(mirror.bottle_type, sortie.bottle_type);
        assert_eq!(mirror.quantity, dec!(30));
        assert_eq!(mirror.client, sortie.client);
        assert_eq!(mirror.bon_numero.as_deref(), Some("BL-2024-0042"));
        assert_eq!(mirror.source_warehouse, Some(StockCategory::DepotVrac));
        assert_eq!(mirror.destination_warehouse, None);
    }

    #[test]
    fn test_entree_from_tracked_warehouse_is_mirrored() {
        let mut entree = fixtures::entree("2024-01-10", dec!(12));
        entree.category = StockCategory::Consignes;
        entree.source_warehouse = Some(StockCategory::BouteillesNeuves);

        let mirror = mirror_of(&entree).unwrap();
        assert_eq!(mirror.movement_type, gazstock_shared::types::MovementType::Sortie);
        assert_eq!(mirror.category, StockCategory::BouteillesNeuves);
        assert_eq!(mirror.source_warehouse, None);
        assert_eq!(mirror.destination_warehouse, Some(StockCategory::Consignes));
    }

    #[test]
    fn test_plain_movements_are_not_mirrored() {
        let sortie = fixtures::sortie("2024-01-10", dec!(30));
        assert!(mirror_of(&sortie).is_none());

        let inventaire = fixtures::inventaire("2024-01-10", dec!(55));
        assert!(mirror_of(&inventaire).is_none());
    }

    #[test]
    fn test_untracked_warehouse_is_not_mirrored() {
        let mut sortie = fixtures::sortie("2024-01-10", dec!(30));
        sortie.destination_warehouse = Some(StockCategory::ParcCe);
        assert!(mirror_of(&sortie).is_none());
    }

    #[test]
    fn test_warehouse_on_the_wrong_side_is_not_mirrored() {
        // A sortie only transfers via its destination; its source field is
        // informational.
        let mut sortie = fixtures::sortie("2024-01-10", dec!(30));
        sortie.source_warehouse = Some(StockCategory::CentreEmplisseur);
        assert!(mirror_of(&sortie).is_none());
    }

    #[test]
    fn test_mirror_never_carries_a_count() {
        let mut sortie = fixtures::sortie("2024-01-10", dec!(30));
        sortie.category = StockCategory::DepotVrac;
        sortie.destination_warehouse = Some(StockCategory::CentreEmplisseur);
        sortie.justification_ecart = Some("should not propagate".to_string());

        let mirror = mirror_of(&sortie).unwrap();
        assert_eq!(mirror.stock_reel, None);
        assert_eq!(mirror.justification_ecart, None);
    }
}
