//! Movement and ledger-key domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gazstock_shared::types::{
    BottleType, MovementId, MovementType, StockCategory, StockClient, StockSite,
};

/// One dated stock event in the append-only movement log.
///
/// Exactly one of the three movement-type semantics applies per row:
/// entree/sortie carry `quantity`, an inventaire carries `stock_reel` (the
/// physically counted quantity) plus the `ecart` captured when the count was
/// taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    /// Unique identifier (time-ordered UUID v7).
    pub id: MovementId,
    /// Calendar day of the event.
    pub date: NaiveDate,
    /// Stock-holding classification.
    pub category: StockCategory,
    /// Plant site.
    pub site: StockSite,
    /// Bottle format.
    pub bottle_type: BottleType,
    /// Client attribution; `None` means unattributed stock.
    pub client: Option<StockClient>,
    /// Kind of stock event.
    pub movement_type: MovementType,
    /// Moved quantity; meaningful for entree/sortie, zero on inventaires.
    pub quantity: Decimal,
    /// Physically counted quantity; only on inventaires.
    pub stock_reel: Option<Decimal>,
    /// stock_reel minus theoretical stock at count time; only on inventaires.
    /// Captured once at save time, never recomputed during replay.
    pub ecart: Option<Decimal>,
    /// Theoretical stock snapshot taken when the row was saved. Audit trail
    /// only - replay never reads it back.
    pub stock_theorique: Option<Decimal>,
    /// Warehouse the stock came from, for inter-warehouse transfers.
    pub source_warehouse: Option<StockCategory>,
    /// Warehouse the stock went to, for inter-warehouse transfers.
    pub destination_warehouse: Option<StockCategory>,
    /// Paired mirror movement, once the transfer has been mirrored.
    pub linked_movement_id: Option<MovementId>,
    /// Free-text delivery note reference.
    pub bon_numero: Option<String>,
    /// Operator explanation for a count variance.
    pub justification_ecart: Option<String>,
    /// Who last touched the row (from the identity collaborator).
    pub last_modified_by: Option<String>,
    /// When the row was last touched.
    pub last_modified_at: Option<DateTime<Utc>>,
    /// Insertion timestamp; secondary replay order after `date`.
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Returns the ledger partition this movement belongs to.
    #[must_use]
    pub const fn key(&self) -> LedgerKey {
        LedgerKey {
            category: self.category,
            site: self.site,
            bottle_type: self.bottle_type,
            client: self.client,
        }
    }
}

/// Composite identity of one independent stock line.
///
/// Movements are partitioned by key; balance calculations never mix
/// unrelated keys. A key without a client matches movements regardless of
/// their attribution; a key with a client matches that client exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LedgerKey {
    /// Stock-holding classification.
    pub category: StockCategory,
    /// Plant site.
    pub site: StockSite,
    /// Bottle format.
    pub bottle_type: BottleType,
    /// Client attribution; `None` matches every client.
    pub client: Option<StockClient>,
}

impl LedgerKey {
    /// Creates an unattributed key.
    #[must_use]
    pub const fn new(category: StockCategory, site: StockSite, bottle_type: BottleType) -> Self {
        Self {
            category,
            site,
            bottle_type,
            client: None,
        }
    }

    /// Creates a client-attributed key.
    #[must_use]
    pub const fn for_client(
        category: StockCategory,
        site: StockSite,
        bottle_type: BottleType,
        client: StockClient,
    ) -> Self {
        Self {
            category,
            site,
            bottle_type,
            client: Some(client),
        }
    }

    /// Whether a movement belongs to this key.
    ///
    /// The client component filters only when given.
    #[must_use]
    pub fn matches(&self, movement: &Movement) -> bool {
        movement.category == self.category
            && movement.site == self.site
            && movement.bottle_type == self.bottle_type
            && self.client.is_none_or(|c| movement.client == Some(c))
    }
}

impl std::fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.client {
            Some(client) => write!(
                f,
                "{}/{}/{}/{}",
                self.category, self.site, self.bottle_type, client
            ),
            None => write!(f, "{}/{}/{}", self.category, self.site, self.bottle_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::fixtures;
    use rust_decimal_macros::dec;

    #[test]
    fn test_key_matches_same_partition() {
        let movement = fixtures::entree("2024-01-10", dec!(100));
        assert!(movement.key().matches(&movement));
    }

    #[test]
    fn test_key_rejects_other_bottle_type() {
        let movement = fixtures::entree("2024-01-10", dec!(100));
        let mut key = movement.key();
        key.bottle_type = BottleType::B38;
        assert!(!key.matches(&movement));
    }

    #[test]
    fn test_clientless_key_matches_any_client() {
        let mut movement = fixtures::entree("2024-01-10", dec!(100));
        movement.client = Some(StockClient::VivoEnergy);

        let key = LedgerKey::new(movement.category, movement.site, movement.bottle_type);
        assert!(key.matches(&movement));
    }

    #[test]
    fn test_client_key_requires_exact_client() {
        let mut movement = fixtures::entree("2024-01-10", dec!(100));
        movement.client = None;

        let key = LedgerKey::for_client(
            movement.category,
            movement.site,
            movement.bottle_type,
            StockClient::PetroIvoire,
        );
        assert!(!key.matches(&movement));

        movement.client = Some(StockClient::PetroIvoire);
        assert!(key.matches(&movement));
    }

    #[test]
    fn test_display_includes_client_when_present() {
        let key = LedgerKey::for_client(
            StockCategory::DepotVrac,
            StockSite::DepotVrac,
            BottleType::B12,
            StockClient::TotalEnergies,
        );
        assert_eq!(key.to_string(), "depot_vrac/depot_vrac/b12/total_energies");
    }
}
