//! Input and derived types for ledger operations.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gazstock_shared::types::{
    BottleType, MovementId, MovementType, StockCategory, StockClient, StockSite,
};

use super::movement::{LedgerKey, Movement};

/// Input for recording a new movement, before validation and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMovement {
    /// Calendar day of the event.
    pub date: NaiveDate,
    /// Stock-holding classification.
    pub category: StockCategory,
    /// Plant site.
    pub site: StockSite,
    /// Bottle format.
    pub bottle_type: BottleType,
    /// Client attribution.
    pub client: Option<StockClient>,
    /// Kind of stock event.
    pub movement_type: MovementType,
    /// Moved quantity; must be positive for entree/sortie.
    #[serde(default)]
    pub quantity: Decimal,
    /// Physically counted quantity; required for inventaires.
    pub stock_reel: Option<Decimal>,
    /// Warehouse the stock came from.
    pub source_warehouse: Option<StockCategory>,
    /// Warehouse the stock went to.
    pub destination_warehouse: Option<StockCategory>,
    /// Free-text delivery note reference.
    pub bon_numero: Option<String>,
    /// Operator explanation for a count variance.
    pub justification_ecart: Option<String>,
}

impl NewMovement {
    /// Returns the ledger partition this movement will belong to.
    #[must_use]
    pub const fn key(&self) -> LedgerKey {
        LedgerKey {
            category: self.category,
            site: self.site,
            bottle_type: self.bottle_type,
            client: self.client,
        }
    }

    /// Materializes the input into a full movement record.
    ///
    /// `stock_theorique` is the balance snapshot computed as of the
    /// movement's date; `ecart` is filled for inventaires only.
    #[must_use]
    pub fn into_movement(
        self,
        id: MovementId,
        stock_theorique: Decimal,
        ecart: Option<Decimal>,
        actor: &str,
    ) -> Movement {
        let now = Utc::now();
        Movement {
            id,
            date: self.date,
            category: self.category,
            site: self.site,
            bottle_type: self.bottle_type,
            client: self.client,
            movement_type: self.movement_type,
            quantity: self.quantity,
            stock_reel: self.stock_reel,
            ecart,
            stock_theorique: Some(stock_theorique),
            source_warehouse: self.source_warehouse,
            destination_warehouse: self.destination_warehouse,
            linked_movement_id: None,
            bon_numero: self.bon_numero,
            justification_ecart: self.justification_ecart,
            last_modified_by: Some(actor.to_string()),
            last_modified_at: Some(now),
            created_at: now,
        }
    }
}

/// Consolidated state of one ledger partition, derived from replay.
///
/// Never persisted as a source of truth: every query recomputes it from the
/// committed movement log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockState {
    /// Stock-holding classification.
    pub category: StockCategory,
    /// Plant site.
    pub site: StockSite,
    /// Bottle format.
    pub bottle_type: BottleType,
    /// Client attribution of the partition.
    pub client: Option<StockClient>,
    /// Baseline from the latest inventaire, zero if none exists.
    pub stock_initial: Decimal,
    /// Inflows accumulated since the baseline.
    pub cumul_entrees: Decimal,
    /// Outflows accumulated since the baseline.
    pub cumul_sorties: Decimal,
    /// stock_initial + cumul_entrees - cumul_sorties.
    pub stock_theorique: Decimal,
    /// Physically counted quantity of the latest inventaire.
    pub stock_reel: Option<Decimal>,
    /// Variance captured when that count was taken; read through verbatim.
    pub ecart: Option<Decimal>,
    /// Date of the latest inventaire.
    pub last_inventory_date: Option<NaiveDate>,
}

impl StockState {
    /// Returns the partition key of this state.
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
