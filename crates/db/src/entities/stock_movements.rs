//! `SeaORM` Entity for the `stock_movements` table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use gazstock_core::ledger::Movement;
use gazstock_shared::types::MovementId;

use super::sea_orm_active_enums::{BottleType, MovementType, StockCategory, StockClient, StockSite};

/// One row of the append-only movement log.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    /// Primary key (time-ordered UUID v7).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Calendar day of the event.
    pub date: Date,
    /// Stock-holding classification.
    pub category: StockCategory,
    /// Plant site.
    pub site: StockSite,
    /// Bottle format.
    pub bottle_type: BottleType,
    /// Client attribution; NULL means unattributed.
    pub client: Option<StockClient>,
    /// Kind of stock event.
    pub movement_type: MovementType,
    /// Moved quantity.
    pub quantity: Decimal,
    /// Physically counted quantity (inventaires only).
    pub stock_reel: Option<Decimal>,
    /// Variance captured at count time (inventaires only).
    pub ecart: Option<Decimal>,
    /// Theoretical stock snapshot at save time (audit only).
    pub stock_theorique: Option<Decimal>,
    /// Transfer source warehouse.
    pub source_warehouse: Option<StockCategory>,
    /// Transfer destination warehouse.
    pub destination_warehouse: Option<StockCategory>,
    /// Paired mirror movement.
    pub linked_movement_id: Option<Uuid>,
    /// Free-text delivery note reference.
    pub bon_numero: Option<String>,
    /// Operator explanation for a count variance.
    pub justification_ecart: Option<String>,
    /// Who last touched the row.
    pub last_modified_by: Option<String>,
    /// When the row was last touched.
    pub last_modified_at: Option<DateTimeWithTimeZone>,
    /// Insertion timestamp; secondary replay order after `date`.
    pub created_at: DateTimeWithTimeZone,
    /// Row update timestamp (trigger-maintained).
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Self-reference to the paired mirror movement.
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::LinkedMovementId",
        to = "Column::Id"
    )]
    LinkedMovement,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into the pure domain movement used by the
    /// calculator.
    #[must_use]
    pub fn into_domain(self) -> Movement {
        Movement {
            id: MovementId::from_uuid(self.id),
            date: self.date,
            category: self.category.into(),
            site: self.site.into(),
            bottle_type: self.bottle_type.into(),
            client: self.client.map(Into::into),
            movement_type: self.movement_type.into(),
            quantity: self.quantity,
            stock_reel: self.stock_reel,
            ecart: self.ecart,
            stock_theorique: self.stock_theorique,
            source_warehouse: self.source_warehouse.map(Into::into),
            destination_warehouse: self.destination_warehouse.map(Into::into),
            linked_movement_id: self.linked_movement_id.map(MovementId::from_uuid),
            bon_numero: self.bon_numero,
            justification_ecart: self.justification_ecart,
            last_modified_by: self.last_modified_by,
            last_modified_at: self.last_modified_at.map(|t| t.with_timezone(&Utc)),
            created_at: self.created_at.with_timezone(&Utc),
        }
    }
}

impl ActiveModel {
    /// Builds an insertable row from a domain movement.
    ///
    /// `created_at`/`updated_at` are stamped here, not taken from the
    /// domain value, so insertion order in the database is authoritative.
    #[must_use]
    pub fn from_domain(movement: &Movement) -> Self {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Self {
            id: Set(movement.id.into_inner()),
            date: Set(movement.date),
            category: Set(movement.category.into()),
            site: Set(movement.site.into()),
            bottle_type: Set(movement.bottle_type.into()),
            client: Set(movement.client.map(Into::into)),
            movement_type: Set(movement.movement_type.into()),
            quantity: Set(movement.quantity),
            stock_reel: Set(movement.stock_reel),
            ecart: Set(movement.ecart),
            stock_theorique: Set(movement.stock_theorique),
            source_warehouse: Set(movement.source_warehouse.map(Into::into)),
            destination_warehouse: Set(movement.destination_warehouse.map(Into::into)),
            linked_movement_id: Set(movement.linked_movement_id.map(MovementId::into_inner)),
            bon_numero: Set(movement.bon_numero.clone()),
            justification_ecart: Set(movement.justification_ecart.clone()),
            last_modified_by: Set(movement.last_modified_by.clone()),
            last_modified_at: Set(movement.last_modified_at.map(Into::into)),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
