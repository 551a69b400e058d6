//! Movement store: append-only persistence of the movement log.
//!
//! This is the only module that talks to the `stock_movements` table
//! directly. Reads come back newest-first (date, then insertion order);
//! the calculator re-sorts ascending for replay.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use gazstock_core::ledger::Movement;
use gazstock_shared::types::{
    BottleType, MovementType, PageRequest, StockCategory, StockClient, StockSite,
};

use crate::entities::stock_movements;

/// Error types for movement store operations.
#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    /// Movement not found.
    #[error("Movement not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Explicit optional-field filter for movement queries.
///
/// Every field is optional; absent means "do not filter". The client field
/// is tri-state: `None` ignores attribution, `Some(None)` selects only
/// unattributed rows, `Some(Some(c))` selects one client.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Filter by stock category.
    pub category: Option<StockCategory>,
    /// Filter by plant site.
    pub site: Option<StockSite>,
    /// Filter by bottle format.
    pub bottle_type: Option<BottleType>,
    /// Filter by client attribution (tri-state, see type docs).
    pub client: Option<Option<StockClient>>,
    /// Filter by movement kind.
    pub movement_type: Option<MovementType>,
    /// Inclusive lower date bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub date_to: Option<NaiveDate>,
}

/// Partial update of a movement row.
///
/// Present fields are written, absent fields are left untouched. The
/// `linked_movement_id` field is doubly optional so a link can be set or
/// cleared.
#[derive(Debug, Clone, Default)]
pub struct MovementUpdate {
    /// New event date.
    pub date: Option<NaiveDate>,
    /// New movement kind.
    pub movement_type: Option<MovementType>,
    /// New quantity.
    pub quantity: Option<Decimal>,
    /// New counted quantity.
    pub stock_reel: Option<Decimal>,
    /// New source warehouse.
    pub source_warehouse: Option<Option<StockCategory>>,
    /// New destination warehouse.
    pub destination_warehouse: Option<Option<StockCategory>>,
    /// New mirror link; `Some(None)` clears it.
    pub linked_movement_id: Option<Option<Uuid>>,
    /// New delivery note reference.
    pub bon_numero: Option<String>,
    /// New variance explanation.
    pub justification_ecart: Option<String>,
    /// Who is making the change.
    pub last_modified_by: Option<String>,
}

/// Repository over the append-only movement log.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends a movement to the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn append(&self, movement: &Movement) -> Result<stock_movements::Model, MovementError> {
        let row = stock_movements::ActiveModel::from_domain(movement)
            .insert(&self.db)
            .await?;
        Ok(row)
    }

    /// Appends a movement on an arbitrary connection (used inside the
    /// mirror transaction).
    pub(crate) async fn append_on<C: ConnectionTrait>(
        conn: &C,
        movement: &Movement,
    ) -> Result<stock_movements::Model, DbErr> {
        stock_movements::ActiveModel::from_domain(movement)
            .insert(conn)
            .await
    }

    /// Queries movements matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn query(
        &self,
        filter: &MovementFilter,
    ) -> Result<Vec<stock_movements::Model>, MovementError> {
        let rows = Self::filtered(filter)
            .order_by_desc(stock_movements::Column::Date)
            .order_by_desc(stock_movements::Column::CreatedAt)
            .order_by_desc(stock_movements::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Queries one page of movements plus the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn query_paginated(
        &self,
        filter: &MovementFilter,
        page: PageRequest,
    ) -> Result<(Vec<stock_movements::Model>, u64), MovementError> {
        let total = Self::filtered(filter).count(&self.db).await?;

        let rows = Self::filtered(filter)
            .order_by_desc(stock_movements::Column::Date)
            .order_by_desc(stock_movements::Column::CreatedAt)
            .order_by_desc(stock_movements::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Finds a movement by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<stock_movements::Model>, MovementError> {
        let row = stock_movements::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row)
    }

    /// Applies a partial update and refreshes the audit timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement does not exist or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        update: MovementUpdate,
    ) -> Result<stock_movements::Model, MovementError> {
        let row = stock_movements::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(MovementError::NotFound(id))?;

        let mut active: stock_movements::ActiveModel = row.into();

        if let Some(date) = update.date {
            active.date = Set(date);
        }
        if let Some(movement_type) = update.movement_type {
            active.movement_type = Set(movement_type.into());
        }
        if let Some(quantity) = update.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(stock_reel) = update.stock_reel {
            active.stock_reel = Set(Some(stock_reel));
        }
        if let Some(source_warehouse) = update.source_warehouse {
            active.source_warehouse = Set(source_warehouse.map(Into::into));
        }
        if let Some(destination_warehouse) = update.destination_warehouse {
            active.destination_warehouse = Set(destination_warehouse.map(Into::into));
        }
        if let Some(linked_movement_id) = update.linked_movement_id {
            active.linked_movement_id = Set(linked_movement_id);
        }
        if let Some(bon_numero) = update.bon_numero {
            active.bon_numero = Set(Some(bon_numero));
        }
        if let Some(justification_ecart) = update.justification_ecart {
            active.justification_ecart = Set(Some(justification_ecart));
        }
        if let Some(actor) = update.last_modified_by {
            active.last_modified_by = Set(Some(actor));
        }
        active.last_modified_at = Set(Some(Utc::now().into()));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a movement. Returns whether a row was actually removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, MovementError> {
        let result = stock_movements::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Builds the filtered select for `query`/`query_paginated`.
    fn filtered(filter: &MovementFilter) -> sea_orm::Select<stock_movements::Entity> {
        let mut query = stock_movements::Entity::find();

        if let Some(category) = filter.category {
            query = query.filter(
                stock_movements::Column::Category
                    .eq(crate::entities::sea_orm_active_enums::StockCategory::from(category)),
            );
        }
        if let Some(site) = filter.site {
            query = query.filter(
                stock_movements::Column::Site
                    .eq(crate::entities::sea_orm_active_enums::StockSite::from(site)),
            );
        }
        if let Some(bottle_type) = filter.bottle_type {
            query = query.filter(
                stock_movements::Column::BottleType
                    .eq(crate::entities::sea_orm_active_enums::BottleType::from(bottle_type)),
            );
        }
        if let Some(client) = filter.client {
            match client {
                Some(client) => {
                    query = query.filter(
                        stock_movements::Column::Client
                            .eq(crate::entities::sea_orm_active_enums::StockClient::from(client)),
                    );
                }
                None => {
                    query = query.filter(stock_movements::Column::Client.is_null());
                }
            }
        }
        if let Some(movement_type) = filter.movement_type {
            query = query.filter(
                stock_movements::Column::MovementType
                    .eq(crate::entities::sea_orm_active_enums::MovementType::from(movement_type)),
            );
        }
        if let Some(from) = filter.date_from {
            query = query.filter(stock_movements::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(stock_movements::Column::Date.lte(to));
        }

        query
    }
}
