//! Stock repository: movement persistence orchestration and ledger reads.
//!
//! Writes go through [`StockRepository::save_movement`], which snapshots
//! the theoretical stock, derives the ecart on counts, and creates the
//! mirror record for inter-warehouse transfers. Reads always replay the
//! committed log through the pure calculator - nothing here caches a
//! balance.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use gazstock_core::ledger::{
    self, LedgerError, LedgerKey, Movement, NewMovement, StockState,
};
use gazstock_core::summary::{self, StockSummary};
use gazstock_shared::AppError;
use gazstock_shared::types::MovementId;

use crate::entities::stock_movements;

use super::movement::{MovementError, MovementFilter, MovementRepository, MovementUpdate};

/// Error types for stock operations.
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    /// The movement failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] LedgerError),

    /// Movement not found.
    #[error("Movement not found: {0}")]
    NotFound(Uuid),

    /// The mirror step failed after the primary movement was committed.
    ///
    /// The primary stays committed un-mirrored; retry or run the
    /// reconciliation sweep.
    #[error("Mirror write failed after movement {primary_id} was committed: {source}")]
    MirrorWrite {
        /// ID of the committed, un-mirrored primary movement.
        primary_id: Uuid,
        /// The underlying database failure.
        #[source]
        source: DbErr,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<MovementError> for StockError {
    fn from(value: MovementError) -> Self {
        match value {
            MovementError::NotFound(id) => Self::NotFound(id),
            MovementError::Database(err) => Self::Database(err),
        }
    }
}

impl From<StockError> for AppError {
    fn from(value: StockError) -> Self {
        match value {
            StockError::Validation(err) => Self::Validation(err.to_string()),
            StockError::NotFound(id) => Self::NotFound(format!("movement {id}")),
            err @ StockError::MirrorWrite { .. } => Self::Conflict(err.to_string()),
            StockError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SavedMovement {
    /// The persisted movement, back-linked if a mirror was created.
    pub movement: stock_movements::Model,
    /// The mirror record, when the movement was a tracked transfer.
    pub mirror: Option<stock_movements::Model>,
}

/// Result of a delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    /// The deleted movement.
    pub deleted_id: Uuid,
    /// The linked row that was also removed, if any.
    pub linked_deleted_id: Option<Uuid>,
    /// False when a requested cascade could not remove the linked row; the
    /// primary delete still went through.
    pub cascade_complete: bool,
}

/// A link whose far side does not point back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    /// The movement holding the one-directional link.
    pub movement_id: Uuid,
    /// The row it points at.
    pub target_id: Uuid,
}

/// Result of a reconciliation sweep over mirror links.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Links whose missing back-reference was restored.
    pub repaired: Vec<BrokenLink>,
    /// Links pointing at rows that no longer exist.
    pub dangling: Vec<BrokenLink>,
    /// Links whose target points at a different row; needs manual review.
    pub conflicting: Vec<BrokenLink>,
}

/// Static classification of the link graph.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LinkAnalysis {
    /// One-directional links where the target has no link at all; the
    /// back-reference can be restored mechanically.
    pub repairable: Vec<BrokenLink>,
    /// Links pointing at missing rows.
    pub dangling: Vec<BrokenLink>,
    /// Links whose target points elsewhere.
    pub conflicting: Vec<BrokenLink>,
}

/// Classifies every stored link as consistent, repairable, dangling, or
/// conflicting.
///
/// Pure function over `(id, linked_movement_id)` pairs so the sweep logic
/// is testable without a database.
#[must_use]
pub fn analyze_links(links: &[(Uuid, Option<Uuid>)]) -> LinkAnalysis {
    let by_id: HashMap<Uuid, Option<Uuid>> = links.iter().copied().collect();
    let mut analysis = LinkAnalysis::default();

    for (movement_id, target_id) in links.iter().filter_map(|(id, link)| link.map(|l| (*id, l))) {
        let broken = BrokenLink {
            movement_id,
            target_id,
        };
        match by_id.get(&target_id) {
            None => analysis.dangling.push(broken),
            Some(None) => analysis.repairable.push(broken),
            Some(Some(back)) if *back == movement_id => {}
            Some(Some(_)) => analysis.conflicting.push(broken),
        }
    }

    analysis
}

/// Repository orchestrating movement writes and ledger reads.
#[derive(Debug, Clone)]
pub struct StockRepository {
    db: DatabaseConnection,
    movements: MovementRepository,
}

impl StockRepository {
    /// Creates a new stock repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let movements = MovementRepository::new(db.clone());
        Self { db, movements }
    }

    /// Returns the underlying movement store.
    #[must_use]
    pub const fn movements(&self) -> &MovementRepository {
        &self.movements
    }

    /// Validates, snapshots, and persists a movement; mirrors tracked
    /// inter-warehouse transfers.
    ///
    /// The theoretical stock of the movement's partition as of its date is
    /// stored on the row as an audit snapshot. On an inventaire, the ecart
    /// (counted minus theoretical) is derived from that same snapshot.
    ///
    /// The mirror insert and the primary's back-link share one database
    /// transaction, but the primary commit does not: a mirror failure
    /// surfaces as [`StockError::MirrorWrite`] with the primary already
    /// committed un-mirrored.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Validation`] before any write,
    /// [`StockError::MirrorWrite`] after the primary committed, or
    /// [`StockError::Database`].
    pub async fn save_movement(
        &self,
        input: NewMovement,
        actor: &str,
    ) -> Result<SavedMovement, StockError> {
        ledger::validate_new_movement(&input)?;

        let key = input.key();
        let snapshot = self.theoretical_stock(&key, Some(input.date)).await?;

        let ecart = match input.stock_reel {
            Some(stock_reel) if input.movement_type == gazstock_shared::types::MovementType::Inventaire => {
                Some(stock_reel - snapshot)
            }
            _ => None,
        };

        let primary_domain = input.into_movement(MovementId::new(), snapshot, ecart, actor);
        let mut primary = self.movements.append(&primary_domain).await?;

        let Some(mirror_input) = ledger::mirror_of(&primary_domain) else {
            return Ok(SavedMovement {
                movement: primary,
                mirror: None,
            });
        };

        // The mirror lives in another partition; snapshot that one too.
        let mirror_key = mirror_input.key();
        let mirror_snapshot = self
            .theoretical_stock(&mirror_key, Some(mirror_input.date))
            .await
            .map_err(|err| Self::mirror_failure(primary.id, err))?;

        let mut mirror_domain =
            mirror_input.into_movement(MovementId::new(), mirror_snapshot, None, actor);
        mirror_domain.linked_movement_id = Some(MovementId::from_uuid(primary.id));

        let mirror = self
            .write_mirror(primary.id, &mirror_domain)
            .await
            .map_err(|source| {
                warn!(
                    primary_id = %primary.id,
                    error = %source,
                    "mirror write failed; primary committed un-mirrored"
                );
                StockError::MirrorWrite {
                    primary_id: primary.id,
                    source,
                }
            })?;

        primary.linked_movement_id = Some(mirror.id);

        Ok(SavedMovement {
            movement: primary,
            mirror: Some(mirror),
        })
    }

    /// Inserts the mirror and back-patches the primary in one transaction.
    async fn write_mirror(
        &self,
        primary_id: Uuid,
        mirror_domain: &Movement,
    ) -> Result<stock_movements::Model, DbErr> {
        let txn = self.db.begin().await?;

        let mirror = MovementRepository::append_on(&txn, mirror_domain).await?;

        let backlink = stock_movements::ActiveModel {
            id: Set(primary_id),
            linked_movement_id: Set(Some(mirror.id)),
            ..Default::default()
        };
        backlink.update(&txn).await?;

        txn.commit().await?;
        Ok(mirror)
    }

    fn mirror_failure(primary_id: Uuid, err: StockError) -> StockError {
        match err {
            StockError::Database(source) => StockError::MirrorWrite { primary_id, source },
            other => other,
        }
    }

    /// Applies a partial update to a movement.
    ///
    /// Quantity edits do NOT propagate to an existing mirror; the pair must
    /// be corrected manually when a transfer changes after the fact.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the movement is missing, or
    /// the update fails.
    pub async fn update_movement(
        &self,
        id: Uuid,
        mut update: MovementUpdate,
        actor: &str,
    ) -> Result<stock_movements::Model, StockError> {
        if update.quantity.is_some_and(|q| q < Decimal::ZERO) {
            return Err(LedgerError::NegativeQuantity.into());
        }

        update.last_modified_by = Some(actor.to_string());
        let updated = self.movements.update(id, update).await?;
        Ok(updated)
    }

    /// Deletes a movement, cascading over its mirror by default.
    ///
    /// With `cascade`, the linked row goes first, best-effort: if it cannot
    /// be removed the primary delete still proceeds and the outcome says
    /// the cascade did not complete. Without `cascade`, the mirror is left
    /// behind with a dangling link, a valid state for manual correction.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement does not exist or the primary
    /// delete fails.
    pub async fn delete_movement(
        &self,
        id: Uuid,
        cascade: bool,
    ) -> Result<DeleteOutcome, StockError> {
        let row = self
            .movements
            .find_by_id(id)
            .await?
            .ok_or(StockError::NotFound(id))?;

        let mut linked_deleted_id = None;
        let mut cascade_complete = true;

        if cascade && let Some(target) = row.linked_movement_id {
            match self.movements.delete(target).await {
                Ok(true) => linked_deleted_id = Some(target),
                Ok(false) => cascade_complete = false,
                Err(err) => {
                    warn!(
                        movement_id = %id,
                        linked_id = %target,
                        error = %err,
                        "cascade delete of linked movement failed"
                    );
                    cascade_complete = false;
                }
            }
        }

        if !self.movements.delete(id).await? {
            return Err(StockError::NotFound(id));
        }

        Ok(DeleteOutcome {
            deleted_id: id,
            linked_deleted_id,
            cascade_complete,
        })
    }

    /// Computes the theoretical stock of one partition, optionally as of a
    /// date.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the movement log fails.
    pub async fn theoretical_stock(
        &self,
        key: &LedgerKey,
        as_of: Option<NaiveDate>,
    ) -> Result<Decimal, StockError> {
        let movements = self.load_partition(key).await?;
        Ok(ledger::theoretical_stock(&movements, key, as_of))
    }

    /// Computes the consolidated state of one partition.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the movement log fails.
    pub async fn consolidated_state(&self, key: &LedgerKey) -> Result<StockState, StockError> {
        let movements = self.load_partition(key).await?;
        Ok(ledger::consolidated_state(&movements, key))
    }

    /// Computes one consolidated state per partition present in the log.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the movement log fails.
    pub async fn all_states(&self) -> Result<Vec<StockState>, StockError> {
        let movements = self.load_all().await?;
        Ok(ledger::all_states(&movements))
    }

    /// Rolls the log up into a period summary.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the movement log fails.
    pub async fn summary(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<StockSummary, StockError> {
        // Full history on purpose: the summary windows flows itself and
        // needs every movement for the point-in-time balances.
        let movements = self.load_all().await?;
        Ok(summary::summary(&movements, start, end))
    }

    /// Returns the consolidated states whose count variance is at or above
    /// the threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the movement log fails.
    pub async fn significant_discrepancies(
        &self,
        threshold: Decimal,
    ) -> Result<Vec<StockState>, StockError> {
        let states = self.all_states().await?;
        Ok(ledger::significant(&states, threshold))
    }

    /// Sweeps the link graph for one-directional mirror links.
    ///
    /// Repairs the back-reference when the far side carries no link, and
    /// reports links that are dangling (target deleted) or conflicting
    /// (target linked elsewhere) for manual review.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep queries or repairs fail.
    pub async fn reconcile_links(&self) -> Result<ReconcileReport, StockError> {
        let links: Vec<(Uuid, Option<Uuid>)> = stock_movements::Entity::find()
            .select_only()
            .column(stock_movements::Column::Id)
            .column(stock_movements::Column::LinkedMovementId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let analysis = analyze_links(&links);
        let mut report = ReconcileReport {
            repaired: Vec::with_capacity(analysis.repairable.len()),
            dangling: analysis.dangling,
            conflicting: analysis.conflicting,
        };

        for link in analysis.repairable {
            let backlink = stock_movements::ActiveModel {
                id: Set(link.target_id),
                linked_movement_id: Set(Some(link.movement_id)),
                ..Default::default()
            };
            backlink.update(&self.db).await?;
            report.repaired.push(link);
        }

        Ok(report)
    }

    /// Loads one partition's movements.
    ///
    /// A clientless key loads the whole line regardless of attribution,
    /// matching the calculator's "filter on client only when given" rule.
    async fn load_partition(&self, key: &LedgerKey) -> Result<Vec<Movement>, StockError> {
        let filter = MovementFilter {
            category: Some(key.category),
            site: Some(key.site),
            bottle_type: Some(key.bottle_type),
            client: key.client.map(Some),
            ..MovementFilter::default()
        };
        let rows = self.movements.query(&filter).await?;
        Ok(rows.into_iter().map(stock_movements::Model::into_domain).collect())
    }

    /// Loads the full movement log.
    async fn load_all(&self) -> Result<Vec<Movement>, StockError> {
        let rows = self.movements.query(&MovementFilter::default()).await?;
        Ok(rows.into_iter().map(stock_movements::Model::into_domain).collect())
    }
}
