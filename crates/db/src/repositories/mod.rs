//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod movement;
pub mod stock;

#[cfg(test)]
mod stock_integration_tests;

pub use movement::{MovementError, MovementFilter, MovementRepository, MovementUpdate};
pub use stock::{
    BrokenLink, DeleteOutcome, LinkAnalysis, ReconcileReport, SavedMovement, StockError,
    StockRepository, analyze_links,
};
