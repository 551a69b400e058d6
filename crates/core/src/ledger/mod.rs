//! Stock ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Movement and ledger-key domain types
//! - Theoretical stock replay and consolidated states
//! - Mirror construction for inter-warehouse transfers
//! - Pre-write validation of new movements
//! - Discrepancy detection on physical counts
//! - Error types for ledger operations

pub mod calculator;
pub mod discrepancy;
pub mod error;
pub mod mirror;
pub mod movement;
pub mod types;
pub mod validation;

#[cfg(test)]
mod calculator_props;
#[cfg(test)]
pub(crate) mod fixtures;

pub use calculator::{all_states, consolidated_state, theoretical_stock};
pub use discrepancy::significant;
pub use error::LedgerError;
pub use mirror::{TRACKED_WAREHOUSES, is_tracked_warehouse, mirror_of};
pub use movement::{LedgerKey, Movement};
pub use types::{NewMovement, StockState};
pub use validation::validate_new_movement;
