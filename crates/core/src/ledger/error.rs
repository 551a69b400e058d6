//! Ledger error types.
//!
//! All variants are validation failures raised before any write; the
//! calculation functions themselves are total and never error.

use thiserror::Error;

use gazstock_shared::types::StockCategory;

/// Errors that can occur while validating a movement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Quantity cannot be negative.
    #[error("Quantity cannot be negative")]
    NegativeQuantity,

    /// Entree and sortie movements must move something.
    #[error("Quantity must be greater than zero for an entree or sortie")]
    ZeroQuantity,

    /// An inventaire must carry the physically counted quantity.
    #[error("An inventaire requires the counted quantity (stock_reel)")]
    MissingStockReel,

    /// A transfer names a category outside the tracked warehouse set.
    #[error("'{0}' is not a tracked warehouse")]
    UnrecognizedWarehouse(StockCategory),

    /// A transfer cannot name its own category as the counterpart.
    #[error("A transfer cannot name its own category as source or destination")]
    TransferToSelf,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeQuantity => "NEGATIVE_QUANTITY",
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::MissingStockReel => "MISSING_STOCK_REEL",
            Self::UnrecognizedWarehouse(_) => "UNRECOGNIZED_WAREHOUSE",
            Self::TransferToSelf => "TRANSFER_TO_SELF",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::NegativeQuantity.error_code(), "NEGATIVE_QUANTITY");
        assert_eq!(LedgerError::MissingStockReel.error_code(), "MISSING_STOCK_REEL");
        assert_eq!(
            LedgerError::UnrecognizedWarehouse(StockCategory::ParcCe).error_code(),
            "UNRECOGNIZED_WAREHOUSE"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LedgerError::UnrecognizedWarehouse(StockCategory::ParcCe).to_string(),
            "'parc_ce' is not a tracked warehouse"
        );
        assert_eq!(
            LedgerError::MissingStockReel.to_string(),
            "An inventaire requires the counted quantity (stock_reel)"
        );
    }
}
