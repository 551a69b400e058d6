//! Discrepancy detection on physical counts.

use rust_decimal::Decimal;

use super::types::StockState;

/// Keeps the states whose count variance is at or above the threshold.
///
/// Both the ecart and the counted quantity must be present: a partition that
/// was never counted is not evidence of a discrepancy.
#[must_use]
pub fn significant(states: &[StockState], threshold: Decimal) -> Vec<StockState> {
    states
        .iter()
        .filter(|state| {
            state.stock_reel.is_some()
                && state.ecart.is_some_and(|ecart| ecart.abs() >= threshold)
        })
        .cloned()
        .collect()
}
