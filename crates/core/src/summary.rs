//! Period roll-ups across all ledger partitions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gazstock_shared::types::{BottleType, MovementType, StockCategory, StockSite};

use crate::ledger::calculator::all_states;
use crate::ledger::movement::Movement;

/// Flow and balance totals for one summary bucket.
///
/// `entrees` and `sorties` are flow totals over the requested window;
/// `stock_theorique` is the current on-hand balance over the full history,
/// independent of the window. The summary deliberately answers "what moved
/// in this window" and "what is on hand now" together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTotals {
    /// Inflows within the window.
    pub entrees: Decimal,
    /// Outflows within the window.
    pub sorties: Decimal,
    /// Point-in-time balance over the full history.
    pub stock_theorique: Decimal,
}

/// Aggregate over a date window, bucketed three ways.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSummary {
    /// Human-readable window label.
    pub period: String,
    /// Inflows within the window, across all partitions.
    pub total_entrees: Decimal,
    /// Outflows within the window, across all partitions.
    pub total_sorties: Decimal,
    /// Sum of every partition's current balance (window-independent).
    pub total_stock_theorique: Decimal,
    /// Sum of absolute count variances recorded within the window.
    pub total_ecarts: Decimal,
    /// Totals per stock category.
    pub categories: BTreeMap<StockCategory, FlowTotals>,
    /// Totals per plant site.
    pub sites: BTreeMap<StockSite, FlowTotals>,
    /// Totals per bottle format.
    pub bottle_types: BTreeMap<BottleType, FlowTotals>,
}

fn period_label(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!("{start} - {end}"),
        (Some(start), None) => format!("Depuis {start}"),
        (None, Some(end)) => format!("Jusqu'à {end}"),
        (None, None) => "Toutes périodes".to_string(),
    }
}

fn in_window(movement: &Movement, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|s| movement.date >= s) && end.is_none_or(|e| movement.date <= e)
}

/// Rolls movements up into per-category, per-site, and per-bottle-type
/// totals for an inclusive date window.
///
/// Flows (and count variances) are accumulated over the window only.
/// Balances come from [`all_states`] over the FULL unfiltered history, so a
/// narrow window still reports today's on-hand stock.
#[must_use]
pub fn summary(
    movements: &[Movement],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> StockSummary {
    // Every bucket exists even when nothing moved, so consumers can index
    // unconditionally.
    let mut categories: BTreeMap<StockCategory, FlowTotals> = StockCategory::ALL
        .into_iter()
        .map(|c| (c, FlowTotals::default()))
        .collect();
    let mut sites: BTreeMap<StockSite, FlowTotals> = StockSite::ALL
        .into_iter()
        .map(|s| (s, FlowTotals::default()))
        .collect();
    let mut bottle_types: BTreeMap<BottleType, FlowTotals> = BottleType::ALL
        .into_iter()
        .map(|b| (b, FlowTotals::default()))
        .collect();

    let mut total_entrees = Decimal::ZERO;
    let mut total_sorties = Decimal::ZERO;
    let mut total_ecarts = Decimal::ZERO;

    for movement in movements.iter().filter(|m| in_window(m, start, end)) {
        match movement.movement_type {
            MovementType::Entree => {
                total_entrees += movement.quantity;
                if let Some(bucket) = categories.get_mut(&movement.category) {
                    bucket.entrees += movement.quantity;
                }
                if let Some(bucket) = sites.get_mut(&movement.site) {
                    bucket.entrees += movement.quantity;
                }
                if let Some(bucket) = bottle_types.get_mut(&movement.bottle_type) {
                    bucket.entrees += movement.quantity;
                }
            }
            MovementType::Sortie => {
                total_sorties += movement.quantity;
                if let Some(bucket) = categories.get_mut(&movement.category) {
                    bucket.sorties += movement.quantity;
                }
                if let Some(bucket) = sites.get_mut(&movement.site) {
                    bucket.sorties += movement.quantity;
                }
                if let Some(bucket) = bottle_types.get_mut(&movement.bottle_type) {
                    bucket.sorties += movement.quantity;
                }
            }
            MovementType::Inventaire => {}
        }

        if let Some(ecart) = movement.ecart {
            total_ecarts += ecart.abs();
        }
    }

    // Balances mix the full history in on purpose: "on hand now", not
    // "on hand within the window".
    let states = all_states(movements);
    let mut total_stock_theorique = Decimal::ZERO;
    for state in &states {
        total_stock_theorique += state.stock_theorique;
        if let Some(bucket) = categories.get_mut(&state.category) {
            bucket.stock_theorique += state.stock_theorique;
        }
        if let Some(bucket) = sites.get_mut(&state.site) {
            bucket.stock_theorique += state.stock_theorique;
        }
        if let Some(bucket) = bottle_types.get_mut(&state.bottle_type) {
            bucket.stock_theorique += state.stock_theorique;
        }
    }

    StockSummary {
        period: period_label(start, end),
        total_entrees,
        total_sorties,
        total_stock_theorique,
        total_ecarts,
        categories,
        sites,
        bottle_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::fixtures;
    use rust_decimal_macros::dec;

    use gazstock_shared::types::StockClient;

    #[test]
    fn test_empty_log_yields_zeroed_buckets() {
        let result = summary(&[], None, None);

        assert_eq!(result.period, "Toutes périodes");
        assert_eq!(result.total_entrees, Decimal::ZERO);
        assert_eq!(result.total_stock_theorique, Decimal::ZERO);
        assert_eq!(result.categories.len(), StockCategory::ALL.len());
        assert_eq!(result.sites.len(), StockSite::ALL.len());
        assert_eq!(result.bottle_types.len(), BottleType::ALL.len());
    }

    #[test]
    fn test_flows_accumulate_per_bucket() {
        let movements = vec![
            fixtures::entree("2024-01-05", dec!(100)),
            fixtures::sortie("2024-01-06", dec!(30)),
            fixtures::entree_for("2024-01-07", dec!(12), StockClient::VivoEnergy),
        ];

        let result = summary(&movements, None, None);
        assert_eq!(result.total_entrees, dec!(112));
        assert_eq!(result.total_sorties, dec!(30));

        let depot = &result.categories[&StockCategory::DepotVrac];
        assert_eq!(depot.entrees, dec!(112));
        assert_eq!(depot.sorties, dec!(30));

        let b12 = &result.bottle_types[&BottleType::B12];
        assert_eq!(b12.entrees, dec!(112));
    }

    #[test]
    fn test_window_is_inclusive_on_both_edges() {
        let movements = vec![
            fixtures::entree("2024-01-01", dec!(1)),
            fixtures::entree("2024-01-15", dec!(2)),
            fixtures::entree("2024-01-31", dec!(4)),
            fixtures::entree("2024-02-01", dec!(8)),
        ];

        let result = summary(
            &movements,
            Some(fixtures::date("2024-01-01")),
            Some(fixtures::date("2024-01-31")),
        );
        assert_eq!(result.total_entrees, dec!(7));
        assert_eq!(result.period, "2024-01-01 - 2024-01-31");
    }

    #[test]
    fn test_balances_ignore_the_window() {
        // The window covers January only, yet the balance reflects the
        // February outflow: flows are windowed, balances are not.
        let movements = vec![
            fixtures::entree("2024-01-10", dec!(100)),
            fixtures::sortie("2024-02-10", dec!(40)),
        ];

        let result = summary(
            &movements,
            Some(fixtures::date("2024-01-01")),
            Some(fixtures::date("2024-01-31")),
        );
        assert_eq!(result.total_entrees, dec!(100));
        assert_eq!(result.total_sorties, Decimal::ZERO);
        assert_eq!(result.total_stock_theorique, dec!(60));

        let depot = &result.categories[&StockCategory::DepotVrac];
        assert_eq!(depot.stock_theorique, dec!(60));
    }

    #[test]
    fn test_ecarts_sum_absolute_values_in_window() {
        let mut first = fixtures::inventaire("2024-01-10", dec!(95));
        first.ecart = Some(dec!(-5));
        let mut second = fixtures::inventaire("2024-02-10", dec!(102));
        second.ecart = Some(dec!(7));

        let movements = vec![first, second];

        let all = summary(&movements, None, None);
        assert_eq!(all.total_ecarts, dec!(12));

        let january = summary(
            &movements,
            Some(fixtures::date("2024-01-01")),
            Some(fixtures::date("2024-01-31")),
        );
        assert_eq!(january.total_ecarts, dec!(5));
    }

    #[test]
    fn test_open_ended_period_labels() {
        let since = summary(&[], Some(fixtures::date("2024-01-01")), None);
        assert_eq!(since.period, "Depuis 2024-01-01");

        let until = summary(&[], None, Some(fixtures::date("2024-06-30")));
        assert_eq!(until.period, "Jusqu'à 2024-06-30");
    }
}
