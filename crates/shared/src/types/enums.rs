//! Domain enums for the stock ledger.
//!
//! These mirror the Postgres enum types one-for-one. String forms are the
//! snake_case database values, which also appear on the wire.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a domain enum from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {expected}")]
pub struct ParseEnumError {
    /// The rejected input.
    pub value: String,
    /// Name of the expected enum.
    pub expected: &'static str,
}

impl ParseEnumError {
    fn new(value: &str, expected: &'static str) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}

/// Stock-holding classification of a movement.
///
/// Categories double as warehouse identities for inter-warehouse transfers;
/// the mirror allow-list over them lives in `gazstock-core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockCategory {
    /// Newly manufactured bottles.
    BouteillesNeuves,
    /// Customer-deposit bottles.
    Consignes,
    /// Tooling stock.
    StockOutils,
    /// Out-of-service bottles.
    BouteillesHs,
    /// Bottles being reconfigured.
    Reconfiguration,
    /// Bulk depot.
    DepotVrac,
    /// Filling centre.
    CentreEmplisseur,
    /// Bottle fleet in circulation at the filling centre.
    ParcCe,
}

impl StockCategory {
    /// Every category, in a stable order.
    pub const ALL: [Self; 8] = [
        Self::BouteillesNeuves,
        Self::Consignes,
        Self::StockOutils,
        Self::BouteillesHs,
        Self::Reconfiguration,
        Self::DepotVrac,
        Self::CentreEmplisseur,
        Self::ParcCe,
    ];

    /// Returns the snake_case database value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BouteillesNeuves => "bouteilles_neuves",
            Self::Consignes => "consignes",
            Self::StockOutils => "stock_outils",
            Self::BouteillesHs => "bouteilles_hs",
            Self::Reconfiguration => "reconfiguration",
            Self::DepotVrac => "depot_vrac",
            Self::CentreEmplisseur => "centre_emplisseur",
            Self::ParcCe => "parc_ce",
        }
    }
}

impl std::fmt::Display for StockCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError::new(s, "stock category"))
    }
}

/// Physical site of the plant a movement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockSite {
    /// Bulk depot site.
    DepotVrac,
    /// Filling centre site.
    CentreEmplisseur,
}

impl StockSite {
    /// Every site, in a stable order.
    pub const ALL: [Self; 2] = [Self::DepotVrac, Self::CentreEmplisseur];

    /// Returns the snake_case database value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DepotVrac => "depot_vrac",
            Self::CentreEmplisseur => "centre_emplisseur",
        }
    }
}

impl std::fmt::Display for StockSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockSite {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ParseEnumError::new(s, "stock site"))
    }
}

/// Bottle format handled by the plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleType {
    /// 6 kg bottle.
    B6,
    /// 12.5 kg bottle.
    B12,
    /// 28 kg bottle.
    B28,
    /// 38 kg bottle.
    B38,
}

impl BottleType {
    /// Every bottle type, in a stable order.
    pub const ALL: [Self; 4] = [Self::B6, Self::B12, Self::B28, Self::B38];

    /// Returns the snake_case database value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::B6 => "b6",
            Self::B12 => "b12",
            Self::B28 => "b28",
            Self::B38 => "b38",
        }
    }
}

impl std::fmt::Display for BottleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BottleType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ParseEnumError::new(s, "bottle type"))
    }
}

/// Client a movement is attributed to. Absent means unattributed stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockClient {
    /// Petro Ivoire.
    PetroIvoire,
    /// TOTAL Energies.
    TotalEnergies,
    /// VIVO Energy.
    VivoEnergy,
}

impl StockClient {
    /// Every client, in a stable order.
    pub const ALL: [Self; 3] = [Self::PetroIvoire, Self::TotalEnergies, Self::VivoEnergy];

    /// Returns the snake_case database value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PetroIvoire => "petro_ivoire",
            Self::TotalEnergies => "total_energies",
            Self::VivoEnergy => "vivo_energy",
        }
    }
}

impl std::fmt::Display for StockClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockClient {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ParseEnumError::new(s, "stock client"))
    }
}

/// Kind of stock event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Inflow into the ledger partition.
    Entree,
    /// Outflow from the ledger partition.
    Sortie,
    /// Physical count; resets the ledger baseline.
    Inventaire,
}

impl MovementType {
    /// Every movement type, in a stable order.
    pub const ALL: [Self; 3] = [Self::Entree, Self::Sortie, Self::Inventaire];

    /// Returns the snake_case database value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entree => "entree",
            Self::Sortie => "sortie",
            Self::Inventaire => "inventaire",
        }
    }

    /// Returns the inverse flow direction, if any.
    ///
    /// Mirrors of inter-warehouse transfers flip entree and sortie; an
    /// inventaire has no inverse.
    #[must_use]
    pub const fn inverted(self) -> Option<Self> {
        match self {
            Self::Entree => Some(Self::Sortie),
            Self::Sortie => Some(Self::Entree),
            Self::Inventaire => None,
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ParseEnumError::new(s, "movement type"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&StockCategory::BouteillesNeuves).unwrap(),
            "\"bouteilles_neuves\""
        );
        assert_eq!(
            serde_json::from_str::<StockSite>("\"centre_emplisseur\"").unwrap(),
            StockSite::CentreEmplisseur
        );
        assert_eq!(
            serde_json::to_string(&MovementType::Inventaire).unwrap(),
            "\"inventaire\""
        );
    }

    #[test]
    fn test_display_matches_serde() {
        for category in StockCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{category}\""));
        }
        for bottle in BottleType::ALL {
            let json = serde_json::to_string(&bottle).unwrap();
            assert_eq!(json, format!("\"{bottle}\""));
        }
    }

    #[test]
    fn test_from_str_roundtrip() {
        for client in StockClient::ALL {
            assert_eq!(StockClient::from_str(client.as_str()).unwrap(), client);
        }
        for movement_type in MovementType::ALL {
            assert_eq!(
                MovementType::from_str(movement_type.as_str()).unwrap(),
                movement_type
            );
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = StockCategory::from_str("sigma").unwrap_err();
        assert_eq!(err.value, "sigma");
        assert!(BottleType::from_str("B12").is_err(), "values are lowercase");
    }

    #[test]
    fn test_inverted_flips_flows_only() {
        assert_eq!(MovementType::Entree.inverted(), Some(MovementType::Sortie));
        assert_eq!(MovementType::Sortie.inverted(), Some(MovementType::Entree));
        assert_eq!(MovementType::Inventaire.inverted(), None);
    }
}
