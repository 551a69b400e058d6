//! `SeaORM` active enums mirroring the Postgres enum types.
//!
//! The pure domain enums live in `gazstock-shared`; these carry the
//! database mapping and convert losslessly in both directions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use gazstock_shared::types as domain;

/// Stock-holding classification (`stock_category`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stock_category")]
#[serde(rename_all = "snake_case")]
pub enum StockCategory {
    /// Newly manufactured bottles.
    #[sea_orm(string_value = "bouteilles_neuves")]
    BouteillesNeuves,
    /// Customer-deposit bottles.
    #[sea_orm(string_value = "consignes")]
    Consignes,
    /// Tooling stock.
    #[sea_orm(string_value = "stock_outils")]
    StockOutils,
    /// Out-of-service bottles.
    #[sea_orm(string_value = "bouteilles_hs")]
    BouteillesHs,
    /// Bottles being reconfigured.
    #[sea_orm(string_value = "reconfiguration")]
    Reconfiguration,
    /// Bulk depot.
    #[sea_orm(string_value = "depot_vrac")]
    DepotVrac,
    /// Filling centre.
    #[sea_orm(string_value = "centre_emplisseur")]
    CentreEmplisseur,
    /// Bottle fleet in circulation.
    #[sea_orm(string_value = "parc_ce")]
    ParcCe,
}

/// Plant site (`stock_site`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stock_site")]
#[serde(rename_all = "snake_case")]
pub enum StockSite {
    /// Bulk depot site.
    #[sea_orm(string_value = "depot_vrac")]
    DepotVrac,
    /// Filling centre site.
    #[sea_orm(string_value = "centre_emplisseur")]
    CentreEmplisseur,
}

/// Bottle format (`bottle_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bottle_type")]
#[serde(rename_all = "snake_case")]
pub enum BottleType {
    /// 6 kg bottle.
    #[sea_orm(string_value = "b6")]
    B6,
    /// 12.5 kg bottle.
    #[sea_orm(string_value = "b12")]
    B12,
    /// 28 kg bottle.
    #[sea_orm(string_value = "b28")]
    B28,
    /// 38 kg bottle.
    #[sea_orm(string_value = "b38")]
    B38,
}

/// Client attribution (`stock_client`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stock_client")]
#[serde(rename_all = "snake_case")]
pub enum StockClient {
    /// Petro Ivoire.
    #[sea_orm(string_value = "petro_ivoire")]
    PetroIvoire,
    /// TOTAL Energies.
    #[sea_orm(string_value = "total_energies")]
    TotalEnergies,
    /// VIVO Energy.
    #[sea_orm(string_value = "vivo_energy")]
    VivoEnergy,
}

/// Kind of stock event (`movement_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_type")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Inflow.
    #[sea_orm(string_value = "entree")]
    Entree,
    /// Outflow.
    #[sea_orm(string_value = "sortie")]
    Sortie,
    /// Physical count.
    #[sea_orm(string_value = "inventaire")]
    Inventaire,
}

// ============================================================================
// Domain conversions
// ============================================================================

impl From<domain::StockCategory> for StockCategory {
    fn from(value: domain::StockCategory) -> Self {
        match value {
            domain::StockCategory::BouteillesNeuves => Self::BouteillesNeuves,
            domain::StockCategory::Consignes => Self::Consignes,
            domain::StockCategory::StockOutils => Self::StockOutils,
            domain::StockCategory::BouteillesHs => Self::BouteillesHs,
            domain::StockCategory::Reconfiguration => Self::Reconfiguration,
            domain::StockCategory::DepotVrac => Self::DepotVrac,
            domain::StockCategory::CentreEmplisseur => Self::CentreEmplisseur,
            domain::StockCategory::ParcCe => Self::ParcCe,
        }
    }
}

impl From<StockCategory> for domain::StockCategory {
    fn from(value: StockCategory) -> Self {
        match value {
            StockCategory::BouteillesNeuves => Self::BouteillesNeuves,
            StockCategory::Consignes => Self::Consignes,
            StockCategory::StockOutils => Self::StockOutils,
            StockCategory::BouteillesHs => Self::BouteillesHs,
            StockCategory::Reconfiguration => Self::Reconfiguration,
            StockCategory::DepotVrac => Self::DepotVrac,
            StockCategory::CentreEmplisseur => Self::CentreEmplisseur,
            StockCategory::ParcCe => Self::ParcCe,
        }
    }
}

impl From<domain::StockSite> for StockSite {
    fn from(value: domain::StockSite) -> Self {
        match value {
            domain::StockSite::DepotVrac => Self::DepotVrac,
            domain::StockSite::CentreEmplisseur => Self::CentreEmplisseur,
        }
    }
}

impl From<StockSite> for domain::StockSite {
    fn from(value: StockSite) -> Self {
        match value {
            StockSite::DepotVrac => Self::DepotVrac,
            StockSite::CentreEmplisseur => Self::CentreEmplisseur,
        }
    }
}

impl From<domain::BottleType> for BottleType {
    fn from(value: domain::BottleType) -> Self {
        match value {
            domain::BottleType::B6 => Self::B6,
            domain::BottleType::B12 => Self::B12,
            domain::BottleType::B28 => Self::B28,
            domain::BottleType::B38 => Self::B38,
        }
    }
}

impl From<BottleType> for domain::BottleType {
    fn from(value: BottleType) -> Self {
        match value {
            BottleType::B6 => Self::B6,
            BottleType::B12 => Self::B12,
            BottleType::B28 => Self::B28,
            BottleType::B38 => Self::B38,
        }
    }
}

impl From<domain::StockClient> for StockClient {
    fn from(value: domain::StockClient) -> Self {
        match value {
            domain::StockClient::PetroIvoire => Self::PetroIvoire,
            domain::StockClient::TotalEnergies => Self::TotalEnergies,
            domain::StockClient::VivoEnergy => Self::VivoEnergy,
        }
    }
}

impl From<StockClient> for domain::StockClient {
    fn from(value: StockClient) -> Self {
        match value {
            StockClient::PetroIvoire => Self::PetroIvoire,
            StockClient::TotalEnergies => Self::TotalEnergies,
            StockClient::VivoEnergy => Self::VivoEnergy,
        }
    }
}

impl From<domain::MovementType> for MovementType {
    fn from(value: domain::MovementType) -> Self {
        match value {
            domain::MovementType::Entree => Self::Entree,
            domain::MovementType::Sortie => Self::Sortie,
            domain::MovementType::Inventaire => Self::Inventaire,
        }
    }
}

impl From<MovementType> for domain::MovementType {
    fn from(value: MovementType) -> Self {
        match value {
            MovementType::Entree => Self::Entree,
            MovementType::Sortie => Self::Sortie,
            MovementType::Inventaire => Self::Inventaire,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_conversion_roundtrips() {
        for category in domain::StockCategory::ALL {
            let db: StockCategory = category.into();
            let back: domain::StockCategory = db.into();
            assert_eq!(back, category);
        }
    }

    #[test]
    fn test_movement_type_conversion_roundtrips() {
        for movement_type in domain::MovementType::ALL {
            let db: MovementType = movement_type.into();
            let back: domain::MovementType = db.into();
            assert_eq!(back, movement_type);
        }
    }

    #[test]
    fn test_string_values_match_domain_strings() {
        use sea_orm::ActiveEnum;

        for category in domain::StockCategory::ALL {
            let db: StockCategory = category.into();
            assert_eq!(db.to_value(), category.as_str());
        }
        for client in domain::StockClient::ALL {
            let db: StockClient = client.into();
            assert_eq!(db.to_value(), client.as_str());
        }
    }
}
