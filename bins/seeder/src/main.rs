//! Database seeder for GazStock development and testing.
//!
//! Seeds a few weeks of movements across several ledger partitions: plain
//! inflows and outflows, a mirrored inter-warehouse transfer, and an
//! inventaire that captures an ecart.
//!
//! Usage: cargo run --bin gazstock-seeder

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use gazstock_core::ledger::NewMovement;
use gazstock_db::repositories::StockRepository;
use gazstock_shared::types::{
    BottleType, MovementType, StockCategory, StockClient, StockSite,
};

/// Actor recorded on every seeded row.
const SEED_ACTOR: &str = "seeder@gazstock.dev";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = gazstock_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let repo = StockRepository::new(db);

    println!("Seeding filling centre production flows...");
    seed_production_flows(&repo).await;

    println!("Seeding an inter-warehouse transfer...");
    seed_transfer(&repo).await;

    println!("Seeding an inventaire with ecart...");
    seed_inventaire(&repo).await;

    println!("Seeding complete!");
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("invalid seed date")
}

fn movement(
    movement_type: MovementType,
    day: &str,
    category: StockCategory,
    site: StockSite,
    bottle_type: BottleType,
    quantity: Decimal,
) -> NewMovement {
    NewMovement {
        date: date(day),
        category,
        site,
        bottle_type,
        client: None,
        movement_type,
        quantity,
        stock_reel: None,
        source_warehouse: None,
        destination_warehouse: None,
        bon_numero: None,
        justification_ecart: None,
    }
}

async fn save(repo: &StockRepository, input: NewMovement) {
    repo.save_movement(input, SEED_ACTOR)
        .await
        .expect("failed to seed movement");
}

/// A week of B6/B12 flows at the filling centre, per client.
async fn seed_production_flows(repo: &StockRepository) {
    let days = ["2024-01-08", "2024-01-09", "2024-01-10", "2024-01-11"];
    let clients = [
        StockClient::PetroIvoire,
        StockClient::TotalEnergies,
        StockClient::VivoEnergy,
    ];

    for (index, day) in days.iter().enumerate() {
        for client in clients {
            let mut entree = movement(
                MovementType::Entree,
                day,
                StockCategory::BouteillesNeuves,
                StockSite::CentreEmplisseur,
                BottleType::B6,
                dec!(120) + Decimal::from(index),
            );
            entree.client = Some(client);
            entree.bon_numero = Some(format!("BL-{}-{index}", client.as_str()));
            save(repo, entree).await;
        }

        save(
            repo,
            movement(
                MovementType::Sortie,
                day,
                StockCategory::BouteillesNeuves,
                StockSite::CentreEmplisseur,
                BottleType::B12,
                dec!(35.5),
            ),
        )
        .await;
    }
}

/// A mirrored transfer: 30 B12 from the bulk depot to the filling centre.
async fn seed_transfer(repo: &StockRepository) {
    let mut transfer = movement(
        MovementType::Sortie,
        "2024-01-10",
        StockCategory::DepotVrac,
        StockSite::DepotVrac,
        BottleType::B12,
        dec!(30),
    );
    transfer.destination_warehouse = Some(StockCategory::CentreEmplisseur);
    transfer.bon_numero = Some("BT-2024-0007".to_string());

    save(repo, transfer).await;
}

/// Flows followed by a count that comes up five bottles short.
async fn seed_inventaire(repo: &StockRepository) {
    save(
        repo,
        movement(
            MovementType::Entree,
            "2024-01-08",
            StockCategory::Consignes,
            StockSite::CentreEmplisseur,
            BottleType::B12,
            dec!(100),
        ),
    )
    .await;
    save(
        repo,
        movement(
            MovementType::Sortie,
            "2024-01-09",
            StockCategory::Consignes,
            StockSite::CentreEmplisseur,
            BottleType::B12,
            dec!(40),
        ),
    )
    .await;

    let mut count = movement(
        MovementType::Inventaire,
        "2024-01-12",
        StockCategory::Consignes,
        StockSite::CentreEmplisseur,
        BottleType::B12,
        Decimal::ZERO,
    );
    count.stock_reel = Some(dec!(55));
    count.justification_ecart = Some("Casse non déclarée présumée".to_string());

    save(repo, count).await;
}
