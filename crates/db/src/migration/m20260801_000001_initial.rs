//! Initial database migration.
//!
//! Creates the stock ledger enums, the `stock_movements` table, its
//! indexes, and the `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(STOCK_MOVEMENTS_SQL).await?;
        db.execute_unprepared(INDEXES_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Stock-holding classification; doubles as warehouse identity for transfers
CREATE TYPE stock_category AS ENUM (
    'bouteilles_neuves',
    'consignes',
    'stock_outils',
    'bouteilles_hs',
    'reconfiguration',
    'depot_vrac',
    'centre_emplisseur',
    'parc_ce'
);

-- Plant sites
CREATE TYPE stock_site AS ENUM (
    'depot_vrac',
    'centre_emplisseur'
);

-- Bottle formats
CREATE TYPE bottle_type AS ENUM ('b6', 'b12', 'b28', 'b38');

-- Clients; movements without one are unattributed
CREATE TYPE stock_client AS ENUM (
    'petro_ivoire',
    'total_energies',
    'vivo_energy'
);

-- Movement kinds
CREATE TYPE movement_type AS ENUM ('entree', 'sortie', 'inventaire');
";

const STOCK_MOVEMENTS_SQL: &str = r"
-- Append-only movement log. Balances are always recomputed from these
-- rows; stock_theorique is an audit snapshot, never read back by replay.
CREATE TABLE stock_movements (
    id UUID PRIMARY KEY,
    date DATE NOT NULL,
    category stock_category NOT NULL,
    site stock_site NOT NULL,
    bottle_type bottle_type NOT NULL,
    client stock_client,
    movement_type movement_type NOT NULL,
    quantity NUMERIC(14, 3) NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    stock_reel NUMERIC(14, 3),
    ecart NUMERIC(14, 3),
    stock_theorique NUMERIC(14, 3),
    source_warehouse stock_category,
    destination_warehouse stock_category,
    -- Deliberately not a foreign key: a dangling link after a
    -- cascade=false delete is a valid state awaiting manual correction
    linked_movement_id UUID,
    bon_numero TEXT,
    justification_ecart TEXT,
    last_modified_by TEXT,
    last_modified_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- An inventaire must carry its count; flows must not
    CONSTRAINT stock_reel_matches_type CHECK (
        (movement_type = 'inventaire') = (stock_reel IS NOT NULL)
    )
);
";

const INDEXES_SQL: &str = r"
-- Partition replay: one key's movements in date order
CREATE INDEX idx_stock_movements_partition
    ON stock_movements (category, site, bottle_type, client, date);

-- History listing: newest first
CREATE INDEX idx_stock_movements_date
    ON stock_movements (date DESC, created_at DESC);

CREATE INDEX idx_stock_movements_linked
    ON stock_movements (linked_movement_id)
    WHERE linked_movement_id IS NOT NULL;
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER stock_movements_updated_at
    BEFORE UPDATE ON stock_movements
    FOR EACH ROW
    EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS stock_movements CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;
DROP TYPE IF EXISTS movement_type;
DROP TYPE IF EXISTS stock_client;
DROP TYPE IF EXISTS bottle_type;
DROP TYPE IF EXISTS stock_site;
DROP TYPE IF EXISTS stock_category;
";
