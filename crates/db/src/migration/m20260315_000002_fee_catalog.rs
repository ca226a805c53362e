//! Adds the catalogue fields to `fee_structures`.
//!
//! Existing rows become mandatory yearly fees with no description.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(UP_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DOWN_SQL).await?;
        Ok(())
    }
}

const UP_SQL: &str = r"
CREATE TYPE fee_frequency AS ENUM (
    'MONTHLY',
    'QUARTERLY',
    'YEARLY',
    'ONE_TIME'
);

ALTER TABLE fee_structures
    ADD COLUMN description TEXT,
    ADD COLUMN frequency fee_frequency NOT NULL DEFAULT 'YEARLY',
    ADD COLUMN is_optional BOOLEAN NOT NULL DEFAULT FALSE;

CREATE INDEX idx_fee_structures_school_created
    ON fee_structures(school_id, created_at DESC)
    WHERE deleted_at IS NULL;
";

const DOWN_SQL: &str = r"
DROP INDEX IF EXISTS idx_fee_structures_school_created;

ALTER TABLE fee_structures
    DROP COLUMN IF EXISTS is_optional,
    DROP COLUMN IF EXISTS frequency,
    DROP COLUMN IF EXISTS description;

DROP TYPE IF EXISTS fee_frequency;
";
